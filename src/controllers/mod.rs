pub mod bridge;
pub mod health;
pub mod memory;
pub mod output;

pub use bridge::{claude_input, send_message};
pub use health::health_check;
pub use memory::{claude_resurrection, recent_memories};
pub use output::{claude_output, claude_stream};
