pub mod conversation;
pub mod memory;
pub mod output;

pub use conversation::ConversationService;
pub use memory::MemoryService;
pub use output::OutputService;
