use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    // 对话文件（消息与回复都追加在这里）
    pub conversation_file: String,
    pub response_marker: String,
    pub user_marker: String,
    pub response_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub stream_interval_ms: u64,
    // 语音管线输出
    pub output_file: String,
    pub last_sent_file: String,
    // 历史记忆
    pub memory_dir: String,
    pub recent_memory_count: usize,
    pub resurrection_file: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 3334),
            conversation_file: env_or("CONVERSATION_FILE", "current_conversation.txt"),
            response_marker: env_or("RESPONSE_MARKER", "## Claude:"),
            user_marker: env_or("USER_MARKER", "## Alain:"),
            response_timeout_secs: env_parse_or("RESPONSE_TIMEOUT_SECS", 60),
            poll_interval_ms: env_parse_or("POLL_INTERVAL_MS", 500),
            stream_interval_ms: env_parse_or("STREAM_INTERVAL_MS", 200),
            output_file: env_or("OUTPUT_FILE", "voice_output_clean.txt"),
            last_sent_file: env_or("LAST_SENT_FILE", ".last_response.txt"),
            memory_dir: env_or("MEMORY_DIR", "conversations"),
            recent_memory_count: env_parse_or("RECENT_MEMORY_COUNT", 3),
            resurrection_file: env_or("RESURRECTION_FILE", "CLAUDE_RESURRECTION.md"),
        }
    }
}

impl AppConfig {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

lazy_static! {
    pub static ref CONFIG: Arc<AppConfig> = Arc::new(AppConfig::default());
}
