use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// POST /message 请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MessageRequest {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub response: String,
    pub status: String,
}

impl MessageResponse {
    pub fn success(response: String) -> Self {
        Self {
            response,
            status: "success".to_string(),
        }
    }
}

// POST /claude-input 请求体
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InputRequest {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// 语音管线输出，没有新内容时 `response` 为空字符串
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OutputResponse {
    pub response: String,
}

/// SSE 推送的一条增量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StreamEvent {
    pub delta: String,
    pub full: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemoryEntry {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentMemoriesResponse {
    pub memories: Vec<MemoryEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResurrectionResponse {
    pub content: String,
}
