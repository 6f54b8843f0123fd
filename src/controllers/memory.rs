use actix_web::{get, web, HttpResponse};

use crate::models::{RecentMemoriesResponse, ResurrectionResponse};
use crate::services::MemoryService;
use crate::utils::error::{AppResult, ErrorResponse};

#[utoipa::path(
    get,
    path = "/recent-memories",
    tag = "Memory",
    responses(
        (status = 200, description = "最近的对话记录", body = RecentMemoriesResponse),
        (status = 500, description = "读取失败", body = ErrorResponse)
    )
)]
#[get("/recent-memories")]
pub async fn recent_memories(memory: web::Data<MemoryService>) -> AppResult<HttpResponse> {
    let memories = memory.recent_memories().await?;
    Ok(HttpResponse::Ok().json(RecentMemoriesResponse { memories }))
}

#[utoipa::path(
    get,
    path = "/claude-resurrection",
    tag = "Memory",
    responses(
        (status = 200, description = "上下文恢复文件内容", body = ResurrectionResponse),
        (status = 500, description = "文件不存在或无法读取", body = ErrorResponse)
    )
)]
#[get("/claude-resurrection")]
pub async fn claude_resurrection(memory: web::Data<MemoryService>) -> AppResult<HttpResponse> {
    let content = memory.resurrection().await.map_err(|e| {
        log::error!("读取上下文恢复文件失败: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(ResurrectionResponse { content }))
}
