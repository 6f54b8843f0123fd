use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use futures::stream;

use crate::models::{OutputResponse, StreamEvent};
use crate::services::{ConversationService, OutputService};
use crate::utils::error::{AppError, AppResult, ErrorResponse};
use crate::utils::text::preview;

/// 获取语音管线的最新输出，已经发过的内容返回空字符串
#[utoipa::path(
    get,
    path = "/claude-output",
    tag = "Bridge",
    responses(
        (status = 200, description = "最新输出", body = OutputResponse),
        (status = 500, description = "读取失败", body = ErrorResponse)
    )
)]
#[get("/claude-output")]
pub async fn claude_output(output: web::Data<OutputService>) -> AppResult<HttpResponse> {
    let response = output.take_new_output().await?.unwrap_or_default();
    Ok(HttpResponse::Ok().json(OutputResponse { response }))
}

fn sse_frame(event: &StreamEvent) -> Result<web::Bytes, AppError> {
    let json = serde_json::to_string(event)?;
    Ok(web::Bytes::from(format!("data: {json}\n\n")))
}

/// 以 SSE 实时推送回复增量
#[utoipa::path(
    get,
    path = "/claude-stream",
    tag = "Bridge",
    responses(
        (status = 200, description = "text/event-stream，每条数据为 StreamEvent", body = StreamEvent)
    )
)]
#[get("/claude-stream")]
pub async fn claude_stream(conversation: web::Data<ConversationService>) -> HttpResponse {
    let watcher = conversation.watch().await;
    log::info!("SSE client connected");

    // 客户端断开后 actix 会丢弃这个流，轮询随之结束
    let events = stream::unfold(watcher, |mut watcher| async move {
        let event = watcher.next_event().await;
        log::debug!("SSE 推送: {}", preview(&event.delta, 30));
        Some((sse_frame(&event), watcher))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events)
}
