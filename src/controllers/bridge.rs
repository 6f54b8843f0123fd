use actix_web::{post, web, HttpResponse};

use crate::models::{AckResponse, InputRequest, MessageRequest, MessageResponse};
use crate::services::ConversationService;
use crate::utils::error::{AppError, AppResult, ErrorResponse};
use crate::utils::text::preview;

/// 发送消息并等待回复
///
/// 消息追加到对话文件后会一直轮询，直到出现新的回复或超时。
#[utoipa::path(
    post,
    path = "/message",
    tag = "Bridge",
    request_body = MessageRequest,
    responses(
        (status = 200, description = "收到回复", body = MessageResponse),
        (status = 400, description = "缺少 message 字段", body = ErrorResponse),
        (status = 503, description = "无法写入对话文件", body = ErrorResponse),
        (status = 504, description = "等待回复超时", body = ErrorResponse)
    )
)]
#[post("/message")]
pub async fn send_message(
    body: Option<web::Json<MessageRequest>>,
    conversation: web::Data<ConversationService>,
) -> AppResult<HttpResponse> {
    // 请求体不是合法 JSON 时也按缺少消息处理
    let message = body
        .and_then(|b| b.into_inner().message)
        .ok_or(AppError::MissingMessage)?;

    log::info!("[BRIDGE] Received message: {}...", preview(&message, 50));

    let response = conversation.exchange(&message).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::success(response)))
}

/// 只写入输入，不等待回复
#[utoipa::path(
    post,
    path = "/claude-input",
    tag = "Bridge",
    request_body = InputRequest,
    responses(
        (status = 200, description = "已写入", body = AckResponse),
        (status = 400, description = "缺少 text 字段", body = ErrorResponse)
    )
)]
#[post("/claude-input")]
pub async fn claude_input(
    body: Option<web::Json<InputRequest>>,
    conversation: web::Data<ConversationService>,
) -> AppResult<HttpResponse> {
    let text = body
        .and_then(|b| b.into_inner().text)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingText)?;

    conversation.append_input(&text).await?;
    log::info!("输入已追加到对话文件: {}...", preview(&text, 50));

    Ok(HttpResponse::Ok().json(AckResponse {
        success: true,
        message: "Message envoyé à Claude Code".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn conversation_in(dir: &tempfile::TempDir) -> web::Data<ConversationService> {
        web::Data::new(
            ConversationService::new(
                dir.path().join("current_conversation.txt"),
                "## Claude:",
                "## Alain:",
            )
            .with_timing(Duration::from_millis(10), Duration::from_millis(300)),
        )
    }

    #[actix_web::test]
    async fn test_message_without_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(conversation_in(&dir))
                .service(send_message),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/message")
            .set_json(serde_json::json!({ "text": "wrong field" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No message provided");
    }

    #[actix_web::test]
    async fn test_message_returns_appended_response() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = conversation_in(&dir);
        let path = conversation.path().to_path_buf();
        let app = test::init_service(
            App::new()
                .app_data(conversation.clone())
                .service(send_message),
        )
        .await;

        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
                .unwrap();
            file.write_all(b"\n## Claude: Il est midi.\n").await.unwrap();
            file.flush().await.unwrap();
        });

        let req = test::TestRequest::post()
            .uri("/message")
            .set_json(serde_json::json!({ "message": "Quelle heure est-il ?" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        writer.await.unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["response"], "Il est midi.");
    }

    #[actix_web::test]
    async fn test_message_timeout_is_gateway_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(conversation_in(&dir))
                .service(send_message),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/message")
            .set_json(serde_json::json!({ "message": "hello?" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[actix_web::test]
    async fn test_input_appends_text() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = conversation_in(&dir);
        let app = test::init_service(
            App::new()
                .app_data(conversation.clone())
                .service(claude_input),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/claude-input")
            .set_json(serde_json::json!({ "text": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/claude-input")
            .set_json(serde_json::json!({ "text": "bonsoir" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Message envoyé à Claude Code");

        let content = tokio::fs::read_to_string(conversation.path()).await.unwrap();
        assert_eq!(content, "## Alain: bonsoir\n\n");
    }
}
