use actix_web::{get, HttpResponse, Responder};

use crate::models::HealthResponse;

/// 健康检查端点
///
/// 只返回固定的服务信息，不检查对话文件是否可用。
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "服务健康", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        service: "Claude Code Bridge".to_string(),
        version: "1.0".to_string(),
    })
}
