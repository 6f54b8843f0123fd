use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod controllers;
mod models;
mod routes;
mod services;
mod utils;

use config::CONFIG;
use services::{ConversationService, MemoryService, OutputService};

#[derive(OpenApi)]
#[openapi(
    paths(
        controllers::health::health_check,
        controllers::bridge::send_message,
        controllers::bridge::claude_input,
        controllers::output::claude_output,
        controllers::output::claude_stream,
        controllers::memory::recent_memories,
        controllers::memory::claude_resurrection,
    ),
    components(schemas(
        models::HealthResponse,
        models::MessageRequest,
        models::MessageResponse,
        models::InputRequest,
        models::AckResponse,
        models::OutputResponse,
        models::StreamEvent,
        models::MemoryEntry,
        models::RecentMemoriesResponse,
        models::ResurrectionResponse,
        utils::error::ErrorResponse,
    )),
    tags(
        (name = "Health", description = "存活检查"),
        (name = "Bridge", description = "通过对话文件与 Claude Code 交换消息"),
        (name = "Memory", description = "历史对话记录")
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载.env文件
    dotenv().ok();

    // 初始化日志
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    log::info!("[BRIDGE] Claude Code Bridge starting...");

    // 所有 worker 共享同一份读取进度
    let conversation = web::Data::new(ConversationService::from_config(&CONFIG));
    log::info!("[BRIDGE] Conversation file: {}", conversation.path().display());
    log::info!("[BRIDGE] Output file: {}", CONFIG.output_file);
    log::info!("[BRIDGE] Memory dir: {}", CONFIG.memory_dir);

    let output = web::Data::new(OutputService::from_config(&CONFIG));
    let memory = web::Data::new(MemoryService::from_config(&CONFIG));

    let host = CONFIG.host.clone();
    let port = CONFIG.port;
    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        // 前端部署在别处，允许任意来源
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(conversation.clone())
            .app_data(output.clone())
            .app_data(memory.clone())
            .wrap(middleware::Logger::default())
            .wrap(cors)
            .configure(routes::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
