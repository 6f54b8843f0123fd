use actix_web::web;
use crate::controllers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // 健康检查
        .service(controllers::health_check)      // GET /health
        // 对话文件桥接
        .service(controllers::send_message)      // POST /message
        .service(controllers::claude_input)      // POST /claude-input
        .service(controllers::claude_output)     // GET /claude-output
        .service(controllers::claude_stream)     // GET /claude-stream
        // 历史记忆
        .service(controllers::recent_memories)   // GET /recent-memories
        .service(controllers::claude_resurrection); // GET /claude-resurrection
}
