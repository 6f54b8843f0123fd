use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout_at, Instant};

use crate::config::AppConfig;
use crate::models::StreamEvent;
use crate::utils::error::{AppError, AppResult};
use crate::utils::text::preview;

// 对话文件的读取进度
#[derive(Debug, Default)]
struct ConversationState {
    last_position: u64,
    request_counter: u64,
}

/// 对话文件服务
///
/// 把消息追加到共享的对话文件里，然后轮询同一个文件，
/// 直到在上次读到的位置之后出现回复标记。
pub struct ConversationService {
    path: PathBuf,
    response_marker: String,
    user_marker: String,
    poll_interval: Duration,
    timeout: Duration,
    stream_interval: Duration,
    // 一次只进行一轮问答，否则并发请求会互相抢走回复
    state: Mutex<ConversationState>,
}

impl ConversationService {
    pub fn new(
        path: impl Into<PathBuf>,
        response_marker: impl Into<String>,
        user_marker: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            response_marker: response_marker.into(),
            user_marker: user_marker.into(),
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
            stream_interval: Duration::from_millis(200),
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.conversation_file,
            &config.response_marker,
            &config.user_marker,
        )
        .with_timing(config.poll_interval(), config.response_timeout())
        .with_stream_interval(config.stream_interval())
    }

    pub fn with_timing(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        self.stream_interval = interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 发送一条消息并等待回复
    ///
    /// 超时从调用时开始计算，排队等锁的时间也算在内。
    pub async fn exchange(&self, message: &str) -> AppResult<String> {
        let deadline = Instant::now() + self.timeout;
        let mut state = timeout_at(deadline, self.state.lock())
            .await
            .map_err(|_| {
                log::warn!("[BRIDGE] Timeout waiting for a previous exchange to finish");
                AppError::ResponseTimeout
            })?;
        state.request_counter += 1;
        let request_id = state.request_counter;

        self.sync_position(&mut state).await;

        let entry = format!(
            "\n\n{} [{}]\n{}\n",
            self.user_marker,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        if let Err(e) = self.append(&entry).await {
            log::error!(
                "[BRIDGE] #{} 写入对话文件 {} 失败: {}",
                request_id,
                self.path.display(),
                e
            );
            return Err(AppError::ConversationWrite(e));
        }
        log::info!("[BRIDGE] #{} Message written to conversation file", request_id);

        log::info!("[BRIDGE] #{} Waiting for response...", request_id);
        match self.wait_for_response(&mut state, deadline).await {
            // 只有标记没有内容不算回复
            Some(response) if !response.is_empty() => {
                log::info!(
                    "[BRIDGE] #{} Got response: {}...",
                    request_id,
                    preview(&response, 50)
                );
                Ok(response)
            }
            _ => {
                log::warn!("[BRIDGE] #{} Timeout waiting for response", request_id);
                Err(AppError::ResponseTimeout)
            }
        }
    }

    /// 只追加输入，不等待回复
    pub async fn append_input(&self, text: &str) -> AppResult<()> {
        let entry = format!("{} {}\n\n", self.user_marker, text);
        self.append(&entry).await?;
        Ok(())
    }

    /// 为一个 SSE 订阅者创建监视器，从当前文件末尾开始
    pub async fn watch(&self) -> ConversationWatcher {
        let last_size = fs::metadata(&self.path)
            .await
            .map(|m| m.len())
            .unwrap_or(0);

        ConversationWatcher {
            path: self.path.clone(),
            response_marker: self.response_marker.clone(),
            user_marker: self.user_marker.clone(),
            interval: self.stream_interval,
            last_size,
            last_content: String::new(),
        }
    }

    #[cfg(test)]
    async fn last_position(&self) -> u64 {
        self.state.lock().await.last_position
    }

    // 首次使用时跳到文件末尾，忽略启动前已有的回复
    async fn sync_position(&self, state: &mut ConversationState) {
        if state.last_position != 0 {
            return;
        }
        if let Ok(meta) = fs::metadata(&self.path).await {
            state.last_position = meta.len();
        }
    }

    async fn append(&self, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    async fn wait_for_response(
        &self,
        state: &mut ConversationState,
        deadline: Instant,
    ) -> Option<String> {
        while Instant::now() < deadline {
            match read_from(&self.path, state.last_position).await {
                Ok((chunk, end)) => {
                    if let Some(response) =
                        extract_response(&chunk, &self.response_marker, &self.user_marker)
                    {
                        state.last_position = end;
                        return Some(response);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::error!("Error reading conversation: {}", e),
            }
            sleep(self.poll_interval).await;
        }

        None
    }
}

// 从 offset 读到文件末尾，返回内容和新的位置
async fn read_from(path: &Path, offset: u64) -> std::io::Result<(String, u64)> {
    let mut file = fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    // 文件被截断过，从头开始
    let start = if offset > len { 0 } else { offset };

    file.seek(SeekFrom::Start(start)).await?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await?;

    let end = start + buf.len() as u64;
    Ok((String::from_utf8_lossy(&buf).into_owned(), end))
}

/// 取最后一个回复标记之后的文本，遇到下一条用户消息时截断
pub fn extract_response(chunk: &str, response_marker: &str, user_marker: &str) -> Option<String> {
    if response_marker.is_empty() {
        return None;
    }

    let (_, last) = chunk.rsplit_once(response_marker)?;
    let last = last.trim();
    let text = match last.split_once(user_marker) {
        Some((head, _)) if !user_marker.is_empty() => head.trim(),
        _ => last,
    };

    Some(text.to_string())
}

/// 找到最后一个以回复标记开头的行，收集到下一条用户消息为止的非空行
pub fn latest_response_block(
    content: &str,
    response_marker: &str,
    user_marker: &str,
) -> Option<String> {
    if response_marker.is_empty() {
        return None;
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let start = lines
        .iter()
        .rposition(|line| line.starts_with(response_marker))?;

    let mut collected = Vec::new();
    let first = lines[start]
        .strip_prefix(response_marker)
        .unwrap_or_default()
        .trim();
    if !first.is_empty() {
        collected.push(first);
    }

    for line in &lines[start + 1..] {
        if !user_marker.is_empty() && line.starts_with(user_marker) {
            break;
        }
        if !line.trim().is_empty() {
            collected.push(*line);
        }
    }

    let block = collected.join("\n").trim().to_string();
    (!block.is_empty()).then_some(block)
}

/// 单个 SSE 订阅者的状态
pub struct ConversationWatcher {
    path: PathBuf,
    response_marker: String,
    user_marker: String,
    interval: Duration,
    last_size: u64,
    last_content: String,
}

impl ConversationWatcher {
    /// 按固定间隔轮询，直到有新的增量
    pub async fn next_event(&mut self) -> StreamEvent {
        loop {
            sleep(self.interval).await;
            if let Some(event) = self.poll().await {
                return event;
            }
        }
    }

    /// 文件变大且最新回复有变化时返回增量
    pub async fn poll(&mut self) -> Option<StreamEvent> {
        let size = fs::metadata(&self.path).await.ok()?.len();
        if size < self.last_size {
            // 文件被清空或重写
            self.last_size = size;
            return None;
        }
        if size == self.last_size {
            return None;
        }

        let content = match fs::read(&self.path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                log::error!("SSE 读取对话文件失败: {}", e);
                return None;
            }
        };
        self.last_size = size;

        let full = latest_response_block(&content, &self.response_marker, &self.user_marker)?;
        if full == self.last_content {
            return None;
        }

        let delta = match full.strip_prefix(self.last_content.as_str()) {
            Some(rest) => rest.to_string(),
            None => full.clone(),
        };
        self.last_content = full.clone();

        Some(StreamEvent { delta, full })
    }
}
