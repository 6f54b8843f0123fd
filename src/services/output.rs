use std::path::PathBuf;

use tokio::fs;

use crate::config::AppConfig;
use crate::utils::error::AppResult;
use crate::utils::text::preview;

// 语音管线输出服务，每条输出只转发一次
pub struct OutputService {
    output_file: PathBuf,
    last_sent_file: PathBuf,
}

impl OutputService {
    pub fn new(output_file: impl Into<PathBuf>, last_sent_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
            last_sent_file: last_sent_file.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.output_file, &config.last_sent_file)
    }

    /// 读取尚未转发过的输出，没有时返回 None
    pub async fn take_new_output(&self) -> AppResult<Option<String>> {
        if !fs::try_exists(&self.output_file).await? {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.output_file).await?;
        let content = content.trim();
        // 以 # 开头的是占位说明，不是回复
        if content.is_empty() || content.starts_with('#') {
            return Ok(None);
        }

        let last_sent = match fs::read_to_string(&self.last_sent_file).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if content == last_sent.trim() {
            return Ok(None);
        }

        fs::write(&self.last_sent_file, content).await?;
        log::info!("收到新的回复输出: {}...", preview(content, 50));

        Ok(Some(content.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_is_forwarded_once() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("voice_output_clean.txt");
        let last_sent = dir.path().join(".last_response.txt");
        let service = OutputService::new(&output, &last_sent);

        // 文件不存在
        assert_eq!(service.take_new_output().await.unwrap(), None);

        fs::write(&output, "  Il fait beau.\n").await.unwrap();
        assert_eq!(
            service.take_new_output().await.unwrap(),
            Some("Il fait beau.".to_string())
        );
        assert_eq!(fs::read_to_string(&last_sent).await.unwrap(), "Il fait beau.");

        // 同一条输出不会再发一次
        assert_eq!(service.take_new_output().await.unwrap(), None);

        fs::write(&output, "Autre chose").await.unwrap();
        assert_eq!(
            service.take_new_output().await.unwrap(),
            Some("Autre chose".to_string())
        );
    }

    #[tokio::test]
    async fn test_placeholder_and_blank_output_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let service = OutputService::new(&output, dir.path().join("sent.txt"));

        fs::write(&output, "# waiting for voice pipeline").await.unwrap();
        assert_eq!(service.take_new_output().await.unwrap(), None);

        fs::write(&output, "   \n").await.unwrap();
        assert_eq!(service.take_new_output().await.unwrap(), None);
    }
}
