use std::path::PathBuf;

use tokio::fs;

use crate::config::AppConfig;
use crate::models::MemoryEntry;
use crate::utils::error::AppResult;

pub struct MemoryService {
    memory_dir: PathBuf,
    resurrection_file: PathBuf,
    recent_count: usize,
}

impl MemoryService {
    pub fn new(
        memory_dir: impl Into<PathBuf>,
        resurrection_file: impl Into<PathBuf>,
        recent_count: usize,
    ) -> Self {
        Self {
            memory_dir: memory_dir.into(),
            resurrection_file: resurrection_file.into(),
            recent_count,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.memory_dir,
            &config.resurrection_file,
            config.recent_memory_count,
        )
    }

    /// 最近的几份对话记录（按文件名倒序）
    pub async fn recent_memories(&self) -> AppResult<Vec<MemoryEntry>> {
        fs::create_dir_all(&self.memory_dir).await?;

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.memory_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".md") {
                    names.push(name.to_string());
                }
            }
        }

        names.sort_unstable_by(|a, b| b.cmp(a));
        names.truncate(self.recent_count);

        let mut memories = Vec::with_capacity(names.len());
        for filename in names {
            let content = fs::read_to_string(self.memory_dir.join(&filename)).await?;
            memories.push(MemoryEntry { filename, content });
        }

        Ok(memories)
    }

    pub async fn resurrection(&self) -> AppResult<String> {
        let content = fs::read_to_string(&self.resurrection_file).await?;
        Ok(content)
    }
}
