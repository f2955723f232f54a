use crate::errors::AppError;
use crate::models::ai::ChatMessage;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where the conversation is kept between runs.
pub fn history_path(output_directory: &Path) -> PathBuf {
    output_directory.join("vibe.output").join("history.json")
}

/// Loads the saved conversation. A missing or unreadable file starts a new one.
pub async fn load_history(path: &Path) -> Result<Vec<ChatMessage>, AppError> {
    if !fs::try_exists(path).await? {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path).await?;
    match serde_json::from_str(&raw) {
        Ok(messages) => Ok(messages),
        Err(e) => {
            log::warn!("Ignoring unreadable history {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

pub async fn save_history(path: &Path, messages: &[ChatMessage]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let raw = serde_json::to_string_pretty(messages)?;
    fs::write(path, raw).await?;
    log::debug!("Saved {} message(s) to {}", messages.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ai::Role;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_history_round_trip() {
        let dir = tempdir().unwrap();
        let path = history_path(dir.path());
        assert!(load_history(&path).await.unwrap().is_empty());

        let messages = vec![
            ChatMessage::new(Role::User, "make it blue"),
            ChatMessage::new(Role::Assistant, "export default function App() {}"),
        ];
        save_history(&path, &messages).await.unwrap();
        assert!(path.ends_with("vibe.output/history.json"));
        assert_eq!(load_history(&path).await.unwrap(), messages);
    }

    #[tokio::test]
    async fn test_corrupt_history_starts_fresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_history(&path).await.unwrap().is_empty());
    }
}
