use crate::errors::AppError;
use crate::vfs::VirtualFileSystem;
use std::path::{Component, Path};
use tokio::fs;
use walkdir::{DirEntry, WalkDir};

/// Maximum allowed file size (10 MB).
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const TEXT_EXTENSIONS: [&str; 16] = [
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "css", "html", "md", "txt", "svg", "yaml",
    "yml", "toml", "xml",
];

/// Extensionless text files picked up by name.
const TEXT_FILE_NAMES: [&str; 2] = [".gitignore", ".env"];

/// Directories that never belong to the previewed project.
const SKIPPED_DIRS: [&str; 5] = ["node_modules", ".git", "dist", "build", "vibe.output"];

/// Loads every text file under `root` into a fresh VFS.
///
/// `root/src/App.tsx` becomes `/src/App.tsx`. Oversized files and files in
/// skipped directories are left out with a log line.
pub async fn load_project(root: &Path) -> Result<VirtualFileSystem, AppError> {
    if !root.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Project directory does not exist: {}",
            root.display()
        )));
    }

    let mut vfs = VirtualFileSystem::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_text_file(entry.path()) {
            continue;
        }

        let metadata = fs::metadata(entry.path()).await?;
        if metadata.len() > MAX_FILE_SIZE {
            log::warn!(
                "Skipping {}: larger than {} bytes",
                entry.path().display(),
                MAX_FILE_SIZE
            );
            continue;
        }

        let Some(vfs_path) = to_vfs_path(root, entry.path()) else {
            continue;
        };
        let bytes = fs::read(entry.path()).await?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                log::warn!("Skipping {}: not valid UTF-8", entry.path().display());
                continue;
            }
        };
        vfs.set(vfs_path, content);
    }

    log::debug!("Loaded {} file(s) from {}", vfs.len(), root.display());
    Ok(vfs)
}

/// Reads a single text file, with the same size limit as `load_project`.
pub async fn read_text_file(path: &Path) -> Result<String, AppError> {
    let metadata = fs::metadata(path).await?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(AppError::InvalidInput(format!(
            "File too large: {} (max {} bytes)",
            path.display(),
            MAX_FILE_SIZE
        )));
    }
    Ok(fs::read_to_string(path).await?)
}

/// Maps a file below `root` to its `/`-rooted VFS path.
pub fn to_vfs_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}", parts.join("/")))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

fn is_text_file(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if TEXT_FILE_NAMES.contains(&name) {
            return true;
        }
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_project_maps_paths() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std_fs::create_dir_all(root.join("src/components")).unwrap();
        std_fs::create_dir_all(root.join("node_modules/react")).unwrap();
        std_fs::write(root.join("src/App.tsx"), "export default function App() {}").unwrap();
        std_fs::write(root.join("src/components/Card.tsx"), "export function Card() {}").unwrap();
        std_fs::write(root.join("src/logo.png"), [0u8, 159, 146, 150]).unwrap();
        std_fs::write(root.join("node_modules/react/index.js"), "module.exports = {}").unwrap();
        std_fs::write(root.join(".gitignore"), "node_modules/").unwrap();

        let vfs = load_project(root).await.unwrap();
        assert_eq!(
            vfs.paths().collect::<Vec<_>>(),
            vec!["/.gitignore", "/src/App.tsx", "/src/components/Card.tsx"]
        );
        assert_eq!(vfs.get("/src/App.tsx"), Some("export default function App() {}"));
    }

    #[tokio::test]
    async fn test_load_project_skips_non_utf8_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std_fs::create_dir_all(root.join("src")).unwrap();
        std_fs::write(root.join("src/App.tsx"), "export default function App() {}").unwrap();
        std_fs::write(root.join("notes.txt"), [0x63u8, 0x61, 0x66, 0xe9]).unwrap();

        let vfs = load_project(root).await.unwrap();
        assert_eq!(vfs.paths().collect::<Vec<_>>(), vec!["/src/App.tsx"]);
    }

    #[tokio::test]
    async fn test_load_project_reads_dotenv() {
        let dir = tempdir().unwrap();
        std_fs::write(dir.path().join(".env"), "VITE_TITLE=demo").unwrap();

        let vfs = load_project(dir.path()).await.unwrap();
        assert_eq!(vfs.get("/.env"), Some("VITE_TITLE=demo"));
    }

    #[tokio::test]
    async fn test_load_project_missing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            load_project(&missing).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_to_vfs_path() {
        let root = Path::new("/work/project");
        assert_eq!(
            to_vfs_path(root, Path::new("/work/project/src/App.tsx")),
            Some("/src/App.tsx".to_string())
        );
        assert_eq!(to_vfs_path(root, root), None);
        assert_eq!(to_vfs_path(root, Path::new("/elsewhere/App.tsx")), None);
    }
}
