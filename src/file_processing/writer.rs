use crate::errors::AppError;
use crate::models::{Bundle, VirtualFile};
use crate::vfs::VirtualFileSystem;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Counts of what a write touched on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub removed: usize,
}

/// Turns a VFS path into a location below `root`.
///
/// Paths come from model output, so anything that could escape `root`
/// (`..`, drive prefixes) is rejected.
pub fn resolve_target(root: &Path, vfs_path: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(vfs_path.trim_start_matches('/'));
    let mut target = root.to_path_buf();
    let mut depth = 0;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                target.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Refusing to write outside the project: {}",
                    vfs_path
                )))
            }
        }
    }
    if depth == 0 {
        return Err(AppError::InvalidInput(format!(
            "Not a file path: {:?}",
            vfs_path
        )));
    }
    Ok(target)
}

/// Writes files below `root`, creating parent directories as needed.
pub async fn write_files(root: &Path, files: &[VirtualFile]) -> Result<usize, AppError> {
    for file in files {
        write_one(root, &file.path, &file.content).await?;
    }
    Ok(files.len())
}

/// Makes the project on disk match `after`, given that it currently matches
/// `before`. Unchanged files are not touched.
pub async fn sync_project(
    root: &Path,
    before: &VirtualFileSystem,
    after: &VirtualFileSystem,
) -> Result<WriteSummary, AppError> {
    let mut summary = WriteSummary::default();

    for (path, content) in after.iter() {
        if before.get(path) != Some(content) {
            write_one(root, path, content).await?;
            summary.written += 1;
        }
    }

    for path in before.paths().filter(|p| !after.has(p)) {
        let target = resolve_target(root, path)?;
        if fs::try_exists(&target).await? {
            fs::remove_file(&target).await?;
            log::info!("Removed {}", target.display());
            summary.removed += 1;
        }
    }

    Ok(summary)
}

/// Empties (or creates) a results directory.
pub async fn reset_output_dir(dir: &Path) -> Result<(), AppError> {
    if fs::try_exists(dir).await? {
        fs::remove_dir_all(dir).await?;
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Writes `bundle.js` and `bundle.css` into `out_dir`.
pub async fn write_bundle(out_dir: &Path, bundle: &Bundle) -> Result<(PathBuf, PathBuf), AppError> {
    fs::create_dir_all(out_dir).await?;
    let code_path = out_dir.join("bundle.js");
    let css_path = out_dir.join("bundle.css");
    fs::write(&code_path, &bundle.code).await?;
    fs::write(&css_path, &bundle.css).await?;
    Ok((code_path, css_path))
}

async fn write_one(root: &Path, vfs_path: &str, content: &str) -> Result<(), AppError> {
    let target = resolve_target(root, vfs_path)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&target, content).await?;
    log::debug!("Wrote {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_target() {
        let root = Path::new("/project");
        assert_eq!(
            resolve_target(root, "/src/App.tsx").unwrap(),
            PathBuf::from("/project/src/App.tsx")
        );
        assert_eq!(
            resolve_target(root, "src/./x.css").unwrap(),
            PathBuf::from("/project/src/x.css")
        );
        assert!(resolve_target(root, "/../etc/passwd").is_err());
        assert!(resolve_target(root, "/").is_err());
    }

    #[tokio::test]
    async fn test_write_files_creates_parents() {
        let dir = tempdir().unwrap();
        let files = vec![
            VirtualFile::new("/src/App.tsx", "app"),
            VirtualFile::new("/src/components/deep/Card.tsx", "card"),
        ];
        assert_eq!(write_files(dir.path(), &files).await.unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/components/deep/Card.tsx")).unwrap(),
            "card"
        );
    }

    #[tokio::test]
    async fn test_sync_project_writes_changes_and_removes_missing() {
        let dir = tempdir().unwrap();
        let mut before = VirtualFileSystem::new();
        before.set("/src/App.tsx", "old");
        before.set("/src/Gone.tsx", "gone");
        before.set("/src/Same.tsx", "same");
        write_files(dir.path(), &before.list()).await.unwrap();

        let mut after = before.clone();
        after.set("/src/App.tsx", "new");
        after.delete("/src/Gone.tsx");
        after.set("/src/Added.tsx", "added");

        let summary = sync_project(dir.path(), &before, &after).await.unwrap();
        assert_eq!(summary, WriteSummary { written: 2, removed: 1 });
        assert!(!dir.path().join("src/Gone.tsx").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/App.tsx")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn test_reset_output_dir_and_bundle() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.txt"), "x").unwrap();

        reset_output_dir(&out).await.unwrap();
        assert!(!out.join("stale.txt").exists());

        let bundle = Bundle {
            code: "const a = 1;".into(),
            css: "body{}".into(),
        };
        let (js, css) = write_bundle(&out, &bundle).await.unwrap();
        assert_eq!(std::fs::read_to_string(js).unwrap(), "const a = 1;");
        assert_eq!(std::fs::read_to_string(css).unwrap(), "body{}");
    }
}
