use crate::errors::AppError;
use crate::vfs::VirtualFileSystem;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const GITIGNORE: &str = "# Dependencies
node_modules/
.pnp
.pnp.js

# Testing
coverage/

# Production
build/
dist/

# Misc
.DS_Store
.env.local
.env.development.local
.env.test.local
.env.production.local

npm-debug.log*
yarn-debug.log*
yarn-error.log*
";

/// Packs the project into a zip that unpacks as a git checkout on `main`.
///
/// The `.git` directory is a stub: config, HEAD and a ref, no objects. The
/// ref hash is derived from the file contents so the same project always
/// exports byte-identical metadata. A `.gitignore` and a README are added
/// when the project has none.
pub fn export_project_zip(vfs: &VirtualFileSystem, repo_name: &str) -> Result<Vec<u8>, AppError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut file_count = 0;
    for (path, content) in vfs.iter() {
        let name = path.trim_start_matches('/');
        if name.is_empty() || name.starts_with(".git/") {
            continue;
        }
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        file_count += 1;
    }

    zip.add_directory(".git/", options)?;
    zip.start_file(".git/config", options)?;
    zip.write_all(git_config(repo_name).as_bytes())?;
    zip.start_file(".git/HEAD", options)?;
    zip.write_all(b"ref: refs/heads/main\n")?;
    zip.add_directory(".git/objects/", options)?;
    zip.add_directory(".git/refs/heads/", options)?;
    zip.add_directory(".git/refs/tags/", options)?;
    zip.start_file(".git/refs/heads/main", options)?;
    zip.write_all(format!("{}\n", commit_hash(vfs)).as_bytes())?;

    if !has_root_file(vfs, ".gitignore") {
        zip.start_file(".gitignore", options)?;
        zip.write_all(GITIGNORE.as_bytes())?;
    }
    if !has_root_file(vfs, "README.md") {
        zip.start_file("README.md", options)?;
        zip.write_all(readme(vfs, repo_name).as_bytes())?;
    }

    let cursor = zip.finish()?;
    log::debug!("Exported {} project file(s) as {}", file_count, repo_name);
    Ok(cursor.into_inner())
}

/// 40 hex chars, the shape of a git object id.
pub fn commit_hash(vfs: &VirtualFileSystem) -> String {
    let mut hasher = blake3::Hasher::new();
    for (path, content) in vfs.iter() {
        hasher.update(path.as_bytes());
        hasher.update(&[0]);
        hasher.update(content.as_bytes());
        hasher.update(&[0]);
    }
    let hash = hasher.finalize().to_hex();
    hash.as_str()[..40].to_string()
}

fn has_root_file(vfs: &VirtualFileSystem, name: &str) -> bool {
    vfs.has(&format!("/{}", name)) || vfs.has(name)
}

fn git_config(repo_name: &str) -> String {
    format!(
        "[core]
\trepositoryformatversion = 0
\tfilemode = true
\tbare = false
\tlogallrefupdates = true
[remote \"origin\"]
\turl = https://github.com/user/{}.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
[branch \"main\"]
\tremote = origin
\tmerge = refs/heads/main
",
        repo_name
    )
}

fn readme(vfs: &VirtualFileSystem, repo_name: &str) -> String {
    let structure: Vec<String> = vfs.paths().map(|p| format!("- {}", p)).collect();
    format!(
        "# {}

Generated with vibe-preview.

## Getting Started

```bash
npm install
npm run dev
```

## Project Structure

{}
",
        repo_name,
        structure.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample() -> VirtualFileSystem {
        let mut vfs = VirtualFileSystem::new();
        vfs.set("/src/App.tsx", "export default function App() {}");
        vfs.set("/src/index.css", "body { margin: 0; }");
        vfs.set("/.git/config", "should not be copied");
        vfs
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut text = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_export_contents() {
        let bytes = export_project_zip(&sample(), "demo").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        assert_eq!(
            read_entry(&mut archive, "src/App.tsx"),
            "export default function App() {}"
        );
        assert_eq!(read_entry(&mut archive, ".git/HEAD"), "ref: refs/heads/main\n");
        assert!(read_entry(&mut archive, ".git/config")
            .contains("url = https://github.com/user/demo.git"));
        let head = read_entry(&mut archive, ".git/refs/heads/main");
        assert_eq!(head.trim().len(), 40);
        assert!(head.trim().chars().all(|c| c.is_ascii_hexdigit()));

        assert!(read_entry(&mut archive, ".gitignore").contains("node_modules/"));
        let readme = read_entry(&mut archive, "README.md");
        assert!(readme.starts_with("# demo"));
        assert!(readme.contains("- /src/index.css"));
    }

    #[test]
    fn test_existing_readme_kept() {
        let mut vfs = sample();
        vfs.set("/README.md", "# mine");
        let bytes = export_project_zip(&vfs, "demo").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(read_entry(&mut archive, "README.md"), "# mine");
    }

    #[test]
    fn test_commit_hash_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(commit_hash(&a), commit_hash(&b));
        b.set("/src/App.tsx", "export default function App() { }");
        assert_ne!(commit_hash(&a), commit_hash(&b));
    }
}
