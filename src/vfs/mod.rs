use crate::models::{FileNode, VirtualFile};
use std::collections::BTreeMap;

/// In-memory project files keyed by absolute, slash-separated path.
///
/// Iteration is always in sorted path order, so anything derived from a
/// snapshot (bundles, change keys, exports) is independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFileSystem {
    files: BTreeMap<String, String>,
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Creates or overwrites a file.
    pub fn set(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn delete(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    pub fn has(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Returns every file in path order.
    pub fn list(&self) -> Vec<VirtualFile> {
        self.files
            .iter()
            .map(|(path, content)| VirtualFile::new(path.clone(), content.clone()))
            .collect()
    }

    /// Replaces the whole file set. This is not a merge: files missing from
    /// `files` are gone afterwards.
    pub fn import_all<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = VirtualFile>,
    {
        self.clear();
        for file in files {
            self.files.insert(file.path, file.content);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Renders the project the way prompts expect it: one `// File:` marker per
    /// file, blocks separated by `---`.
    pub fn to_prompt_context(&self) -> String {
        self.files
            .iter()
            .map(|(path, content)| format!("// File: {}\n{}", path, content))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    /// Builds the folder/file tree. Folders sort before files, then by name.
    pub fn file_tree(&self) -> Vec<FileNode> {
        let mut root = TreeBuilder::default();
        for path in self.files.keys() {
            let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
            root.insert(path, &parts, 0);
        }
        root.into_nodes()
    }
}

#[derive(Default)]
struct TreeBuilder {
    folders: BTreeMap<String, (String, TreeBuilder)>,
    files: BTreeMap<String, String>,
}

impl TreeBuilder {
    fn insert(&mut self, full_path: &str, parts: &[&str], depth: usize) {
        let Some(name) = parts.get(depth) else {
            return;
        };
        if depth + 1 == parts.len() {
            self.files.insert(name.to_string(), full_path.to_string());
            return;
        }
        let folder_path = format!("/{}", parts[..=depth].join("/"));
        let (_, child) = self
            .folders
            .entry(name.to_string())
            .or_insert_with(|| (folder_path, TreeBuilder::default()));
        child.insert(full_path, parts, depth + 1);
    }

    fn into_nodes(self) -> Vec<FileNode> {
        let mut nodes = Vec::with_capacity(self.folders.len() + self.files.len());
        for (name, (path, child)) in self.folders {
            nodes.push(FileNode::Folder {
                path,
                name,
                children: child.into_nodes(),
            });
        }
        for (name, path) in self.files {
            let language = language_from_path(&path).to_string();
            nodes.push(FileNode::File {
                path,
                name,
                language,
            });
        }
        nodes
    }
}

/// Editor language for a path, derived from its extension.
pub fn language_from_path(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "tsx" | "ts" => "typescript",
        "jsx" | "js" => "javascript",
        "css" => "css",
        "html" => "html",
        "json" => "json",
        "md" => "markdown",
        _ => "plaintext",
    }
}

/// Prefixes a path with `/` when it is missing.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
