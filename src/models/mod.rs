pub mod ai;

use serde::{Deserialize, Serialize};

/// A single file held by the virtual file system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub path: String,
    pub content: String,
}

impl VirtualFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A file recovered from an LLM response.
pub type ParsedFile = VirtualFile;

/// Output of the bundler: one executable script plus the extracted stylesheet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub code: String,
    pub css: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Add,
    Remove,
    Same,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub line: String,
    #[serde(rename = "lineNumber")]
    pub line_number: usize,
}

/// Node of the folder/file tree built from the VFS paths.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileNode {
    Folder {
        path: String,
        name: String,
        children: Vec<FileNode>,
    },
    File {
        path: String,
        name: String,
        language: String,
    },
}

impl FileNode {
    pub fn name(&self) -> &str {
        match self {
            FileNode::Folder { name, .. } | FileNode::File { name, .. } => name,
        }
    }
}
