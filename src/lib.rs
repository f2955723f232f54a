//! Multi-file JS/TSX bundling, sandboxed live preview and LLM answer
//! handling for small React projects.

pub mod api;
pub mod bundler;
pub mod cli;
pub mod commands;
pub mod diff;
pub mod errors;
pub mod file_processing;
pub mod models;
pub mod preview;
pub mod utils;
pub mod vfs;

pub use bundler::bundle_multi_file_project;
pub use diff::calculate_diff;
pub use file_processing::response_parser::parse_multi_file_response;
pub use preview::generate_preview_html;
pub use vfs::VirtualFileSystem;
