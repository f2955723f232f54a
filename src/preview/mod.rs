pub mod change_key;
pub mod harness;
pub mod host;
pub mod message;

pub use change_key::change_key;
pub use harness::{build_preview_html, generate_preview_html};
pub use host::{render_host_page, SANDBOX_POLICY};
pub use message::PreviewMessage;
