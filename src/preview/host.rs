//! Host page that embeds the preview document in a sandboxed iframe.

use super::message::PREVIEW_ERROR_TYPE;

/// Scripts may run, but the frame never shares the host's origin, so previewed
/// code cannot reach cookies, storage or the parent DOM.
pub const SANDBOX_POLICY: &str = "allow-scripts";

/// Wraps a `srcdoc` document in a page that hosts it and surfaces
/// `preview-error` messages. Messages of any other shape are ignored.
pub fn render_host_page(title: &str, srcdoc: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    html, body {{ margin: 0; height: 100%; }}
    iframe {{ width: 100%; height: 100%; border: 0; background: white; }}
    #preview-error {{ display: none; position: fixed; left: 0; right: 0; bottom: 0; max-height: 40%; overflow: auto; margin: 0; padding: 1rem; font-family: monospace; white-space: pre-wrap; background: #1f1b2e; color: #ff4d4f; }}
  </style>
</head>
<body>
  <iframe title="Live Preview" sandbox="{sandbox}" srcdoc="{srcdoc}"></iframe>
  <pre id="preview-error"></pre>
  <script>
    window.addEventListener('message', (event) => {{
      const data = event.data;
      if (!data || data.type !== '{message_type}' || typeof data.error !== 'string') {{
        return;
      }}
      const panel = document.getElementById('preview-error');
      panel.textContent = data.stack ? data.error + '\n' + data.stack : data.error;
      panel.style.display = 'block';
    }});
  </script>
</body>
</html>
"#,
        title = escape_html(title),
        sandbox = SANDBOX_POLICY,
        srcdoc = escape_html(srcdoc),
        message_type = PREVIEW_ERROR_TYPE,
    )
}

/// Escapes text for use inside a double- or single-quoted HTML attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
