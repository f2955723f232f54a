//! The `srcdoc` document executed inside the sandboxed iframe.

use crate::bundler::bundle_multi_file_project;
use crate::vfs::VirtualFileSystem;

pub const REACT_SRC: &str = "https://unpkg.com/react@18/umd/react.development.js";
pub const REACT_DOM_SRC: &str = "https://unpkg.com/react-dom@18/umd/react-dom.development.js";
pub const BABEL_SRC: &str = "https://unpkg.com/@babel/standalone/babel.min.js";

pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self' 'unsafe-inline' 'unsafe-eval' https: data: blob:; script-src 'self' 'unsafe-inline' 'unsafe-eval' https://unpkg.com; style-src 'self' 'unsafe-inline';";

/// Global names probed, in order, for the component to mount.
pub const ROOT_COMPONENT_CANDIDATES: &[&str] = &["App", "Dashboard", "Main", "Root", "Component"];

pub const NO_COMPONENT_MESSAGE: &str =
    "No component found. Make sure you define and export a main component like App or Dashboard.";

const EMPTY_PROJECT_HTML: &str = "<div>No files</div>";

const CSS_INJECTOR_HEAD: &str = r#"  <script>
    (function() {
      const css = "#;

const CSS_INJECTOR_TAIL: &str = r#";
      if (css && css.trim().length > 0) {
        const styleTag = document.createElement('style');
        styleTag.id = '__preview-user-style__';
        styleTag.textContent = css;
        document.head.appendChild(styleTag);
      }
    })();
  </script>
"#;

const HARNESS_HEAD: &str = r#"  <script>
    (function() {
      const reportError = (error, stack) => {
        try {
          window.parent.postMessage({ type: 'preview-error', error: error, stack: stack }, '*');
        } catch (e) {}
      };

      const showError = (error) => {
        console.error('Preview error:', error);
        const detail = error && error.stack ? error.stack : (error && error.message ? error.message : String(error));
        const panel = document.createElement('div');
        panel.setAttribute('style', 'padding:2rem;font-family:monospace;background:#1f1b2e;color:#ff4d4f;');
        const title = document.createElement('h2');
        title.setAttribute('style', 'margin-bottom:1rem;');
        title.textContent = 'Preview Error';
        const pre = document.createElement('pre');
        pre.setAttribute('style', 'white-space:pre-wrap;word-break:break-word;background:rgba(0,0,0,0.4);border-radius:8px;padding:1rem;');
        pre.textContent = detail;
        panel.appendChild(title);
        panel.appendChild(pre);
        document.body.innerHTML = '';
        document.body.appendChild(panel);
      };

      window.addEventListener('error', (event) => {
        event.preventDefault();
        const error = event.error || new Error(event.message);
        showError(error);
        reportError(error.message, error.stack || event.message);
      });

      window.addEventListener('unhandledrejection', (event) => {
        event.preventDefault();
        const error = event.reason instanceof Error ? event.reason : new Error(String(event.reason));
        showError(error);
        reportError(error.message, error.stack);
      });

      try {
        const code = "#;

const HARNESS_TAIL: &str = r#";

        const transformed = Babel.transform(code, {
          presets: ['typescript', 'react'],
          sourceType: 'module',
          filename: 'preview.tsx'
        }).code;

        const exportsObj = {};
        const moduleObj = { exports: exportsObj };
        const require = (name) => {
          if (name === 'react') return React;
          if (name === 'react-dom') return ReactDOM;
          throw new Error('Preview cannot import module: ' + name);
        };

        const functionBody = [
          'const { useState, useEffect, useRef, useMemo, useCallback, useContext } = React;',
          transformed,
          'const candidates = [',
"#;

const HARNESS_FOOTER: &str = r#"          '  module.exports && module.exports.default ? module.exports.default : null,',
          '  exports && exports.default ? exports.default : null',
          '].filter(Boolean);',
          'return candidates.length > 0 ? candidates[0] : null;'
        ].join('\n');

        const executeCode = new Function('React', 'ReactDOM', 'exports', 'module', 'require', functionBody);
        const component = executeCode(React, ReactDOM, exportsObj, moduleObj, require);
        if (!component) {
          throw new Error(NO_COMPONENT_MESSAGE);
        }

        const rootElement = document.getElementById('root');
        if (!rootElement) {
          throw new Error('Root element not found');
        }
        ReactDOM.createRoot(rootElement).render(React.createElement(component));
      } catch (error) {
        const errorObj = error instanceof Error ? error : new Error(String(error));
        showError(errorObj);
        reportError(errorObj.message, errorObj.stack);
      }
    })();
  </script>
</body>
</html>"#;

/// Bundles the project and wraps it in a complete preview document.
pub fn generate_preview_html(vfs: &VirtualFileSystem) -> String {
    if vfs.is_empty() {
        return EMPTY_PROJECT_HTML.to_string();
    }
    let bundle = bundle_multi_file_project(vfs);
    build_preview_html(&bundle.code, &bundle.css)
}

/// Assembles the document around an already bundled script and stylesheet.
pub fn build_preview_html(code: &str, css: &str) -> String {
    let mut html = String::with_capacity(code.len() + css.len() + 8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!(
        "  <meta http-equiv=\"Content-Security-Policy\" content=\"{}\">\n",
        CONTENT_SECURITY_POLICY
    ));
    html.push_str(&format!(
        "  <script crossorigin src=\"{}\"></script>\n",
        REACT_SRC
    ));
    html.push_str(&format!(
        "  <script crossorigin src=\"{}\"></script>\n",
        REACT_DOM_SRC
    ));
    html.push_str(&format!("  <script src=\"{}\"></script>\n", BABEL_SRC));
    html.push_str(
        r#"  <style id="__preview-base-style__">
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: system-ui, -apple-system, sans-serif; background: #fff; color: #000; }
    #root { width: 100%; min-height: 100vh; }
  </style>
</head>
<body>
  <div id="root"></div>
"#,
    );

    html.push_str(CSS_INJECTOR_HEAD);
    html.push_str(&script_string_literal(css));
    html.push_str(CSS_INJECTOR_TAIL);

    html.push_str(HARNESS_HEAD);
    html.push_str(&script_string_literal(code));
    html.push_str(HARNESS_TAIL);
    for name in ROOT_COMPONENT_CANDIDATES {
        html.push_str(&format!(
            "          \"  typeof {name} !== 'undefined' ? {name} : null,\",\n"
        ));
    }
    let footer = HARNESS_FOOTER.replace(
        "NO_COMPONENT_MESSAGE",
        &script_string_literal(NO_COMPONENT_MESSAGE),
    );
    html.push_str(&footer);
    html
}

/// JSON-encodes `text` for use as a JS string literal inside `<script>`.
///
/// `</` and `<!--` are escaped so bundle content can neither close the
/// enclosing element nor push the parser into the double-escaped script state.
pub fn script_string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}
