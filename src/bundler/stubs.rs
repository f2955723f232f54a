use super::imports::{ExternalBinding, ImportKind};
use regex::Regex;
use std::sync::LazyLock;

static JS_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

const STUB_PRELUDE: &str = r#"
// ---- Preview stubs for unsupported external modules ----
const __PreviewStubComponent = (label) => Object.assign(
  (...args) => React.createElement(
    'div',
    {
      style: {
        padding: '16px',
        border: '1px dashed rgba(211, 47, 47, 0.4)',
        borderRadius: '12px',
        background: 'rgba(211, 47, 47, 0.08)',
        color: '#d32f2f',
        margin: '12px 0',
        fontFamily: 'monospace',
        fontSize: '14px',
        textAlign: 'center'
      }
    },
    label + ' unavailable in preview'
  ),
  { displayName: label }
);
const __PreviewStubNamespace = (label) =>
  new Proxy({}, { get: () => __PreviewStubComponent(label) });
"#;

const STUB_EPILOGUE: &str = "// -----------------------------------------------------\n\n";

/// Collects external bindings across files, keeping first-seen order.
///
/// A name is bound once even when several files (or several import kinds)
/// mention it; a second `const` with the same name would not parse.
#[derive(Debug, Default)]
pub struct StubSet {
    bindings: Vec<ExternalBinding>,
}

impl StubSet {
    pub fn add(&mut self, binding: ExternalBinding) {
        if !JS_IDENTIFIER.is_match(&binding.name) {
            log::debug!(
                "Skipping stub for non-identifier '{}' from '{}'",
                binding.name,
                binding.source
            );
            return;
        }
        if self.bindings.iter().any(|b| b.name == binding.name) {
            return;
        }
        self.bindings.push(binding);
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Emits the stub preamble, defaults first, then named, then namespaces.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut code = String::from(STUB_PRELUDE);
        for kind in [ImportKind::Default, ImportKind::Named, ImportKind::Namespace] {
            for binding in self.bindings.iter().filter(|b| b.kind == kind) {
                let factory = match kind {
                    ImportKind::Namespace => "__PreviewStubNamespace",
                    ImportKind::Default | ImportKind::Named => "__PreviewStubComponent",
                };
                code.push_str(&format!(
                    "const {name} = {factory}('{name}');\n",
                    name = binding.name
                ));
            }
        }
        code.push_str(STUB_EPILOGUE);
        code
    }
}
