//! Line-oriented import and export rewriting.
//!
//! Nothing here is a real JavaScript parser. Lines are matched with regexes,
//! which means an `import` that merely appears at the start of a line inside a
//! template string is stripped as well.

use regex::Regex;
use std::sync::LazyLock;

/// External modules that resolve to globals inside the preview sandbox.
pub const ALLOWED_EXTERNAL_MODULES: &[&str] = &["react", "react-dom"];

static FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(.+?)\s+from\s+['"]([^'"]+)['"];?$"#).expect("valid import regex")
});

static BARE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+['"]([^'"]+)['"];?$"#).expect("valid bare import regex")
});

static ALIAS_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\s+as\s+").expect("valid alias regex"));

static EXPORT_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"export\s+default\s+function\s+", "function "),
        (r"export\s+function\s+", "function "),
        (r"export\s+const\s+", "const "),
        (r"export\s+default\s+", ""),
        (r"export\s+\{[^}]+\};?\n?", ""),
        (r"export\s+", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid export regex"), replacement))
    .collect()
});

/// How an unresolved external binding was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Named,
    Namespace,
}

/// An identifier bound by an import from a module the sandbox cannot load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalBinding {
    pub name: String,
    pub kind: ImportKind,
    pub source: String,
}

/// What to do with one line that starts with `import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportLine {
    /// Relative or absolute source; the symbol lives in the concatenated scope.
    Internal { source: String },
    /// `react` / `react-dom`, available as globals.
    Allowed { source: String },
    /// Any other package. Bindings need stubs.
    External {
        source: String,
        bindings: Vec<ExternalBinding>,
    },
    /// Starts with `import` but matched neither shape.
    Unrecognized,
}

/// Returns `None` when the line is not an import and must be kept.
pub fn classify_line(line: &str) -> Option<ImportLine> {
    let trimmed = line.trim();
    if !trimmed.starts_with("import") {
        return None;
    }

    if let Some(caps) = FROM_IMPORT.captures(trimmed) {
        let specifiers = caps[1].trim();
        let source = caps[2].trim().to_string();
        return Some(match source_kind(&source) {
            SourceKind::Internal => ImportLine::Internal { source },
            SourceKind::Allowed => ImportLine::Allowed { source },
            SourceKind::External => ImportLine::External {
                bindings: parse_import_specifiers(specifiers, &source),
                source,
            },
        });
    }

    if let Some(caps) = BARE_IMPORT.captures(trimmed) {
        let source = caps[1].trim().to_string();
        return Some(match source_kind(&source) {
            SourceKind::Internal => ImportLine::Internal { source },
            SourceKind::Allowed => ImportLine::Allowed { source },
            SourceKind::External => ImportLine::External {
                source,
                bindings: Vec::new(),
            },
        });
    }

    Some(ImportLine::Unrecognized)
}

enum SourceKind {
    Internal,
    Allowed,
    External,
}

fn source_kind(source: &str) -> SourceKind {
    if source.starts_with('.') || source.starts_with('/') {
        SourceKind::Internal
    } else if ALLOWED_EXTERNAL_MODULES.contains(&source) {
        SourceKind::Allowed
    } else {
        SourceKind::External
    }
}

/// Parses the part between `import` and `from`.
///
/// Handles `Default`, `{ a, b as c }`, `* as ns`, `Default, { a }` and a
/// leading `type` modifier. For aliased names only the alias is bound.
pub fn parse_import_specifiers(specifiers: &str, source: &str) -> Vec<ExternalBinding> {
    let mut bindings = Vec::new();
    let mut push = |name: &str, kind: ImportKind| {
        let name = name.trim();
        if !name.is_empty() {
            bindings.push(ExternalBinding {
                name: name.to_string(),
                kind,
                source: source.to_string(),
            });
        }
    };

    let remaining = specifiers.trim();
    let remaining = remaining.strip_prefix("type ").unwrap_or(remaining).trim();
    if remaining.is_empty() {
        return bindings;
    }

    if remaining.starts_with('{') && remaining.ends_with('}') {
        for name in named_list(remaining) {
            push(&name, ImportKind::Named);
        }
        return bindings;
    }

    if let Some(ns) = remaining.strip_prefix("* as ") {
        push(ns, ImportKind::Namespace);
        return bindings;
    }

    let parts: Vec<&str> = remaining
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [] => {}
        [single] => push(single, ImportKind::Default),
        [default, rest @ ..] => {
            push(default, ImportKind::Default);
            let named = rest.join(",");
            let named = named.trim();
            if named.starts_with('{') && named.ends_with('}') {
                for name in named_list(named) {
                    push(&name, ImportKind::Named);
                }
            } else if let Some(ns) = named.strip_prefix("* as ") {
                push(ns, ImportKind::Namespace);
            }
        }
    }
    bindings
}

/// `{ a, type B, c as d }` -> `["a", "B", "d"]`
fn named_list(braced: &str) -> Vec<String> {
    braced[1..braced.len() - 1]
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| n.strip_prefix("type ").unwrap_or(n).trim())
        .map(|n| ALIAS_PREFIX.replace(n, "").trim().to_string())
        .collect()
}

/// Strips export syntax but keeps the declarations.
pub fn strip_exports(source: &str) -> String {
    EXPORT_REWRITES
        .iter()
        .fold(source.to_string(), |text, (regex, replacement)| {
            regex.replace_all(&text, *replacement).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(bindings: &[ExternalBinding]) -> Vec<(&str, ImportKind)> {
        bindings.iter().map(|b| (b.name.as_str(), b.kind)).collect()
    }

    #[test]
    fn test_non_import_lines_pass() {
        assert_eq!(classify_line("const x = 1;"), None);
        assert_eq!(classify_line("  return <div/>;"), None);
    }

    #[test]
    fn test_internal_and_allowed() {
        assert_eq!(
            classify_line("import { Btn } from './components/Btn';"),
            Some(ImportLine::Internal {
                source: "./components/Btn".to_string()
            })
        );
        assert_eq!(
            classify_line("import Header from \"/src/Header\""),
            Some(ImportLine::Internal {
                source: "/src/Header".to_string()
            })
        );
        assert_eq!(
            classify_line("import React, { useState } from 'react';"),
            Some(ImportLine::Allowed {
                source: "react".to_string()
            })
        );
        assert_eq!(
            classify_line("import './index.css';"),
            Some(ImportLine::Internal {
                source: "./index.css".to_string()
            })
        );
    }

    #[test]
    fn test_external_bindings() {
        let Some(ImportLine::External { source, bindings }) =
            classify_line("import Chart, { Line as L, Bar } from 'chart-lib';")
        else {
            panic!("expected external import");
        };
        assert_eq!(source, "chart-lib");
        assert_eq!(
            names(&bindings),
            vec![
                ("Chart", ImportKind::Default),
                ("L", ImportKind::Named),
                ("Bar", ImportKind::Named),
            ]
        );
    }

    #[test]
    fn test_namespace_and_type_imports() {
        assert_eq!(
            names(&parse_import_specifiers("* as Icons", "lucide-react")),
            vec![("Icons", ImportKind::Namespace)]
        );
        assert_eq!(
            names(&parse_import_specifiers("type { Props, type Other }", "lib")),
            vec![("Props", ImportKind::Named), ("Other", ImportKind::Named)]
        );
        assert!(parse_import_specifiers("  ", "lib").is_empty());
    }

    #[test]
    fn test_bare_external_and_unrecognized() {
        assert_eq!(
            classify_line("import 'normalize.css'"),
            Some(ImportLine::External {
                source: "normalize.css".to_string(),
                bindings: vec![]
            })
        );
        assert_eq!(
            classify_line("import {\n"),
            Some(ImportLine::Unrecognized)
        );
    }

    #[test]
    fn test_strip_exports() {
        let src = "export default function App() {}\nexport function a() {}\nexport const b = 1;\nexport { a, b };\nexport class C {}\nexport default App;";
        let out = strip_exports(src);
        assert_eq!(
            out,
            "function App() {}\nfunction a() {}\nconst b = 1;\nclass C {}\nApp;"
        );
    }
}
