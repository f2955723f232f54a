pub mod imports;
pub mod stubs;

use crate::models::Bundle;
use crate::vfs::VirtualFileSystem;
use imports::{classify_line, strip_exports, ImportLine};
use stubs::StubSet;

/// Concatenates every script in the project into one scope and extracts CSS.
///
/// Files under a `components` path come first, then the rest, and the entry
/// file (first path containing `App.tsx`) last. Cross-file references between
/// `const` arrow components still depend on that order. Never fails: a bad
/// file only produces a script that throws inside the sandbox.
pub fn bundle_multi_file_project(vfs: &VirtualFileSystem) -> Bundle {
    let ordered_paths = order_paths(vfs);
    log::debug!("Bundle order: {:?}", ordered_paths);

    let css = collect_css(vfs);

    let mut stubs = StubSet::default();
    let mut bundled = String::new();
    for path in &ordered_paths {
        let content = vfs.get(path).unwrap_or_default();
        let mut kept_lines = Vec::new();

        for line in content.split('\n') {
            match classify_line(line) {
                None => kept_lines.push(line),
                Some(ImportLine::External { bindings, .. }) => {
                    for binding in bindings {
                        stubs.add(binding);
                    }
                }
                Some(ImportLine::Internal { .. })
                | Some(ImportLine::Allowed { .. })
                | Some(ImportLine::Unrecognized) => {}
            }
        }

        let transformed = strip_exports(&kept_lines.join("\n"));
        bundled.push_str(&format!("\n// From: {}\n{}\n", path, transformed));
    }

    log::debug!(
        "Bundled code length: {}, CSS length: {}, stubs: {}",
        bundled.len(),
        css.len(),
        stubs.len()
    );

    Bundle {
        code: stubs.render() + &bundled,
        css,
    }
}

/// Script paths in concatenation order. CSS files are never included.
pub fn order_paths(vfs: &VirtualFileSystem) -> Vec<String> {
    let main_path = vfs
        .paths()
        .find(|p| p.contains("App.tsx"))
        .or_else(|| vfs.paths().next());

    let Some(main_path) = main_path else {
        return Vec::new();
    };

    let (components, others): (Vec<&str>, Vec<&str>) = vfs
        .paths()
        .filter(|p| *p != main_path)
        .partition(|p| p.contains("components"));

    components
        .into_iter()
        .chain(others)
        .chain(std::iter::once(main_path))
        .filter(|p| !is_css(p))
        .map(str::to_string)
        .collect()
}

fn collect_css(vfs: &VirtualFileSystem) -> String {
    vfs.iter()
        .filter(|(path, _)| is_css(path))
        .map(|(path, content)| format!("/* From: {} */\n{}\n\n", path, content))
        .collect()
}

fn is_css(path: &str) -> bool {
    path.ends_with(".css")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(files: &[(&str, &str)]) -> VirtualFileSystem {
        let mut vfs = VirtualFileSystem::new();
        for (path, content) in files {
            vfs.set(*path, *content);
        }
        vfs
    }

    #[test]
    fn test_app_with_component() {
        let vfs = project(&[
            (
                "/src/App.tsx",
                "import {Btn} from './components/Btn';\nexport default function App(){return <Btn/>}",
            ),
            (
                "/src/components/Btn.tsx",
                "export function Btn(){return <button/>}",
            ),
        ]);

        let bundle = bundle_multi_file_project(&vfs);
        let btn = bundle.code.find("function Btn").expect("Btn defined");
        let app = bundle.code.find("function App").expect("App defined");
        assert!(btn < app);
        assert!(!bundle.code.lines().any(|l| l.trim_start().starts_with("import")));
        assert!(!bundle.code.contains("export"));
        assert!(bundle.css.is_empty());
    }

    #[test]
    fn test_bundle_is_deterministic() {
        let files = [
            ("/src/utils.ts", "export const add = (a, b) => a + b;"),
            ("/src/App.tsx", "import { add } from './utils';\nexport default function App(){ return add(1, 2) }"),
            ("/src/index.css", "body { margin: 0 }"),
        ];
        let forward = project(&files);
        let mut reversed = VirtualFileSystem::new();
        for (path, content) in files.iter().rev() {
            reversed.set(*path, *content);
        }

        assert_eq!(bundle_multi_file_project(&forward), bundle_multi_file_project(&forward));
        assert_eq!(bundle_multi_file_project(&forward), bundle_multi_file_project(&reversed));
    }

    #[test]
    fn test_css_isolation() {
        let vfs = project(&[
            ("/src/App.tsx", "export default function App(){ return null }"),
            ("/src/b.css", ".b { color: blue }"),
            ("/src/a.css", ".a { color: red }"),
        ]);

        let bundle = bundle_multi_file_project(&vfs);
        assert_eq!(
            bundle.css,
            "/* From: /src/a.css */\n.a { color: red }\n\n/* From: /src/b.css */\n.b { color: blue }\n\n"
        );
        assert!(!bundle.code.contains("color: red"));
        assert!(!bundle.code.contains("color: blue"));
    }

    #[test]
    fn test_relative_imports_removed() {
        let vfs = project(&[
            ("/src/App.tsx", "import Header from './Header';\nimport { x } from \"/src/x\";\nfunction App(){}"),
            ("/src/Header.tsx", "export default function Header(){}"),
            ("/src/x.ts", "export const x = 1;"),
        ]);

        let code = bundle_multi_file_project(&vfs).code;
        assert!(!code.contains("import Header from './Header';"));
        assert!(!code.contains("import { x } from \"/src/x\";"));
        assert!(code.contains("function Header(){}"));
        assert!(code.contains("const x = 1;"));
    }

    #[test]
    fn test_external_default_import_is_stubbed_before_use() {
        let vfs = project(&[(
            "/src/App.tsx",
            "import Chart from 'some-lib';\nexport default function App(){ return <Chart/> }",
        )]);

        let code = bundle_multi_file_project(&vfs).code;
        let stub = code
            .find("const Chart = __PreviewStubComponent('Chart');")
            .expect("stub emitted");
        let usage = code.find("<Chart/>").expect("usage kept");
        assert!(stub < usage);
        assert!(!code.contains("some-lib"));
    }

    #[test]
    fn test_namespace_import_stub() {
        let vfs = project(&[(
            "/src/App.tsx",
            "import * as Icons from 'lucide-react';\nexport default function App(){ return <Icons.Home/> }",
        )]);

        let code = bundle_multi_file_project(&vfs).code;
        assert!(code.contains("const Icons = __PreviewStubNamespace('Icons');"));
        assert!(code.contains("new Proxy({}, { get: () => __PreviewStubComponent(label) })"));
        assert!(code.contains("label + ' unavailable in preview'"));
    }

    #[test]
    fn test_react_imports_dropped_without_stubs() {
        let vfs = project(&[(
            "/src/App.tsx",
            "import React, { useState } from 'react';\nimport ReactDOM from 'react-dom';\nfunction App(){}",
        )]);

        let code = bundle_multi_file_project(&vfs).code;
        assert!(!code.contains("__PreviewStubComponent"));
        assert!(!code.contains("from 'react'"));
    }

    #[test]
    fn test_import_inside_template_string_is_stripped() {
        // Line-based rewriting cannot see string boundaries.
        let vfs = project(&[(
            "/src/App.tsx",
            "const snippet = `\nimport x from './x';\n`;\nfunction App(){ return snippet }",
        )]);

        let code = bundle_multi_file_project(&vfs).code;
        assert!(!code.contains("import x from './x';"));
        assert!(code.contains("const snippet = `\n`;"));
    }

    #[test]
    fn test_order_paths() {
        let vfs = project(&[
            ("/src/App.tsx", ""),
            ("/src/hooks/useThing.ts", ""),
            ("/src/components/B.tsx", ""),
            ("/src/components/A.tsx", ""),
            ("/src/styles.css", ""),
        ]);

        assert_eq!(
            order_paths(&vfs),
            vec![
                "/src/components/A.tsx",
                "/src/components/B.tsx",
                "/src/hooks/useThing.ts",
                "/src/App.tsx",
            ]
        );
    }

    #[test]
    fn test_order_without_app_uses_first_path() {
        let vfs = project(&[("/b.ts", ""), ("/a.ts", "")]);
        assert_eq!(order_paths(&vfs), vec!["/b.ts", "/a.ts"]);
        assert!(order_paths(&VirtualFileSystem::new()).is_empty());
    }
}
