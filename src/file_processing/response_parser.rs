use crate::models::ParsedFile;
use crate::vfs::normalize_path;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_ENTRY_PATH: &str = "/src/App.tsx";

/// `// File: <path>` or a fence annotated with a path (```` ```tsx:src/App.tsx ````).
static FILE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//\s*File:\s*([^\r\n]+)|```\w*:([^\r\n]+)").expect("valid marker regex")
});

/// `### <path>` followed by a fenced block.
static HEADING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"###\s+([^\r\n]+)[\r\n]+```\w*[\r\n]+((?s:.*?))```").expect("valid heading regex")
});

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:typescript|tsx|javascript|jsx)?\n((?s:.*?))```").expect("valid fence regex")
});

static CODE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(import |export )").expect("valid code start regex"));

/// Splits an LLM reply into files.
///
/// Returns `None` unless the reply clearly contains more than one file, so the
/// caller can tell "treat this as one file" apart from a real multi-file answer.
/// Text before the first marker belongs to `default_path`. Never panics.
pub fn parse_multi_file_response(text: &str, default_path: &str) -> Option<Vec<ParsedFile>> {
    let default_path = normalize_path(default_path);

    let markers: Vec<(usize, usize, String)> = FILE_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let raw = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            Some((whole.start(), whole.end(), raw.to_string()))
        })
        .collect();

    if markers.is_empty() {
        return parse_heading_blocks(text);
    }

    let mut files = Vec::new();
    let mut last_index = 0;
    let mut current_path = default_path.clone();

    for (start, end, raw_path) in markers {
        push_segment(&mut files, &current_path, &text[last_index..start]);
        current_path = if raw_path.is_empty() {
            default_path.clone()
        } else {
            normalize_path(&raw_path)
        };
        last_index = end;
    }
    push_segment(&mut files, &current_path, &text[last_index..]);

    log::debug!("Parsed {} file segment(s) from response", files.len());
    (files.len() > 1).then_some(files)
}

fn push_segment(files: &mut Vec<ParsedFile>, path: &str, segment: &str) {
    let content = segment.trim();
    if !content.is_empty() {
        files.push(ParsedFile::new(path, content));
    }
}

fn parse_heading_blocks(text: &str) -> Option<Vec<ParsedFile>> {
    let files: Vec<ParsedFile> = HEADING_BLOCK
        .captures_iter(text)
        .map(|caps| ParsedFile::new(normalize_path(caps[1].trim()), caps[2].trim()))
        .collect();
    (files.len() > 1).then_some(files)
}

/// Pulls the code out of a full model reply.
///
/// Takes the first fenced block (untagged or tagged as TS/JS). Without a fence,
/// drops any prose before the first line that starts with `import` or `export`.
pub fn extract_code(content: &str) -> String {
    if let Some(caps) = CODE_BLOCK.captures(content) {
        return caps[1].trim().to_string();
    }

    let content = content.trim();
    match CODE_START.find(content) {
        Some(m) if m.start() > 0 => content[m.start()..].trim().to_string(),
        _ => content.to_string(),
    }
}
