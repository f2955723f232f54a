use crate::models::{DiffKind, DiffLine};
use similar::{capture_diff_slices, Algorithm, ChangeTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// Lock-step comparison by line index. One inserted line near the top
    /// turns every following line into a remove/add pair.
    #[default]
    Indexed,
    /// Myers diff, for reviewing larger edits.
    Minimal,
}

/// Diff of one file, labelled for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub file_name: String,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

impl FileDiff {
    pub fn new(file_name: &str, old: &str, new: &str, mode: DiffMode) -> Self {
        let lines = match mode {
            DiffMode::Indexed => calculate_diff(old, new),
            DiffMode::Minimal => calculate_minimal_diff(old, new),
        };
        Self {
            file_name: file_name.to_string(),
            lines,
        }
    }

    pub fn summary(&self) -> DiffSummary {
        self.lines
            .iter()
            .fold(DiffSummary::default(), |mut summary, line| {
                match line.kind {
                    DiffKind::Add => summary.added += 1,
                    DiffKind::Remove => summary.removed += 1,
                    DiffKind::Same => summary.unchanged += 1,
                }
                summary
            })
    }
}

/// Index-aligned line diff used by the accept/reject review.
pub fn calculate_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();
    let max_lines = old_lines.len().max(new_lines.len());

    let mut result = Vec::with_capacity(max_lines);
    for i in 0..max_lines {
        let line_number = i + 1;
        match (old_lines.get(i), new_lines.get(i)) {
            (None, Some(added)) => result.push(line(DiffKind::Add, added, line_number)),
            (Some(removed), None) => result.push(line(DiffKind::Remove, removed, line_number)),
            (Some(old_line), Some(new_line)) if old_line != new_line => {
                result.push(line(DiffKind::Remove, old_line, line_number));
                result.push(line(DiffKind::Add, new_line, line_number));
            }
            (Some(same), Some(_)) => result.push(line(DiffKind::Same, same, line_number)),
            (None, None) => {}
        }
    }
    result
}

/// Minimal edit script via `similar`. Removed lines carry their old line
/// number, everything else the new one.
pub fn calculate_minimal_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();

    capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines)
        .iter()
        .flat_map(|op| op.iter_changes(&old_lines, &new_lines))
        .map(|change| {
            let (kind, index) = match change.tag() {
                ChangeTag::Delete => (DiffKind::Remove, change.old_index()),
                ChangeTag::Insert => (DiffKind::Add, change.new_index()),
                ChangeTag::Equal => (DiffKind::Same, change.new_index()),
            };
            line(kind, change.value(), index.unwrap_or_default() + 1)
        })
        .collect()
}

fn line(kind: DiffKind, text: &str, line_number: usize) -> DiffLine {
    DiffLine {
        kind,
        line: text.to_string(),
        line_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(lines: &[DiffLine]) -> Vec<DiffKind> {
        lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn test_identical_is_all_same() {
        let text = "a\nb\n\nc";
        let diff = calculate_diff(text, text);
        assert_eq!(diff.len(), 4);
        assert!(diff.iter().all(|l| l.kind == DiffKind::Same));
        assert_eq!(diff[3].line_number, 4);
    }

    #[test]
    fn test_changed_line_is_remove_then_add() {
        let diff = calculate_diff("a\nb\nc", "a\nB\nc");
        assert_eq!(
            kinds(&diff),
            vec![DiffKind::Same, DiffKind::Remove, DiffKind::Add, DiffKind::Same]
        );
        assert_eq!(diff[1].line, "b");
        assert_eq!(diff[2].line, "B");
        assert_eq!(diff[1].line_number, 2);
        assert_eq!(diff[2].line_number, 2);
    }

    #[test]
    fn test_length_mismatch() {
        let grown = calculate_diff("a", "a\nb\nc");
        assert_eq!(kinds(&grown), vec![DiffKind::Same, DiffKind::Add, DiffKind::Add]);

        let shrunk = calculate_diff("a\nb", "a");
        assert_eq!(kinds(&shrunk), vec![DiffKind::Same, DiffKind::Remove]);
        assert_eq!(shrunk[1].line, "b");
    }

    #[test]
    fn test_insert_at_top_shifts_everything() {
        let diff = calculate_diff("a\nb", "x\na\nb");
        let summary = FileDiff {
            file_name: "f".into(),
            lines: diff,
        }
        .summary();
        assert_eq!(summary.added, 3);
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.unchanged, 0);
    }

    #[test]
    fn test_every_line_accounted_for() {
        let old = "one\ntwo\nthree\nfour";
        let new = "one\n2\nthree";
        let diff = calculate_diff(old, new);
        assert!(diff.len() >= 4);

        let from_old: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind != DiffKind::Add)
            .map(|l| l.line.as_str())
            .collect();
        let from_new: Vec<&str> = diff
            .iter()
            .filter(|l| l.kind != DiffKind::Remove)
            .map(|l| l.line.as_str())
            .collect();
        assert_eq!(from_old, old.split('\n').collect::<Vec<_>>());
        assert_eq!(from_new, new.split('\n').collect::<Vec<_>>());
    }

    #[test]
    fn test_minimal_diff_insert_at_top() {
        let diff = calculate_minimal_diff("a\nb", "x\na\nb");
        assert_eq!(kinds(&diff), vec![DiffKind::Add, DiffKind::Same, DiffKind::Same]);
        assert_eq!(diff[0].line, "x");
        assert_eq!(diff[2].line_number, 3);
    }

    #[test]
    fn test_file_diff_modes() {
        let indexed = FileDiff::new("App.tsx", "a\nb", "x\na\nb", DiffMode::Indexed);
        let minimal = FileDiff::new("App.tsx", "a\nb", "x\na\nb", DiffMode::Minimal);
        assert_eq!(indexed.summary().added, 3);
        assert_eq!(minimal.summary().added, 1);
        assert!(FileDiff::new("f", "same", "same", DiffMode::Indexed)
            .summary()
            .is_unchanged());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(&calculate_diff("a", "b")[0]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "remove", "line": "a", "lineNumber": 1})
        );
    }
}
