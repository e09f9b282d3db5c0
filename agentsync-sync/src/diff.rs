//! Diff previews for `agentsync sync` and `agentsync diff`.

use similar::TextDiff;

use crate::plan::PlanSet;

/// Maximum number of `-`/`+` lines a positional diff emits.
pub const DIFF_LINE_CAP: usize = 40;

/// Preview of the change to one output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Root-relative path.
    pub path: String,
    pub target_ids: Vec<String>,
    pub diff: String,
}

/// Line-by-line comparison by index: where the lines at the same position
/// differ, emit `-old` then `+new`. Stops after [`DIFF_LINE_CAP`] lines.
pub fn positional(current: &str, desired: &str) -> String {
    let old: Vec<&str> = current.lines().collect();
    let new: Vec<&str> = desired.lines().collect();

    let mut emitted = Vec::new();
    for i in 0..old.len().max(new.len()) {
        let (a, b) = (old.get(i), new.get(i));
        if a == b {
            continue;
        }
        if let Some(a) = a {
            emitted.push(format!("-{a}"));
        }
        if let Some(b) = b {
            emitted.push(format!("+{b}"));
        }
    }

    if emitted.len() > DIFF_LINE_CAP {
        let hidden = emitted.len() - DIFF_LINE_CAP;
        emitted.truncate(DIFF_LINE_CAP);
        emitted.push(format!("... ({hidden} more lines)"));
    }
    emitted.join("\n")
}

/// Unified diff with `a/` and `b/` headers and three lines of context.
pub fn unified(relative: &str, current: &str, desired: &str) -> String {
    let old_header = format!("a/{relative}");
    let new_header = format!("b/{relative}");
    TextDiff::from_lines(current, desired)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

/// One [`FileDiff`] per changed path, in plan order.
pub fn preview(set: &PlanSet, unified_format: bool) -> Vec<FileDiff> {
    set.unique()
        .into_iter()
        .filter(|p| p.changed)
        .map(|p| {
            let target_ids = set
                .plans
                .iter()
                .filter(|o| o.path == p.path)
                .map(|o| o.target_id.clone())
                .collect();
            let diff = if unified_format {
                unified(&p.path.relative, &p.current, &p.desired)
            } else {
                positional(&p.current, &p.desired)
            };
            FileDiff { path: p.path.relative.clone(), target_ids, diff }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_emits_pairs_only_where_lines_differ() {
        let d = positional("a\nb\nc\n", "a\nB\nc\nd\n");
        assert_eq!(d, "-b\n+B\n+d");
    }

    #[test]
    fn positional_reports_removed_tail() {
        assert_eq!(positional("a\nb\n", "a\n"), "-b");
    }

    #[test]
    fn positional_is_empty_for_identical_text() {
        assert_eq!(positional("same\n", "same\n"), "");
    }

    #[test]
    fn positional_is_capped() {
        let new: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let d = positional("", &new);
        let lines: Vec<&str> = d.lines().collect();
        assert_eq!(lines.len(), DIFF_LINE_CAP);
        assert_eq!(lines.last(), Some(&"+line 39"));

        let new: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let d = positional("", &new);
        let lines: Vec<&str> = d.lines().collect();
        assert_eq!(lines.len(), DIFF_LINE_CAP + 1);
        assert_eq!(lines[DIFF_LINE_CAP], "... (10 more lines)");
    }

    #[test]
    fn unified_has_headers_and_hunks() {
        let d = unified("CLAUDE.md", "a\nb\n", "a\nc\n");
        assert!(d.contains("--- a/CLAUDE.md"));
        assert!(d.contains("+++ b/CLAUDE.md"));
        assert!(d.contains("@@"));
        assert!(d.contains("-b\n"));
        assert!(d.contains("+c\n"));
    }
}
