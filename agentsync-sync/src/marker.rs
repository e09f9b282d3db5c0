//! Marker-delimited merge and repair.
//!
//! A marker-managed file owns only the text between a begin and an end
//! sentinel. [`merge`] replaces that region, appends it when absent, and
//! rebuilds it when the sentinels are damaged. It never fails, and running it
//! twice with the same content is a no-op.

use agentsync_core::MarkerPair;

/// Sentinel layout found in a host text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    /// Neither sentinel present.
    Missing,
    /// Exactly one of each, begin before end.
    Valid,
    MissingBegin,
    MissingEnd,
    /// One of each, end before begin.
    Misordered,
    /// More than one begin or end.
    Multiple,
}

impl MarkerState {
    /// Classify `host` by counting and ordering sentinel occurrences.
    pub fn classify(host: &str, markers: MarkerPair) -> Self {
        let begins = host.matches(markers.begin).count();
        let ends = host.matches(markers.end).count();
        match (begins, ends) {
            (0, 0) => MarkerState::Missing,
            (b, e) if b > 1 || e > 1 => MarkerState::Multiple,
            (0, _) => MarkerState::MissingBegin,
            (_, 0) => MarkerState::MissingEnd,
            _ => match (host.find(markers.begin), host.find(markers.end)) {
                (Some(b), Some(e)) if b < e => MarkerState::Valid,
                _ => MarkerState::Misordered,
            },
        }
    }

    /// `true` for the states that trigger a repair.
    pub fn is_malformed(self) -> bool {
        !matches!(self, MarkerState::Missing | MarkerState::Valid)
    }
}

/// Result of [`merge`]: the new host text and the state it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub text: String,
    pub state: MarkerState,
}

/// Put `content` between `markers` inside `host`.
pub fn merge(host: &str, markers: MarkerPair, content: &str) -> MergeOutcome {
    let host = host.replace("\r\n", "\n");
    let body = managed_body(content, markers);
    let state = MarkerState::classify(&host, markers);

    let text = match state {
        MarkerState::Valid => match (host.find(markers.begin), host.find(markers.end)) {
            (Some(b), Some(e)) => {
                let head = &host[..b + markers.begin.len()];
                let tail = &host[e..];
                format!("{head}\n{body}{tail}")
            }
            _ => append_block(&host, markers, &body),
        },
        MarkerState::Missing => append_block(&host, markers, &body),
        _ => {
            tracing::debug!("rebuilding marker block from {state:?}");
            let rest = strip_markers(&host, markers);
            append_block(&rest, markers, &body)
        }
    };

    MergeOutcome { text: collapse_blank_lines(&text), state }
}

/// Trimmed content with a trailing newline, or empty. Sentinel strings are
/// removed so the content cannot corrupt its own block.
fn managed_body(content: &str, markers: MarkerPair) -> String {
    let cleaned = content
        .replace("\r\n", "\n")
        .replace(markers.begin, "")
        .replace(markers.end, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

fn append_block(host: &str, markers: MarkerPair, body: &str) -> String {
    let block = format!("{}\n{body}{}\n", markers.begin, markers.end);
    let existing = host.trim_end();
    if existing.is_empty() {
        block
    } else {
        format!("{existing}\n\n{block}")
    }
}

/// Remove every begin…end span (an unterminated begin runs to the end of the
/// text), then any stray sentinel left over, then trim.
fn strip_markers(host: &str, markers: MarkerPair) -> String {
    let mut out = String::with_capacity(host.len());
    let mut rest = host;
    while let Some(b) = rest.find(markers.begin) {
        out.push_str(&rest[..b]);
        let after_begin = &rest[b + markers.begin.len()..];
        rest = match after_begin.find(markers.end) {
            Some(e) => &after_begin[e + markers.end.len()..],
            None => "",
        };
    }
    out.push_str(rest);

    let out = out.replace(markers.end, "");
    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collapse three or more consecutive newlines into two.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
