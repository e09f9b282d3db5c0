//! Roundtrip tests: `normalize(parse(serialize(normalize(D)))) == normalize(D)`.
//!
//! Each `#[case]` is isolated — no shared state.

use agentsync_core::defaults::Defaults;
use agentsync_core::normalize::normalize;
use agentsync_core::parser::{parse, parse_lines};
use agentsync_core::serializer::serialize;
use agentsync_core::types::{Document, TargetConfig};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

const MINIMAL: &str = "mission: Keep the lights on\n";

const HAND_WRITTEN: &str = "\
# agent instructions
version: 1
mission: >
  Build a fast,
  reliable API.

  Second paragraph.
workflow:
  - Read first   # trailing comment
  - 'Don''t guess'
commands:
  lint: cargo clippy -- -D warnings
  test: cargo test
  build: cargo build --release
  bench: cargo bench
done:
  - CI green
approvals:
  mode: ask
  notes:
    - Ask before migrations
targets:
  claude:
    enabled: true
    path: CLAUDE.md
  cursor: false
  aider:
    path: docs/AIDER.md
";

const UNICODE: &str = "\
mission: \"Task with émojis 🚀 & spéçïal chars: <>&\\\"'\"
workflow: [日本語, 한국어, \"a, b\"]
commands: {lint: 'x', test: \"y\", build: z}
";

const MESSY: &str = "\
mission: |
  Line one
    indented two
  # not a comment
this line is not yaml
workflow:
- zero indent item
commands:
  lint: \"echo 'a: b'\"
";

const EMPTY_LISTS: &str = "workflow: []\ndone: []\napprovals:\n  mode: never\n  notes: []\n";

fn roundtrip(text: &str) -> (Document, Document) {
    let defaults = Defaults::default();
    let once = normalize(&parse(text), &defaults);
    let twice = normalize(&parse(&serialize(&once)), &defaults);
    (once, twice)
}

// ---------------------------------------------------------------------------
// Parameterised roundtrip test
// ---------------------------------------------------------------------------

#[rstest]
#[case("minimal", MINIMAL)]
#[case("hand_written", HAND_WRITTEN)]
#[case("unicode_strings", UNICODE)]
#[case("messy", MESSY)]
#[case("empty_lists", EMPTY_LISTS)]
#[case("empty_input", "")]
fn document_roundtrip(#[case] label: &str, #[case] text: &str) {
    let (once, twice) = roundtrip(text);
    assert_eq!(once, twice, "[{label}] roundtrip changed the document");

    let canonical = serialize(&once);
    assert_eq!(serialize(&twice), canonical, "[{label}] serialization not stable");
    assert_eq!(
        normalize(&parse_lines(&canonical), &Defaults::default()),
        once,
        "[{label}] line scanner disagrees with strict parse on canonical text"
    );
}

// ---------------------------------------------------------------------------
// Keys that YAML would read as something other than a string
// ---------------------------------------------------------------------------

#[rstest]
#[case("True")]
#[case("false")]
#[case("NULL")]
#[case("~")]
#[case("0x10")]
#[case("0o17")]
#[case("1e3")]
#[case("007")]
#[case("12")]
#[case("-5")]
#[case("-x")]
#[case(".inf")]
#[case(".NaN")]
#[case("yes")]
#[case("e2e")]
fn odd_keys_keep_their_spelling(#[case] name: &str) {
    let defaults = Defaults::default();
    let mut doc = defaults.document();
    doc.commands.insert(name.to_string(), "run it".to_string());
    doc.targets.insert(
        name.to_string(),
        TargetConfig { enabled: true, path: format!("docs/{name}.md") },
    );

    let text = serialize(&doc);
    for reparsed in [parse(&text), parse_lines(&text)] {
        let back = normalize(&reparsed, &defaults);
        assert_eq!(back.commands.get(name).map(String::as_str), Some("run it"), "{text}");
        assert_eq!(back.targets.get(name), doc.targets.get(name), "{text}");
        assert_eq!(back, doc, "[{name}] key changed on re-parse");
    }
}

// ---------------------------------------------------------------------------
// Content checks on the hand-written document
// ---------------------------------------------------------------------------

#[test]
fn hand_written_values_survive() {
    let (doc, _) = roundtrip(HAND_WRITTEN);
    assert_eq!(doc.mission, "Build a fast, reliable API.\nSecond paragraph.");
    assert_eq!(doc.workflow, vec!["Read first", "Don't guess"]);
    assert_eq!(doc.commands["lint"], "cargo clippy -- -D warnings");
    assert_eq!(doc.commands["bench"], "cargo bench");
    assert_eq!(doc.approvals.notes, vec!["Ask before migrations"]);
    assert!(!doc.targets["cursor"].enabled);
    assert_eq!(doc.targets["aider"].path, "docs/AIDER.md");
}

#[test]
fn messy_document_keeps_what_it_can() {
    let (doc, _) = roundtrip(MESSY);
    assert_eq!(doc.mission, "Line one\n  indented two\n# not a comment");
    assert_eq!(doc.workflow, vec!["zero indent item"]);
    assert_eq!(doc.commands["lint"], "echo 'a: b'");
}
