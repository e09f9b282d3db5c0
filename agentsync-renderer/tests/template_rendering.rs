use agentsync_core::{Defaults, Document, Edit, TargetKind};
use agentsync_core::edit::apply;
use agentsync_renderer::{Renderer, TemplateContext};

fn make_document() -> Document {
    let mut doc = Defaults::default().document();
    apply(
        &mut doc,
        &[
            Edit::SetMission("Run the copnow API: fast, boring, well tested.".into()),
            Edit::SetCommand { name: "lint".into(), command: "cargo clippy -- -D warnings".into() },
            Edit::SetCommand { name: "test".into(), command: "cargo test".into() },
            Edit::SetCommand { name: "build".into(), command: "cargo build".into() },
            Edit::SetCommand { name: "e2e".into(), command: "just e2e".into() },
            Edit::AddDone("Changelog updated".into()),
            Edit::SetApprovalMode("auto".into()),
            Edit::AddApprovalNote("Never touch migrations/ without asking.".into()),
        ],
    )
    .expect("apply edits");
    doc
}

#[test]
fn template_rendering_correctness_all_targets() {
    let doc = make_document();
    let renderer = Renderer::new().expect("renderer");

    for target in TargetKind::all() {
        let content = renderer
            .render(&doc, *target)
            .unwrap_or_else(|e| panic!("render failed for {target:?}: {e}"));

        for expected in [
            "Run the copnow API: fast, boring, well tested.",
            "- **lint**: `cargo clippy -- -D warnings`",
            "- **test**: `cargo test`",
            "- **build**: `cargo build`",
            "- **e2e**: `just e2e`",
            "- Changelog updated",
            "Mode: **auto**",
            "- Never touch migrations/ without asking.",
            "agentsync.yaml",
        ] {
            assert!(
                content.contains(expected),
                "'{expected}' missing for {target:?}:\n{content}"
            );
        }

        let lint = content.find("**lint**").unwrap();
        let e2e = content.find("**e2e**").unwrap();
        assert!(lint < e2e, "required commands must come first for {target:?}");

        let markers = target.markers();
        if let Some(pair) = markers {
            assert!(!content.contains(pair.begin), "{target:?} output contains its own sentinel");
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let doc = make_document();
    let renderer = Renderer::new().expect("renderer");
    for target in TargetKind::all() {
        assert_eq!(
            renderer.render(&doc, *target).unwrap(),
            renderer.render(&doc, *target).unwrap()
        );
    }
}

#[test]
fn custom_context_renders() {
    let doc = make_document();
    let renderer = Renderer::new().expect("renderer");
    let mut ctx = TemplateContext::from_document(&doc, TargetKind::Claude);
    ctx.mission = "Overridden mission".into();
    let content = renderer
        .render_with_context(&ctx, TargetKind::Claude)
        .expect("render");
    assert!(content.contains("Overridden mission"));
    assert!(!content.contains("copnow"));
}
