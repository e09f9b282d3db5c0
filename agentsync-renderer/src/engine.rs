//! Tera rendering engine: template registry and [`Renderer`].
//!
//! # Template mapping
//!
//! | Target            | Template                     |
//! |-------------------|------------------------------|
//! | agents, opencode  | `agents/agents.md.tera`      |
//! | claude            | `claude/claude.md.tera`      |
//! | gemini            | `gemini/gemini.md.tera`      |
//! | copilot           | `copilot/copilot.md.tera`    |
//! | cursor            | `cursor/agentsync.mdc.tera`  |
//! | windsurf          | `windsurf/agentsync.md.tera` |
//! | cline             | `cline/agentsync.md.tera`    |
//!
//! `agents` and `opencode` share a template so they can share an output file.

use tera::Tera;

use agentsync_core::{Document, TargetKind};

use crate::context::TemplateContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked in via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_header.tera", include_str!("templates/_partials/header.tera")),
    ("shared/_body.tera", include_str!("templates/_partials/body.tera")),
    ("agents/agents.md.tera", include_str!("templates/agents.md.tera")),
    ("claude/claude.md.tera", include_str!("templates/claude.md.tera")),
    ("gemini/gemini.md.tera", include_str!("templates/gemini.md.tera")),
    ("copilot/copilot.md.tera", include_str!("templates/copilot.md.tera")),
    ("cursor/agentsync.mdc.tera", include_str!("templates/cursor.mdc.tera")),
    ("windsurf/agentsync.md.tera", include_str!("templates/windsurf.md.tera")),
    ("cline/agentsync.md.tera", include_str!("templates/cline.md.tera")),
];

/// Template rendered for `target`.
pub fn template_name(target: TargetKind) -> &'static str {
    match target {
        TargetKind::Agents | TargetKind::OpenCode => "agents/agents.md.tera",
        TargetKind::Claude   => "claude/claude.md.tera",
        TargetKind::Gemini   => "gemini/gemini.md.tera",
        TargetKind::Copilot  => "copilot/copilot.md.tera",
        TargetKind::Cursor   => "cursor/agentsync.mdc.tera",
        TargetKind::Windsurf => "windsurf/agentsync.md.tera",
        TargetKind::Cline    => "cline/agentsync.md.tera",
    }
}

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

/// LF line endings, at most one blank line in a row, no leading or trailing
/// blank lines, exactly one trailing newline.
fn normalize_output(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for every target kind.
///
/// Uses embedded templates only. Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    /// Render the instruction text for `target` from `doc`.
    ///
    /// Pure: the result depends only on the arguments.
    pub fn render(&self, doc: &Document, target: TargetKind) -> Result<String, RenderError> {
        let ctx = TemplateContext::from_document(doc, target);
        self.render_with_context(&ctx, target)
    }

    /// Render using a caller-provided [`TemplateContext`].
    pub fn render_with_context(
        &self,
        ctx: &TemplateContext,
        target: TargetKind,
    ) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let raw = self.tera.render(template_name(target), &tera_ctx)?;
        Ok(normalize_output(&raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use agentsync_core::Defaults;

    fn doc() -> Document {
        let mut d = Defaults::default().document();
        d.mission = "Keep testapp fast.".into();
        d
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn every_target_has_a_registered_template() {
        let names: Vec<&str> = TPLS.iter().map(|(n, _)| *n).collect();
        for target in TargetKind::all() {
            assert!(names.contains(&template_name(*target)), "{target:?}");
        }
    }

    #[test]
    fn all_targets_render_without_error() {
        let renderer = Renderer::new().unwrap();
        let d = doc();
        for target in TargetKind::all() {
            let content = renderer
                .render(&d, *target)
                .unwrap_or_else(|e| panic!("render failed for {target:?}: {e}"));
            assert!(content.contains("Keep testapp fast."), "{target:?}");
            assert!(content.contains(&d.commands["lint"]), "{target:?}");
            assert!(content.ends_with('\n') && !content.ends_with("\n\n"), "{target:?}");
        }
    }

    #[test]
    fn agents_and_opencode_render_identically() {
        let renderer = Renderer::new().unwrap();
        let d = doc();
        assert_eq!(
            renderer.render(&d, TargetKind::Agents).unwrap(),
            renderer.render(&d, TargetKind::OpenCode).unwrap()
        );
    }

    #[test]
    fn cursor_template_contains_frontmatter() {
        let renderer = Renderer::new().unwrap();
        let content = renderer.render(&doc(), TargetKind::Cursor).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("alwaysApply: true"), "Cursor MDC must have alwaysApply frontmatter");
    }

    #[test]
    fn windsurf_template_contains_trigger() {
        let renderer = Renderer::new().unwrap();
        let content = renderer.render(&doc(), TargetKind::Windsurf).unwrap();
        assert!(content.contains("trigger: always_on"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let renderer = Renderer::new().unwrap();
        let mut d = doc();
        d.workflow.clear();
        d.done.clear();
        let content = renderer.render(&d, TargetKind::Claude).unwrap();
        assert!(!content.contains("## Workflow"));
        assert!(!content.contains("## Definition of done"));
        assert!(content.contains("## Commands"));
    }

    #[test]
    fn workflow_is_numbered() {
        let renderer = Renderer::new().unwrap();
        let content = renderer.render(&doc(), TargetKind::Cline).unwrap();
        assert!(content.contains("1. Read the relevant code"));
        assert!(content.contains("\n2. "));
    }

    #[test]
    fn no_crlf_and_no_double_blank_lines() {
        let renderer = Renderer::new().unwrap();
        let mut d = doc();
        d.mission = "line one\r\n\r\n\r\nline two".into();
        for target in TargetKind::all() {
            let content = renderer.render(&d, *target).unwrap();
            assert!(!content.contains('\r'), "{target:?} contains CR");
            assert!(!content.contains("\n\n\n"), "{target:?} has a double blank line");
        }
    }

    #[test]
    fn normalize_output_collapses_and_trims() {
        assert_eq!(normalize_output("\n\na  \n\n\n\nb\n\n"), "a\n\nb\n");
    }
}
