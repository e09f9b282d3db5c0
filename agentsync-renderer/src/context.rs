//! Template context: serializable rendering payload built from a [`Document`].

use serde::{Deserialize, Serialize};

use agentsync_core::{Document, TargetKind, DOCUMENT_FILE};

use crate::error::RenderError;

/// Rendering payload.
///
/// Holds only document data and target metadata; two targets that share a
/// template produce identical text from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub target: TargetCtx,
    pub mission: String,
    pub workflow: Vec<String>,
    /// Required commands first, then custom ones by name.
    pub commands: Vec<CommandCtx>,
    pub done: Vec<String>,
    pub approvals: ApprovalsCtx,
    pub meta: MetaCtx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCtx {
    pub id: String,
    pub display_name: String,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandCtx {
    pub name: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalsCtx {
    pub mode: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaCtx {
    pub document_file: String,
    pub agentsync_version: String,
}

impl TemplateContext {
    /// Build a [`TemplateContext`] for rendering `doc` as `target`.
    pub fn from_document(doc: &Document, target: TargetKind) -> Self {
        TemplateContext {
            target: TargetCtx {
                id: target.id().to_string(),
                display_name: target.display_name().to_string(),
                mode: target.mode().to_string(),
            },
            mission: doc.mission.clone(),
            workflow: doc.workflow.clone(),
            commands: doc
                .ordered_commands()
                .into_iter()
                .map(|(name, command)| CommandCtx {
                    name: name.to_string(),
                    command: command.to_string(),
                })
                .collect(),
            done: doc.done.clone(),
            approvals: ApprovalsCtx {
                mode: doc.approvals.mode.clone(),
                notes: doc.approvals.notes.clone(),
            },
            meta: MetaCtx {
                document_file: DOCUMENT_FILE.to_string(),
                agentsync_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentsync_core::Defaults;

    #[test]
    fn context_fields_populated() {
        let mut doc = Defaults::default().document();
        doc.commands.insert("e2e".into(), "playwright test".into());
        let ctx = TemplateContext::from_document(&doc, TargetKind::Cursor);
        assert_eq!(ctx.target.id, "cursor");
        assert_eq!(ctx.target.mode, "full");
        assert_eq!(ctx.commands[0].name, "lint");
        assert_eq!(ctx.commands.last().map(|c| c.name.as_str()), Some("e2e"));
        assert_eq!(ctx.meta.document_file, "agentsync.yaml");
    }

    #[test]
    fn to_tera_context_succeeds() {
        let doc = Defaults::default().document();
        let ctx = TemplateContext::from_document(&doc, TargetKind::Claude);
        let tera_ctx = ctx.to_tera_context().expect("context conversion");
        assert!(tera_ctx.contains_key("mission"));
    }
}
