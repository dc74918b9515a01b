//! Template persistence contract and the admin "save template" operation.

use crate::error::{AuditError, AuditResult};
use crate::ids::IdGenerator;
use crate::model::template::{
    Template, TemplateDraft, TemplatePoint, TemplateUpdate, validate_template,
};

/// Storage for templates. Implemented by the service's document store.
///
/// There is no concurrency token: two saves of the same template both
/// succeed and the later one wins.
pub trait TemplateGateway {
    fn list_templates(&self) -> AuditResult<Vec<Template>>;

    /// Stores a new template, assigning an id when the draft has none.
    fn create_template(&self, draft: TemplateDraft) -> AuditResult<Template>;

    fn get_template(&self, id: &str) -> AuditResult<Template>;

    /// Replaces the given fields. `NotFound` when `id` is unknown.
    fn update_template(&self, id: &str, update: TemplateUpdate) -> AuditResult<Template>;

    fn delete_template(&self, id: &str) -> AuditResult<()>;
}

/// Creates a template, or fully replaces the name and points of
/// `existing_id`. Returns the stored template so the caller can adopt its
/// id as the active selection.
///
/// Nothing is written when validation fails, and a store error is returned
/// as-is without any local state having changed.
pub fn save_template(
    gateway: &dyn TemplateGateway,
    existing_id: Option<&str>,
    name: &str,
    points: Vec<TemplatePoint>,
    ids: &mut dyn IdGenerator,
) -> AuditResult<Template> {
    validate_template(name, &points)?;
    let name = name.trim().to_string();

    match existing_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => gateway.update_template(
            id,
            TemplateUpdate {
                name: Some(name),
                points: Some(points),
            },
        ),
        None => gateway.create_template(TemplateDraft {
            id: Some(ids.next_id()),
            name,
            points,
        }),
    }
}

/// Unknown-id error in the wording every gateway uses.
pub fn template_not_found(id: &str) -> AuditError {
    AuditError::not_found(format!("template `{id}`"))
}
