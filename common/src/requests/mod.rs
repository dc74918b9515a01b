use crate::audit::derive::AuditHeader;
use crate::model::template::TemplatePoint;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/audits`: which template to derive from, plus the
/// audit header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAuditRequest {
    pub template_id: String,
    #[serde(flatten)]
    pub header: AuditHeader,
}

/// Body of `POST /api/templates/save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub existing_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub points: Vec<TemplatePoint>,
}

/// Body of `POST /api/audits/{id}/template`: save the audit's current
/// structure as a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAsTemplateRequest {
    #[serde(default)]
    pub existing_id: Option<String>,
    pub name: String,
}

/// Reply to a photo upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesAttached {
    pub point_id: String,
    /// Images the point holds after the upload.
    pub count: usize,
    pub revision: u64,
}
