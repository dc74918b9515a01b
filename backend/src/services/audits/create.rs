//! # Audit Start Service
//!
//! `POST /api/audits` derives a fresh audit session from a stored template.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: the handler receives a `StartAuditRequest` with the
//!     `templateId` and the audit header (supplier, auditor, optional date).
//!
//! 2.  **Template Lookup**: the template is read from the `SqliteTemplateStore`.
//!
//! 3.  **Derivation**: `derive_session` deep-copies the template with fresh
//!     ids for the instance and every node, so the new audit shares nothing
//!     with the template or with other audits of the same template.
//!
//! 4.  **Registration**: the session is stored in `SessionsState` under the
//!     instance id and returned with `201 Created`.

use crate::error::ApiError;
use crate::sessions::state::SessionsState;
use crate::store::SqliteTemplateStore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::derive::derive_session;
use common::audit::session::AuditSession;
use common::audit::template_save::TemplateGateway;
use common::ids::UuidIds;
use common::requests::StartAuditRequest;
use log::info;

pub async fn process(
    store: web::Data<SqliteTemplateStore>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<StartAuditRequest>,
) -> impl Responder {
    match start_audit(&store, &sessions, payload.into_inner()).await {
        Ok(session) => HttpResponse::Created().json(session),
        Err(e) => e.error_response(),
    }
}

pub async fn start_audit(
    store: &SqliteTemplateStore,
    sessions: &SessionsState,
    request: StartAuditRequest,
) -> Result<AuditSession, ApiError> {
    let template = store.get_template(&request.template_id)?;
    let session = derive_session(&template, &request.header, &mut UuidIds)?;
    info!(
        "Started audit {} of {} from template {}",
        session.instance.id, session.instance.supplier_name, template.id
    );
    sessions.insert(session).await
}
