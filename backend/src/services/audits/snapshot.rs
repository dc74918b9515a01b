//! # Snapshot Export and Import
//!
//! A snapshot is the JSON document `{ "instance": ..., "imageMap": ... }`.
//! It is how an audit leaves the service and how it comes back later.
//!
//! - `GET /api/audits/{audit_id}/snapshot` serves the pretty-printed document
//!   as a download named `audit-<supplier>-<date>.json`.
//! - `POST /api/audits/{audit_id}/snapshot` replaces the live session's
//!   content with the uploaded document. A malformed document answers
//!   `422 Unprocessable Entity` and the session is left untouched.
//!   A document of a different audit is refused with `400 Bad Request`.
//! - `POST /api/audits/import` registers the uploaded document as a new
//!   live session under the instance id it carries. If that audit is already
//!   open the import answers `409 Conflict`; close it first or import into
//!   it with the session route.
//!
//! Snapshot bodies are capped by `snapshot_limit`, which leaves room for
//! every photo a session may hold.

use crate::error::ApiError;
use crate::sessions::state::SessionsState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::session::AuditSession;
use common::model::instance::AuditInstance;
use common::model::snapshot::AuditSnapshot;
use log::info;

pub async fn export(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
) -> impl Responder {
    let result = sessions.get(&audit_id).await.and_then(|session| {
        let body = session.snapshot().to_json_pretty()?;
        Ok((download_name(&session.instance), body))
    });
    match result {
        Ok((filename, body)) => HttpResponse::Ok()
            .content_type("application/json")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(body),
        Err(e) => e.error_response(),
    }
}

pub async fn import(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let result = sessions
        .update(&audit_id, |session| {
            let mut next = session.clone();
            next.import(&body)?;
            sessions.check_image_budget(&next, 0)?;
            *session = next;
            Ok(session.clone())
        })
        .await;
    match result {
        Ok(session) => {
            info!(
                "Imported snapshot into audit {} (revision {})",
                audit_id, session.revision
            );
            HttpResponse::Ok().json(session)
        }
        Err(e) => e.error_response(),
    }
}

pub async fn import_new(sessions: web::Data<SessionsState>, body: web::Bytes) -> impl Responder {
    match load(&sessions, &body).await {
        Ok(session) => HttpResponse::Created().json(session),
        Err(e) => e.error_response(),
    }
}

async fn load(sessions: &SessionsState, bytes: &[u8]) -> Result<AuditSession, ApiError> {
    let snapshot = AuditSnapshot::from_slice(bytes)?;
    let session = AuditSession::from_snapshot(snapshot);
    sessions.check_image_budget(&session, 0)?;
    let session = sessions.insert(session).await?;
    info!("Loaded audit {} from snapshot", session.instance.id);
    Ok(session)
}

/// `audit-<supplier>-<yyyy-mm-dd>.json`, reduced to filename-safe characters.
pub(crate) fn download_name(instance: &AuditInstance) -> String {
    let supplier: String = instance
        .supplier_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!(
        "audit-{}-{}.json",
        supplier,
        instance.date.format("%Y-%m-%d")
    )
}
