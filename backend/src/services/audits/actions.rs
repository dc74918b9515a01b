//! `POST /api/audits/{audit_id}/actions`
//!
//! Applies one `AuditAction` to the live session under the sessions write
//! lock. A rejected action leaves the session exactly as it was.

use crate::config::Config;
use crate::error::ApiError;
use crate::sessions::state::SessionsState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::capture::AuditAction;
use common::audit::session::AuditSession;
use common::ids::UuidIds;
use log::debug;

pub async fn process(
    sessions: web::Data<SessionsState>,
    config: web::Data<Config>,
    audit_id: web::Path<String>,
    action: web::Json<AuditAction>,
) -> impl Responder {
    match apply_action(&sessions, &config, &audit_id, &action).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => e.error_response(),
    }
}

pub async fn apply_action(
    sessions: &SessionsState,
    config: &Config,
    audit_id: &str,
    action: &AuditAction,
) -> Result<AuditSession, ApiError> {
    let session = sessions
        .update(audit_id, |session| {
            if let AuditAction::AttachImage { payload, .. } = action {
                sessions.check_image_budget(session, payload.len())?;
            }
            session.apply_mut(action, config.capabilities(), &mut UuidIds)?;
            Ok(session.clone())
        })
        .await?;
    debug!("Audit {} at revision {}: {:?}", audit_id, session.revision, action);
    Ok(session)
}
