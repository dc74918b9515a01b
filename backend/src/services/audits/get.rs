use crate::sessions::state::SessionsState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::score::ScoreReport;

/// `GET /api/audits/{audit_id}`: the live session with its revision.
pub async fn process(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
) -> impl Responder {
    match sessions.get(&audit_id).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => e.error_response(),
    }
}

/// `GET /api/audits/{audit_id}/score`: total plus per-point breakdown.
pub async fn score(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
) -> impl Responder {
    match sessions.get(&audit_id).await {
        Ok(session) => HttpResponse::Ok().json(ScoreReport::for_instance(&session.instance)),
        Err(e) => e.error_response(),
    }
}
