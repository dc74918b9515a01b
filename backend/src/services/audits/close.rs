use crate::sessions::state::SessionsState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use log::info;

/// `DELETE /api/audits/{audit_id}`: closes the live session and frees its
/// photos. Export a snapshot first to keep the work.
pub async fn process(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
) -> impl Responder {
    match sessions.remove(&audit_id).await {
        Ok(session) => {
            info!(
                "Closed audit {} at revision {} ({} photo(s) dropped)",
                audit_id,
                session.revision,
                session.image_map.total()
            );
            HttpResponse::NoContent().finish()
        }
        Err(e) => e.error_response(),
    }
}
