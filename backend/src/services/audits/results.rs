use crate::error::ApiError;
use crate::sessions::state::SessionsState;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::export::results_csv;

/// `GET /api/audits/{audit_id}/results.csv`: one row per sub-question.
pub async fn process(
    sessions: web::Data<SessionsState>,
    audit_id: web::Path<String>,
) -> impl Responder {
    let result = sessions
        .get(&audit_id)
        .await
        .and_then(|session| results_csv(&session.instance).map_err(ApiError::from));
    match result {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => e.error_response(),
    }
}
