//! # Template Retrieval Service
//!
//! Backend logic for `GET /api/templates` and `GET /api/templates/{template_id}`.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `list` or `process` receives the request; `process`
//!     takes the `template_id` from the URL path.
//!
//! 2.  **Document Store**: the handler reads from the `SqliteTemplateStore`
//!     injected as application data. Each call opens its own connection to
//!     the configured SQLite file.
//!
//! 3.  **HTTP Response**: the `Template` (or the list of templates) is returned
//!     as JSON with `200 OK`. An unknown id answers `404 Not Found`; a store
//!     that cannot be opened or read answers `503 Service Unavailable`.
//!
//! Reading a template never changes anything; audits derived from it are
//! created by `POST /api/audits`.

use crate::error::ApiError;
use crate::store::SqliteTemplateStore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::template_save::TemplateGateway;

/// Actix web handler for `GET /api/templates/{template_id}`.
///
/// # Returns
/// - `200 OK` with the `Template` as JSON.
/// - `404 Not Found` if no template has this id.
/// - `503 Service Unavailable` if the store cannot be read.
pub async fn process(
    store: web::Data<SqliteTemplateStore>,
    template_id: web::Path<String>,
) -> impl Responder {
    match store.get_template(&template_id) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => ApiError::from(e).error_response(),
    }
}

/// Actix web handler for `GET /api/templates`, ordered by name.
pub async fn list(store: web::Data<SqliteTemplateStore>) -> impl Responder {
    match store.list_templates() {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => ApiError::from(e).error_response(),
    }
}
