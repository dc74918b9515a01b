//! # Audit Service Module
//!
//! Routes under `/api/audits` work on live audit sessions held in
//! `SessionsState`.
//!
//! ## Sub-modules:
//! - `create`: derives a new session from a stored template.
//! - `get`: reads a session and its score.
//! - `close`: ends a session and frees its photos.
//! - `actions`: applies capture actions (answers, comments, status, structure).
//! - `images`: multipart photo uploads.
//! - `snapshot`: snapshot export and import.
//! - `results`: CSV export of the answers.
//! - `template`: saves an audit's structure as a template.

mod actions;
mod close;
mod create;
mod get;
mod images;
mod results;
mod snapshot;
mod template;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/audits";

/// Configures and returns the Actix `Scope` for all audit routes.
///
/// # Registered Routes:
///
/// *   **`POST /`**: `create::process`, body `StartAuditRequest`.
/// *   **`POST /import`**: `snapshot::import_new`, raw snapshot document.
/// *   **`GET /{audit_id}`**: `get::process`.
/// *   **`DELETE /{audit_id}`**: `close::process`.
/// *   **`POST /{audit_id}/actions`**: `actions::process`, body `AuditAction`.
/// *   **`GET /{audit_id}/score`**: `get::score`.
/// *   **`POST /{audit_id}/images/{point_id}`**: `images::process`, multipart.
/// *   **`GET /{audit_id}/snapshot`**: `snapshot::export`.
/// *   **`POST /{audit_id}/snapshot`**: `snapshot::import`.
/// *   **`GET /{audit_id}/results.csv`**: `results::process`.
/// *   **`POST /{audit_id}/template`**: `template::process`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/import", post().to(snapshot::import_new))
        .route("/{audit_id}", get().to(get::process))
        .route("/{audit_id}", delete().to(close::process))
        .route("/{audit_id}/actions", post().to(actions::process))
        .route("/{audit_id}/score", get().to(get::score))
        .route("/{audit_id}/images/{point_id}", post().to(images::process))
        .route("/{audit_id}/snapshot", get().to(snapshot::export))
        .route("/{audit_id}/snapshot", post().to(snapshot::import))
        .route("/{audit_id}/results.csv", get().to(results::process))
        .route("/{audit_id}/template", post().to(template::process))
}
