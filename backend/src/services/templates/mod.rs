//! # Template Service Module
//!
//! Audit questionnaires are kept as templates: reusable point trees that
//! auditors start new audits from. The `/api/templates` scope reads them for
//! everyone and lets an admin create, edit and remove them.
//!
//! ## Sub-modules:
//! - `get`: Reads templates from the document store.
//! - `save`: Creates, replaces and deletes templates. Every write requires the
//!   admin capability of the running service.

mod get;
mod save;

pub(crate) use save::require_admin;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**: `get::list`, every stored template ordered by name.
/// *   **`POST /`**: `save::create`, stores a `TemplateDraft` as given.
/// *   **`POST /save`**: `save::process`, validates and then creates a template,
///     or replaces name and points of `existingId`.
/// *   **`GET /{template_id}`**: `get::process`.
/// *   **`PUT /{template_id}`**: `save::update`, partial `TemplateUpdate`.
/// *   **`DELETE /{template_id}`**: `save::delete`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(get::list))
        .route("", post().to(save::create))
        .route("/save", post().to(save::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", put().to(save::update))
        .route("/{template_id}", delete().to(save::delete))
}
