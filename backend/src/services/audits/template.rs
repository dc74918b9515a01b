//! `POST /api/audits/{audit_id}/template`
//!
//! Saves the audit's current questionnaire structure as a template, either
//! new or replacing `existingId`. Answers, comments and photos stay with the
//! audit; the template gets fresh node ids.

use crate::config::Config;
use crate::error::ApiError;
use crate::services::templates::require_admin;
use crate::sessions::state::SessionsState;
use crate::store::SqliteTemplateStore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::derive::template_points_from_instance;
use common::audit::template_save::save_template;
use common::ids::UuidIds;
use common::model::template::Template;
use common::requests::SaveAsTemplateRequest;
use log::info;

pub async fn process(
    store: web::Data<SqliteTemplateStore>,
    sessions: web::Data<SessionsState>,
    config: web::Data<Config>,
    audit_id: web::Path<String>,
    payload: web::Json<SaveAsTemplateRequest>,
) -> impl Responder {
    match save_as_template(&store, &sessions, &config, &audit_id, payload.into_inner()).await {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

async fn save_as_template(
    store: &SqliteTemplateStore,
    sessions: &SessionsState,
    config: &Config,
    audit_id: &str,
    request: SaveAsTemplateRequest,
) -> Result<Template, ApiError> {
    require_admin(config, "saving templates")?;
    let session = sessions.get(audit_id).await?;

    let mut ids = UuidIds;
    let points = template_points_from_instance(&session.instance, &mut ids);
    let template = save_template(
        store,
        request.existing_id.as_deref(),
        &request.name,
        points,
        &mut ids,
    )?;
    info!("Saved audit {} as template {}", audit_id, template.id);
    Ok(template)
}
