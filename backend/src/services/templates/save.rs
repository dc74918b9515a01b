use crate::config::Config;
use crate::error::ApiError;
use crate::store::SqliteTemplateStore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::audit::template_save::{save_template, TemplateGateway};
use common::error::AuditError;
use common::ids::UuidIds;
use common::model::template::{Template, TemplateDraft, TemplateUpdate};
use common::requests::SaveTemplateRequest;
use log::info;

/// `POST /api/templates/save`: create, or fully replace `existingId`.
pub async fn process(
    store: web::Data<SqliteTemplateStore>,
    config: web::Data<Config>,
    payload: web::Json<SaveTemplateRequest>,
) -> impl Responder {
    match save(&store, &config, payload.into_inner()) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

pub fn save(
    store: &SqliteTemplateStore,
    config: &Config,
    request: SaveTemplateRequest,
) -> Result<Template, ApiError> {
    require_admin(config, "saving templates")?;
    let template = save_template(
        store,
        request.existing_id.as_deref(),
        &request.name,
        request.points,
        &mut UuidIds,
    )?;
    info!("Saved template {} ({})", template.id, template.name);
    Ok(template)
}

/// `POST /api/templates`: store a template as given; the id is assigned
/// when absent.
pub async fn create(
    store: web::Data<SqliteTemplateStore>,
    config: web::Data<Config>,
    payload: web::Json<TemplateDraft>,
) -> impl Responder {
    let result = require_admin(&config, "creating templates")
        .and_then(|_| {
            store
                .create_template(payload.into_inner())
                .map_err(ApiError::from)
        });
    match result {
        Ok(template) => HttpResponse::Created().json(template),
        Err(e) => e.error_response(),
    }
}

/// `PUT /api/templates/{template_id}`: replace the fields present in the body.
pub async fn update(
    store: web::Data<SqliteTemplateStore>,
    config: web::Data<Config>,
    template_id: web::Path<String>,
    payload: web::Json<TemplateUpdate>,
) -> impl Responder {
    let result = require_admin(&config, "updating templates")
        .and_then(|_| {
            store
                .update_template(&template_id, payload.into_inner())
                .map_err(ApiError::from)
        });
    match result {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

/// `DELETE /api/templates/{template_id}`. Deleting an unknown id succeeds.
pub async fn delete(
    store: web::Data<SqliteTemplateStore>,
    config: web::Data<Config>,
    template_id: web::Path<String>,
) -> impl Responder {
    let result = require_admin(&config, "deleting templates")
        .and_then(|_| store.delete_template(&template_id).map_err(ApiError::from));
    match result {
        Ok(()) => {
            info!("Deleted template {}", template_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => e.error_response(),
    }
}

pub(crate) fn require_admin(config: &Config, what: &str) -> Result<(), ApiError> {
    if config.admin {
        Ok(())
    } else {
        Err(AuditError::NotPermitted(what.to_string()).into())
    }
}
