//! # Photo Upload Service
//!
//! `POST /api/audits/{audit_id}/images/{point_id}` accepts a multipart form
//! with one or more `file` parts. Each part is read in full, checked to be an
//! image, encoded as a `data:image/...;base64,` payload and appended to the
//! point's attachment list.
//!
//! Appends go through the attachment updater in `sessions::state`, so uploads
//! that finish in any order all land on the current session.

use crate::config::Config;
use crate::error::ApiError;
use crate::sessions::state::SessionsState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::image::encode_data_url;
use common::requests::ImagesAttached;
use futures_util::StreamExt;
use log::info;

pub async fn process(
    sessions: web::Data<SessionsState>,
    config: web::Data<Config>,
    path: web::Path<(String, String)>,
    payload: Multipart,
) -> impl Responder {
    let (audit_id, point_id) = path.into_inner();
    match upload_images(&sessions, config.json_limit, &audit_id, &point_id, payload).await {
        Ok(attached) => HttpResponse::Ok().json(attached),
        Err(e) => e.error_response(),
    }
}

pub async fn upload_images(
    sessions: &SessionsState,
    limit: usize,
    audit_id: &str,
    point_id: &str,
    mut payload: Multipart,
) -> Result<ImagesAttached, ApiError> {
    let mut last: Option<ImagesAttached> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Upload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(ApiError::Upload(format!(
                    "`{filename}` exceeds the {limit} byte limit"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let mime = image_mime(&filename, &bytes)?;
        let attached = sessions
            .attach(audit_id, point_id, encode_data_url(&mime, &bytes))
            .await?;
        info!(
            "Attached {} ({} bytes) to {}/{}, {} image(s) now",
            filename,
            bytes.len(),
            audit_id,
            point_id,
            attached.count
        );
        last = Some(attached);
    }

    last.ok_or_else(|| ApiError::Upload("missing `file` part".to_string()))
}

/// Sniffs the content. SVG is the one format the decoder cannot detect, so a
/// `.svg` upload whose text opens like an SVG document is accepted too.
/// Anything else, whatever its extension, is refused.
fn image_mime(filename: &str, bytes: &[u8]) -> Result<String, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Upload(format!("`{filename}` is empty")));
    }
    if let Ok(format) = image::guess_format(bytes) {
        return Ok(format.to_mime_type().to_string());
    }
    match mime_guess::from_path(filename).first() {
        Some(mime) if mime.essence_str() == SVG && looks_like_svg(bytes) => {
            Ok(SVG.to_string())
        }
        _ => Err(ApiError::Upload(format!("`{filename}` is not an image"))),
    }
}

const SVG: &str = "image/svg+xml";

/// An XML prolog, comment, doctype or the `<svg` root itself, with an `<svg`
/// element within the first kilobyte.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    ["<?xml", "<!--", "<!DOCTYPE", "<svg"]
        .iter()
        .any(|start| head.starts_with(start))
        && head.contains("<svg")
}
