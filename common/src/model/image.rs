//! Photo evidence attached to audit points.
//!
//! Images travel inline as `data:image/<type>;base64,<payload>` URLs so a
//! snapshot stays a single self-contained JSON document.

use crate::error::{AuditError, AuditResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point id to the ordered images attached to that point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMap(BTreeMap<String, Vec<String>>);

impl ImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self, point_id: &str) -> &[String] {
        self.0.get(point_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_point(&self, point_id: &str) -> bool {
        self.0.contains_key(point_id)
    }

    /// Appends an image and returns how many the point now has.
    pub fn append(&mut self, point_id: &str, payload: String) -> usize {
        let images = self.0.entry(point_id.to_string()).or_default();
        images.push(payload);
        images.len()
    }

    /// Removes one image. The point's entry goes away with its last image.
    pub fn remove_at(&mut self, point_id: &str, index: usize) -> Option<String> {
        let images = self.0.get_mut(point_id)?;
        if index >= images.len() {
            return None;
        }
        let removed = images.remove(index);
        if images.is_empty() {
            self.0.remove(point_id);
        }
        Some(removed)
    }

    pub fn remove_point(&mut self, point_id: &str) -> Option<Vec<String>> {
        self.0.remove(point_id)
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Bytes of all stored payloads, as they appear in a snapshot.
    pub fn payload_bytes(&self) -> usize {
        self.0.values().flatten().map(String::len).sum()
    }
}

/// Encodes raw image bytes as an inline data URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Checks that `payload` is an inline base64 image and returns its mime type.
pub fn inline_image_mime(payload: &str) -> AuditResult<&str> {
    let header_re = Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64$")
        .map_err(|e| AuditError::validation(format!("regex error: {e}")))?;

    let (header, data) = payload
        .split_once(',')
        .ok_or_else(|| AuditError::validation("image payload is not a data URL"))?;
    let mime = header_re
        .captures(header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AuditError::validation("image payload must be a base64 image data URL"))?;

    BASE64
        .decode(data)
        .map_err(|e| AuditError::validation(format!("image payload is not valid base64: {e}")))?;
    Ok(mime)
}
