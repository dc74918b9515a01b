use crate::error::{AuditError, AuditResult};
use crate::model::image::ImageMap;
use crate::model::instance::AuditInstance;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Self-contained bundle written to and read from a user-chosen file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSnapshot {
    pub instance: AuditInstance,
    #[serde(default)]
    pub image_map: ImageMap,
}

impl AuditSnapshot {
    /// Parses a snapshot file. Anything that is not an object with an
    /// `instance` field of the right shape is `MalformedSnapshot`.
    pub fn from_slice(bytes: &[u8]) -> AuditResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AuditError::MalformedSnapshot(format!("not valid JSON: {e}")))?;

        match value.get("instance") {
            Some(instance) if instance.is_object() => {}
            Some(_) => {
                return Err(AuditError::MalformedSnapshot(
                    "`instance` must be an object".to_string(),
                ));
            }
            None => {
                return Err(AuditError::MalformedSnapshot(
                    "missing `instance` field".to_string(),
                ));
            }
        }

        serde_json::from_value(value).map_err(|e| AuditError::MalformedSnapshot(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> AuditResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AuditError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_instance_is_malformed() {
        let err = AuditSnapshot::from_slice(br#"{ "imageMap": {} }"#).unwrap_err();
        assert_eq!(
            err,
            AuditError::MalformedSnapshot("missing `instance` field".into())
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            AuditSnapshot::from_slice(b"not json"),
            Err(AuditError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            AuditSnapshot::from_slice(b"[1, 2]"),
            Err(AuditError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            AuditSnapshot::from_slice(br#"{ "instance": { "id": "a" } }"#),
            Err(AuditError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn image_map_is_optional() {
        let snapshot = AuditSnapshot::from_slice(
            br#"{ "instance": { "id": "a", "supplierName": "S", "auditor": "A",
                  "date": "2026-01-02T00:00:00Z" } }"#,
        )
        .unwrap();
        assert_eq!(snapshot.instance.id, "a");
        assert!(snapshot.instance.points.is_empty());
        assert_eq!(snapshot.image_map.total(), 0);
    }
}
