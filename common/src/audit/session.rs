use crate::error::{AuditError, AuditResult};
use crate::model::image::ImageMap;
use crate::model::instance::AuditInstance;
use crate::model::snapshot::AuditSnapshot;
use serde::{Deserialize, Serialize};

/// An audit being worked on: the instance, its photos, and a revision that
/// grows with every applied change.
///
/// Consumers detect change by comparing `revision`; it is never reused for a
/// different state of the same session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSession {
    pub instance: AuditInstance,
    pub image_map: ImageMap,
    pub revision: u64,
}

impl AuditSession {
    pub fn new(instance: AuditInstance) -> Self {
        Self {
            instance,
            image_map: ImageMap::new(),
            revision: 0,
        }
    }

    pub fn from_snapshot(snapshot: AuditSnapshot) -> Self {
        Self {
            instance: snapshot.instance,
            image_map: snapshot.image_map,
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> AuditSnapshot {
        AuditSnapshot {
            instance: self.instance.clone(),
            image_map: self.image_map.clone(),
        }
    }

    /// Replaces the content with a snapshot file of the same audit. On error
    /// nothing changes.
    pub fn import(&mut self, bytes: &[u8]) -> AuditResult<()> {
        let snapshot = AuditSnapshot::from_slice(bytes)?;
        if snapshot.instance.id != self.instance.id {
            return Err(AuditError::validation(format!(
                "snapshot belongs to audit `{}`, not `{}`",
                snapshot.instance.id, self.instance.id
            )));
        }
        self.instance = snapshot.instance;
        self.image_map = snapshot.image_map;
        self.revision += 1;
        Ok(())
    }
}
