//! Live audit sessions and the photo attachment pipeline.
//!
//! Sessions are kept in memory, keyed by audit id, for as long as the
//! service runs. Snapshots are how an audit outlives the process.
//!
//! Photo uploads finish in whatever order the client's reads complete.
//! Instead of each upload handler writing into the session it looked at
//! when it started, every finished upload is sent as an `AttachmentUpdate`
//! over an MPSC channel to one updater task. The updater takes the write
//! lock, appends to the session as it is at that moment and acknowledges
//! the handler over a oneshot channel. No append is ever made against a
//! stale copy, so concurrent uploads cannot overwrite each other.
//!
//! Each session's photos are capped at `image_budget` encoded bytes so that
//! its snapshot export always fits the snapshot import limit.

use crate::error::ApiError;
use common::audit::capture::{AuditAction, Capabilities};
use common::audit::session::AuditSession;
use common::ids::UuidIds;
use common::requests::ImagesAttached;
use log::debug;
use std::collections::hash_map::Entry;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, oneshot, RwLock};

/// Shared, clonable handle on all live sessions.
///
/// Created in `main.rs` and injected into the Actix application as
/// `web::Data`.
#[derive(Clone)]
pub struct SessionsState {
    /// Audit id to its session. Handlers take the write lock only for the
    /// duration of a single action.
    pub sessions: Arc<RwLock<HashMap<String, AuditSession>>>,

    /// Sender side of the attachment channel drained by
    /// `start_attachment_updater`.
    pub tx: mpsc::Sender<AttachmentUpdate>,

    /// Encoded photo bytes a single session may hold.
    pub image_budget: usize,
}

/// One finished photo upload, waiting to be appended.
#[derive(Debug)]
pub struct AttachmentUpdate {
    pub(crate) audit_id: String,
    pub(crate) point_id: String,
    /// Inline `data:image/...;base64,` payload.
    pub(crate) payload: String,
    pub(crate) ack: oneshot::Sender<Result<ImagesAttached, ApiError>>,
}

impl SessionsState {
    pub fn new(buffer: usize, image_budget: usize) -> (Self, mpsc::Receiver<AttachmentUpdate>) {
        let (tx, rx) = mpsc::channel(buffer);
        let state = Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            tx,
            image_budget,
        };
        (state, rx)
    }

    /// Queues a photo for `point_id` and waits until the updater applied it.
    pub async fn attach(
        &self,
        audit_id: &str,
        point_id: &str,
        payload: String,
    ) -> Result<ImagesAttached, ApiError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(AttachmentUpdate {
                audit_id: audit_id.to_string(),
                point_id: point_id.to_string(),
                payload,
                ack,
            })
            .await
            .map_err(|_| ApiError::Internal("attachment updater stopped".to_string()))?;
        done.await
            .map_err(|_| ApiError::Internal("attachment updater dropped the upload".to_string()))?
    }

    /// Registers a new session. An id that is already open is refused so
    /// its unsaved state is never replaced.
    pub async fn insert(&self, session: AuditSession) -> Result<AuditSession, ApiError> {
        match self.sessions.write().await.entry(session.instance.id.clone()) {
            Entry::Occupied(entry) => Err(ApiError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(session).clone()),
        }
    }

    /// Closes a session and drops its photos.
    pub async fn remove(&self, audit_id: &str) -> Result<AuditSession, ApiError> {
        self.sessions
            .write()
            .await
            .remove(audit_id)
            .ok_or_else(|| ApiError::SessionNotFound(audit_id.to_string()))
    }

    /// Fails when `extra` more photo bytes would push the session past its
    /// budget.
    pub fn check_image_budget(
        &self,
        session: &AuditSession,
        extra: usize,
    ) -> Result<(), ApiError> {
        let used = session.image_map.payload_bytes();
        if used.saturating_add(extra) > self.image_budget {
            return Err(ApiError::TooLarge(format!(
                "audit `{}` holds {used} bytes of photos, the limit is {}",
                session.instance.id, self.image_budget
            )));
        }
        Ok(())
    }

    pub async fn get(&self, audit_id: &str) -> Result<AuditSession, ApiError> {
        self.sessions
            .read()
            .await
            .get(audit_id)
            .cloned()
            .ok_or_else(|| ApiError::SessionNotFound(audit_id.to_string()))
    }

    /// Runs `f` on the live session under the write lock.
    pub async fn update<T>(
        &self,
        audit_id: &str,
        f: impl FnOnce(&mut AuditSession) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(audit_id)
            .ok_or_else(|| ApiError::SessionNotFound(audit_id.to_string()))?;
        f(session)
    }
}

/// Drains the attachment channel until every sender is gone.
///
/// Spawned once as a long-running task in `main.rs`.
pub async fn start_attachment_updater(
    state: SessionsState,
    mut rx: mpsc::Receiver<AttachmentUpdate>,
) {
    while let Some(update) = rx.recv().await {
        let AttachmentUpdate {
            audit_id,
            point_id,
            payload,
            ack,
        } = update;

        let outcome = state
            .update(&audit_id, |session| {
                state.check_image_budget(session, payload.len())?;
                session.apply_mut(
                    &AuditAction::AttachImage {
                        point_id: point_id.clone(),
                        payload,
                    },
                    Capabilities::answering(),
                    &mut UuidIds,
                )?;
                Ok(ImagesAttached {
                    point_id: point_id.clone(),
                    count: session.image_map.images(&point_id).len(),
                    revision: session.revision,
                })
            })
            .await;

        debug!("Attachment for {audit_id}/{point_id}: {:?}", outcome.as_ref().map(|a| a.count));
        // the uploader may have gone away; the append stands either way
        let _ = ack.send(outcome);
    }
}
