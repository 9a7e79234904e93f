//! The edit-session controller.
//!
//! [`EditSession`] owns a snapshot (last known-good state) and a working
//! copy. Cancel restores the snapshot; a successful save promotes the
//! working copy; a failed save leaves the user's edits untouched.

use crate::error::SessionError;
use crate::gateway::{PersistenceError, PersistenceGateway, RecordKey};
use crate::record::Record;
use crate::validation::ValidationError;

use super::notice::Notice;
use super::state::SessionState;

/// Data an [`EditSession`] can edit.
pub trait Editable: Clone + PartialEq + Send + Sync {
    /// Static description of the data (schema, list settings).
    type Spec: Send + Sync;

    /// Entity name used in user-facing messages.
    fn entity(spec: &Self::Spec) -> &str;

    fn validate(&self, spec: &Self::Spec) -> Result<(), ValidationError>;

    /// The document handed to the gateway on save.
    fn to_document(&self, key: &RecordKey, spec: &Self::Spec) -> Record;
}

/// A validated document waiting for the gateway's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub key: RecordKey,
    pub document: Record,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStart {
    /// Validation passed; the session is now `Saving`.
    Ready(PendingSave),
    /// Validation failed; the session is still `Editing`.
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Persisted; carries the document now stored.
    Saved(Record),
    /// Blocked before reaching the gateway.
    Invalid(ValidationError),
    /// The gateway rejected the save; edits are kept.
    Failed(PersistenceError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// View/edit/save controller for one logical document.
#[derive(Debug, Clone)]
pub struct EditSession<D: Editable> {
    key: RecordKey,
    spec: D::Spec,
    state: SessionState,
    snapshot: D,
    working: D,
    generation: u64,
    notice: Option<Notice>,
}

impl<D: Editable> EditSession<D> {
    /// Starts in `Viewing` with `data` as both snapshot and working copy.
    pub fn new(key: RecordKey, spec: D::Spec, data: D) -> Self {
        Self {
            key,
            spec,
            state: SessionState::Viewing,
            snapshot: data.clone(),
            working: data,
            generation: 0,
            notice: None,
        }
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn spec(&self) -> &D::Spec {
        &self.spec
    }

    pub(crate) fn spec_mut(&mut self) -> &mut D::Spec {
        &mut self.spec
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == SessionState::Editing
    }

    /// The data editors are bound to.
    pub fn working(&self) -> &D {
        &self.working
    }

    /// The last known-good state.
    pub fn snapshot(&self) -> &D {
        &self.snapshot
    }

    /// True when the working copy holds uncommitted edits.
    pub fn is_dirty(&self) -> bool {
        self.working != self.snapshot
    }

    /// Replaces the session's data with freshly loaded source data.
    ///
    /// Any edits are dropped, a pending notice is discarded and a save still
    /// in flight is invalidated; its completion will be rejected with
    /// [`SessionError::StaleSave`].
    pub fn reload(&mut self, data: D) {
        self.snapshot = data.clone();
        self.working = data;
        self.state = SessionState::Viewing;
        self.generation = self.generation.wrapping_add(1);
        self.notice = None;
    }

    /// Enters edit mode with a fresh copy of the snapshot. Calling it while
    /// already editing keeps the current edits.
    pub fn start_edit(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Viewing => {
                self.working = self.snapshot.clone();
                self.state = SessionState::Editing;
                Ok(())
            }
            SessionState::Editing => Ok(()),
            SessionState::Saving => Err(self.invalid("start editing")),
        }
    }

    /// Discards edits and returns to `Viewing`. A no-op while viewing.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Viewing => Ok(()),
            SessionState::Editing => {
                self.working = self.snapshot.clone();
                self.state = SessionState::Viewing;
                Ok(())
            }
            SessionState::Saving => Err(self.invalid("cancel")),
        }
    }

    /// Applies a change to the working copy. Only allowed while `Editing`.
    pub(crate) fn edit<R, F>(&mut self, action: &'static str, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut D, &mut D::Spec) -> Result<R, SessionError>,
    {
        if !self.state.accepts_edits() {
            return Err(self.invalid(action));
        }
        f(&mut self.working, &mut self.spec)
    }

    /// Validates the working copy and, if it passes, moves to `Saving`.
    pub fn begin_save(&mut self) -> Result<SaveStart, SessionError> {
        if self.state != SessionState::Editing {
            return Err(self.invalid("save"));
        }

        if let Err(err) = self.working.validate(&self.spec) {
            self.notice = Some(Notice::failure(err.to_string()));
            return Ok(SaveStart::Invalid(err));
        }

        self.state = SessionState::Saving;
        Ok(SaveStart::Ready(PendingSave {
            key: self.key.clone(),
            document: self.working.to_document(&self.key, &self.spec),
            generation: self.generation,
        }))
    }

    /// Applies the gateway's answer to a pending save.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: crate::error::Result<()>,
    ) -> Result<SaveOutcome, SessionError> {
        if pending.generation != self.generation {
            return Err(SessionError::StaleSave);
        }
        if self.state != SessionState::Saving {
            return Err(self.invalid("complete a save"));
        }

        let entity = D::entity(&self.spec).to_string();
        match result {
            Ok(()) => {
                self.snapshot = self.working.clone();
                self.state = SessionState::Viewing;
                self.notice = Some(Notice::success(format!("Saved {}", entity)));
                Ok(SaveOutcome::Saved(pending.document))
            }
            Err(err) => {
                self.state = SessionState::Editing;
                let failure = PersistenceError {
                    key: pending.key,
                    reason: err.to_string(),
                };
                self.notice = Some(Notice::failure(format!(
                    "Could not save {}: {}",
                    entity, failure.reason
                )));
                Ok(SaveOutcome::Failed(failure))
            }
        }
    }

    /// Validates, makes exactly one gateway call and applies its answer.
    /// Failures are never retried.
    pub async fn save<G>(&mut self, gateway: &G) -> Result<SaveOutcome, SessionError>
    where
        G: PersistenceGateway + ?Sized,
    {
        match self.begin_save()? {
            SaveStart::Invalid(err) => Ok(SaveOutcome::Invalid(err)),
            SaveStart::Ready(pending) => {
                let result = gateway.save(&pending.key, &pending.document).await;
                self.complete_save(pending, result)
            }
        }
    }

    /// The acknowledgment of the last save attempt, if not yet taken.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}
