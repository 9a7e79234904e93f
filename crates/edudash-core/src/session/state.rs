//! Edit session states.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Where an edit session is in its view/edit/save cycle.
///
/// ```text
/// Viewing --start_edit--> Editing --begin_save--> Saving
///    ^                     |   ^                    |
///    +-------cancel--------+   +------failure-------+
///    ^                                              |
///    +-------------------success--------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    /// Read-only display; working copy equals the snapshot.
    #[default]
    Viewing,
    /// Field editors are live.
    Editing,
    /// One save is in flight; editors are disabled.
    Saving,
}

impl SessionState {
    pub fn accepts_edits(self) -> bool {
        self == SessionState::Editing
    }
}
