//! Edit-session controllers.
//!
//! Nearly every admin screen follows the same contract: show data
//! read-only, enter edit mode, change a working copy, then either cancel
//! back to the snapshot or save through the persistence gateway.
//!
//! # Module Structure
//!
//! - `state`: `SessionState` (`Viewing`, `Editing`, `Saving`)
//! - `editor`: the generic `EditSession<D>` state machine
//! - `record`: single-record sessions (`RecordSession`)
//! - `list`: list-of-records sessions (`ListSession`)
//! - `temp_id`: temporary ids for unsaved list items
//! - `notice`: user-facing save acknowledgments

mod editor;
mod list;
mod notice;
mod record;
mod state;
mod temp_id;

#[cfg(test)]
mod session_test;

pub use editor::{EditSession, Editable, PendingSave, SaveOutcome, SaveStart};
pub use list::{ListSession, ListSpec, RecordList};
pub use notice::{Notice, NoticeLevel};
pub use record::RecordSession;
pub use state::SessionState;
pub use temp_id::{TempIdGenerator, id_suffix};
