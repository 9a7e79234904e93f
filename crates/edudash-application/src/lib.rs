//! Screen use cases for the edudash back-office.
//!
//! Wires catalog screens to edit sessions and the persistence gateway, and
//! forwards save acknowledgments to a [`Notifier`].

pub mod notifier;
pub mod screen_service;


pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use screen_service::ScreenService;
