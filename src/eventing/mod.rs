//! Eventing - State Layer to UI Notifications

pub mod panel_event;

pub use panel_event::*;
