//! App Layer
//!
//! Session wiring: shared state handles, the controller facade and the
//! runtime entry point.

pub mod application;
pub mod controller;
pub mod entities;

pub use controller::PanelController;
pub use entities::PanelEntities;
