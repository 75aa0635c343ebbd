//! Res Panel Library
//!
//! Control-panel core for a resolution watcher service: keeps an editable
//! configuration draft apart from the saved one, mirrors the service's live
//! status through a polling loop, and guards the actions that are only legal
//! in certain states.

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod helpers;
pub mod i18n;
pub mod services;
pub mod states;
