//! Domain - Pure Data Structures
//!
//! Value types shared between the panel and the watcher service.

pub mod config;
pub mod monitor;

pub use config::*;
pub use monitor::*;
