//! Service Layer
//!
//! The panel never talks to the operating system itself. Everything with a
//! side effect goes through the watcher service behind [`ServiceClient`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                PanelController               │
//! │  ┌────────────┐ ┌──────────────┐ ┌────────┐  │
//! │  │ DraftStore │ │ StatusPoller │ │ Guards │  │
//! │  └────────────┘ └──────────────┘ └────────┘  │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼ ServiceClient
//! ┌──────────────────────────────────────────────┐
//! │   watcher service (or SimulatedService)      │
//! └──────────────────────────────────────────────┘
//! ```

mod client;
mod simulated;

pub use client::*;
pub use simulated::*;
