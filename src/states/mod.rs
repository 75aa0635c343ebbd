//! State Layer
//!
//! Panel state that outlives a single render: the configuration draft, the
//! mirrored service status and its poller, the operating mode, notices and
//! the panel's own settings.

mod draft;
mod mode;
mod monitors;
mod notices;
mod poller;
mod settings;
mod status;

pub use draft::*;
pub use mode::*;
pub use monitors::*;
pub use notices::*;
pub use poller::*;
pub use settings::*;
pub use status::*;
