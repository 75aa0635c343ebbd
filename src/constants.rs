//! Panel Constants
//!
//! Centralized defaults shared by the state layer and the settings file.

/// Status polling interval
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Lower bound accepted for a configured polling interval
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

/// Notice history capacity
pub const NOTICE_CAPACITY: usize = 100;

/// Default desktop resolution (restored when the game exits)
pub const DEFAULT_DESKTOP_WIDTH: u32 = 1920;
pub const DEFAULT_DESKTOP_HEIGHT: u32 = 1080;
pub const DEFAULT_DESKTOP_REFRESH_HZ: u32 = 144;

/// Default in-game resolution (applied when the game is detected)
pub const DEFAULT_GAME_WIDTH: u32 = 1568;
pub const DEFAULT_GAME_HEIGHT: u32 = 1080;
pub const DEFAULT_GAME_REFRESH_HZ: u32 = 144;

/// Settings file name inside the config directory
pub const SETTINGS_FILE: &str = "res-panel.toml";

/// Log file prefix inside the data directory
pub const LOG_FILE_PREFIX: &str = "res-panel.log";

/// Project directory identifiers
pub const PROJECT_QUALIFIER: &str = "com";
pub const PROJECT_ORGANIZATION: &str = "respanel";
pub const PROJECT_APPLICATION: &str = "res-panel";
