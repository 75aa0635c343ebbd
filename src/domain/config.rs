//! Config - Watcher Service Configuration
//!
//! The aggregate owned by the external watcher service. The panel only ever
//! reads it, edits a local copy, and sends the whole value back.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DESKTOP_HEIGHT, DEFAULT_DESKTOP_REFRESH_HZ, DEFAULT_DESKTOP_WIDTH,
    DEFAULT_GAME_HEIGHT, DEFAULT_GAME_REFRESH_HZ, DEFAULT_GAME_WIDTH,
};
use crate::error::{Error, Result};

/// A display mode: resolution plus refresh rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionProfile {
    #[serde(rename = "ResolutionSizeX")]
    pub width: u32,
    #[serde(rename = "ResolutionSizeY")]
    pub height: u32,
    #[serde(rename = "RefreshRate")]
    pub refresh_rate_hz: u32,
}

impl ResolutionProfile {
    pub const fn new(width: u32, height: u32, refresh_rate_hz: u32) -> Self {
        Self {
            width,
            height,
            refresh_rate_hz,
        }
    }

    /// Every dimension must be strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.refresh_rate_hz > 0
    }

    fn set(&mut self, field: ResolutionField, value: u32) {
        match field {
            ResolutionField::Width => self.width = value,
            ResolutionField::Height => self.height = value,
            ResolutionField::RefreshRate => self.refresh_rate_hz = value,
        }
    }
}

impl std::fmt::Display for ResolutionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}@{}Hz", self.width, self.height, self.refresh_rate_hz)
    }
}

/// Watcher section: the executable the watcher looks for
///
/// On disk the section also carries the game resolution as `Width`/`Height`/`Fps`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherSection {
    pub game_path: String,
}

/// Valorant section: install locations found by the game path scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValorantSection {
    #[serde(rename = "GamePath", default)]
    pub game_path: String,
    #[serde(rename = "LauncherPath", default)]
    pub launcher_path: String,
}

/// Development section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentSection {
    #[serde(rename = "Debug", default)]
    pub debug: bool,
}

/// Complete configuration aggregate
///
/// A pure value: two configurations are the same configuration exactly when
/// they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile", into = "ConfigFile")]
pub struct Configuration {
    pub desktop: ResolutionProfile,
    pub game: ResolutionProfile,
    pub watcher: WatcherSection,
    pub valorant: ValorantSection,
    pub development: DevelopmentSection,
}

/// `[Watcher]` table as the service writes it
///
/// The service keeps the in-game resolution here as `Width`/`Height`/`Fps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WatcherTable {
    #[serde(rename = "GamePath", default)]
    game_path: Option<String>,
    #[serde(rename = "Width", default)]
    width: Option<u32>,
    #[serde(rename = "Height", default)]
    height: Option<u32>,
    #[serde(rename = "Fps", default)]
    fps: Option<u32>,
}

/// On-disk layout of the service's config file
///
/// Older service builds write only `[Watcher]`, `[Valorant]` and
/// `[Development]`. `[Desktop]` and `[Game]` are optional on read. On write
/// the game profile goes to both `[Game]` and `[Watcher]` so either build can
/// read the file back.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Desktop", default, skip_serializing_if = "Option::is_none")]
    desktop: Option<ResolutionProfile>,
    #[serde(rename = "Game", default, skip_serializing_if = "Option::is_none")]
    game: Option<ResolutionProfile>,
    #[serde(rename = "Watcher", default)]
    watcher: WatcherTable,
    #[serde(rename = "Valorant", default)]
    valorant: ValorantSection,
    #[serde(rename = "Development", default)]
    development: DevelopmentSection,
}

impl From<ConfigFile> for Configuration {
    fn from(file: ConfigFile) -> Self {
        let defaults = Configuration::default();
        let watcher = file.watcher;
        let game = file.game.unwrap_or(ResolutionProfile {
            width: watcher.width.unwrap_or(defaults.game.width),
            height: watcher.height.unwrap_or(defaults.game.height),
            refresh_rate_hz: watcher.fps.unwrap_or(defaults.game.refresh_rate_hz),
        });

        Self {
            desktop: file.desktop.unwrap_or(defaults.desktop),
            game,
            watcher: WatcherSection {
                game_path: watcher.game_path.unwrap_or_default(),
            },
            valorant: file.valorant,
            development: file.development,
        }
    }
}

impl From<Configuration> for ConfigFile {
    fn from(config: Configuration) -> Self {
        Self {
            desktop: Some(config.desktop),
            game: Some(config.game),
            watcher: WatcherTable {
                game_path: Some(config.watcher.game_path),
                width: Some(config.game.width),
                height: Some(config.game.height),
                fps: Some(config.game.refresh_rate_hz),
            },
            valorant: config.valorant,
            development: config.development,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            desktop: ResolutionProfile::new(
                DEFAULT_DESKTOP_WIDTH,
                DEFAULT_DESKTOP_HEIGHT,
                DEFAULT_DESKTOP_REFRESH_HZ,
            ),
            game: ResolutionProfile::new(
                DEFAULT_GAME_WIDTH,
                DEFAULT_GAME_HEIGHT,
                DEFAULT_GAME_REFRESH_HZ,
            ),
            watcher: WatcherSection::default(),
            valorant: ValorantSection::default(),
            development: DevelopmentSection::default(),
        }
    }
}

impl Configuration {
    /// Borrow one of the two resolution profiles
    pub fn profile(&self, kind: ProfileKind) -> &ResolutionProfile {
        match kind {
            ProfileKind::Desktop => &self.desktop,
            ProfileKind::Game => &self.game,
        }
    }

    fn profile_mut(&mut self, kind: ProfileKind) -> &mut ResolutionProfile {
        match kind {
            ProfileKind::Desktop => &mut self.desktop,
            ProfileKind::Game => &mut self.game,
        }
    }

    /// Apply a single field edit
    pub fn apply(&mut self, edit: ConfigEdit) {
        match edit {
            ConfigEdit::Resolution {
                profile,
                field,
                value,
            } => self.profile_mut(profile).set(field, value),
            ConfigEdit::WatcherGamePath(path) => self.watcher.game_path = path,
            ConfigEdit::ValorantGamePath(path) => self.valorant.game_path = path,
            ConfigEdit::ValorantLauncherPath(path) => self.valorant.launcher_path = path,
            ConfigEdit::Debug(debug) => self.development.debug = debug,
        }
    }

    /// Check that the value is acceptable to send to the service
    pub fn validate(&self) -> Result<()> {
        for kind in [ProfileKind::Desktop, ProfileKind::Game] {
            let profile = self.profile(kind);
            if !profile.is_valid() {
                return Err(Error::Invalid {
                    message: format!("{kind} resolution {profile} has a zero dimension"),
                });
            }
        }
        Ok(())
    }

    /// Whether the watcher has an executable to look for
    pub fn has_watcher_game_path(&self) -> bool {
        !self.watcher.game_path.trim().is_empty()
    }

    /// Whether the game install location is known
    pub fn has_valorant_game_path(&self) -> bool {
        !self.valorant.game_path.trim().is_empty()
    }
}

/// Which resolution profile an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    /// Restored when the game exits
    Desktop,
    /// Applied when the game launches
    Game,
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Desktop => write!(f, "desktop"),
            ProfileKind::Game => write!(f, "game"),
        }
    }
}

/// Field of a resolution profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionField {
    Width,
    Height,
    RefreshRate,
}

/// A single typed edit to the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEdit {
    Resolution {
        profile: ProfileKind,
        field: ResolutionField,
        value: u32,
    },
    WatcherGamePath(String),
    ValorantGamePath(String),
    ValorantLauncherPath(String),
    Debug(bool),
}

impl ConfigEdit {
    /// Edit one dimension of a resolution profile
    pub fn resolution(profile: ProfileKind, field: ResolutionField, value: u32) -> Self {
        ConfigEdit::Resolution {
            profile,
            field,
            value,
        }
    }
}

/// A named in-game resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPreset {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

impl ResolutionPreset {
    /// Expand into the edits it stands for. Refresh rate is left alone.
    pub fn edits(&self) -> [ConfigEdit; 2] {
        [
            ConfigEdit::resolution(ProfileKind::Game, ResolutionField::Width, self.width),
            ConfigEdit::resolution(ProfileKind::Game, ResolutionField::Height, self.height),
        ]
    }
}

/// Common stretched resolutions offered in the game section
pub const GAME_PRESETS: &[ResolutionPreset] = &[
    ResolutionPreset {
        label: "1440x1080 (4:3)",
        width: 1440,
        height: 1080,
    },
    ResolutionPreset {
        label: "1280x1024 (5:4)",
        width: 1280,
        height: 1024,
    },
    ResolutionPreset {
        label: "1568x1080",
        width: 1568,
        height: 1080,
    },
    ResolutionPreset {
        label: "1920x1080 (16:9)",
        width: 1920,
        height: 1080,
    },
];
