//! i18n - Internationalization Module
//!
//! Provides simple translation functions using HashMap-based lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// English (US)
    #[default]
    EnUS,
    /// Chinese (Simplified)
    ZhCN,
}

impl Locale {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUS => "English",
            Locale::ZhCN => "中文",
        }
    }

    /// Parse a language code such as `zh`, `zh-CN` or `en_US`
    pub fn from_code(code: &str) -> Option<Self> {
        let lang = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" => Some(Locale::EnUS),
            "zh" => Some(Locale::ZhCN),
            _ => None,
        }
    }

    /// Use the configured code, else the system locale, else English
    pub fn resolve(configured: Option<&str>) -> Self {
        configured
            .and_then(Self::from_code)
            .or_else(|| Self::from_code(&locale_config::Locale::current().to_string()))
            .unwrap_or_default()
    }
}

/// Translation resources
static TRANSLATIONS: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();

/// Initialize translations (key -> (en, zh))
fn init_translations() -> HashMap<&'static str, (&'static str, &'static str)> {
    let mut map = HashMap::new();

    // Configuration
    map.insert("config-loaded", ("Configuration loaded", "配置已加载"));
    map.insert("config-load-failed", ("Failed to load configuration", "加载配置失败"));
    map.insert("config-saved", ("Configuration applied", "配置已应用"));
    map.insert("config-save-failed", ("Failed to apply configuration", "应用配置失败"));
    map.insert("config-discarded", ("Changes discarded", "已重置为已保存的配置"));
    map.insert("config-reset", ("Configuration reset to defaults", "配置已重置为默认值"));
    map.insert("config-reset-failed", ("Failed to reset configuration", "重置配置失败"));

    // Status
    map.insert("status-refreshed", ("Status refreshed", "状态已刷新"));
    map.insert("status-refresh-failed", ("Failed to refresh status", "刷新状态失败"));
    map.insert("init-failed", ("Initialization failed", "初始化失败"));

    // Watcher
    map.insert("watcher-started", ("Watcher started", "监听器已启动"));
    map.insert("watcher-stopped", ("Watcher stopped", "监听器已停止"));
    map.insert("watcher-toggle-failed", ("Failed to toggle watcher", "切换监听器失败"));
    map.insert("watcher-already-on", ("Watcher is already running", "监听器已在运行"));
    map.insert("watcher-already-off", ("Watcher is already stopped", "监听器未在运行"));

    // Monitors
    map.insert("monitor-select-first", ("Select a monitor first", "请先选择显示器"));
    map.insert("monitor-selected", ("Monitor selected", "已选择显示器"));
    map.insert("monitor-select-failed", ("Failed to select monitor", "选择显示器失败"));
    map.insert("monitor-locked", ("Stop the watcher before changing the monitor", "监听中无法切换显示器"));
    map.insert("monitors-refreshed", ("Monitor list refreshed", "显示器列表已刷新"));
    map.insert("monitors-scan-failed", ("Failed to scan monitors", "扫描显示器失败"));
    map.insert("monitor-selection-cleared", ("Selected monitor is no longer connected", "所选显示器已断开"));

    // Game
    map.insert("game-path-required", ("Set the game path first", "请先设置游戏路径"));
    map.insert("game-path-set", ("Game path saved", "游戏路径设置成功"));
    map.insert("game-path-set-failed", ("Failed to save game path", "设置游戏路径失败"));
    map.insert("game-started", ("Game started", "游戏启动成功"));
    map.insert("game-start-failed", ("Failed to start game", "启动游戏失败"));
    map.insert("game-scan-done", ("Game path found and saved", "游戏路径扫描并保存成功"));
    map.insert("game-scan-failed", ("Failed to scan game path", "扫描游戏路径失败"));
    map.insert("install-path-required", ("Scan for the game path first", "请先获取游戏路径"));

    // Tools
    map.insert("preset-watcher-created", ("Preset applied to watcher", "预设已应用到监听器"));
    map.insert("preset-watcher-failed", ("Failed to apply preset", "应用预设失败"));
    map.insert("permissions-restored", ("File permissions restored", "文件权限已解锁"));
    map.insert("permissions-failed", ("Failed to restore file permissions", "解锁文件权限失败"));
    map.insert("taskbar-hidden", ("Taskbar hidden", "任务栏已隐藏"));
    map.insert("taskbar-failed", ("Failed to hide taskbar", "隐藏任务栏失败"));
    map.insert("cfg-modified", ("Game config file updated", "CFG 文件修改成功"));
    map.insert("cfg-failed", ("Failed to update game config file", "CFG 文件修改失败"));

    map
}

/// Get translations
fn translations() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    TRANSLATIONS.get_or_init(init_translations)
}

/// Translate a key
pub fn t(locale: Locale, key: &str) -> String {
    if let Some(&(en, zh)) = translations().get(key) {
        match locale {
            Locale::EnUS => en.to_string(),
            Locale::ZhCN => zh.to_string(),
        }
    } else {
        // Fallback: return the key itself
        key.to_string()
    }
}

/// Translate a key and append a detail, e.g. the error text
pub fn t_detail(locale: Locale, key: &str, detail: impl std::fmt::Display) -> String {
    format!("{}: {detail}", t(locale, key))
}
