use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::path::get_config_path;

pub const DEFAULT_GPSD_ADDRESS: &str = "127.0.0.1:2947";

/// Varifrån enheten hämtar sin position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSourceKind {
    /// gpsd över TCP
    #[default]
    Gpsd,
    /// Fast position från inställningarna
    Fixed,
    /// Ingen positionering
    Disabled,
}

impl LocationSourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gpsd => "GPS (gpsd)",
            Self::Fixed => "Sabit konum",
            Self::Disabled => "Kapalı",
        }
    }

    pub fn all() -> &'static [LocationSourceKind] {
        &[Self::Gpsd, Self::Fixed, Self::Disabled]
    }
}

impl fmt::Display for LocationSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpsd => write!(f, "gpsd"),
            Self::Fixed => write!(f, "fixed"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSettings {
    pub source: LocationSourceKind,
    pub gpsd_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_lng: Option<f64>,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            source: LocationSourceKind::default(),
            gpsd_address: DEFAULT_GPSD_ADDRESS.to_string(),
            fixed_lat: None,
            fixed_lng: None,
        }
    }
}

// ============================================================
// Kortkommandon
// ============================================================

/// Bindbar åtgärd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    NavigateNewVisit,
    NavigateVisits,
    NavigateCustomers,
    NavigateSettings,
    NewCustomer,
    FocusSearch,
    ExportCsv,
    CloseModal,
    ToggleDarkMode,
}

impl ShortcutAction {
    pub const ALL: &'static [Self] = &[
        Self::NavigateNewVisit,
        Self::NavigateVisits,
        Self::NavigateCustomers,
        Self::NavigateSettings,
        Self::NewCustomer,
        Self::FocusSearch,
        Self::ExportCsv,
        Self::CloseModal,
        Self::ToggleDarkMode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NavigateNewVisit => "Yeni Ziyaret",
            Self::NavigateVisits => "Ziyaretler",
            Self::NavigateCustomers => "Müşteriler",
            Self::NavigateSettings => "Ayarlar",
            Self::NewCustomer => "Yeni müşteri",
            Self::FocusSearch => "Ara",
            Self::ExportCsv => "CSV dışa aktar",
            Self::CloseModal => "Pencereyi kapat",
            Self::ToggleDarkMode => "Koyu/açık tema",
        }
    }

    fn to_key(&self) -> &'static str {
        match self {
            Self::NavigateNewVisit => "navigate_new_visit",
            Self::NavigateVisits => "navigate_visits",
            Self::NavigateCustomers => "navigate_customers",
            Self::NavigateSettings => "navigate_settings",
            Self::NewCustomer => "new_customer",
            Self::FocusSearch => "focus_search",
            Self::ExportCsv => "export_csv",
            Self::CloseModal => "close_modal",
            Self::ToggleDarkMode => "toggle_dark_mode",
        }
    }

    fn from_key(s: &str) -> Option<Self> {
        match s {
            "navigate_new_visit" => Some(Self::NavigateNewVisit),
            "navigate_visits" => Some(Self::NavigateVisits),
            "navigate_customers" => Some(Self::NavigateCustomers),
            "navigate_settings" => Some(Self::NavigateSettings),
            "new_customer" => Some(Self::NewCustomer),
            "focus_search" => Some(Self::FocusSearch),
            "export_csv" => Some(Self::ExportCsv),
            "close_modal" => Some(Self::CloseModal),
            "toggle_dark_mode" => Some(Self::ToggleDarkMode),
            _ => None,
        }
    }
}

/// Modifierare för kortkommando
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutModifiers {
    /// Ctrl (Linux/Windows) eller Cmd (macOS)
    pub ctrl_or_cmd: bool,
    pub shift: bool,
    pub alt: bool,
}

/// Ett kortkommando, tangent plus modifierare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardShortcut {
    pub key: egui::Key,
    pub modifiers: ShortcutModifiers,
}

impl KeyboardShortcut {
    pub fn new(key: egui::Key, ctrl_or_cmd: bool, shift: bool, alt: bool) -> Self {
        Self {
            key,
            modifiers: ShortcutModifiers { ctrl_or_cmd, shift, alt },
        }
    }

    /// Visningstext, t.ex. "Ctrl+N" eller "Cmd+N"
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.ctrl_or_cmd {
            if cfg!(target_os = "macos") {
                parts.push("Cmd");
            } else {
                parts.push("Ctrl");
            }
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    /// Serialisera till sträng (alltid "Ctrl" oavsett plattform)
    fn to_string_canonical(&self) -> String {
        let mut parts = Vec::new();
        if self.modifiers.ctrl_or_cmd {
            parts.push("Ctrl");
        }
        if self.modifiers.alt {
            parts.push("Alt");
        }
        if self.modifiers.shift {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        parts.join("+")
    }

    fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(|p| p.trim()).collect();
        let (key_name, modifier_parts) = parts.split_last()?;

        let mut ctrl_or_cmd = false;
        let mut shift = false;
        let mut alt = false;

        for part in modifier_parts {
            match *part {
                "Ctrl" | "Cmd" => ctrl_or_cmd = true,
                "Shift" => shift = true,
                "Alt" => alt = true,
                _ => return None,
            }
        }

        let key = egui::Key::from_name(key_name)?;
        Some(Self::new(key, ctrl_or_cmd, shift, alt))
    }

    /// Matchar denna genväg mot egui-modifierare och tangent?
    pub fn matches(&self, key: egui::Key, modifiers: &egui::Modifiers) -> bool {
        self.key == key
            && self.modifiers.ctrl_or_cmd == modifiers.command
            && self.modifiers.shift == modifiers.shift
            && self.modifiers.alt == modifiers.alt
    }
}

pub type ShortcutMap = HashMap<ShortcutAction, KeyboardShortcut>;

/// Standard-genvägar
pub fn default_shortcuts() -> ShortcutMap {
    let mut m = ShortcutMap::new();
    m.insert(ShortcutAction::NavigateNewVisit, KeyboardShortcut::new(egui::Key::Num1, true, false, false));
    m.insert(ShortcutAction::NavigateVisits, KeyboardShortcut::new(egui::Key::Num2, true, false, false));
    m.insert(ShortcutAction::NavigateCustomers, KeyboardShortcut::new(egui::Key::Num3, true, false, false));
    m.insert(ShortcutAction::NavigateSettings, KeyboardShortcut::new(egui::Key::Comma, true, false, false));
    m.insert(ShortcutAction::NewCustomer, KeyboardShortcut::new(egui::Key::N, true, false, false));
    m.insert(ShortcutAction::FocusSearch, KeyboardShortcut::new(egui::Key::F, true, false, false));
    m.insert(ShortcutAction::ExportCsv, KeyboardShortcut::new(egui::Key::E, true, false, false));
    m.insert(ShortcutAction::CloseModal, KeyboardShortcut::new(egui::Key::Escape, false, false, false));
    m.insert(ShortcutAction::ToggleDarkMode, KeyboardShortcut::new(egui::Key::D, true, false, false));
    m
}

/// Applikationsinställningar, sparas i settings.toml
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub dark_mode: bool,
    /// Lägg in två exempelkunder vid första start. En riktig
    /// installation vill troligen stänga av detta.
    pub seed_demo_customers: bool,
    pub export_directory: Option<PathBuf>,
    pub location: LocationSettings,
    pub shortcuts: ShortcutMap,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            seed_demo_customers: true,
            export_directory: None,
            location: LocationSettings::default(),
            shortcuts: default_shortcuts(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        let path = get_config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!("Använder standardinställningar ({:#})", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Kunde inte läsa {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Ogiltig TOML i {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Kunde inte skriva {}", path.display()))?;

        Ok(())
    }
}

impl Serialize for AppSettings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AppSettings", 5)?;
        state.serialize_field("dark_mode", &self.dark_mode)?;
        state.serialize_field("seed_demo_customers", &self.seed_demo_customers)?;
        match &self.export_directory {
            Some(dir) => state.serialize_field("export_directory", dir)?,
            None => state.skip_field("export_directory")?,
        }
        state.serialize_field("location", &self.location)?;

        // Serialisera genvägar som HashMap<String, String>
        let shortcuts_map: HashMap<String, String> = self
            .shortcuts
            .iter()
            .map(|(action, shortcut)| {
                (action.to_key().to_string(), shortcut.to_string_canonical())
            })
            .collect();
        state.serialize_field("shortcuts", &shortcuts_map)?;

        state.end()
    }
}

impl<'de> Deserialize<'de> for AppSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct AppSettingsHelper {
            dark_mode: Option<bool>,
            seed_demo_customers: Option<bool>,
            export_directory: Option<PathBuf>,
            location: Option<LocationSettings>,
            shortcuts: Option<HashMap<String, String>>,
        }

        let helper = AppSettingsHelper::deserialize(deserializer)?;

        // Börja med defaults, överskrid med sparade
        let mut shortcuts = default_shortcuts();
        if let Some(saved) = helper.shortcuts {
            for (key, value) in saved {
                if let (Some(action), Some(shortcut)) =
                    (ShortcutAction::from_key(&key), KeyboardShortcut::parse(&value))
                {
                    shortcuts.insert(action, shortcut);
                }
            }
        }

        Ok(AppSettings {
            dark_mode: helper.dark_mode.unwrap_or(false),
            seed_demo_customers: helper.seed_demo_customers.unwrap_or(true),
            export_directory: helper.export_directory,
            location: helper.location.unwrap_or_default(),
            shortcuts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_with_modifiers() {
        let shortcut = KeyboardShortcut::new(egui::Key::E, true, true, true);
        let s = shortcut.to_string_canonical();
        assert_eq!(s, "Ctrl+Alt+Shift+E");
        assert_eq!(KeyboardShortcut::parse(&s), Some(shortcut));
    }

    #[test]
    fn test_shortcut_parse_rejects_unknown_modifier() {
        assert_eq!(KeyboardShortcut::parse("Hyper+N"), None);
        assert_eq!(KeyboardShortcut::parse(""), None);
    }

    #[test]
    fn test_default_shortcuts_covers_all_actions() {
        let defaults = default_shortcuts();
        for action in ShortcutAction::ALL {
            assert!(
                defaults.contains_key(action),
                "Missing default for {:?}",
                action
            );
            assert_eq!(ShortcutAction::from_key(action.to_key()), Some(*action));
        }
    }

    #[test]
    fn test_app_settings_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.toml");

        let mut settings = AppSettings::default();
        settings.dark_mode = true;
        settings.seed_demo_customers = false;
        settings.location.source = LocationSourceKind::Fixed;
        settings.location.fixed_lat = Some(38.9186);
        settings.location.fixed_lng = Some(27.8397);
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path).unwrap();
        assert!(loaded.dark_mode);
        assert!(!loaded.seed_demo_customers);
        assert_eq!(loaded.export_directory, None);
        assert_eq!(loaded.location, settings.location);
        assert_eq!(loaded.shortcuts, settings.shortcuts);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let toml_str = r#"
dark_mode = true

[location]
source = "disabled"
"#;
        let loaded: AppSettings = toml::from_str(toml_str).unwrap();
        assert!(loaded.dark_mode);
        assert!(loaded.seed_demo_customers);
        assert_eq!(loaded.location.source, LocationSourceKind::Disabled);
        assert_eq!(loaded.location.gpsd_address, DEFAULT_GPSD_ADDRESS);
        assert_eq!(loaded.shortcuts.len(), ShortcutAction::ALL.len());
    }

    #[test]
    fn test_old_timeout_key_is_ignored() {
        let toml_str = r#"
[location]
source = "gpsd"
timeout_secs = 60
"#;
        let loaded: AppSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(loaded.location, LocationSettings::default());

        let written = toml::to_string(&loaded).unwrap();
        assert!(!written.contains("timeout_secs"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppSettings::load_from(&dir.path().join("nope.toml")).is_err());
    }
}
