//! Light/dark theme toggle.
//!
//! The toggle is a two-state machine over [`ThemePreference`]. Its state is
//! read once from the document-level style attribute by [`ThemeToggle::init`]
//! and flipped by [`ThemeToggle::toggle`], which persists the new preference
//! and mirrors it back onto the attribute. Both pieces of global state live
//! behind [`ThemeStore`] so they can be swapped for an in-memory fake.

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Key the preference is persisted under.
pub const STORAGE_KEY: &str = "color-mode";

/// Attribute value that marks dark mode on the document body.
pub const DARK_MARKER: &str = "dark";

/// Folder, relative to the site root, holding the persisted store.
pub const STATE_DIR: &str = ".cafecito";
pub const STORAGE_FILE: &str = "local-storage.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Value of the document style attribute for this preference.
    pub fn attribute(self) -> &'static str {
        match self {
            ThemePreference::Light => "",
            ThemePreference::Dark => DARK_MARKER,
        }
    }

    /// Reads the document style attribute. Anything but the dark marker is light.
    pub fn from_attribute(attribute: &str) -> Self {
        if attribute == DARK_MARKER {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }

    /// Parses a persisted value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global state the toggle reads and writes.
///
/// Writes are best-effort: implementations swallow (and log) failures.
pub trait ThemeStore {
    /// Current value of the document-level style attribute.
    fn attribute(&self) -> String;

    fn set_attribute(&mut self, value: &str);

    /// Last persisted preference, if any.
    fn persisted(&self) -> Option<ThemePreference>;

    fn persist(&mut self, preference: ThemePreference);
}

/// In-memory store for tests and previews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryThemeStore {
    pub attribute: String,
    pub persisted: Option<ThemePreference>,
}

impl MemoryThemeStore {
    pub fn with_attribute(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            persisted: None,
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn attribute(&self) -> String {
        self.attribute.clone()
    }

    fn set_attribute(&mut self, value: &str) {
        self.attribute = value.to_string();
    }

    fn persisted(&self) -> Option<ThemePreference> {
        self.persisted
    }

    fn persist(&mut self, preference: ThemePreference) {
        self.persisted = Some(preference);
    }
}

/// Store backed by a JSON key-value file, the on-disk analogue of
/// `localStorage`.
///
/// Opening the store seeds the document attribute from the persisted value,
/// the same way the rendered page applies the stored preference to `<body>`
/// before anything reads it.
#[derive(Debug)]
pub struct FileThemeStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    attribute: String,
}

impl FileThemeStore {
    /// Opens the store under `root/.cafecito/local-storage.json`.
    pub fn open_in(root: &Path) -> Self {
        Self::open(root.join(STATE_DIR).join(STORAGE_FILE))
    }

    /// Opens the store at `path`. A missing or unreadable file is an empty store.
    pub fn open(path: PathBuf) -> Self {
        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable theme store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Could not read theme store {}: {e}", path.display());
                }
                BTreeMap::new()
            }
        };

        let attribute = entries
            .get(STORAGE_KEY)
            .and_then(|v| ThemePreference::parse(v))
            .unwrap_or_default()
            .attribute()
            .to_string();

        tracing::debug!(
            "Opened theme store {} (attribute: {:?})",
            path.display(),
            attribute
        );
        Self {
            path,
            entries,
            attribute,
        }
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::other)?;
        fs::write(&self.path, json)
    }
}

impl ThemeStore for FileThemeStore {
    fn attribute(&self) -> String {
        self.attribute.clone()
    }

    fn set_attribute(&mut self, value: &str) {
        self.attribute = value.to_string();
    }

    fn persisted(&self) -> Option<ThemePreference> {
        self.entries
            .get(STORAGE_KEY)
            .and_then(|v| ThemePreference::parse(v))
    }

    fn persist(&mut self, preference: ThemePreference) {
        self.entries
            .insert(STORAGE_KEY.to_string(), preference.as_str().to_string());
        if let Err(e) = self.write() {
            tracing::warn!(
                "Failed to persist theme preference to {}: {e}",
                self.path.display()
            );
        }
    }
}

/// Icon shown on the toggle button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleIcon {
    Sun,
    Moon,
}

impl ToggleIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            ToggleIcon::Sun => "\u{2600}",
            ToggleIcon::Moon => "\u{263E}",
        }
    }
}

/// What the template needs to draw the toggle button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleView {
    pub icon: ToggleIcon,
    pub glyph: &'static str,
    pub color: &'static str,
    pub preference: ThemePreference,
}

/// The dark-mode toggle bound to a [`ThemeStore`].
pub struct ThemeToggle<S: ThemeStore> {
    store: S,
    preference: ThemePreference,
}

impl<S: ThemeStore> ThemeToggle<S> {
    /// One-time synchronization with the document attribute.
    pub fn init(store: S) -> Self {
        let preference = ThemePreference::from_attribute(&store.attribute());
        tracing::debug!("Theme toggle initialized as {preference}");
        Self { store, preference }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    /// Flips the preference, persists it and mirrors it onto the attribute.
    pub fn toggle(&mut self) -> ThemePreference {
        let next = self.preference.toggled();
        self.preference = next;
        self.store.persist(next);
        self.store.set_attribute(next.attribute());
        tracing::info!("Theme switched to {next}");
        next
    }

    /// Sun while dark is active, moon while light is active.
    pub fn icon(&self) -> ToggleIcon {
        match self.preference {
            ThemePreference::Dark => ToggleIcon::Sun,
            ThemePreference::Light => ToggleIcon::Moon,
        }
    }

    pub fn view(&self) -> ToggleView {
        let icon = self.icon();
        ToggleView {
            icon,
            glyph: icon.glyph(),
            color: match self.preference {
                ThemePreference::Dark => "white",
                ThemePreference::Light => "#1A202C",
            },
            preference: self.preference,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_reads_dark_attribute() {
        let toggle = ThemeToggle::init(MemoryThemeStore::with_attribute("dark"));
        assert_eq!(toggle.preference(), ThemePreference::Dark);
    }

    #[test]
    fn test_init_defaults_to_light() {
        for attr in ["", "light", "Dark", "dark ", "sepia"] {
            let toggle = ThemeToggle::init(MemoryThemeStore::with_attribute(attr));
            assert_eq!(toggle.preference(), ThemePreference::Light, "attr {attr:?}");
        }
    }

    #[test]
    fn test_init_does_not_write() {
        let toggle = ThemeToggle::init(MemoryThemeStore::with_attribute("dark"));
        assert_eq!(toggle.store().persisted, None);
        assert_eq!(toggle.store().attribute, "dark");
    }

    #[test]
    fn test_toggle_from_light() {
        let mut toggle = ThemeToggle::init(MemoryThemeStore::default());
        assert_eq!(toggle.toggle(), ThemePreference::Dark);
        assert_eq!(toggle.store().persisted, Some(ThemePreference::Dark));
        assert_eq!(toggle.store().attribute, "dark");
    }

    #[test]
    fn test_toggle_from_dark_clears_attribute() {
        let mut toggle = ThemeToggle::init(MemoryThemeStore::with_attribute("dark"));
        assert_eq!(toggle.toggle(), ThemePreference::Light);
        assert_eq!(toggle.store().persisted, Some(ThemePreference::Light));
        assert_eq!(toggle.store().attribute, "");
    }

    #[test]
    fn test_toggle_twice_restores() {
        for attr in ["", "dark"] {
            let mut toggle = ThemeToggle::init(MemoryThemeStore::with_attribute(attr));
            let before = toggle.preference();
            toggle.toggle();
            toggle.toggle();
            assert_eq!(toggle.preference(), before);
            assert_eq!(toggle.store().attribute, attr);
        }
    }

    #[test]
    fn test_icon_follows_preference() {
        let mut toggle = ThemeToggle::init(MemoryThemeStore::default());
        assert_eq!(toggle.icon(), ToggleIcon::Moon);
        assert_eq!(toggle.view().color, "#1A202C");
        toggle.toggle();
        assert_eq!(toggle.icon(), ToggleIcon::Sun);
        assert_eq!(toggle.view().color, "white");
    }

    #[test]
    fn test_preference_round_trips_through_attribute() {
        for pref in [ThemePreference::Light, ThemePreference::Dark] {
            assert_eq!(ThemePreference::from_attribute(pref.attribute()), pref);
            assert_eq!(ThemePreference::parse(pref.as_str()), Some(pref));
        }
        assert_eq!(ThemePreference::parse("blue"), None);
    }

    #[test]
    fn test_file_store_missing_file_is_light() {
        let dir = TempDir::new().unwrap();
        let store = FileThemeStore::open_in(dir.path());
        assert_eq!(store.attribute(), "");
        assert_eq!(store.persisted(), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let mut toggle = ThemeToggle::init(FileThemeStore::open_in(dir.path()));
        toggle.toggle();

        let reopened = FileThemeStore::open_in(dir.path());
        assert_eq!(reopened.persisted(), Some(ThemePreference::Dark));
        assert_eq!(reopened.attribute(), "dark");

        let raw = fs::read_to_string(dir.path().join(STATE_DIR).join(STORAGE_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[STORAGE_KEY], "dark");
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"color-mode": "dark", "other": "kept"}"#).unwrap();

        let mut toggle = ThemeToggle::init(FileThemeStore::open(path.clone()));
        assert_eq!(toggle.preference(), ThemePreference::Dark);
        toggle.toggle();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["color-mode"], "light");
        assert_eq!(json["other"], "kept");
    }

    #[test]
    fn test_file_store_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        let store = FileThemeStore::open(path);
        assert_eq!(store.persisted(), None);
        assert_eq!(store.attribute(), "");
    }

    #[test]
    fn test_file_store_write_failure_is_silent() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let mut toggle = ThemeToggle::init(FileThemeStore::open(blocker.join("store.json")));
        assert_eq!(toggle.toggle(), ThemePreference::Dark);
        assert_eq!(toggle.store().attribute(), "dark");
    }
}
