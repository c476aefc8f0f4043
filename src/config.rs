use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::{errors::ConfigError, reading_time};

/// Author shown in the bio card and used as the fallback document title.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Author {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Where the author writes from, emphasized in the bio.
    #[serde(default)]
    pub location: Option<String>,
    /// Site-relative path or absolute URL of the avatar image.
    #[serde(default = "default_avatar")]
    pub avatar: String,
}

fn default_avatar() -> String {
    "/images/profile-pic.jpeg".to_string()
}

/// Social accounts. `twitter` and `github` are handles, `linkedin` is a full URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Social {
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

/// Site metadata, the read-only record templates and head tags draw on.
///
/// Every field may be missing; absent values render as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Absolute origin prefixed to image paths in social meta tags.
    #[serde(default)]
    pub site_url: Option<String>,
    /// Document title when a page does not set one.
    #[serde(default)]
    pub default_title: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub social: Social,
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            site_url: None,
            default_title: None,
            lang: default_lang(),
            author: Author {
                avatar: default_avatar(),
                ..Default::default()
            },
            social: Social::default(),
        }
    }
}

/// Reading-time label and estimate settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingTimeConfig {
    pub marker: String,
    pub glyph: String,
    pub suffix: String,
    pub minutes_per_glyph: f64,
    pub words_per_minute: usize,
    /// Characters kept when pruning a post body into an excerpt.
    pub excerpt_length: usize,
}

impl Default for ReadingTimeConfig {
    fn default() -> Self {
        Self {
            marker: reading_time::DEFAULT_MARKER.to_string(),
            glyph: reading_time::DEFAULT_GLYPH.to_string(),
            suffix: reading_time::DEFAULT_SUFFIX.to_string(),
            minutes_per_glyph: reading_time::DEFAULT_MINUTES_PER_GLYPH,
            words_per_minute: reading_time::DEFAULT_WORDS_PER_MINUTE,
            excerpt_length: 140,
        }
    }
}

impl ReadingTimeConfig {
    pub fn labeler(&self) -> reading_time::ReadingTimeLabeler {
        reading_time::ReadingTimeLabeler {
            marker: self.marker.clone(),
            glyph: self.glyph.clone(),
            suffix: self.suffix.clone(),
            minutes_per_glyph: self.minutes_per_glyph,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub root_dir: PathBuf,
    /// Folder, relative to the root, holding markdown posts.
    pub content_dir: String,
    pub markdown_extensions: Vec<String>,
    /// Optional template folder; files found here override the compiled defaults.
    #[serde(default)]
    pub template_folder: Option<PathBuf>,
    /// Locale used for post dates, e.g. "es_ES" or "en_US".
    pub date_locale: String,
    /// URL prefix post links are resolved against.
    pub base_path: String,
    #[serde(default)]
    pub site: SiteMetadata,
    #[serde(default)]
    pub reading_time: ReadingTimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            content_dir: "content/blog".to_string(),
            markdown_extensions: vec!["md".to_string()],
            template_folder: None,
            date_locale: "es_ES".to_string(),
            base_path: "/".to_string(),
            site: SiteMetadata::default(),
            reading_time: ReadingTimeConfig::default(),
        }
    }
}

impl Config {
    /// Loads the layered config for the site containing `search_config_from`.
    ///
    /// Values are not validated here; call [`Config::validate`] once any
    /// command-line overrides have been applied.
    pub fn read(search_config_from: &Path) -> Result<Self, ConfigError> {
        let root_dir = Self::find_root_dir(search_config_from);
        let mut config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("CAFECITO_").split("__"))
            .merge(Toml::file(root_dir.join(".cafecito/config.toml")))
            .extract()
            .map_err(|e| ConfigError::ParseFailed(Box::new(e)))?;
        tracing::debug!("Loaded config: {:?}", &config);
        config.root_dir = root_dir;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// `minutes_per_glyph` and `words_per_minute` are divisors and must be
    /// positive; a configured template folder must be a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let per_glyph = self.reading_time.minutes_per_glyph;
        if !(per_glyph.is_finite() && per_glyph > 0.0) {
            return Err(ConfigError::InvalidMinutesPerGlyph { value: per_glyph });
        }

        if self.reading_time.words_per_minute == 0 {
            return Err(ConfigError::InvalidWordsPerMinute { value: 0 });
        }

        if let Some(folder) = &self.template_folder {
            let folder = self.resolve(folder);
            if !folder.is_dir() {
                return Err(ConfigError::TemplateFolderNotDirectory { path: folder });
            }
        }

        Ok(())
    }

    /// Absolute folder the posts are read from.
    pub fn content_path(&self) -> PathBuf {
        self.root_dir.join(&self.content_dir)
    }

    /// Resolves `path` against the root unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    fn find_root_dir(start_dir: &Path) -> PathBuf {
        const DIR_MARKERS: &[&str] = &[".cafecito", ".git"];

        for marker in DIR_MARKERS {
            if let Some(root) = Self::search_folder_in_ancestors(start_dir, marker) {
                return root;
            }
        }

        Self::cwd_if_ancestor(start_dir).unwrap_or_else(|| start_dir.to_path_buf())
    }

    fn cwd_if_ancestor(start_path: &Path) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        let dir = if start_path.is_dir() {
            start_path
        } else {
            start_path.parent()?
        };
        dir.ancestors()
            .find(|candidate| *candidate == cwd)
            .map(|x| x.to_path_buf())
    }

    fn search_folder_in_ancestors<P: AsRef<Path>>(
        start_path: &Path,
        search_folder: P,
    ) -> Option<PathBuf> {
        let search_folder = search_folder.as_ref();
        let dir = if start_path.is_dir() {
            start_path
        } else {
            start_path.parent()?
        };
        dir.ancestors()
            .map(|ancestor| ancestor.join(search_folder))
            .find(|candidate| candidate.as_path().is_dir())
            .and_then(|marker_dir| marker_dir.parent().map(|p| p.to_path_buf()))
    }
}
