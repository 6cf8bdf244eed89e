use thiserror::Error;

use crate::input::Modifiers;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rejected tree configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown multiselect key `{0}` (expected ctrl, meta or alt)")]
    UnknownMultiselectKey(String),
    #[error("multiselect key list is empty")]
    NoMultiselectKeys,
    #[error("`{name}` must be a finite, non-negative number (got {value})")]
    InvalidSize { name: &'static str, value: f64 },
}

/// Behaviour options shared by every level of one tree.
///
/// Sizes and keys are only set through [`TreeConfigBuilder`] (or
/// deserialization, which runs the same checks), so they are always valid.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawTreeConfig", into = "RawTreeConfig")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
    pub allow_multiselect: bool,
    multiselect_keys: Modifiers,
    edge_size: f64,
    scroll_area_height: f64,
    max_scroll_speed: f64,
    /// Draw branch guide lines (rendering surfaces only).
    pub show_branches: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            allow_multiselect: true,
            multiselect_keys: Modifiers::CTRL | Modifiers::META,
            edge_size: 3.0,
            scroll_area_height: 70.0,
            max_scroll_speed: 20.0,
            show_branches: false,
        }
    }
}

impl TreeConfig {
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Modifier keys that add to the selection instead of replacing it.
    #[inline]
    pub const fn multiselect_keys(&self) -> Modifiers {
        self.multiselect_keys
    }

    /// Height of the before/after zones on branch nodes.
    #[inline]
    pub const fn edge_size(&self) -> f64 {
        self.edge_size
    }

    /// Height of the auto-scroll bands at the top and bottom of the list.
    #[inline]
    pub const fn scroll_area_height(&self) -> f64 {
        self.scroll_area_height
    }

    /// Scroll distance per timer tick at full speed.
    #[inline]
    pub const fn max_scroll_speed(&self) -> f64 {
        self.max_scroll_speed
    }

    /// Returns `true` if any configured multiselect key is held.
    #[inline]
    pub const fn multiselect_pressed(&self, modifiers: Modifiers) -> bool {
        modifiers.intersects(self.multiselect_keys)
    }
}

/// Parses a multiselect key name.
///
/// Accepts both short names and DOM-style property names (`ctrlKey`).
pub fn parse_multiselect_key(name: &str) -> Result<Modifiers, ConfigError> {
    match name.trim() {
        "ctrl" | "ctrlKey" | "control" => Ok(Modifiers::CTRL),
        "meta" | "metaKey" | "cmd" | "command" | "super" => Ok(Modifiers::META),
        "alt" | "altKey" | "option" => Ok(Modifiers::ALT),
        other => Err(ConfigError::UnknownMultiselectKey(other.to_string())),
    }
}

#[derive(Clone, Debug, Default)]
pub struct TreeConfigBuilder {
    config: TreeConfig,
    keys: Option<Vec<String>>,
}

impl TreeConfigBuilder {
    #[must_use]
    pub const fn allow_multiselect(mut self, allow: bool) -> Self {
        self.config.allow_multiselect = allow;
        self
    }

    /// Sets the multiselect keys by name; validated in [`Self::build`].
    #[must_use]
    pub fn multiselect_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn edge_size(mut self, size: f64) -> Self {
        self.config.edge_size = size;
        self
    }

    #[must_use]
    pub const fn scroll_area_height(mut self, height: f64) -> Self {
        self.config.scroll_area_height = height;
        self
    }

    #[must_use]
    pub const fn max_scroll_speed(mut self, speed: f64) -> Self {
        self.config.max_scroll_speed = speed;
        self
    }

    #[must_use]
    pub const fn show_branches(mut self, show: bool) -> Self {
        self.config.show_branches = show;
        self
    }

    pub fn build(self) -> Result<TreeConfig, ConfigError> {
        let Self { mut config, keys } = self;
        if let Some(keys) = keys {
            if keys.is_empty() {
                return Err(ConfigError::NoMultiselectKeys);
            }
            let mut modifiers = Modifiers::empty();
            for key in &keys {
                modifiers |= parse_multiselect_key(key)?;
            }
            config.multiselect_keys = modifiers;
        }
        check_size("edge_size", config.edge_size)?;
        check_size("scroll_area_height", config.scroll_area_height)?;
        check_size("max_scroll_speed", config.max_scroll_speed)?;
        Ok(config)
    }
}

/// Serialized form of [`TreeConfig`]: keys by name, every field optional.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTreeConfig {
    allow_multiselect: bool,
    multiselect_keys: Vec<String>,
    edge_size: f64,
    scroll_area_height: f64,
    max_scroll_speed: f64,
    show_branches: bool,
}

#[cfg(feature = "serde")]
impl Default for RawTreeConfig {
    fn default() -> Self {
        Self::from(TreeConfig::default())
    }
}

#[cfg(feature = "serde")]
impl From<TreeConfig> for RawTreeConfig {
    fn from(config: TreeConfig) -> Self {
        let names = [
            (Modifiers::CTRL, "ctrl"),
            (Modifiers::META, "meta"),
            (Modifiers::ALT, "alt"),
        ];
        Self {
            allow_multiselect: config.allow_multiselect,
            multiselect_keys: names
                .into_iter()
                .filter(|(key, _)| config.multiselect_keys.contains(*key))
                .map(|(_, name)| name.to_string())
                .collect(),
            edge_size: config.edge_size,
            scroll_area_height: config.scroll_area_height,
            max_scroll_speed: config.max_scroll_speed,
            show_branches: config.show_branches,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawTreeConfig> for TreeConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTreeConfig) -> Result<Self, Self::Error> {
        Self::builder()
            .allow_multiselect(raw.allow_multiselect)
            .multiselect_keys(raw.multiselect_keys)
            .edge_size(raw.edge_size)
            .scroll_area_height(raw.scroll_area_height)
            .max_scroll_speed(raw.max_scroll_speed)
            .show_branches(raw.show_branches)
            .build()
    }
}

fn check_size(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSize { name, value })
    }
}
