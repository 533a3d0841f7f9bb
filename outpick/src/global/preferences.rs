//! User-editable canvas preferences, persisted as TOML.
//!
//! The clamp bounds and tap threshold were hardcoded magic numbers in earlier
//! builds. They are product-configurable now: values live in a preferences
//! file under the platform preference dir, defaulting when missing or
//! malformed.

use outpick_core::{color::Color, state::Options};

const DOCUMENTATION: &str = r#"# Outpick canvas preferences. You may edit this file, but be aware that
# formatting and comments will not be preserved.

# Lengths are in logical pixels, `tap_threshold_ms` is in milliseconds, and
# `background` is an RGBA quadruple with 0-255 per channel.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// On-disk mirror of [`Options`], plus export settings that only the shell
/// cares about.
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub min_scale: f32,
    pub max_scale: f32,
    pub tap_threshold_ms: u64,
    pub default_layer_size: [f32; 2],
    pub background: [u8; 4],
    pub pinch_min_spacing: f32,
    /// Longest edge of the exported snapshot, after flattening.
    pub snapshot_max_dim: u32,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Preferences {
    fn default() -> Self {
        let options = Options::default();
        Self {
            min_scale: options.min_scale,
            max_scale: options.max_scale,
            tap_threshold_ms: options.tap_threshold.as_millis() as u64,
            default_layer_size: options.default_layer_size,
            background: options.background.as_array(),
            pinch_min_spacing: options.pinch_min_spacing,
            snapshot_max_dim: 600,
            failed_to_load: false,
        }
    }
}
impl Preferences {
    const FILENAME: &'static str = "canvas.toml";
    /// Shared global preferences, loaded from the user preference dir.
    /// (Or defaulted, if unavailable for some reason.)
    #[must_use]
    pub fn get() -> &'static Self {
        static GLOBAL_PREFERENCES: std::sync::OnceLock<Preferences> = std::sync::OnceLock::new();

        GLOBAL_PREFERENCES.get_or_init(|| {
            let mut dir = preferences_dir();
            match dir.as_mut() {
                None => Self::no_path(),
                Some(dir) => {
                    dir.push(Self::FILENAME);
                    Self::load_or_default(dir)
                }
            }
        })
    }
    #[must_use]
    fn no_path() -> Self {
        log::warn!("Preferences weren't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let loaded: anyhow::Result<Preferences> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences: Preferences = toml::from_str(&string)?;
            // A file that parses but violates session invariants is treated
            // the same as a malformed one.
            preferences.to_options().validate()?;

            Ok(preferences)
        };

        match loaded {
            Ok(preferences) => preferences,
            Err(_) => Self::no_path(),
        }
    }
    /// Return true if loading the user's settings failed. Useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicitly do *not* create recursively. If not found, the user
        // probably has a good reason. Ignore errors (could already exist);
        // any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let mut string = toml::ser::to_string_pretty(self)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(preferences, string)?;
        Ok(())
    }
    /// Session options these preferences describe. Not necessarily valid -
    /// callers building a session go through [`Options::validate`].
    #[must_use]
    pub fn to_options(&self) -> Options {
        Options {
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            tap_threshold: std::time::Duration::from_millis(self.tap_threshold_ms),
            default_layer_size: self.default_layer_size,
            background: Color(self.background),
            pinch_min_spacing: self.pinch_min_spacing,
        }
    }
}
