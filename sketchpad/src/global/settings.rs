use sketchpad_core::{
    state::palette::{NamedColor, Palette},
    SurfaceSize,
};

const DOCUMENTATION: &str = r#"# Sketchpad settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys fall back to their defaults.

# [surface]      Size of the drawing surface, in device-independent pixels.
# stroke_width   Width strokes are drawn at.
# initial_color  Palette entry selected at startup, e.g. "black", "light_gray", "navy".
# log_level      One of "off", "error", "warn", "info", "debug", "trace".
#                The RUST_LOG environment variable takes precedence when logging to a terminal.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct SurfaceConfig {
    pub width: f32,
    pub height: f32,
}
impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1080.0,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct Settings {
    pub stroke_width: f32,
    pub initial_color: NamedColor,
    pub log_level: String,
    // Tables after plain values.
    pub surface: SurfaceConfig,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            stroke_width: sketchpad_core::render::DEFAULT_STROKE_WIDTH,
            initial_color: NamedColor::Black,
            log_level: "debug".to_owned(),
            surface: SurfaceConfig::default(),
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    pub fn surface_size(&self) -> anyhow::Result<SurfaceSize> {
        Ok(SurfaceSize::new(self.surface.width, self.surface.height)?)
    }
    /// Parsed log level. Unrecognized levels are rejected on load, but a hand-built `Settings` may
    /// still carry one, which falls back to `Debug`.
    #[must_use]
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Debug)
    }
    /// The default palette, with `initial_color` selected.
    #[must_use]
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();
        if let Err(e) = palette.select(self.initial_color.default_index()) {
            log::warn!("can't select {}: {e}", self.initial_color);
        }
        palette
    }
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(text)?;
        // Validate eagerly, so a bad file is reported as a load failure.
        settings.surface_size()?;
        anyhow::ensure!(
            settings.stroke_width.is_finite() && settings.stroke_width > 0.0,
            "stroke width must be positive, got {}",
            settings.stroke_width
        );
        settings
            .log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", settings.log_level))?;
        Ok(settings)
    }
    pub fn to_toml(&self) -> anyhow::Result<String> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
}

/// Settings loaded from the user's preferences, or defaulted.
pub struct LoadedSettings {
    failed_to_load: Option<anyhow::Error>,
    pub settings: Settings,
}
impl LoadedSettings {
    /// Load from the preferences dir, or default if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => Self::no_path(anyhow::anyhow!("No preferences dir found")),
            Some(mut dir) => {
                dir.push(Settings::FILENAME);
                Self::load_or_default(&dir)
            }
        }
    }
    #[must_use]
    fn no_path(why: anyhow::Error) -> Self {
        Self {
            failed_to_load: Some(why),
            settings: Settings::default(),
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Settings> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Settings::from_toml(&string)
        };

        match settings {
            Ok(settings) => Self {
                failed_to_load: None,
                settings,
            },
            Err(e) => Self::no_path(e.context(format!("reading {}", path.display()))),
        }
    }
    /// Why loading the user's settings failed, if it did. Logging isn't up yet during load, so the
    /// caller reports this once it is.
    #[must_use]
    pub fn load_error(&self) -> Option<&anyhow::Error> {
        self.failed_to_load.as_ref()
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. If the preferences dir itself is missing, the user probably has a reason.
        // Errors (like already existing) surface from the write below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Settings::FILENAME);
        std::fs::write(preferences, self.settings.to_toml()?)?;
        Ok(())
    }
}
