//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 640
//! height = 352
//! target_fps = 120
//! vsync = true
//!
//! [level]
//! path = assets/levels/testmap.json
//! tile_size = 32
//! autotile = assets/levels/autotile.json
//!
//! [player]
//! spawn_x = 100
//! spawn_y = 100
//! width = 24
//! height = 32
//! run_speed = 160
//! jump_speed = 420
//! gravity = 980
//! max_fall_speed = 900
//!
//! [tiles]
//! empty_types = 0
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use raylib::prelude::Vector2;

use crate::components::actor::Actor;
use crate::components::platformercontrolled::{
    DEFAULT_GRAVITY, DEFAULT_JUMP_SPEED, DEFAULT_MAX_FALL_SPEED, DEFAULT_RUN_SPEED,
    PlatformerControlled,
};
use crate::resources::autotile::{AutoTileRules, RulesError};
use crate::resources::level::LevelSettings;
use crate::resources::tilegrid::DEFAULT_TILE_SIZE;
use crate::resources::tilepalette::{TilePalette, TileTypeId};

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 640;
const DEFAULT_WINDOW_HEIGHT: u32 = 352;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_LEVEL_PATH: &str = "assets/levels/testmap.json";
const DEFAULT_SPAWN: (f32, f32) = (100.0, 100.0);
const DEFAULT_PLAYER_SIZE: (f32, f32) = (24.0, 32.0);
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Level file to load at startup.
    pub level_path: String,
    /// Tile edge length in world units.
    pub tile_size: f32,
    /// Optional autotile rules JSON; the identity table is used when unset.
    pub autotile_path: Option<PathBuf>,
    /// Top-left corner where the player appears.
    pub spawn: Vector2,
    /// Player bounding box size.
    pub player_size: Vector2,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Level tile types that produce empty cells.
    pub empty_types: Vec<TileTypeId>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a float that must be finite and positive; anything else keeps `current`.
fn positive_float(config: &Ini, section: &str, key: &str, current: f32) -> f32 {
    match config.getfloat(section, key) {
        Ok(Some(v)) if v.is_finite() && v > 0.0 => v as f32,
        Ok(Some(v)) => {
            warn!("Ignoring [{}] {} = {}: must be positive", section, key, v);
            current
        }
        Ok(None) => current,
        Err(e) => {
            warn!("Ignoring [{}] {}: {}", section, key, e);
            current
        }
    }
}

/// Read any finite float; anything else keeps `current`.
fn finite_float(config: &Ini, section: &str, key: &str, current: f32) -> f32 {
    match config.getfloat(section, key) {
        Ok(Some(v)) if v.is_finite() => v as f32,
        Ok(Some(_)) | Err(_) => {
            warn!("Ignoring [{}] {}: not a finite number", section, key);
            current
        }
        Ok(None) => current,
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            level_path: DEFAULT_LEVEL_PATH.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            autotile_path: None,
            spawn: Vector2::new(DEFAULT_SPAWN.0, DEFAULT_SPAWN.1),
            player_size: Vector2::new(DEFAULT_PLAYER_SIZE.0, DEFAULT_PLAYER_SIZE.1),
            run_speed: DEFAULT_RUN_SPEED,
            jump_speed: DEFAULT_JUMP_SPEED,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            empty_types: vec![0],
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or invalid values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [level] section
        if let Some(path) = config.get("level", "path") {
            self.level_path = path;
        }
        self.tile_size = positive_float(&config, "level", "tile_size", self.tile_size);
        if let Some(path) = config.get("level", "autotile") {
            self.autotile_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        // [player] section
        self.spawn.x = finite_float(&config, "player", "spawn_x", self.spawn.x);
        self.spawn.y = finite_float(&config, "player", "spawn_y", self.spawn.y);
        self.player_size.x = positive_float(&config, "player", "width", self.player_size.x);
        self.player_size.y = positive_float(&config, "player", "height", self.player_size.y);
        self.run_speed = positive_float(&config, "player", "run_speed", self.run_speed);
        self.jump_speed = positive_float(&config, "player", "jump_speed", self.jump_speed);
        self.gravity = positive_float(&config, "player", "gravity", self.gravity);
        self.max_fall_speed =
            positive_float(&config, "player", "max_fall_speed", self.max_fall_speed);

        // [tiles] section
        if let Some(list) = config.get("tiles", "empty_types") {
            self.empty_types = TilePalette::parse_empty_types(&list).empty_types();
        }

        info!(
            "Loaded config: {}x{} window, fps={}, vsync={}, level={}, tile_size={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.level_path,
            self.tile_size
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        // [level] section
        config.set("level", "path", Some(self.level_path.clone()));
        config.set("level", "tile_size", Some(self.tile_size.to_string()));
        if let Some(path) = &self.autotile_path {
            config.set("level", "autotile", Some(path.display().to_string()));
        }

        // [player] section
        config.set("player", "spawn_x", Some(self.spawn.x.to_string()));
        config.set("player", "spawn_y", Some(self.spawn.y.to_string()));
        config.set("player", "width", Some(self.player_size.x.to_string()));
        config.set("player", "height", Some(self.player_size.y.to_string()));
        config.set("player", "run_speed", Some(self.run_speed.to_string()));
        config.set("player", "jump_speed", Some(self.jump_speed.to_string()));
        config.set("player", "gravity", Some(self.gravity.to_string()));
        config.set("player", "max_fall_speed", Some(self.max_fall_speed.to_string()));

        // [tiles] section
        let empty_types: Vec<String> = self.empty_types.iter().map(|t| t.to_string()).collect();
        config.set("tiles", "empty_types", Some(empty_types.join(",")));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Palette, autotile rules and tile size for building levels.
    ///
    /// Fails if the configured autotile rules file cannot be loaded.
    pub fn level_settings(&self) -> Result<LevelSettings, RulesError> {
        let rules = match &self.autotile_path {
            Some(path) => AutoTileRules::load_from_file(path)?,
            None => AutoTileRules::default(),
        };
        Ok(LevelSettings {
            palette: TilePalette::with_empty_types(self.empty_types.iter().copied()),
            rules,
            tile_size: self.tile_size,
        })
    }

    /// Movement tuning for the player actor.
    pub fn player_tuning(&self) -> PlatformerControlled {
        PlatformerControlled::new(
            self.run_speed,
            self.jump_speed,
            self.gravity,
            self.max_fall_speed,
        )
    }

    /// A fresh player actor at the spawn point.
    pub fn spawn_actor(&self) -> Actor {
        Actor::new(self.spawn, self.player_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();
        assert_eq!(config.window_size(), (640, 352));
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.spawn, Vector2::new(100.0, 100.0));
        assert_eq!(config.empty_types, vec![0]);
        assert_eq!(config.player_tuning(), PlatformerControlled::default());
    }

    #[test]
    fn test_missing_file_is_error_and_keeps_defaults() {
        let mut config = GameConfig::with_path("/nonexistent/dir/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_width, 640);
    }

    #[test]
    fn test_load_overrides_and_ignores_invalid() {
        let file = write_config(
            "[window]\nwidth = 800\n\n[level]\npath = levels/a.json\ntile_size = -4\n\n\
             [player]\nspawn_x = 40\ngravity = 500\nwidth = abc\n\n[tiles]\nempty_types = 0, 9\n",
        );
        let mut config = GameConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 352);
        assert_eq!(config.level_path, "levels/a.json");
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.spawn.x, 40.0);
        assert_eq!(config.gravity, 500.0);
        assert_eq!(config.player_size.x, 24.0);
        assert_eq!(config.empty_types, vec![0, 9]);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::with_path(dir.path().join("config.ini"));
        config.jump_speed = 300.0;
        config.empty_types = vec![0, 3];
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(dir.path().join("config.ini"));
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_level_settings_uses_palette_and_rules() {
        let mut config = GameConfig::new();
        config.empty_types = vec![0, 7];
        let settings = config.level_settings().unwrap();
        assert!(!settings.palette.is_solid(7));
        assert_eq!(settings.rules, AutoTileRules::default());

        config.autotile_path = Some(PathBuf::from("/nonexistent/rules.json"));
        assert!(matches!(config.level_settings(), Err(RulesError::Io(_))));
    }

    #[test]
    fn test_spawn_actor() {
        let actor = GameConfig::new().spawn_actor();
        assert_eq!(actor.position, Vector2::new(100.0, 100.0));
        assert_eq!(actor.size, Vector2::new(24.0, 32.0));
        assert!(!actor.grounded);
    }
}
