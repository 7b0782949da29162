//! Simulation configuration. Loaded from config.ron at startup.

use procgen::TerrainConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::camera_rig::CameraTuning;
use crate::flight::FlightTuning;
use crate::threat::ThreatTuning;
use crate::weapons::WeaponTuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// World setup: seed and population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Seeds terrain, placement and the shot-down wobble.
    pub seed: u64,
    pub cannon_count: usize,
    pub tree_count: usize,
    /// Longest simulation step a single frame may take, in seconds.
    pub max_frame_delta: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            cannon_count: 12,
            tree_count: 400,
            max_frame_delta: engine_core::DEFAULT_MAX_DELTA,
        }
    }
}

/// Everything tunable about a run. Every field falls back to its default when
/// missing from the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldSettings,
    pub terrain: TerrainConfig,
    pub flight: FlightTuning,
    pub weapons: WeaponTuning,
    pub threats: ThreatTuning,
    pub camera: CameraTuning,
}

impl GameConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.float_settings() {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be a finite number, got {value}")));
            }
        }

        let f = &self.flight;
        if !(f.min_speed > 0.0 && f.min_speed < f.max_speed) {
            return Err(ConfigError::Invalid(format!(
                "flight speed band [{}, {}] is empty",
                f.min_speed, f.max_speed
            )));
        }
        if !(f.cruise_speed > 0.0) {
            return Err(ConfigError::Invalid("cruise_speed must be positive".into()));
        }
        if !(f.max_pitch > 0.0 && f.min_vertical_velocity < f.max_vertical_velocity) {
            return Err(ConfigError::Invalid("pitch or vertical velocity limits are empty".into()));
        }
        if !(f.glide_max_nose_down >= 0.0) {
            return Err(ConfigError::Invalid("glide_max_nose_down cannot be negative".into()));
        }
        if !(self.world.max_frame_delta > 0.0) {
            return Err(ConfigError::Invalid("max_frame_delta must be positive".into()));
        }
        if !(self.weapons.reload_time >= 0.0 && self.threats.fire_interval >= 0.0) {
            return Err(ConfigError::Invalid("reload and fire intervals cannot be negative".into()));
        }
        if !(-1.0..=1.0).contains(&self.threats.lock_cone_cos) {
            return Err(ConfigError::Invalid("lock_cone_cos must be a cosine".into()));
        }
        let c = &self.camera;
        if !(c.min_radius > 0.0 && c.min_radius <= c.max_radius && c.min_phi <= c.max_phi) {
            return Err(ConfigError::Invalid("camera limits are empty".into()));
        }
        if !(self.terrain.size > 0.0) {
            return Err(ConfigError::Invalid("terrain size must be positive".into()));
        }
        Ok(())
    }

    /// Every float that feeds a clamp or a comparison in the simulation.
    fn float_settings(&self) -> Vec<(&'static str, f64)> {
        let f = &self.flight;
        let t = &self.threats;
        let c = &self.camera;
        let terrain = &self.terrain;
        let singles = [
            ("world.max_frame_delta", self.world.max_frame_delta),
            ("flight.min_speed", f.min_speed),
            ("flight.max_speed", f.max_speed),
            ("flight.cruise_speed", f.cruise_speed),
            ("flight.throttle_rate", f.throttle_rate),
            ("flight.roll_rate", f.roll_rate),
            ("flight.fine_roll_multiplier", f.fine_roll_multiplier),
            ("flight.roll_damping", f.roll_damping),
            ("flight.turn_from_roll", f.turn_from_roll),
            ("flight.yaw_rate", f.yaw_rate),
            ("flight.turn_from_yaw", f.turn_from_yaw),
            ("flight.yaw_input_decay", f.yaw_input_decay),
            ("flight.pitch_rate", f.pitch_rate),
            ("flight.max_pitch", f.max_pitch),
            ("flight.gravity", f.gravity),
            ("flight.cruise_lift", f.cruise_lift),
            ("flight.pitch_lift", f.pitch_lift),
            ("flight.stall_speed", f.stall_speed),
            ("flight.stall_pitch", f.stall_pitch),
            ("flight.stall_lift", f.stall_lift),
            ("flight.stall_pitch_down_rate", f.stall_pitch_down_rate),
            ("flight.stall_pitch_floor", f.stall_pitch_floor),
            ("flight.min_vertical_velocity", f.min_vertical_velocity),
            ("flight.max_vertical_velocity", f.max_vertical_velocity),
            ("flight.glide_speed_decay", f.glide_speed_decay),
            ("flight.glide_min_speed", f.glide_min_speed),
            ("flight.glide_min_vertical_velocity", f.glide_min_vertical_velocity),
            ("flight.glide_pitch_rate", f.glide_pitch_rate),
            ("flight.glide_max_nose_down", f.glide_max_nose_down),
            ("flight.glide_roll_jitter", f.glide_roll_jitter),
            ("flight.spawn_altitude", f.spawn_altitude),
            ("weapons.reload_time", self.weapons.reload_time),
            ("weapons.hardpoint_span", self.weapons.hardpoint_span),
            ("weapons.hardpoint_drop", self.weapons.hardpoint_drop),
            ("threats.fire_interval", t.fire_interval),
            ("threats.fire_range", t.fire_range),
            ("threats.lock_range", t.lock_range),
            ("threats.lock_cone_cos", t.lock_cone_cos),
            ("threats.cannon_radius", t.cannon_radius),
            ("threats.muzzle_height", t.muzzle_height),
            ("threats.spawn_clearance", t.spawn_clearance),
            ("camera.default_radius", c.default_radius),
            ("camera.min_radius", c.min_radius),
            ("camera.max_radius", c.max_radius),
            ("camera.base_phi", c.base_phi),
            ("camera.min_phi", c.min_phi),
            ("camera.max_phi", c.max_phi),
            ("camera.idle_delay", c.idle_delay),
            ("camera.return_rate", c.return_rate),
            ("camera.look_behind_phi", c.look_behind_phi),
            ("terrain.size", terrain.size),
            ("terrain.height_scale", terrain.height_scale),
            ("terrain.falloff_inner", terrain.falloff_inner),
            ("terrain.falloff_outer", terrain.falloff_outer),
            ("terrain.edge_drop", terrain.edge_drop),
            ("terrain.water_level", terrain.water_level),
        ];
        let mut out: Vec<(&'static str, f64)> = singles.into_iter().map(|(n, v)| (n, v as f64)).collect();
        out.extend([
            ("terrain.base_height", terrain.base_height),
            ("terrain.frequency", terrain.frequency),
            ("terrain.lacunarity", terrain.lacunarity),
            ("terrain.persistence", terrain.persistence),
        ]);
        out
    }

    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        let result = self.to_ron_string().and_then(|s| Ok(std::fs::write(&path, s)?));
        if let Err(e) = result {
            log::warn!("Could not write config to {:?}: {}", path, e);
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = GameConfig::from_ron_str("(world: (seed: 9, cannon_count: 3), flight: (max_speed: 160.0))").unwrap();
        assert_eq!(cfg.world.seed, 9);
        assert_eq!(cfg.world.cannon_count, 3);
        assert_eq!(cfg.world.tree_count, 400);
        assert_eq!(cfg.flight.max_speed, 160.0);
        assert_eq!(cfg.flight.min_speed, 30.0);
        assert_eq!(cfg.threats.fire_range, 450.0);
    }

    #[test]
    fn round_trips_through_ron() {
        let mut cfg = GameConfig::default();
        cfg.weapons.first_wing = crate::weapons::Wing::Right;
        cfg.flight.roll_damping_mode = crate::flight::RollDamping::PerSecond;
        let text = cfg.to_ron_string().unwrap();
        assert_eq!(GameConfig::from_ron_str(&text).unwrap(), cfg);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(GameConfig::from_ron_str("(world: (seed: "), Err(ConfigError::Parse(_))));
        assert!(matches!(
            GameConfig::from_ron_str("(flight: (min_speed: 200.0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_ron_str("(threats: (lock_cone_cos: 2.0))"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_nan_bounds() {
        for doc in [
            "(flight: (max_speed: NaN))",
            "(flight: (max_pitch: NaN))",
            "(flight: (max_vertical_velocity: NaN))",
            "(camera: (max_phi: NaN))",
        ] {
            let parsed = GameConfig::from_ron_str(doc);
            assert!(matches!(parsed, Err(ConfigError::Invalid(_))), "{doc} was accepted");
        }

        let mut cfg = GameConfig::default();
        cfg.flight.cruise_speed = f32::INFINITY;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn every_accepted_config_can_spawn_and_tick() {
        let cfg = GameConfig::from_ron_str("(world: (cannon_count: 0, tree_count: 0))").unwrap();
        let mut world = crate::world::SimulationWorld::new(cfg);
        world.tick(1.0 / 60.0, &input::Controls::default());
        assert_eq!(world.mode(), crate::state::GameMode::Flying);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::from_path(Path::new("/definitely/not/here/config.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
