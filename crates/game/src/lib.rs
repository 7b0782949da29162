//! SkyStrike simulation core: arcade flight, homing missiles, ground cannons
//! and the shot-down / crash state machine.
//!
//! A host owns one [`SimulationWorld`], feeds it a frame delta and the
//! current [`input::Controls`] once per frame, and reads back a
//! [`RenderSnapshot`], a [`HudReadout`] and drained [`SimEvent`]s.

pub mod camera_rig;
pub mod config;
pub mod effects;
pub mod events;
pub mod flight;
pub mod hud;
pub mod missile;
pub mod snapshot;
pub mod state;
pub mod threat;
pub mod weapons;
pub mod world;

pub use camera_rig::{CameraPose, CameraRig, CameraTuning};
pub use config::{ConfigError, GameConfig, WorldSettings};
pub use events::SimEvent;
pub use flight::{AircraftState, FlightTuning, RollDamping};
pub use hud::{GameOverText, HudReadout, LockStatus};
pub use missile::{MissileKind, MissileTarget};
pub use snapshot::RenderSnapshot;
pub use state::{CrashCause, GameMode};
pub use weapons::{WeaponTuning, Wing};
pub use world::SimulationWorld;
