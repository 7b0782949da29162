//! Arcade flight model for the player aircraft.
//!
//! Speed, bank, heading and pitch are integrated as independent scalars and
//! composed into one rotation each tick (yaw, then roll, then pitch, so pitch
//! always turns about the wing axis). Lift is tuned so that level flight at
//! cruise speed is exactly neutral against gravity.

use engine_core::Transform;
use glam::{Quat, Vec3};
use input::Controls;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Distance from the aircraft origin down to its belly.
pub const BOTTOM_OFFSET: f32 = 0.8;

/// How bank decays toward level when no input is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollDamping {
    /// Multiply by the damping factor once per tick, whatever the tick length.
    PerTick,
    /// Scale the factor by tick length, treating it as a per-1/60s rate.
    PerSecond,
}

/// Every constant the flight model uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed at which lift exactly cancels gravity with the nose level.
    pub cruise_speed: f32,
    /// Throttle acceleration (units/s²).
    pub throttle_rate: f32,
    /// Bank rate from the roll controls (rad/s).
    pub roll_rate: f32,
    /// Multiplier on `roll_rate` for the fine roll controls.
    pub fine_roll_multiplier: f32,
    pub roll_damping: f32,
    pub roll_damping_mode: RollDamping,
    /// Heading change per radian of turn roll per second.
    pub turn_from_roll: f32,
    /// Rudder accumulation rate (rad/s).
    pub yaw_rate: f32,
    /// Heading change per unit of rudder accumulator per second.
    pub turn_from_yaw: f32,
    /// Fraction of the rudder accumulator kept each tick.
    pub yaw_input_decay: f32,
    pub pitch_rate: f32,
    pub max_pitch: f32,
    pub gravity: f32,
    /// Lift at cruise speed with the nose level.
    pub cruise_lift: f32,
    /// Extra lift per radian of pitch.
    pub pitch_lift: f32,
    pub stall_speed: f32,
    pub stall_pitch: f32,
    /// Lift while stalled (negative: the wing lets go).
    pub stall_lift: f32,
    pub stall_pitch_down_rate: f32,
    pub stall_pitch_floor: f32,
    pub min_vertical_velocity: f32,
    pub max_vertical_velocity: f32,
    // Shot-down glide
    pub glide_speed_decay: f32,
    pub glide_min_speed: f32,
    pub glide_min_vertical_velocity: f32,
    pub glide_pitch_rate: f32,
    pub glide_max_nose_down: f32,
    /// Peak random roll kick per tick while falling.
    pub glide_roll_jitter: f32,
    pub spawn_altitude: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            min_speed: 30.0,
            max_speed: 140.0,
            cruise_speed: 75.0,
            throttle_rate: 40.0,
            roll_rate: 1.0,
            fine_roll_multiplier: 1.5,
            roll_damping: 0.995,
            roll_damping_mode: RollDamping::PerTick,
            turn_from_roll: 0.6,
            yaw_rate: 2.0,
            turn_from_yaw: 0.4,
            yaw_input_decay: 0.95,
            pitch_rate: 0.9,
            max_pitch: 1.2,
            gravity: -22.0,
            cruise_lift: 22.0,
            pitch_lift: 25.0,
            stall_speed: 38.0,
            stall_pitch: 0.25,
            stall_lift: -16.0,
            stall_pitch_down_rate: 1.5,
            stall_pitch_floor: -0.5,
            min_vertical_velocity: -55.0,
            max_vertical_velocity: 50.0,
            glide_speed_decay: 0.992,
            glide_min_speed: 15.0,
            glide_min_vertical_velocity: -50.0,
            glide_pitch_rate: 0.12,
            glide_max_nose_down: 0.6,
            glide_roll_jitter: 0.02,
            spawn_altitude: 120.0,
        }
    }
}

/// Kinematic state of the player aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
    /// Composed from yaw, roll and pitch at the end of every update.
    pub rotation: Quat,
    pub speed: f32,
    pub vertical_velocity: f32,
    /// Bank accumulated from the roll controls only; drives the turn.
    pub turn_roll: f32,
    /// Rudder accumulator.
    pub yaw_input: f32,
}

impl AircraftState {
    /// Fresh aircraft over the map center, heading -Z at cruise speed.
    pub fn spawn(tuning: &FlightTuning) -> Self {
        let speed = tuning.cruise_speed.clamp(tuning.min_speed, tuning.max_speed);
        Self {
            position: Vec3::new(0.0, tuning.spawn_altitude, 0.0),
            velocity: -Vec3::Z * speed,
            pitch: 0.0,
            roll: 0.0,
            yaw: 0.0,
            rotation: Quat::IDENTITY,
            speed,
            vertical_velocity: 0.0,
            turn_roll: 0.0,
            yaw_input: 0.0,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// World height of the belly.
    pub fn bottom(&self) -> f32 {
        self.position.y - BOTTOM_OFFSET
    }

    fn compose_rotation(&mut self) {
        self.rotation = Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_z(self.roll)
            * Quat::from_rotation_x(self.pitch);
    }

    fn integrate_position(&mut self, dt: f32) {
        self.velocity = self.forward() * self.speed;
        self.position += self.velocity * dt;
        self.position.y += self.vertical_velocity * dt;
    }
}

/// Whether the wing has let go at the current speed and pitch.
pub fn is_stalling(state: &AircraftState, tuning: &FlightTuning) -> bool {
    state.speed < tuning.stall_speed && state.pitch > tuning.stall_pitch
}

fn damp_roll(value: f32, tuning: &FlightTuning, dt: f32) -> f32 {
    match tuning.roll_damping_mode {
        RollDamping::PerTick => value * tuning.roll_damping,
        RollDamping::PerSecond => value * tuning.roll_damping.powf(60.0 * dt),
    }
}

/// Advance the aircraft one tick under pilot control.
pub fn update_flight(state: &mut AircraftState, controls: &Controls, tuning: &FlightTuning, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    // Throttle
    state.speed = (state.speed + controls.throttle_axis() * tuning.throttle_rate * dt)
        .clamp(tuning.min_speed, tuning.max_speed);

    // Bank and roll trim; only the bank feeds the turn.
    let bank = controls.roll_axis() * tuning.roll_rate * dt;
    let trim = controls.fine_roll_axis() * tuning.roll_rate * tuning.fine_roll_multiplier * dt;
    state.roll += bank + trim;
    state.turn_roll += bank;
    state.roll = damp_roll(state.roll, tuning, dt);
    state.turn_roll = damp_roll(state.turn_roll, tuning, dt);

    // Heading
    state.yaw_input += controls.yaw_axis() * tuning.yaw_rate * dt;
    state.yaw += state.turn_roll * tuning.turn_from_roll * dt + state.yaw_input * tuning.turn_from_yaw * dt;
    state.yaw_input *= tuning.yaw_input_decay;

    // Pitch
    state.pitch = (state.pitch + controls.pitch_axis() * tuning.pitch_rate * dt)
        .clamp(-tuning.max_pitch, tuning.max_pitch);

    // Lift
    let lift = if is_stalling(state, tuning) {
        state.pitch = (state.pitch - tuning.stall_pitch_down_rate * dt).max(tuning.stall_pitch_floor);
        tuning.stall_lift
    } else {
        (state.speed / tuning.cruise_speed) * tuning.cruise_lift + state.pitch * tuning.pitch_lift
    };

    state.vertical_velocity = (state.vertical_velocity + (tuning.gravity + lift) * dt)
        .clamp(tuning.min_vertical_velocity, tuning.max_vertical_velocity);

    state.compose_rotation();
    state.integrate_position(dt);
}

/// Advance the aircraft one tick of uncontrolled glide after being hit.
pub fn update_shot_down<R: Rng>(state: &mut AircraftState, tuning: &FlightTuning, dt: f32, rng: &mut R) {
    if dt <= 0.0 {
        return;
    }

    state.speed = (state.speed * tuning.glide_speed_decay).max(tuning.glide_min_speed);

    state.pitch = (state.pitch - tuning.glide_pitch_rate * dt).max(-tuning.glide_max_nose_down);

    state.roll += (rng.gen::<f32>() - 0.5) * 2.0 * tuning.glide_roll_jitter;
    state.turn_roll = damp_roll(state.turn_roll, tuning, dt);
    state.yaw += state.turn_roll * tuning.turn_from_roll * dt;

    // No lift: the airframe just falls.
    state.vertical_velocity =
        (state.vertical_velocity + tuning.gravity * dt).max(tuning.glide_min_vertical_velocity);

    state.compose_rotation();
    state.integrate_position(dt);
}
