//! Owned, read-only view of the simulation for a renderer.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use procgen::Tree;

use crate::camera_rig::CameraPose;
use crate::effects::{Effects, Explosion, GroundFire};
use crate::missile::{Missile, MissileKind};
use crate::state::GameMode;
use crate::threat::Cannon;
use engine_core::{Transform, Velocity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub speed: f32,
    /// Hide the airframe once it is a wreck.
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileView {
    pub id: Entity,
    pub kind: MissileKind,
    pub position: Vec3,
    pub rotation: Quat,
    /// Unit direction of travel.
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannonView {
    pub id: Entity,
    pub position: Vec3,
    pub active: bool,
    pub locked: bool,
}

#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub aircraft: AircraftPose,
    pub missiles: Vec<MissileView>,
    pub cannons: Vec<CannonView>,
    pub explosions: Vec<Explosion>,
    pub ground_fires: Vec<GroundFire>,
    pub trees: Vec<Tree>,
    pub camera: CameraPose,
    pub mode: GameMode,
}

/// Collect the live missiles, skipping ones that detonated this tick.
pub fn collect_missiles(world: &World) -> Vec<MissileView> {
    world
        .query::<(&Transform, &Velocity, &Missile)>()
        .iter()
        .filter(|(_, (_, _, m))| m.active)
        .map(|(id, (t, v, m))| MissileView {
            id,
            kind: m.kind,
            position: t.position,
            rotation: t.rotation,
            direction: v.linear.try_normalize().unwrap_or_else(|| t.forward()),
        })
        .collect()
}

pub fn collect_cannons(world: &World, lock: Option<Entity>) -> Vec<CannonView> {
    world
        .query::<&Cannon>()
        .iter()
        .map(|(id, c)| CannonView {
            id,
            position: c.position,
            active: c.active,
            locked: lock == Some(id),
        })
        .collect()
}

pub fn collect_effects(effects: &Effects) -> (Vec<Explosion>, Vec<GroundFire>) {
    (effects.explosions.clone(), effects.ground_fires.clone())
}
