//! Homing missiles fired by cannons at the aircraft and by the aircraft at cannons.
//!
//! Both kinds share one update; only the numbers in [`MissileParams`] differ.
//! Guidance is opportunistic: when the target handle no longer resolves the
//! missile keeps its current heading.

use engine_core::{Transform, Velocity};
use glam::Vec3;
use hecs::{Entity, World};
use procgen::TerrainField;

use crate::threat::{destroy_cannon, live_cannon, Cannon};

/// Missiles detonate this far above the ground.
pub const TERRAIN_IMPACT_MARGIN: f32 = 0.5;
/// Proximity fuse radius of enemy missiles against the aircraft.
pub const ENEMY_HIT_RADIUS: f32 = 4.0;
/// Added to a cannon's radius for player missile proximity.
pub const PLAYER_HIT_MARGIN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileKind {
    /// Cannon → aircraft.
    Enemy,
    /// Aircraft → cannon.
    Player,
}

/// Flight envelope of one missile kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileParams {
    pub initial_speed: f32,
    /// Speed the guidance steers toward.
    pub homing_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub homing_strength: f32,
    /// Seconds before self-destruct.
    pub lifetime: f64,
}

pub const ENEMY_MISSILE: MissileParams = MissileParams {
    initial_speed: 65.0,
    homing_speed: 105.0,
    min_speed: 65.0,
    max_speed: 115.0,
    homing_strength: 1.5,
    lifetime: 8.0,
};

pub const PLAYER_MISSILE: MissileParams = MissileParams {
    initial_speed: 180.0,
    homing_speed: 200.0,
    min_speed: 120.0,
    max_speed: 220.0,
    homing_strength: 2.2,
    lifetime: 5.0,
};

impl MissileKind {
    pub fn params(self) -> &'static MissileParams {
        match self {
            MissileKind::Enemy => &ENEMY_MISSILE,
            MissileKind::Player => &PLAYER_MISSILE,
        }
    }
}

/// What a missile is steering for. Cannons are referenced by handle only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissileTarget {
    Aircraft,
    Cannon(Entity),
}

#[derive(Debug, Clone, Copy)]
pub struct Missile {
    pub kind: MissileKind,
    pub target: Option<MissileTarget>,
    pub homing_strength: f32,
    /// Simulation time of launch in seconds.
    pub spawned_at: f64,
    /// Cleared on detonation; the entity is despawned on the following update.
    pub active: bool,
}

/// Why a missile detonated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detonation {
    Terrain,
    /// Proximity hit on the aircraft.
    Aircraft,
    /// Proximity hit on a cannon, which has already been removed.
    Cannon { entity: Entity, cannon: Cannon },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissileImpact {
    pub missile: Entity,
    pub kind: MissileKind,
    pub position: Vec3,
    pub detonation: Detonation,
}

/// Per-tick view of the aircraft for guidance and fusing.
#[derive(Debug, Clone, Copy)]
pub struct AircraftTarget {
    pub position: Vec3,
    /// False once the aircraft has crashed; enemy missiles stop homing.
    pub targetable: bool,
}

pub fn spawn_missile(
    world: &mut World,
    kind: MissileKind,
    origin: Vec3,
    direction: Vec3,
    target: Option<MissileTarget>,
    now: f64,
) -> Entity {
    let params = kind.params();
    let direction = direction.try_normalize().unwrap_or(-Vec3::Z);
    let mut transform = Transform::from_position(origin);
    transform.face_direction(direction);

    world.spawn((
        transform,
        Velocity::new(direction * params.initial_speed),
        Missile {
            kind,
            target,
            homing_strength: params.homing_strength,
            spawned_at: now,
            active: true,
        },
    ))
}

struct Aim {
    /// Where guidance steers.
    point: Vec3,
    /// Where the proximity fuse measures from.
    fuse_center: Vec3,
    hit_radius: f32,
}

enum Fuse {
    Terrain,
    Proximity,
    Expired,
}

fn resolve_target(world: &World, target: Option<MissileTarget>, aircraft: &AircraftTarget) -> Option<Aim> {
    match target? {
        MissileTarget::Aircraft => aircraft.targetable.then(|| Aim {
            point: aircraft.position,
            fuse_center: aircraft.position,
            hit_radius: ENEMY_HIT_RADIUS,
        }),
        MissileTarget::Cannon(entity) => live_cannon(world, entity).map(|c| Aim {
            point: c.aim_point(),
            fuse_center: c.position,
            hit_radius: c.radius + PLAYER_HIT_MARGIN,
        }),
    }
}

/// Steer `velocity` toward `aim` and clamp it into the kind's speed band.
pub fn apply_homing(velocity: &mut Velocity, position: Vec3, aim: Vec3, params: &MissileParams, strength: f32, dt: f32) {
    let Some(dir) = (aim - position).try_normalize() else {
        return;
    };
    let desired = dir * params.homing_speed;
    let t = (strength * dt).clamp(0.0, 1.0);
    velocity.linear = velocity.linear.lerp(desired, t);
    velocity.clamp_speed(params.min_speed, params.max_speed);
}

/// Advance every missile one tick.
///
/// Missiles that detonated on the previous call are despawned first. Cannons
/// struck by player missiles are removed immediately so later missiles in the
/// same tick cannot hit them again.
pub fn update_missiles(
    world: &mut World,
    terrain: &TerrainField,
    aircraft: &AircraftTarget,
    dt: f32,
    now: f64,
) -> Vec<MissileImpact> {
    let spent: Vec<Entity> = world
        .query::<&Missile>()
        .iter()
        .filter(|(_, m)| !m.active)
        .map(|(e, _)| e)
        .collect();
    for entity in spent {
        let _ = world.despawn(entity);
    }

    let live: Vec<(Entity, Option<MissileTarget>)> = world
        .query::<&Missile>()
        .iter()
        .map(|(e, m)| (e, m.target))
        .collect();

    let mut impacts = Vec::new();
    for (entity, target) in live {
        let aim = resolve_target(world, target, aircraft);

        let Ok((transform, velocity, missile)) =
            world.query_one_mut::<(&mut Transform, &mut Velocity, &mut Missile)>(entity)
        else {
            continue;
        };
        let params = missile.kind.params();

        if let Some(aim) = &aim {
            apply_homing(velocity, transform.position, aim.point, params, missile.homing_strength, dt);
        }
        transform.translate(velocity.linear * dt);
        transform.face_direction(velocity.linear);

        let position = transform.position;
        let kind = missile.kind;
        let fuse = if position.y <= terrain.height(position.x, position.z) + TERRAIN_IMPACT_MARGIN {
            Fuse::Terrain
        } else if aim.as_ref().is_some_and(|a| position.distance(a.fuse_center) < a.hit_radius) {
            Fuse::Proximity
        } else if now - missile.spawned_at > params.lifetime {
            Fuse::Expired
        } else {
            continue;
        };
        missile.active = false;

        let detonation = match (fuse, target) {
            (Fuse::Terrain, _) => Detonation::Terrain,
            (Fuse::Expired, _) => Detonation::Expired,
            (Fuse::Proximity, Some(MissileTarget::Cannon(cannon_entity))) => {
                match destroy_cannon(world, cannon_entity) {
                    Some(cannon) => Detonation::Cannon { entity: cannon_entity, cannon },
                    None => Detonation::Expired,
                }
            }
            (Fuse::Proximity, _) => Detonation::Aircraft,
        };

        impacts.push(MissileImpact { missile: entity, kind, position, detonation });
    }
    impacts
}

/// Number of missiles still flying.
pub fn active_missile_count(world: &World) -> usize {
    world.query::<&Missile>().iter().filter(|(_, m)| m.active).count()
}
