//! Ground cannon emplacements: placement, fire control and lock-on selection.

use engine_core::planar_distance;
use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use procgen::{scatter, Exclusion, PlacementRules, TerrainField};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// A stationary threat that lobs homing missiles at the aircraft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cannon {
    /// Base of the emplacement, on the ground.
    pub position: Vec3,
    pub active: bool,
    /// Simulation time of the last shot in seconds; `None` until it first fires.
    pub last_fired_at: Option<f64>,
    /// Collision / kill radius.
    pub radius: f32,
}

impl Cannon {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            active: true,
            last_fired_at: None,
            radius,
        }
    }

    /// Point incoming missiles steer for.
    pub fn aim_point(&self) -> Vec3 {
        self.position + Vec3::Y * (self.radius * 0.5)
    }

    pub fn can_fire(&self, now: f64, interval: f32) -> bool {
        match self.last_fired_at {
            None => true,
            Some(t) => now - t >= interval as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatTuning {
    /// Seconds between shots from one cannon.
    pub fire_interval: f32,
    /// Planar distance at which a cannon opens fire.
    pub fire_range: f32,
    /// Distance within which the aircraft can lock a cannon.
    pub lock_range: f32,
    /// Minimum cosine between the nose and a lockable cannon.
    pub lock_cone_cos: f32,
    pub cannon_radius: f32,
    /// Height of the barrel above the cannon base.
    pub muzzle_height: f32,
    /// Keep-out circle around the spawn point.
    pub spawn_clearance: f32,
    pub placement: PlacementRules,
}

impl Default for ThreatTuning {
    fn default() -> Self {
        Self {
            fire_interval: 2.5,
            fire_range: 450.0,
            lock_range: 550.0,
            lock_cone_cos: 0.85,
            cannon_radius: 5.0,
            muzzle_height: 3.0,
            spawn_clearance: 350.0,
            placement: PlacementRules {
                min_radius: 0.0,
                max_radius: 1100.0,
                min_clearance: 0.5,
                max_height: 60.0,
                max_slope: 0.6,
                min_spacing: 80.0,
                attempts_per_item: 80,
            },
        }
    }
}

/// Request from a cannon to launch at the aircraft.
#[derive(Debug, Clone, Copy)]
pub struct FireOrder {
    pub cannon: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Place `count` cannons deterministically from `seed`, keeping clear of the spawn point.
pub fn spawn_cannons(
    world: &mut World,
    terrain: &TerrainField,
    tuning: &ThreatTuning,
    count: usize,
    seed: u64,
    spawn: Vec3,
) -> Vec<Entity> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(0xca7707));
    let exclusion = Exclusion {
        center: Vec2::new(spawn.x, spawn.z),
        radius: tuning.spawn_clearance,
    };
    let spots = scatter(terrain, &tuning.placement, count, &[exclusion], &mut rng);
    if spots.len() < count {
        log::warn!("Only placed {} of {} cannons", spots.len(), count);
    }

    spots
        .into_iter()
        .map(|p| world.spawn((Cannon::new(p, tuning.cannon_radius),)))
        .collect()
}

/// Let every eligible cannon fire at the aircraft. Marks each firing cannon's
/// timer and returns the launches for the caller to spawn.
pub fn update_cannons(world: &mut World, aircraft: Vec3, tuning: &ThreatTuning, now: f64) -> Vec<FireOrder> {
    let mut orders = Vec::new();
    for (entity, cannon) in world.query_mut::<&mut Cannon>() {
        if !cannon.active {
            continue;
        }
        if planar_distance(cannon.position, aircraft) > tuning.fire_range {
            continue;
        }
        if !cannon.can_fire(now, tuning.fire_interval) {
            continue;
        }

        let origin = cannon.position + Vec3::Y * tuning.muzzle_height;
        let Some(direction) = (aircraft - origin).try_normalize() else {
            continue;
        };
        cannon.last_fired_at = Some(now);
        orders.push(FireOrder { cannon: entity, origin, direction });
    }
    orders
}

/// Nearest active cannon inside lock range and the forward cone.
pub fn select_lock_target(world: &World, position: Vec3, forward: Vec3, tuning: &ThreatTuning) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, cannon) in world.query::<&Cannon>().iter() {
        if !cannon.active {
            continue;
        }
        let to_cannon = cannon.position - position;
        let distance = to_cannon.length();
        if distance > tuning.lock_range || distance <= f32::EPSILON {
            continue;
        }
        if forward.dot(to_cannon / distance) < tuning.lock_cone_cos {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Look up a cannon, failing closed for destroyed or inactive ones.
pub fn live_cannon(world: &World, entity: Entity) -> Option<Cannon> {
    world
        .get::<&Cannon>(entity)
        .ok()
        .filter(|c| c.active)
        .map(|c| *c)
}

pub fn active_cannon_count(world: &World) -> usize {
    world.query::<&Cannon>().iter().filter(|(_, c)| c.active).count()
}

/// Remove a cannon from play.
pub fn destroy_cannon(world: &mut World, entity: Entity) -> Option<Cannon> {
    let mut cannon = world.remove_one::<Cannon>(entity).ok()?;
    cannon.active = false;
    let _ = world.despawn(entity);
    Some(cannon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::TerrainConfig;

    fn tuning() -> ThreatTuning {
        ThreatTuning::default()
    }

    #[test]
    fn fires_only_in_range_and_off_cooldown() {
        let mut world = World::new();
        let near = world.spawn((Cannon::new(Vec3::new(0.0, 0.0, -300.0), 5.0),));
        let _far = world.spawn((Cannon::new(Vec3::new(0.0, 0.0, -900.0), 5.0),));
        let aircraft = Vec3::new(0.0, 100.0, 0.0);

        let orders = update_cannons(&mut world, aircraft, &tuning(), 10.0);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].cannon, near);
        assert!((orders[0].direction.length() - 1.0).abs() < 1e-5);
        assert!(orders[0].direction.z > 0.0);

        assert!(update_cannons(&mut world, aircraft, &tuning(), 11.0).is_empty());
        assert_eq!(update_cannons(&mut world, aircraft, &tuning(), 12.5).len(), 1);
    }

    #[test]
    fn range_is_planar() {
        let mut world = World::new();
        world.spawn((Cannon::new(Vec3::new(0.0, 0.0, -440.0), 5.0),));
        // High overhead: 3D distance is well beyond range, planar distance is not.
        let orders = update_cannons(&mut world, Vec3::new(0.0, 400.0, 0.0), &tuning(), 0.0);
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn all_eligible_cannons_fire_together() {
        let mut world = World::new();
        for i in 0..4 {
            world.spawn((Cannon::new(Vec3::new(i as f32 * 50.0, 0.0, -200.0), 5.0),));
        }
        let orders = update_cannons(&mut world, Vec3::new(0.0, 80.0, 0.0), &tuning(), 0.0);
        assert_eq!(orders.len(), 4);
    }

    #[test]
    fn lock_picks_nearest_in_cone() {
        let mut world = World::new();
        let ahead_far = world.spawn((Cannon::new(Vec3::new(0.0, 0.0, -500.0), 5.0),));
        let ahead_near = world.spawn((Cannon::new(Vec3::new(10.0, 0.0, -200.0), 5.0),));
        let _behind = world.spawn((Cannon::new(Vec3::new(0.0, 0.0, 50.0), 5.0),));
        let _wide = world.spawn((Cannon::new(Vec3::new(150.0, 0.0, -100.0), 5.0),));
        let pos = Vec3::new(0.0, 20.0, 0.0);

        let lock = select_lock_target(&world, pos, -Vec3::Z, &tuning());
        assert_eq!(lock, Some(ahead_near));

        destroy_cannon(&mut world, ahead_near);
        assert_eq!(select_lock_target(&world, pos, -Vec3::Z, &tuning()), Some(ahead_far));
    }

    #[test]
    fn inactive_cannon_is_never_locked_or_fired() {
        let mut world = World::new();
        let c = world.spawn((Cannon::new(Vec3::new(0.0, 0.0, -100.0), 5.0),));
        let pos = Vec3::new(0.0, 20.0, 0.0);
        assert_eq!(select_lock_target(&world, pos, -Vec3::Z, &tuning()), Some(c));

        world.get::<&mut Cannon>(c).unwrap().active = false;
        assert_eq!(select_lock_target(&world, pos, -Vec3::Z, &tuning()), None);
        assert!(update_cannons(&mut world, pos, &tuning(), 0.0).is_empty());
        assert!(live_cannon(&world, c).is_none());
        assert_eq!(active_cannon_count(&world), 0);
    }

    #[test]
    fn destroyed_handle_fails_closed() {
        let mut world = World::new();
        let c = world.spawn((Cannon::new(Vec3::ZERO, 5.0),));
        assert!(destroy_cannon(&mut world, c).is_some());
        assert!(live_cannon(&world, c).is_none());
        assert!(destroy_cannon(&mut world, c).is_none());
        // A new entity may reuse the slot; the stale handle still misses it.
        let _reused = world.spawn((Cannon::new(Vec3::ONE, 5.0),));
        assert!(live_cannon(&world, c).is_none());
    }

    #[test]
    fn placement_is_deterministic_and_clear_of_spawn() {
        let terrain = TerrainField::new(TerrainConfig { seed: 4, ..Default::default() });
        let t = tuning();
        let mut a = World::new();
        let mut b = World::new();
        spawn_cannons(&mut a, &terrain, &t, 12, 4, Vec3::ZERO);
        spawn_cannons(&mut b, &terrain, &t, 12, 4, Vec3::ZERO);
        let pa: Vec<Vec3> = a.query::<&Cannon>().iter().map(|(_, c)| c.position).collect();
        let pb: Vec<Vec3> = b.query::<&Cannon>().iter().map(|(_, c)| c.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(pa.len(), 12);
        for p in pa {
            assert!(Vec2::new(p.x, p.z).length() >= t.spawn_clearance);
        }
    }
}
