//! The simulation aggregate: one owner for everything that changes per tick.
//!
//! Each call to [`SimulationWorld::tick`] runs a fixed sequence:
//! state gate → flight → threats (lock, cannon fire) → player fire →
//! missiles → collision → crash sequence → camera.

use engine_core::{planar_distance, Time};
use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use input::Controls;
use procgen::{default_tree_rules, scatter_trees, Exclusion, TerrainConfig, TerrainField, Tree};
use rand::prelude::*;

use crate::camera_rig::CameraRig;
use crate::config::GameConfig;
use crate::effects::Effects;
use crate::events::{EventQueue, SimEvent};
use crate::flight::{is_stalling, update_flight, update_shot_down, AircraftState};
use crate::hud::{GameOverText, HudReadout, LockStatus};
use crate::missile::{
    active_missile_count, spawn_missile, update_missiles, AircraftTarget, Detonation, MissileImpact, MissileKind,
    MissileTarget,
};
use crate::snapshot::{collect_cannons, collect_effects, collect_missiles, AircraftPose, RenderSnapshot};
use crate::state::{CrashCause, GameMode, GameState};
use crate::threat::{active_cannon_count, live_cannon, select_lock_target, spawn_cannons, update_cannons};
use crate::weapons::{Hardpoints, Wing};

/// Belly-to-ground margin that counts as hitting the terrain.
pub const GROUND_CLEARANCE: f32 = 0.3;
/// Minimum height of the spawn point above the ground below it.
const SPAWN_GROUND_CLEARANCE: f32 = 40.0;
/// Trees keep out of this circle around the spawn point.
const SPAWN_TREE_CLEARANCE: f32 = 80.0;
/// Horizontal scatter of post-crash secondary explosions.
const CRASH_BURST_SPREAD: f32 = 6.0;

pub struct SimulationWorld {
    config: GameConfig,
    time: Time,
    terrain: TerrainField,
    trees: Vec<Tree>,
    /// Missiles and cannons.
    ecs: World,
    aircraft: AircraftState,
    state: GameState,
    hardpoints: Hardpoints,
    camera: CameraRig,
    effects: Effects,
    events: EventQueue,
    lock: Option<Entity>,
    kills: u32,
    /// Fire control state on the previous tick, for edge detection.
    fire_held: bool,
    rng: StdRng,
}

impl SimulationWorld {
    pub fn new(config: GameConfig) -> Self {
        let seed = config.world.seed;
        let terrain = TerrainField::new(TerrainConfig {
            seed,
            ..config.terrain.clone()
        });
        let aircraft = spawn_aircraft(&terrain, &config);

        let spawn_zone = Exclusion {
            center: Vec2::new(aircraft.position.x, aircraft.position.z),
            radius: SPAWN_TREE_CLEARANCE,
        };
        let trees = scatter_trees(&terrain, &default_tree_rules(), config.world.tree_count, &[spawn_zone], seed);
        if trees.len() < config.world.tree_count {
            log::warn!("Only placed {} of {} trees", trees.len(), config.world.tree_count);
        }

        let mut world = Self {
            time: Time::new(config.world.max_frame_delta),
            hardpoints: Hardpoints::new(&config.weapons),
            camera: CameraRig::new(&config.camera),
            rng: StdRng::seed_from_u64(seed ^ 0x5eed_f00d),
            terrain,
            trees,
            ecs: World::new(),
            aircraft,
            state: GameState::new(),
            effects: Effects::new(),
            events: EventQueue::new(),
            lock: None,
            kills: 0,
            fire_held: false,
            config,
        };
        world.place_cannons();
        log::info!(
            "World ready: seed {}, {} cannons, {} trees",
            seed,
            active_cannon_count(&world.ecs),
            world.trees.len()
        );
        world
    }

    fn place_cannons(&mut self) {
        spawn_cannons(
            &mut self.ecs,
            &self.terrain,
            &self.config.threats,
            self.config.world.cannon_count,
            self.config.world.seed,
            self.aircraft.position,
        );
    }

    /// Advance the simulation by one host frame. Returns the delta actually
    /// simulated after clamping.
    pub fn tick(&mut self, raw_delta: f32, controls: &Controls) -> f32 {
        let dt = self.time.advance(raw_delta);
        if dt <= 0.0 {
            return 0.0;
        }
        let now = self.time.elapsed_seconds();
        let mode_at_start = self.state.mode;

        self.effects.update(dt);
        self.hardpoints.update(dt);

        match self.state.mode {
            GameMode::Flying => update_flight(&mut self.aircraft, controls, &self.config.flight, dt),
            GameMode::ShotDown => {
                self.state.shot_down_elapsed += dt;
                update_shot_down(&mut self.aircraft, &self.config.flight, dt, &mut self.rng);
            }
            GameMode::Crashed => {}
        }

        if !self.state.is_crashed() {
            self.update_threats(now);
        }

        let fire_pressed = controls.fire && !self.fire_held;
        self.fire_held = controls.fire;
        if fire_pressed {
            self.fire_player_missile();
        }

        let target = AircraftTarget {
            position: self.aircraft.position,
            targetable: !self.state.is_crashed(),
        };
        for impact in update_missiles(&mut self.ecs, &self.terrain, &target, dt, now) {
            self.resolve_impact(impact);
        }

        let shot_down_this_tick = mode_at_start != GameMode::ShotDown && self.state.mode == GameMode::ShotDown;
        if !shot_down_this_tick {
            self.check_collision();
        }

        if mode_at_start == GameMode::Crashed {
            self.advance_crash_sequence(dt);
        }

        self.camera.update(controls, &self.config.camera, dt);
        dt
    }

    fn update_threats(&mut self, now: f64) {
        let tuning = &self.config.threats;
        self.lock = select_lock_target(&self.ecs, self.aircraft.position, self.aircraft.forward(), tuning);

        for order in update_cannons(&mut self.ecs, self.aircraft.position, tuning, now) {
            spawn_missile(
                &mut self.ecs,
                MissileKind::Enemy,
                order.origin,
                order.direction,
                Some(MissileTarget::Aircraft),
                now,
            );
            self.events.push(SimEvent::MissileFired {
                kind: MissileKind::Enemy,
                position: order.origin,
            });
            log::debug!("Cannon {:?} fired from {}", order.cannon, order.origin);
        }
    }

    /// Launch a player missile from the next ready hardpoint at the current
    /// lock. A no-op outside Flying or while both hardpoints reload.
    pub fn fire_player_missile(&mut self) -> Option<Entity> {
        if !self.state.is_controllable() {
            return None;
        }
        let wing = self.hardpoints.try_fire()?;
        let origin = self
            .aircraft
            .transform()
            .transform_point(self.config.weapons.hardpoint_offset(wing));
        let target = self.lock.map(MissileTarget::Cannon);
        let missile = spawn_missile(
            &mut self.ecs,
            MissileKind::Player,
            origin,
            self.aircraft.forward(),
            target,
            self.time.elapsed_seconds(),
        );
        self.events.push(SimEvent::MissileFired {
            kind: MissileKind::Player,
            position: origin,
        });
        log::debug!("Fired from {:?} wing, target {:?}", wing, target);
        Some(missile)
    }

    fn resolve_impact(&mut self, impact: MissileImpact) {
        match impact.detonation {
            Detonation::Cannon { entity, cannon } => {
                self.kills += 1;
                if self.lock == Some(entity) {
                    self.lock = None;
                }
                self.explode(cannon.position, true);
                self.events.push(SimEvent::CannonDestroyed { position: cannon.position });
                log::info!("Cannon destroyed at {} ({} kills)", cannon.position, self.kills);
            }
            Detonation::Aircraft => {
                self.explode(impact.position, false);
                if self.state.shoot_down() {
                    self.events.push(SimEvent::ShotDown { position: self.aircraft.position });
                    log::info!("Shot down at {}", self.aircraft.position);
                }
            }
            Detonation::Terrain | Detonation::Expired => self.explode(impact.position, false),
        }
    }

    fn explode(&mut self, position: Vec3, big: bool) {
        self.effects.spawn_explosion(position, big);
        self.events.push(SimEvent::Explosion { position, big });
    }

    fn collision(&self) -> Option<CrashCause> {
        let p = self.aircraft.position;
        if self.aircraft.bottom() <= self.terrain.height(p.x, p.z) + GROUND_CLEARANCE {
            return Some(CrashCause::Terrain);
        }
        self.trees
            .iter()
            .find(|t| planar_distance(t.position, p) < t.radius && p.y < t.top())
            .map(|t| CrashCause::Tree(t.kind))
    }

    /// Crash the aircraft if it is touching terrain or a tree. Returns true on
    /// the tick the crash happens.
    pub fn check_collision(&mut self) -> bool {
        if self.state.is_crashed() {
            return false;
        }
        let Some(cause) = self.collision() else {
            return false;
        };
        let position = self.aircraft.position;
        if !self.state.crash(position, cause) {
            return false;
        }
        self.aircraft.velocity = Vec3::ZERO;
        self.aircraft.vertical_velocity = 0.0;
        self.lock = None;
        self.effects.spawn_explosion(position, true);
        self.events.push(SimEvent::Crash { position });
        log::info!("Crashed into {:?} at {}", cause, position);
        true
    }

    fn advance_crash_sequence(&mut self, dt: f32) {
        let Some(sequence) = self.state.crash_sequence.as_mut() else {
            return;
        };
        let step = sequence.advance(dt);
        let center = sequence.position;
        for _ in 0..step.bursts {
            let offset = Vec3::new(
                self.rng.gen_range(-CRASH_BURST_SPREAD..CRASH_BURST_SPREAD),
                self.rng.gen_range(0.0..CRASH_BURST_SPREAD * 0.5),
                self.rng.gen_range(-CRASH_BURST_SPREAD..CRASH_BURST_SPREAD),
            );
            self.explode(center + offset, false);
        }
        if step.settled {
            self.effects.spawn_ground_fire(center);
            log::debug!("Crash site settled into ground fire");
        }
    }

    /// Start a new life: clear missiles, cannons and effects, re-place the
    /// cannons and put a fresh aircraft in the air.
    pub fn restart(&mut self) {
        self.ecs.clear();
        self.effects.clear();
        self.events.clear();
        self.state.reset();
        self.aircraft = spawn_aircraft(&self.terrain, &self.config);
        self.hardpoints = Hardpoints::new(&self.config.weapons);
        self.camera.reset(&self.config.camera);
        self.lock = None;
        self.kills = 0;
        self.place_cannons();
        log::info!("Restarted with {} cannons", active_cannon_count(&self.ecs));
    }

    pub fn hud(&self) -> HudReadout {
        let p = self.aircraft.position;
        let ground = self.terrain.height(p.x, p.z);
        let lock = self
            .lock
            .and_then(|e| live_cannon(&self.ecs, e))
            .map_or(LockStatus::None, |c| LockStatus::Locked {
                distance: c.position.distance(p),
            });
        HudReadout {
            altitude: p.y,
            height_above_ground: self.aircraft.bottom() - ground,
            speed: self.aircraft.speed,
            vertical_speed: self.aircraft.vertical_velocity,
            kills: self.kills,
            threats_remaining: active_cannon_count(&self.ecs),
            lock,
            mode: self.state.mode,
            stalling: self.state.is_controllable() && is_stalling(&self.aircraft, &self.config.flight),
            reload: (
                self.hardpoints.reload_remaining(Wing::Left),
                self.hardpoints.reload_remaining(Wing::Right),
            ),
            game_over: GameOverText::for_state(&self.state),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let (explosions, ground_fires) = collect_effects(&self.effects);
        RenderSnapshot {
            aircraft: AircraftPose {
                position: self.aircraft.position,
                rotation: self.aircraft.rotation,
                speed: self.aircraft.speed,
                visible: !self.state.is_crashed(),
            },
            missiles: collect_missiles(&self.ecs),
            cannons: collect_cannons(&self.ecs, self.lock),
            explosions,
            ground_fires,
            trees: self.trees.clone(),
            camera: self.camera.pose(&self.aircraft.transform(), &self.config.camera),
            mode: self.state.mode,
        }
    }

    /// Events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn aircraft(&self) -> &AircraftState {
        &self.aircraft
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn lock(&self) -> Option<Entity> {
        self.lock
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn missile_count(&self) -> usize {
        active_missile_count(&self.ecs)
    }

    pub fn cannon_count(&self) -> usize {
        active_cannon_count(&self.ecs)
    }
}

fn spawn_aircraft(terrain: &TerrainField, config: &GameConfig) -> AircraftState {
    let mut aircraft = AircraftState::spawn(&config.flight);
    let ground = terrain.height(aircraft.position.x, aircraft.position.z);
    aircraft.position.y = aircraft.position.y.max(ground + SPAWN_GROUND_CLEARANCE);
    aircraft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missile::Missile;
    use crate::threat::Cannon;
    use engine_core::Transform;

    const DT: f32 = 1.0 / 60.0;
    /// Far outside the map: flat sentinel ground, no cannons or trees in range.
    const OFF_MAP: Vec3 = Vec3::new(10_000.0, 0.0, 10_000.0);

    fn config(cannons: usize, trees: usize) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.world.cannon_count = cannons;
        cfg.world.tree_count = trees;
        cfg
    }

    fn off_map_at_height(world: &mut SimulationWorld, bottom_above_ground: f32) {
        let ground = world.terrain.height(OFF_MAP.x, OFF_MAP.z);
        world.aircraft.position = Vec3::new(OFF_MAP.x, ground + crate::flight::BOTTOM_OFFSET + bottom_above_ground, OFF_MAP.z);
    }

    /// Aircraft cruising off the map at 100 with a cannon 350 ahead on the flat.
    fn cannon_ahead(world: &mut SimulationWorld) -> Entity {
        world.aircraft.position = Vec3::new(OFF_MAP.x, 100.0, OFF_MAP.z);
        let ground = world.terrain.height(OFF_MAP.x, OFF_MAP.z - 350.0);
        world
            .ecs
            .spawn((Cannon::new(Vec3::new(OFF_MAP.x, ground, OFF_MAP.z - 350.0), 5.0),))
    }

    #[test]
    fn new_world_is_flying_with_configured_population() {
        let world = SimulationWorld::new(config(6, 50));
        assert_eq!(world.mode(), GameMode::Flying);
        assert_eq!(world.cannon_count(), 6);
        assert_eq!(world.trees().len(), 50);
        assert_eq!(world.missile_count(), 0);
        assert!(world.hud().height_above_ground > 0.0);
    }

    #[test]
    fn zero_delta_tick_changes_nothing() {
        let mut world = SimulationWorld::new(config(0, 0));
        let before = world.aircraft().clone();
        assert_eq!(world.tick(0.0, &Controls::default()), 0.0);
        assert_eq!(world.tick(-1.0, &Controls::default()), 0.0);
        assert_eq!(world.aircraft(), &before);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut world = SimulationWorld::new(config(0, 0));
        assert_eq!(world.tick(2.0, &Controls::default()), 0.1);
    }

    #[test]
    fn grazing_the_ground_crashes() {
        let mut world = SimulationWorld::new(config(0, 0));
        off_map_at_height(&mut world, 0.2);
        assert!(world.check_collision());
        assert_eq!(world.mode(), GameMode::Crashed);
        assert_eq!(world.state().crash_cause, Some(CrashCause::Terrain));
        assert!(world.drain_events().iter().any(|e| matches!(e, SimEvent::Crash { .. })));
    }

    #[test]
    fn clearance_margin_is_respected() {
        let mut world = SimulationWorld::new(config(0, 0));
        off_map_at_height(&mut world, 0.4);
        assert!(!world.check_collision());
        assert_eq!(world.mode(), GameMode::Flying);
    }

    #[test]
    fn tree_trunk_crashes_only_below_the_crown() {
        let mut world = SimulationWorld::new(config(0, 0));
        let ground = world.terrain.height(OFF_MAP.x, OFF_MAP.z);
        let tree = Tree::new(procgen::TreeKind::Spruce, Vec3::new(OFF_MAP.x, ground, OFF_MAP.z), 1.0);
        world.trees.push(tree);

        world.aircraft.position = Vec3::new(OFF_MAP.x + 1.0, tree.top() + 1.0, OFF_MAP.z);
        assert!(!world.check_collision());

        world.aircraft.position.y = tree.top() - 1.0;
        assert!(world.check_collision());
        assert_eq!(world.state().crash_cause, Some(CrashCause::Tree(procgen::TreeKind::Spruce)));
    }

    #[test]
    fn fire_alternates_wings_then_blocks() {
        let mut world = SimulationWorld::new(config(0, 0));
        let first = world.fire_player_missile().unwrap();
        let second = world.fire_player_missile().unwrap();
        assert!(world.fire_player_missile().is_none());
        assert_eq!(world.missile_count(), 2);

        let x = |e: Entity| world.ecs.get::<&Transform>(e).unwrap().position.x;
        let center = world.aircraft().position.x;
        assert!(x(first) < center, "left wing fires first");
        assert!(x(second) > center);
        assert_eq!(world.hud().reload, (3.0, 3.0));
    }

    #[test]
    fn fire_control_is_edge_triggered() {
        let mut world = SimulationWorld::new(config(0, 0));
        let fire = Controls { fire: true, ..Default::default() };
        for _ in 0..30 {
            world.tick(DT, &fire);
        }
        assert_eq!(world.missile_count(), 1);
        world.tick(DT, &Controls::default());
        world.tick(DT, &fire);
        assert_eq!(world.missile_count(), 2);
    }

    #[test]
    fn enemy_hit_shoots_down_without_crashing_same_tick() {
        let mut world = SimulationWorld::new(config(0, 0));
        // Low enough that the collision check would fire on this tick.
        off_map_at_height(&mut world, 0.25);
        let p = world.aircraft.position;
        let ahead = p + world.aircraft.forward() * world.aircraft.speed * DT;
        spawn_missile(&mut world.ecs, MissileKind::Enemy, ahead + Vec3::X * 2.0, -Vec3::X, Some(MissileTarget::Aircraft), 0.0);

        world.tick(DT, &Controls::default());
        assert_eq!(world.mode(), GameMode::ShotDown);
        assert!(world.state().hit_by_missile);

        world.tick(DT, &Controls::default());
        assert_eq!(world.mode(), GameMode::Crashed);
        let hud = world.hud();
        assert_eq!(hud.game_over.map(|t| t.title), Some("SHOT DOWN".to_string()));
    }

    #[test]
    fn shot_down_ignores_pilot_input() {
        let mut world = SimulationWorld::new(config(0, 0));
        world.state.shoot_down();
        let speed = world.aircraft.speed;
        let c = Controls { throttle_up: true, fire: true, ..Default::default() };
        world.tick(DT, &c);
        assert!(world.aircraft.speed < speed);
        assert_eq!(world.missile_count(), 0);
    }

    #[test]
    fn crash_sequence_then_restart() {
        let mut world = SimulationWorld::new(config(5, 20));
        off_map_at_height(&mut world, 0.1);
        world.tick(DT, &Controls::default());
        assert_eq!(world.mode(), GameMode::Crashed);
        world.fire_player_missile();
        assert_eq!(world.missile_count(), 0);

        for _ in 0..(4 * 60) {
            world.tick(DT, &Controls::default());
        }
        let snap = world.snapshot();
        assert_eq!(snap.ground_fires.len(), 1);
        assert!(!snap.aircraft.visible);
        let bursts = world
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::Explosion { big: false, .. }))
            .count();
        assert_eq!(bursts, 20);

        world.restart();
        assert_eq!(world.mode(), GameMode::Flying);
        assert_eq!(world.missile_count(), 0);
        assert_eq!(world.cannon_count(), 5);
        assert_eq!(world.kills(), 0);
        let snap = world.snapshot();
        assert!(snap.explosions.is_empty());
        assert!(snap.ground_fires.is_empty());
        assert_eq!(snap.trees.len(), 20);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn restart_places_the_same_cannons() {
        let mut world = SimulationWorld::new(config(6, 0));
        let positions = |w: &SimulationWorld| -> Vec<Vec3> {
            let mut v: Vec<Vec3> = w.ecs.query::<&Cannon>().iter().map(|(_, c)| c.position).collect();
            v.sort_by(|a, b| a.x.total_cmp(&b.x));
            v
        };
        let before = positions(&world);
        world.restart();
        assert_eq!(positions(&world), before);
    }

    #[test]
    fn deactivated_cannon_is_excluded_next_tick() {
        let mut world = SimulationWorld::new(config(0, 0));
        let cannon = cannon_ahead(&mut world);
        world.tick(DT, &Controls::default());
        assert_eq!(world.lock(), Some(cannon));
        assert_eq!(world.missile_count(), 1, "cannon in range fires at once");

        world.ecs.get::<&mut Cannon>(cannon).unwrap().active = false;
        world.tick(DT, &Controls::default());
        assert_eq!(world.lock(), None);
        assert_eq!(world.hud().lock, LockStatus::None);
        assert_eq!(world.cannon_count(), 0);
    }

    #[test]
    fn crash_drops_the_lock() {
        let mut world = SimulationWorld::new(config(0, 0));
        let cannon = cannon_ahead(&mut world);
        world.tick(DT, &Controls::default());
        assert_eq!(world.lock(), Some(cannon));

        off_map_at_height(&mut world, -0.1);
        assert!(world.check_collision());
        assert_eq!(world.mode(), GameMode::Crashed);
        assert_eq!(world.lock(), None);
        assert_eq!(world.hud().lock, LockStatus::None);
        assert!(world.snapshot().cannons.iter().all(|c| !c.locked));
    }

    #[test]
    fn player_missile_kill_counts_and_clears_lock() {
        let mut world = SimulationWorld::new(config(0, 0));
        let cannon = cannon_ahead(&mut world);
        world.tick(DT, &Controls::default());
        assert_eq!(world.lock(), Some(cannon));
        world.fire_player_missile();

        let mut killed = false;
        for _ in 0..(3 * 60) {
            world.tick(DT, &Controls::default());
            if world.kills() == 1 {
                killed = true;
                break;
            }
        }
        assert!(killed, "player missile never reached the cannon");
        assert_eq!(world.lock(), None);
        assert_eq!(world.cannon_count(), 0);
        assert!(world.snapshot().explosions.iter().any(|e| e.big));
        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::CannonDestroyed { .. })));
    }

    #[test]
    fn enemy_missiles_are_single_use() {
        let mut world = SimulationWorld::new(config(0, 0));
        let m = spawn_missile(&mut world.ecs, MissileKind::Enemy, OFF_MAP + Vec3::Y * 500.0, Vec3::X, Some(MissileTarget::Aircraft), 0.0);
        for _ in 0..(10 * 60) {
            world.tick(DT, &Controls::default());
        }
        assert!(!world.ecs.contains(m) || !world.ecs.get::<&Missile>(m).unwrap().active);
    }
}
