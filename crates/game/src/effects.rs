//! Transient visual effects the renderer draws: explosions and wreck fires.

use engine_core::Lifetime;
use glam::Vec3;

const SMALL_EXPLOSION_LIFETIME: f32 = 1.2;
const BIG_EXPLOSION_LIFETIME: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct Explosion {
    pub position: Vec3,
    pub big: bool,
    pub age: f32,
    pub lifetime: Lifetime,
}

impl Explosion {
    pub fn new(position: Vec3, big: bool) -> Self {
        let seconds = if big { BIG_EXPLOSION_LIFETIME } else { SMALL_EXPLOSION_LIFETIME };
        Self {
            position,
            big,
            age: 0.0,
            lifetime: Lifetime::new(seconds),
        }
    }

    /// 0 at detonation, 1 when it disappears.
    pub fn progress(&self) -> f32 {
        let total = self.age + self.lifetime.remaining.max(0.0);
        if total <= 0.0 {
            1.0
        } else {
            (self.age / total).clamp(0.0, 1.0)
        }
    }
}

/// Fire left burning at a crash site until restart.
#[derive(Debug, Clone, Copy)]
pub struct GroundFire {
    pub position: Vec3,
    /// Seconds since ignition, for flicker.
    pub age: f32,
}

#[derive(Debug, Default)]
pub struct Effects {
    pub explosions: Vec<Explosion>,
    pub ground_fires: Vec<GroundFire>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_explosion(&mut self, position: Vec3, big: bool) {
        self.explosions.push(Explosion::new(position, big));
    }

    pub fn spawn_ground_fire(&mut self, position: Vec3) {
        self.ground_fires.push(GroundFire { position, age: 0.0 });
    }

    pub fn update(&mut self, dt: f32) {
        self.explosions.retain_mut(|e| {
            e.age += dt;
            !e.lifetime.update(dt)
        });
        for fire in &mut self.ground_fires {
            fire.age += dt;
        }
    }

    pub fn clear(&mut self) {
        self.explosions.clear();
        self.ground_fires.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty() && self.ground_fires.is_empty()
    }
}
