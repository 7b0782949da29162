//! Terrain height field.
//!
//! **Seed-based determinism:** all noise is derived from `config.seed`, so the
//! same seed always yields the same height at every (x, z). The field is a pure
//! function of world coordinates; it is sampled for collision every tick and for
//! placement, never only at mesh vertices.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Height reported for coordinates outside the authored terrain ("over water").
pub const OUT_OF_BOUNDS_HEIGHT: f32 = -10.0;

/// Derive a deterministic u32 noise seed from a world seed and an offset.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Configuration for the terrain height field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for the noise generators.
    pub seed: u64,
    /// Half-extent of the terrain in world units; the map spans `[-size, size]`.
    pub size: f32,
    /// Amplitude of the noise term.
    pub height_scale: f32,
    /// Constant added to every sample before the edge falloff.
    pub base_height: f64,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: usize,
    /// Lacunarity (frequency multiplier per octave).
    pub lacunarity: f64,
    /// Persistence (amplitude multiplier per octave).
    pub persistence: f64,
    /// Radius where the edge falloff starts.
    pub falloff_inner: f32,
    /// Radius where the edge falloff reaches full depth.
    pub falloff_outer: f32,
    /// Depth subtracted at and beyond `falloff_outer`.
    pub edge_drop: f32,
    /// Nominal water surface height.
    pub water_level: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            size: 2000.0,
            height_scale: 30.0,
            base_height: 10.0,
            frequency: 0.0025,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            falloff_inner: 600.0,
            falloff_outer: 2000.0,
            edge_drop: 55.0,
            water_level: 0.0,
        }
    }
}

/// Procedural height field queried by collision, placement and the renderer.
#[derive(Clone)]
pub struct TerrainField {
    config: TerrainConfig,
    fbm: Fbm<Perlin>,
}

impl std::fmt::Debug for TerrainField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainField").field("config", &self.config).finish()
    }
}

impl TerrainField {
    pub fn new(config: TerrainConfig) -> Self {
        let fbm = Fbm::<Perlin>::new(deterministic_noise_seed(config.seed, 0))
            .set_octaves(config.octaves.max(1))
            .set_frequency(config.frequency)
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.persistence);
        Self { config, fbm }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn water_level(&self) -> f32 {
        self.config.water_level
    }

    /// Whether (x, z) lies on the authored terrain square.
    pub fn is_in_bounds(&self, x: f32, z: f32) -> bool {
        let span = 2.0 * self.config.size;
        let sx = x + self.config.size;
        let sz = z + self.config.size;
        (0.0..=span).contains(&sx) && (0.0..=span).contains(&sz)
    }

    /// Ground height at world (x, z).
    pub fn height(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() || !self.is_in_bounds(x, z) {
            return OUT_OF_BOUNDS_HEIGHT;
        }

        let n = self.fbm.get([x as f64, z as f64]);
        let base = (self.config.base_height + n * self.config.height_scale as f64) as f32;

        let r = (x * x + z * z).sqrt();
        let falloff =
            smoothstep(self.config.falloff_inner, self.config.falloff_outer, r) * self.config.edge_drop;

        base - falloff
    }

    /// Steepness at (x, z): magnitude of the central-difference gradient.
    pub fn slope(&self, x: f32, z: f32) -> f32 {
        const EPS: f32 = 2.0;
        let dx = (self.height(x + EPS, z) - self.height(x - EPS, z)) / (2.0 * EPS);
        let dz = (self.height(x, z + EPS) - self.height(x, z - EPS)) / (2.0 * EPS);
        (dx * dx + dz * dz).sqrt()
    }

    /// Whether the ground at (x, z) sits below the water surface.
    pub fn is_under_water(&self, x: f32, z: f32) -> bool {
        self.height(x, z) < self.config.water_level
    }
}
