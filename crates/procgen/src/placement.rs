//! Deterministic scatter of static obstacles and ground emplacements.
//!
//! Candidates are drawn from a seeded RNG and rejected against height, slope,
//! spacing and exclusion-zone rules, so a given seed always produces the same
//! layout.

use glam::{Vec2, Vec3};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::terrain::TerrainField;

/// Rejection-sampling rules for one kind of placed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Minimum distance from the map center.
    pub min_radius: f32,
    /// Maximum distance from the map center.
    pub max_radius: f32,
    /// Minimum ground height above the water surface.
    pub min_clearance: f32,
    /// Maximum ground height.
    pub max_height: f32,
    /// Maximum terrain slope (rise over run).
    pub max_slope: f32,
    /// Minimum planar distance between two placed objects.
    pub min_spacing: f32,
    /// Candidate draws allowed per requested object.
    pub attempts_per_item: usize,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            min_radius: 0.0,
            max_radius: 1400.0,
            min_clearance: 1.0,
            max_height: 60.0,
            max_slope: 0.6,
            min_spacing: 10.0,
            attempts_per_item: 60,
        }
    }
}

/// Circle on the ground plane nothing may be placed inside (e.g. the spawn runway).
#[derive(Debug, Clone, Copy)]
pub struct Exclusion {
    pub center: Vec2,
    pub radius: f32,
}

/// Scatter up to `count` ground points that satisfy `rules`.
///
/// Returns fewer points when the attempt budget runs out; callers decide
/// whether that matters.
pub fn scatter<R: Rng>(
    field: &TerrainField,
    rules: &PlacementRules,
    count: usize,
    exclusions: &[Exclusion],
    rng: &mut R,
) -> Vec<Vec3> {
    let mut placed: Vec<Vec3> = Vec::with_capacity(count);
    let max_attempts = count.saturating_mul(rules.attempts_per_item.max(1));
    let min_r = rules.min_radius.max(0.0);
    let max_r = rules.max_radius.max(min_r + f32::EPSILON);
    let water = field.water_level();

    for _ in 0..max_attempts {
        if placed.len() >= count {
            break;
        }

        // Uniform over the annulus area, not the radius.
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let r = (min_r * min_r + rng.gen::<f32>() * (max_r * max_r - min_r * min_r)).sqrt();
        let x = angle.cos() * r;
        let z = angle.sin() * r;

        if !field.is_in_bounds(x, z) {
            continue;
        }
        let h = field.height(x, z);
        if h < water + rules.min_clearance || h > rules.max_height {
            continue;
        }
        if field.slope(x, z) > rules.max_slope {
            continue;
        }
        let p = Vec2::new(x, z);
        if exclusions.iter().any(|e| p.distance(e.center) < e.radius) {
            continue;
        }
        if placed
            .iter()
            .any(|q| Vec2::new(q.x, q.z).distance(p) < rules.min_spacing)
        {
            continue;
        }

        placed.push(Vec3::new(x, h, z));
    }

    placed
}

/// Tree species; each carries its own trunk collision size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeKind {
    Pine,
    Oak,
    Spruce,
}

impl TreeKind {
    /// (collision radius, height) at scale 1.0.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            TreeKind::Pine => (1.6, 11.0),
            TreeKind::Oak => (3.2, 8.0),
            TreeKind::Spruce => (2.0, 14.0),
        }
    }

    fn pick<R: Rng>(rng: &mut R) -> Self {
        match rng.gen::<f32>() {
            x if x < 0.45 => TreeKind::Pine,
            x if x < 0.75 => TreeKind::Oak,
            _ => TreeKind::Spruce,
        }
    }
}

/// A static obstacle the aircraft can fly into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub kind: TreeKind,
    /// Base of the trunk, on the ground.
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
}

impl Tree {
    pub fn new(kind: TreeKind, position: Vec3, scale: f32) -> Self {
        let (radius, height) = kind.dimensions();
        Self {
            kind,
            position,
            radius: radius * scale,
            height: height * scale,
        }
    }

    /// World height of the crown.
    pub fn top(&self) -> f32 {
        self.position.y + self.height
    }
}

/// Rules that keep trees off beaches and cliffs.
pub fn default_tree_rules() -> PlacementRules {
    PlacementRules {
        min_radius: 0.0,
        max_radius: 1500.0,
        min_clearance: 2.0,
        max_height: 45.0,
        max_slope: 0.5,
        min_spacing: 6.0,
        attempts_per_item: 30,
    }
}

/// Scatter a deterministic forest.
pub fn scatter_trees(
    field: &TerrainField,
    rules: &PlacementRules,
    count: usize,
    exclusions: &[Exclusion],
    seed: u64,
) -> Vec<Tree> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(0x7ee5));
    let spots = scatter(field, rules, count, exclusions, &mut rng);
    spots
        .into_iter()
        .map(|p| {
            let kind = TreeKind::pick(&mut rng);
            let scale = 0.8 + rng.gen::<f32>() * 0.5;
            Tree::new(kind, p, scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainConfig;

    fn field() -> TerrainField {
        TerrainField::new(TerrainConfig { seed: 42, ..Default::default() })
    }

    #[test]
    fn scatter_same_seed_same_layout() {
        let field = field();
        let rules = PlacementRules::default();
        let a = scatter(&field, &rules, 12, &[], &mut StdRng::seed_from_u64(5));
        let b = scatter(&field, &rules, 12, &[], &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn scatter_respects_rules() {
        let field = field();
        let rules = PlacementRules::default();
        let exclusion = Exclusion { center: Vec2::ZERO, radius: 200.0 };
        let points = scatter(&field, &rules, 12, &[exclusion], &mut StdRng::seed_from_u64(9));
        for (i, p) in points.iter().enumerate() {
            assert!(p.y >= field.water_level() + rules.min_clearance);
            assert!(p.y <= rules.max_height);
            assert!(Vec2::new(p.x, p.z).length() >= 200.0);
            assert_eq!(p.y, field.height(p.x, p.z));
            for q in &points[i + 1..] {
                assert!(Vec2::new(p.x, p.z).distance(Vec2::new(q.x, q.z)) >= rules.min_spacing);
            }
        }
    }

    #[test]
    fn impossible_rules_place_nothing() {
        let field = field();
        let rules = PlacementRules { max_height: -1000.0, ..Default::default() };
        let points = scatter(&field, &rules, 5, &[], &mut StdRng::seed_from_u64(1));
        assert!(points.is_empty());
    }

    #[test]
    fn trees_are_deterministic_and_sized_by_kind() {
        let field = field();
        let rules = default_tree_rules();
        let a = scatter_trees(&field, &rules, 40, &[], 77);
        let b = scatter_trees(&field, &rules, 40, &[], 77);
        assert_eq!(a, b);
        for tree in &a {
            let (r, h) = tree.kind.dimensions();
            let scale = tree.radius / r;
            assert!((tree.height - h * scale).abs() < 1e-4);
            assert!(tree.top() > tree.position.y);
        }
    }
}
