//! Entity field: bug and decoy positions inside the arena
//!
//! Entities are identified by their index within their kind's collection.
//! Every position is independent and uniformly distributed within the
//! arena bounds for that kind's size.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The two things that can be hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Scores a point when hit
    Bug,
    /// "Code block" - costs a point and counts a regression when hit
    Decoy,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Bug => "bug",
            EntityKind::Decoy => "decoy",
        }
    }
}

/// Fixed-size rectangular play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest top-left corner that keeps an entity of `size` inside
    pub fn max_corner(&self, size: f32) -> Vec2 {
        Vec2::new(
            (self.width - size).max(0.0),
            (self.height - size).max(0.0),
        )
    }

    /// Whether an entity of `size` fits at all
    pub fn fits(&self, size: f32) -> bool {
        size > 0.0 && size <= self.width && size <= self.height
    }

    /// Pick a uniform random in-bounds position for an entity of `size`
    pub fn random_position(&self, size: f32, rng: &mut impl Rng) -> Entity {
        let max = self.max_corner(size);
        Entity {
            left: rng.random_range(0.0..=max.x),
            top: rng.random_range(0.0..=max.y),
        }
    }
}

/// Top-left corner of an entity, in arena pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub left: f32,
    pub top: f32,
}

impl Entity {
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Top-left corner as a vector
    pub fn corner(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Point-in-box test against the current bounds (edges inclusive)
    pub fn contains(&self, point: Vec2, size: f32) -> bool {
        point.x >= self.left
            && point.x <= self.left + size
            && point.y >= self.top
            && point.y <= self.top + size
    }
}

/// All entities of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityField {
    pub arena: Arena,
    pub bug_size: f32,
    pub decoy_size: f32,
    pub bugs: Vec<Entity>,
    pub decoys: Vec<Entity>,
}

impl EntityField {
    /// Create a field with every entity at a fresh random position
    pub fn generate(
        arena: Arena,
        bug_count: usize,
        bug_size: f32,
        decoy_count: usize,
        decoy_size: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let bugs = (0..bug_count)
            .map(|_| arena.random_position(bug_size, rng))
            .collect();
        let decoys = (0..decoy_count)
            .map(|_| arena.random_position(decoy_size, rng))
            .collect();
        Self {
            arena,
            bug_size,
            decoy_size,
            bugs,
            decoys,
        }
    }

    /// Edge length of an entity kind
    pub fn size_of(&self, kind: EntityKind) -> f32 {
        match kind {
            EntityKind::Bug => self.bug_size,
            EntityKind::Decoy => self.decoy_size,
        }
    }

    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Bug => &self.bugs,
            EntityKind::Decoy => &self.decoys,
        }
    }

    fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Bug => &mut self.bugs,
            EntityKind::Decoy => &mut self.decoys,
        }
    }

    pub fn get(&self, kind: EntityKind, index: usize) -> Option<Entity> {
        self.entities(kind).get(index).copied()
    }

    /// Move every entity of `kind` to a fresh random position
    pub fn regenerate_all(&mut self, kind: EntityKind, rng: &mut impl Rng) {
        let arena = self.arena;
        let size = self.size_of(kind);
        for entity in self.entities_mut(kind).iter_mut() {
            *entity = arena.random_position(size, rng);
        }
    }

    /// Move a single entity; returns false for an unknown index
    pub fn regenerate(&mut self, kind: EntityKind, index: usize, rng: &mut impl Rng) -> bool {
        let arena = self.arena;
        let size = self.size_of(kind);
        match self.entities_mut(kind).get_mut(index) {
            Some(entity) => {
                *entity = arena.random_position(size, rng);
                true
            }
            None => false,
        }
    }

    /// Whether `point` lies on the entity's current bounds
    pub fn hits(&self, kind: EntityKind, index: usize, point: Vec2) -> bool {
        self.get(kind, index)
            .map(|e| e.contains(point, self.size_of(kind)))
            .unwrap_or(false)
    }

    /// Topmost entity under `point`
    ///
    /// Decoys are drawn above bugs and later indices above earlier ones,
    /// so the search runs in reverse paint order.
    pub fn entity_at(&self, point: Vec2) -> Option<(EntityKind, usize)> {
        for kind in [EntityKind::Decoy, EntityKind::Bug] {
            let size = self.size_of(kind);
            if let Some(index) = self
                .entities(kind)
                .iter()
                .rposition(|e| e.contains(point, size))
            {
                return Some((kind, index));
            }
        }
        None
    }

    /// Whether every entity lies within the arena (debug/test helper)
    pub fn in_bounds(&self) -> bool {
        [EntityKind::Bug, EntityKind::Decoy].iter().all(|&kind| {
            let max = self.arena.max_corner(self.size_of(kind));
            self.entities(kind).iter().all(|e| {
                e.left >= 0.0 && e.left <= max.x && e.top >= 0.0 && e.top <= max.y
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(seed: u64) -> EntityField {
        let mut rng = Pcg32::seed_from_u64(seed);
        EntityField::generate(
            Arena::new(ARENA_WIDTH, ARENA_HEIGHT),
            BUG_COUNT,
            BUG_SIZE,
            DECOY_COUNT,
            DECOY_SIZE,
            &mut rng,
        )
    }

    #[test]
    fn test_generate_counts() {
        let f = field(1);
        assert_eq!(f.bugs.len(), BUG_COUNT);
        assert_eq!(f.decoys.len(), DECOY_COUNT);
        assert!(f.in_bounds());
    }

    #[test]
    fn test_regenerate_single_slot() {
        let mut f = field(2);
        let mut rng = Pcg32::seed_from_u64(99);
        let before = f.bugs.clone();
        assert!(f.regenerate(EntityKind::Bug, 3, &mut rng));
        for (i, (old, new)) in before.iter().zip(&f.bugs).enumerate() {
            if i != 3 {
                assert_eq!(old, new);
            }
        }
        assert!(!f.regenerate(EntityKind::Bug, BUG_COUNT, &mut rng));
    }

    #[test]
    fn test_contains_edges() {
        let e = Entity::new(10.0, 20.0);
        assert!(e.contains(Vec2::new(10.0, 20.0), 40.0));
        assert!(e.contains(Vec2::new(50.0, 60.0), 40.0));
        assert!(!e.contains(Vec2::new(50.1, 30.0), 40.0));
        assert!(!e.contains(Vec2::new(9.9, 30.0), 40.0));
    }

    #[test]
    fn test_entity_at_prefers_decoy() {
        let mut f = field(3);
        for e in f.bugs.iter_mut().chain(f.decoys.iter_mut()) {
            *e = Entity::new(800.0, 400.0);
        }
        f.bugs[0] = Entity::new(100.0, 100.0);
        f.decoys[1] = Entity::new(110.0, 110.0);
        let hit = f.entity_at(Vec2::new(120.0, 120.0));
        assert_eq!(hit, Some((EntityKind::Decoy, 1)));
        let hit = f.entity_at(Vec2::new(105.0, 105.0));
        assert_eq!(hit.map(|h| h.0), Some(EntityKind::Bug));

        // Same kind: the later index is painted on top
        f.bugs[2] = Entity::new(105.0, 95.0);
        assert_eq!(f.entity_at(Vec2::new(108.0, 105.0)), Some((EntityKind::Bug, 2)));
        assert_eq!(f.entity_at(Vec2::new(102.0, 102.0)), Some((EntityKind::Bug, 0)));
    }

    #[test]
    fn test_hits_uses_current_position() {
        let mut f = field(4);
        f.bugs[0] = Entity::new(0.0, 0.0);
        let stale_point = Vec2::new(20.0, 20.0);
        assert!(f.hits(EntityKind::Bug, 0, stale_point));
        f.bugs[0] = Entity::new(500.0, 300.0);
        assert!(!f.hits(EntityKind::Bug, 0, stale_point));
        assert!(!f.hits(EntityKind::Bug, 42, stale_point));
    }

    #[test]
    fn test_degenerate_arena_pins_to_origin() {
        let arena = Arena::new(40.0, 40.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let e = arena.random_position(40.0, &mut rng);
        assert_eq!(e, Entity::new(0.0, 0.0));
        assert!(arena.fits(40.0));
        assert!(!arena.fits(41.0));
    }

    proptest! {
        #[test]
        fn prop_positions_stay_in_bounds(seed in any::<u64>(), rounds in 1usize..20) {
            let mut f = field(seed);
            let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
            for i in 0..rounds {
                f.regenerate_all(EntityKind::Bug, &mut rng);
                f.regenerate_all(EntityKind::Decoy, &mut rng);
                f.regenerate(EntityKind::Bug, i % BUG_COUNT, &mut rng);
                prop_assert!(f.in_bounds());
            }
        }
    }
}
