//! Seeded wave generation for headless simulations.

use rampart_core::{EnemyId, PathEnemy, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BASE_ENEMIES: u32 = 8;
const ENEMIES_PER_WAVE: u32 = 3;
const BASE_HP: f32 = 40.0;
const HP_GROWTH: f32 = 0.25;
const SPAWN_SPACING: f32 = 1.2;
const FLYER_CHANCE: f64 = 0.15;
const FLY_HEIGHT: f32 = 1.5;

/// Straight lane enemies walk along.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Lane {
    /// Start of the lane on the ground plane.
    pub(crate) origin: Vec2,
    /// Direction of travel.
    pub(crate) direction: Vec2,
    /// Distance after which an enemy has leaked through the defence.
    pub(crate) length: f32,
}

/// Deterministic enemy wave generator.
#[derive(Debug)]
pub(crate) struct WaveGenerator {
    rng: ChaCha8Rng,
    next_enemy: u32,
}

impl WaveGenerator {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_enemy: 0,
        }
    }

    /// Enemies of wave `wave`, staggered behind the lane origin.
    ///
    /// Later waves grow both in size and in hit points.
    pub(crate) fn wave(&mut self, wave: u32, lane: &Lane) -> Vec<PathEnemy> {
        let count = BASE_ENEMIES + ENEMIES_PER_WAVE * wave;
        let scale = 1.0 + HP_GROWTH * wave as f32;

        (0..count)
            .map(|slot| {
                let id = EnemyId::new(self.next_enemy);
                self.next_enemy = self.next_enemy.wrapping_add(1);

                let hp = BASE_HP * scale * self.rng.gen_range(0.8..1.3);
                let speed = self.rng.gen_range(1.0..2.2);
                let enemy = PathEnemy::new(id, hp, speed, lane.origin, lane.direction)
                    .advanced_by(-(slot as f32) * SPAWN_SPACING);

                if self.rng.gen_bool(FLYER_CHANCE) {
                    enemy.flying(FLY_HEIGHT)
                } else {
                    enemy
                }
            })
            .collect()
    }
}
