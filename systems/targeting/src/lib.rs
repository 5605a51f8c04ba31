#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks targets for weapons from the live enemy set.

use rampart_core::{Enemy, TargetingMode, Vec2};

/// Minimum effective range a weapon needs before it may engage airborne enemies.
pub const AIR_TARGETING_MIN_RANGE: f32 = 5.0;

/// Reports whether `enemy` may be engaged by a weapon at `origin` with `range`.
///
/// The enemy must be alive, strictly inside the range on the ground plane,
/// and airborne enemies additionally require a range of at least
/// [`AIR_TARGETING_MIN_RANGE`].
#[must_use]
pub fn is_eligible<E: Enemy>(origin: Vec2, range: f32, enemy: &E) -> bool {
    if !enemy.is_alive() {
        return false;
    }

    if enemy.is_airborne() && range < AIR_TARGETING_MIN_RANGE {
        return false;
    }

    origin.distance(enemy.position()) < range
}

/// Selects the index of the enemy a weapon should engage.
///
/// The scan is linear with strict comparisons, so ties resolve to whichever
/// eligible enemy appears first in `enemies`.
#[must_use]
pub fn select_target<E: Enemy>(
    origin: Vec2,
    range: f32,
    mode: TargetingMode,
    enemies: &[E],
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (index, enemy) in enemies.iter().enumerate() {
        if !is_eligible(origin, range, enemy) {
            continue;
        }

        let score = score(origin, mode, enemy);
        match best {
            Some((_, best_score)) if !precedes(mode, score, best_score) => {}
            _ => best = Some((index, score)),
        }
    }

    best.map(|(index, _)| index)
}

/// Selects a target using a textual targeting mode.
///
/// Unrecognised labels fall back to the first eligible enemy in iteration order.
#[must_use]
pub fn select_target_by_label<E: Enemy>(
    origin: Vec2,
    range: f32,
    label: &str,
    enemies: &[E],
) -> Option<usize> {
    match TargetingMode::from_label(label) {
        Some(mode) => select_target(origin, range, mode, enemies),
        None => enemies
            .iter()
            .position(|enemy| is_eligible(origin, range, enemy)),
    }
}

fn score<E: Enemy>(origin: Vec2, mode: TargetingMode, enemy: &E) -> f32 {
    match mode {
        TargetingMode::First | TargetingMode::Last => enemy.distance_traveled(),
        TargetingMode::Strongest => enemy.hp(),
        TargetingMode::Closest => origin.distance(enemy.position()),
    }
}

fn precedes(mode: TargetingMode, candidate: f32, incumbent: f32) -> bool {
    match mode {
        TargetingMode::First | TargetingMode::Strongest => candidate > incumbent,
        TargetingMode::Last | TargetingMode::Closest => candidate < incumbent,
    }
}

/// Ranks several targets per weapon while reusing a scratch buffer.
#[derive(Debug, Default)]
pub struct TargetRanking {
    candidates: Vec<(usize, f32)>,
}

impl TargetRanking {
    /// Creates a ranking helper with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes up to `limit` eligible enemy indices into `out`, best first.
    ///
    /// The first entry always matches [`select_target`]; later entries follow
    /// the same ordering with ties kept in iteration order.
    pub fn rank<E: Enemy>(
        &mut self,
        origin: Vec2,
        range: f32,
        mode: TargetingMode,
        enemies: &[E],
        limit: usize,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        if limit == 0 {
            return;
        }

        self.candidates.clear();
        self.candidates.extend(
            enemies
                .iter()
                .enumerate()
                .filter(|(_, enemy)| is_eligible(origin, range, *enemy))
                .map(|(index, enemy)| (index, score(origin, mode, enemy))),
        );

        self.candidates.sort_by(|left, right| {
            if precedes(mode, left.1, right.1) {
                std::cmp::Ordering::Less
            } else if precedes(mode, right.1, left.1) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });

        out.extend(self.candidates.iter().take(limit).map(|(index, _)| *index));
    }
}
