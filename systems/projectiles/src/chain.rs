//! Instant chain attacks that jump between nearby enemies.

use rampart_core::{strike, Credit, Enemy, Notification, NotificationSink, WeaponId};

/// Largest distance a chain can jump from the last enemy it struck.
pub const CHAIN_RADIUS: f32 = 4.0;

/// Fraction of the activation damage dealt by every link after the primary.
pub const CHAIN_LINK_DAMAGE: f32 = 0.6;

/// Seconds a link slow granted by a synergy lasts.
pub const CHAIN_SLOW_DURATION: f32 = 1.0;

/// Parameters of a single chain activation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainStrike {
    /// Weapon producing the chain.
    pub source: WeaponId,
    /// Damage dealt to the primary target.
    pub damage: f32,
    /// Total enemies struck, primary included.
    pub max_hits: u32,
    /// Slow factor applied to every enemy struck, if any.
    pub link_slow: Option<f32>,
    /// Whether links deal full damage instead of the reduced link damage.
    pub no_falloff: bool,
}

/// Chain resolver reusing its visited buffer between activations.
#[derive(Debug, Default)]
pub struct ChainAttack {
    visited: Vec<usize>,
}

impl ChainAttack {
    /// Creates a chain resolver with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strikes `enemies[primary]` and jumps to the nearest unvisited enemies.
    ///
    /// Each jump picks the nearest living enemy not yet struck in this
    /// activation within [`CHAIN_RADIUS`] of the last enemy struck; ties keep
    /// the enemy that appears first. The chain stops after `max_hits` enemies
    /// or when no candidate remains. Returns the number of enemies struck.
    pub fn fire<E: Enemy, S: NotificationSink + ?Sized>(
        &mut self,
        enemies: &mut [E],
        primary: usize,
        chain: &ChainStrike,
        credits: &mut Vec<Credit>,
        sink: &mut S,
    ) -> usize {
        self.visited.clear();

        let alive = enemies.get(primary).is_some_and(|enemy| enemy.is_alive());
        if !alive || chain.max_hits == 0 {
            return 0;
        }

        let link_damage = if chain.no_falloff {
            chain.damage
        } else {
            chain.damage * CHAIN_LINK_DAMAGE
        };

        let mut current = primary;
        loop {
            self.visited.push(current);
            let damage = if self.visited.len() == 1 {
                chain.damage
            } else {
                link_damage
            };

            let enemy = &mut enemies[current];
            let _ = strike(enemy, chain.source, damage, credits);
            if let Some(factor) = chain.link_slow {
                if enemy.is_alive() {
                    enemy.apply_slow(factor, CHAIN_SLOW_DURATION);
                }
            }

            if self.visited.len() >= chain.max_hits as usize {
                break;
            }

            match self.next_link(enemies, current) {
                Some(next) => current = next,
                None => break,
            }
        }

        sink.notify(Notification::ChainFired {
            weapon: chain.source,
            links: self.visited.iter().map(|index| enemies[*index].id()).collect(),
        });

        self.visited.len()
    }

    fn next_link<E: Enemy>(&self, enemies: &[E], from: usize) -> Option<usize> {
        let origin = enemies[from].position();
        let mut best: Option<(usize, f32)> = None;

        for (index, enemy) in enemies.iter().enumerate() {
            if !enemy.is_alive() || self.visited.contains(&index) {
                continue;
            }
            let distance = origin.distance(enemy.position());
            if distance > CHAIN_RADIUS {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }

        best.map(|(index, _)| index)
    }
}
