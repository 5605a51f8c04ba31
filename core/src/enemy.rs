//! Capability set the combat engine requires from enemies.

use glam::Vec2;

use crate::{DotKind, EnemyId, WeaponId};

/// Enemy capabilities consumed by targeting, projectiles and attribution.
///
/// Enemies are owned by the surrounding game loop; the engine only borrows
/// them for the duration of a tick.
pub trait Enemy {
    /// Identifier allocated by the game loop.
    fn id(&self) -> EnemyId;

    /// Reports whether the enemy is still alive.
    fn is_alive(&self) -> bool;

    /// Remaining hit points.
    fn hp(&self) -> f32;

    /// Current position on the ground plane.
    fn position(&self) -> Vec2;

    /// Distance covered along the enemy's path.
    fn distance_traveled(&self) -> f32;

    /// Height above the ground; positive values mean the enemy is airborne.
    fn fly_height(&self) -> f32;

    /// Removes `amount` hit points, killing the enemy when none remain.
    fn take_damage(&mut self, amount: f32);

    /// Slows the enemy to `factor` of its speed for `duration` seconds.
    fn apply_slow(&mut self, factor: f32, duration: f32);

    /// Inflicts `amount_per_second` damage for `duration` seconds.
    fn apply_dot(&mut self, amount_per_second: f32, duration: f32, kind: DotKind);

    /// Weapon that most recently damaged the enemy.
    fn last_damaged_by(&self) -> Option<WeaponId>;

    /// Records the weapon that most recently damaged the enemy.
    fn set_last_damaged_by(&mut self, weapon: WeaponId);

    /// Reports whether the enemy's death has already been credited.
    fn kill_attributed(&self) -> bool;

    /// Marks the enemy's death as credited.
    fn mark_kill_attributed(&mut self);

    /// Reports whether the enemy is airborne.
    fn is_airborne(&self) -> bool {
        self.fly_height() > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveSlow {
    factor: f32,
    remaining: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveDot {
    kind: DotKind,
    amount_per_second: f32,
    remaining: f32,
}

/// Reference enemy that walks a straight lane and tracks its status effects.
#[derive(Clone, Debug, PartialEq)]
pub struct PathEnemy {
    id: EnemyId,
    hp: f32,
    speed: f32,
    lane_origin: Vec2,
    lane_direction: Vec2,
    distance_traveled: f32,
    fly_height: f32,
    slow: Option<ActiveSlow>,
    dots: Vec<ActiveDot>,
    last_damaged_by: Option<WeaponId>,
    kill_attributed: bool,
}

impl PathEnemy {
    /// Creates a ground enemy at the start of a lane.
    ///
    /// `lane_direction` is normalized; a zero vector keeps the enemy in place.
    #[must_use]
    pub fn new(id: EnemyId, hp: f32, speed: f32, lane_origin: Vec2, lane_direction: Vec2) -> Self {
        Self {
            id,
            hp,
            speed,
            lane_origin,
            lane_direction: lane_direction.normalize_or_zero(),
            distance_traveled: 0.0,
            fly_height: 0.0,
            slow: None,
            dots: Vec::new(),
            last_damaged_by: None,
            kill_attributed: false,
        }
    }

    /// Lifts the enemy off the ground.
    #[must_use]
    pub fn flying(mut self, height: f32) -> Self {
        self.fly_height = height;
        self
    }

    /// Places the enemy `distance` units along its lane.
    #[must_use]
    pub fn advanced_by(mut self, distance: f32) -> Self {
        self.distance_traveled = distance;
        self
    }

    /// Current speed multiplier from active slows.
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        self.slow.map_or(1.0, |slow| slow.factor)
    }

    /// Damage per second of the active effect of `kind`, if any.
    #[must_use]
    pub fn dot_rate(&self, kind: DotKind) -> Option<f32> {
        self.dots
            .iter()
            .find(|dot| dot.kind == kind)
            .map(|dot| dot.amount_per_second)
    }

    /// Advances the enemy by `dt` seconds.
    ///
    /// Damage-over-time ticks first, then the enemy walks along its lane at
    /// its slowed speed. Returns the damage dealt by damage-over-time effects.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }

        let mut dot_damage = 0.0;
        for dot in &mut self.dots {
            let active = dot.remaining.min(dt).max(0.0);
            dot_damage += dot.amount_per_second * active;
            dot.remaining -= dt;
        }
        self.dots.retain(|dot| dot.remaining > 0.0);
        if dot_damage > 0.0 {
            self.take_damage(dot_damage);
        }

        if !self.is_alive() {
            return dot_damage;
        }

        let factor = self.speed_factor();
        self.distance_traveled += self.speed * factor * dt;

        if let Some(slow) = &mut self.slow {
            slow.remaining -= dt;
            if slow.remaining <= 0.0 {
                self.slow = None;
            }
        }

        dot_damage
    }
}

impl Enemy for PathEnemy {
    fn id(&self) -> EnemyId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    fn hp(&self) -> f32 {
        self.hp
    }

    fn position(&self) -> Vec2 {
        self.lane_origin + self.lane_direction * self.distance_traveled
    }

    fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    fn fly_height(&self) -> f32 {
        self.fly_height
    }

    fn take_damage(&mut self, amount: f32) {
        if !self.is_alive() {
            return;
        }
        self.hp = (self.hp - amount).max(0.0);
    }

    fn apply_slow(&mut self, factor: f32, duration: f32) {
        match &mut self.slow {
            Some(active) if active.factor < factor => {
                active.remaining = active.remaining.max(duration);
            }
            Some(active) => {
                active.factor = factor;
                active.remaining = active.remaining.max(duration);
            }
            None => {
                self.slow = Some(ActiveSlow {
                    factor,
                    remaining: duration,
                });
            }
        }
    }

    fn apply_dot(&mut self, amount_per_second: f32, duration: f32, kind: DotKind) {
        if let Some(active) = self.dots.iter_mut().find(|dot| dot.kind == kind) {
            active.amount_per_second = active.amount_per_second.max(amount_per_second);
            active.remaining = active.remaining.max(duration);
            return;
        }

        self.dots.push(ActiveDot {
            kind,
            amount_per_second,
            remaining: duration,
        });
    }

    fn last_damaged_by(&self) -> Option<WeaponId> {
        self.last_damaged_by
    }

    fn set_last_damaged_by(&mut self, weapon: WeaponId) {
        self.last_damaged_by = Some(weapon);
    }

    fn kill_attributed(&self) -> bool {
        self.kill_attributed
    }

    fn mark_kill_attributed(&mut self) {
        self.kill_attributed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{Enemy, PathEnemy};
    use crate::{DotKind, EnemyId};
    use glam::Vec2;

    fn walker() -> PathEnemy {
        PathEnemy::new(EnemyId::new(1), 50.0, 2.0, Vec2::new(0.0, 1.0), Vec2::new(3.0, 0.0))
    }

    #[test]
    fn walks_along_normalized_lane() {
        let mut enemy = walker();
        let _ = enemy.advance(1.5);

        assert!((enemy.distance_traveled() - 3.0).abs() < 1e-6);
        assert_eq!(enemy.position(), Vec2::new(3.0, 1.0));
    }

    #[test]
    fn slow_reduces_speed_until_it_expires() {
        let mut enemy = walker();
        enemy.apply_slow(0.5, 1.0);

        let _ = enemy.advance(1.0);
        assert!((enemy.distance_traveled() - 1.0).abs() < 1e-6);
        assert!((enemy.speed_factor() - 1.0).abs() < f32::EPSILON);

        let _ = enemy.advance(1.0);
        assert!((enemy.distance_traveled() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn weaker_slow_does_not_override_stronger_one() {
        let mut enemy = walker();
        enemy.apply_slow(0.3, 1.0);
        enemy.apply_slow(0.8, 2.0);

        assert!((enemy.speed_factor() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn dot_ticks_for_its_duration_only() {
        let mut enemy = walker();
        enemy.apply_dot(10.0, 1.5, DotKind::Poison);

        assert!((enemy.advance(1.0) - 10.0).abs() < 1e-4);
        assert!((enemy.advance(1.0) - 5.0).abs() < 1e-4);
        assert!((enemy.advance(1.0)).abs() < 1e-6);
        assert!((enemy.hp() - 35.0).abs() < 1e-4);
    }

    #[test]
    fn separate_dot_kinds_stack() {
        let mut enemy = walker();
        enemy.apply_dot(4.0, 2.0, DotKind::Poison);
        enemy.apply_dot(6.0, 2.0, DotKind::Fire);
        enemy.apply_dot(2.0, 2.0, DotKind::Fire);

        assert_eq!(enemy.dot_rate(DotKind::Poison), Some(4.0));
        assert_eq!(enemy.dot_rate(DotKind::Fire), Some(6.0));
    }

    #[test]
    fn damage_never_drops_hp_below_zero() {
        let mut enemy = walker();
        enemy.take_damage(80.0);

        assert!(!enemy.is_alive());
        assert!(enemy.hp().abs() < f32::EPSILON);
    }
}
