//! Effect resolution shared by projectile impacts and trap pulses.

use rampart_core::{
    strike, Credit, DotEffect, DotKind, Enemy, SlowEffect, SpecialBehavior, Vec2, WeaponId,
};

use crate::DamageZone;

/// Fraction of the falloff-scaled damage dealt to enemies caught in a splash.
pub const SPLASH_DAMAGE_FACTOR: f32 = 0.6;

/// Effects carried by a projectile or pulse, already composed from effective stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Payload {
    /// Damage dealt to the primary target.
    pub damage: f32,
    /// Splash radius around the impact point, if any.
    pub splash_radius: Option<f32>,
    /// Slow applied on impact, if any.
    pub slow: Option<SlowEffect>,
    /// Damage-over-time applied on impact, if any.
    pub dot: Option<DotEffect>,
    /// Flavour of the damage-over-time effect.
    pub dot_kind: DotKind,
    /// Kind-specific behaviour requested by a specialization.
    pub special: Option<SpecialBehavior>,
}

impl Payload {
    /// Payload dealing plain damage without any secondary effect.
    #[must_use]
    pub const fn damage(damage: f32) -> Self {
        Self {
            damage,
            splash_radius: None,
            slow: None,
            dot: None,
            dot_kind: DotKind::Fire,
            special: None,
        }
    }
}

/// Splash damage dealt `distance` units away from an impact.
///
/// Returns zero at and beyond the edge of the radius.
#[must_use]
pub fn splash_damage(damage: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    damage * (1.0 - distance / radius) * SPLASH_DAMAGE_FACTOR
}

/// Resolves a hit on `enemies[primary]` at `impact`.
///
/// Direct damage lands first, then splash damage on every other living enemy
/// within the splash radius, then slows and damage-over-time on the
/// survivors. Returns the damage zone left behind, if the payload asks for one.
pub fn resolve_impact<E: Enemy>(
    enemies: &mut [E],
    primary: usize,
    impact: Vec2,
    source: WeaponId,
    payload: &Payload,
    credits: &mut Vec<Credit>,
) -> Option<DamageZone> {
    let target = enemies.get_mut(primary)?;

    let execute = match payload.special {
        Some(SpecialBehavior::Execute { hp_fraction }) if target.is_alive() => {
            target.hp() * hp_fraction
        }
        _ => 0.0,
    };
    let _ = strike(target, source, payload.damage + execute, credits);

    let splash_radius = payload.splash_radius.filter(|radius| *radius > 0.0);
    if let Some(radius) = splash_radius {
        for (index, enemy) in enemies.iter_mut().enumerate() {
            if index == primary || !enemy.is_alive() {
                continue;
            }
            let amount = splash_damage(payload.damage, impact.distance(enemy.position()), radius);
            if amount > 0.0 {
                let _ = strike(enemy, source, amount, credits);
            }
        }
    }

    if let Some(slow) = payload.slow {
        let spread = match payload.special {
            Some(SpecialBehavior::AreaSlow { radius }) => {
                Some(radius.max(splash_radius.unwrap_or(0.0)))
            }
            _ => splash_radius,
        };
        for_each_affected(enemies, primary, impact, spread, |enemy| {
            enemy.apply_slow(slow.factor, slow.duration);
        });
    }

    if let Some(dot) = payload.dot {
        let spread = match payload.special {
            Some(SpecialBehavior::Contagion { radius }) => {
                Some(radius.max(splash_radius.unwrap_or(0.0)))
            }
            _ => splash_radius,
        };
        for_each_affected(enemies, primary, impact, spread, |enemy| {
            enemy.apply_dot(dot.amount_per_second, dot.duration, payload.dot_kind);
        });
    }

    match payload.special {
        Some(SpecialBehavior::DamageZone {
            damage_per_second,
            duration,
            radius,
        }) => Some(DamageZone::new(
            source,
            impact,
            radius,
            damage_per_second,
            duration,
        )),
        _ => None,
    }
}

/// Applies `payload` to every living ground enemy within `radius` of `origin`.
///
/// Each affected enemy takes the full payload damage together with its slow
/// and damage-over-time. Returns the number of enemies affected.
pub fn pulse<E: Enemy>(
    enemies: &mut [E],
    origin: Vec2,
    radius: f32,
    source: WeaponId,
    payload: &Payload,
    credits: &mut Vec<Credit>,
) -> usize {
    let mut affected = 0;
    for enemy in enemies.iter_mut() {
        if !enemy.is_alive() || enemy.is_airborne() {
            continue;
        }
        if origin.distance(enemy.position()) >= radius {
            continue;
        }

        affected += 1;
        if payload.damage > 0.0 {
            let _ = strike(enemy, source, payload.damage, credits);
        }
        if !enemy.is_alive() {
            continue;
        }
        if let Some(slow) = payload.slow {
            enemy.apply_slow(slow.factor, slow.duration);
        }
        if let Some(dot) = payload.dot {
            enemy.apply_dot(dot.amount_per_second, dot.duration, payload.dot_kind);
        }
    }
    affected
}

fn for_each_affected<E: Enemy>(
    enemies: &mut [E],
    primary: usize,
    impact: Vec2,
    spread: Option<f32>,
    mut apply: impl FnMut(&mut E),
) {
    for (index, enemy) in enemies.iter_mut().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let inside = index == primary
            || spread.is_some_and(|radius| impact.distance(enemy.position()) <= radius);
        if inside {
            apply(enemy);
        }
    }
}
