#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that composes a weapon's effective combat stats.
//!
//! Effective stats are the product of the base configuration, the upgrade
//! multiplier for the weapon's level, the synergy buffs currently granted to
//! it and the modifiers of its specialization. Nothing is cached: every query
//! recomputes from the inputs so that synergy or specialization changes are
//! observed immediately.

use rampart_core::{DotEffect, SlowEffect, SpecModifiers, SynergyBuffs, WeaponConfig, MAX_LEVEL};

const DAMAGE_PER_LEVEL: f64 = 0.35;
const RANGE_PER_LEVEL: f64 = 0.15;
const FIRE_RATE_PER_LEVEL: f64 = 0.20;

/// Damage multiplier granted by `level`.
#[must_use]
pub fn upgrade_damage_mult(level: u8) -> f64 {
    1.0 + f64::from(level.saturating_sub(1)) * DAMAGE_PER_LEVEL
}

/// Range multiplier granted by `level`.
#[must_use]
pub fn upgrade_range_mult(level: u8) -> f64 {
    1.0 + f64::from(level.saturating_sub(1)) * RANGE_PER_LEVEL
}

/// Fire rate multiplier granted by `level`.
#[must_use]
pub fn upgrade_fire_rate_mult(level: u8) -> f64 {
    1.0 + f64::from(level.saturating_sub(1)) * FIRE_RATE_PER_LEVEL
}

/// Gold required to upgrade a weapon from `level` to the next level.
///
/// Returns `None` once the weapon is at the maximum level.
#[must_use]
pub fn upgrade_cost(base_cost: u32, level: u8) -> Option<u32> {
    if level >= MAX_LEVEL {
        return None;
    }

    let tenths = 6 + 4 * u64::from(level.saturating_sub(1));
    let cost = u64::from(base_cost) * tenths / 10;
    u32::try_from(cost).ok()
}

/// Gold refunded when selling a weapon that absorbed `total_invested` gold.
#[must_use]
pub const fn sell_value(total_invested: u32) -> u32 {
    total_invested / 2
}

/// Composes effective stats from a configuration and its active modifiers.
#[derive(Clone, Copy, Debug)]
pub struct StatComposer<'a> {
    config: &'a WeaponConfig,
    level: u8,
    synergy: Option<&'a SynergyBuffs>,
    spec: Option<&'a SpecModifiers>,
    boss_debuff: f32,
}

impl<'a> StatComposer<'a> {
    /// Creates a composer for a weapon at `level` without any modifiers.
    #[must_use]
    pub fn new(config: &'a WeaponConfig, level: u8) -> Self {
        Self {
            config,
            level,
            synergy: None,
            spec: None,
            boss_debuff: 1.0,
        }
    }

    /// Layers the weapon's current synergy buffs on top.
    #[must_use]
    pub fn with_synergy(mut self, synergy: Option<&'a SynergyBuffs>) -> Self {
        self.synergy = synergy;
        self
    }

    /// Layers the weapon's specialization modifiers on top.
    #[must_use]
    pub fn with_spec(mut self, spec: Option<&'a SpecModifiers>) -> Self {
        self.spec = spec;
        self
    }

    /// Applies an external fire rate debuff (`1.0` means unaffected).
    #[must_use]
    pub fn with_boss_debuff(mut self, factor: f32) -> Self {
        self.boss_debuff = factor;
        self
    }

    /// Effective damage, floored to a whole number.
    #[must_use]
    pub fn damage(&self) -> f32 {
        let synergy = self.synergy.map_or(1.0, |buffs| buffs.damage_mult);
        let spec = self.spec.and_then(|spec| spec.damage_mult).unwrap_or(1.0);
        let value = f64::from(self.config.damage)
            * upgrade_damage_mult(self.level)
            * f64::from(synergy)
            * f64::from(spec);
        value.floor() as f32
    }

    /// Effective range in world units.
    #[must_use]
    pub fn range(&self) -> f32 {
        let synergy = self.synergy.map_or(1.0, |buffs| buffs.range_mult);
        let spec = self.spec.and_then(|spec| spec.range_mult).unwrap_or(1.0);
        (f64::from(self.config.range)
            * upgrade_range_mult(self.level)
            * f64::from(synergy)
            * f64::from(spec)) as f32
    }

    /// Effective activations per second, boss debuff included.
    #[must_use]
    pub fn fire_rate(&self) -> f32 {
        let synergy = self.synergy.map_or(1.0, |buffs| buffs.fire_rate_mult);
        let spec = self.spec.and_then(|spec| spec.fire_rate_mult).unwrap_or(1.0);
        (f64::from(self.config.fire_rate)
            * upgrade_fire_rate_mult(self.level)
            * f64::from(synergy)
            * f64::from(spec)
            * f64::from(self.boss_debuff)) as f32
    }

    /// Seconds between activations at the effective fire rate.
    ///
    /// A non-positive fire rate yields an infinite cooldown.
    #[must_use]
    pub fn cooldown(&self) -> f32 {
        let rate = self.fire_rate();
        if rate > 0.0 {
            1.0 / rate
        } else {
            f32::INFINITY
        }
    }

    /// Effective splash radius, if the weapon splashes at all.
    #[must_use]
    pub fn splash_radius(&self) -> Option<f32> {
        let base = self.config.splash_radius.filter(|radius| *radius > 0.0)?;
        let synergy = self.synergy.map_or(1.0, |buffs| buffs.splash_radius_mult);
        let spec = self
            .spec
            .and_then(|spec| spec.splash_radius_mult)
            .unwrap_or(1.0);
        Some(base * synergy * spec)
    }

    /// Effective slow applied on hit, if any.
    #[must_use]
    pub fn slow(&self) -> Option<SlowEffect> {
        let base = self.config.slow?;
        let factor = self.spec.and_then(|spec| spec.slow_factor).unwrap_or(base.factor);
        let duration_mult = self
            .spec
            .and_then(|spec| spec.slow_duration_mult)
            .unwrap_or(1.0);
        Some(SlowEffect {
            factor,
            duration: base.duration * duration_mult,
        })
    }

    /// Effective damage-over-time applied on hit, synergy grants included.
    #[must_use]
    pub fn dot(&self) -> Option<DotEffect> {
        let base = self.config.dot.unwrap_or(DotEffect {
            amount_per_second: 0.0,
            duration: 0.0,
        });
        let buffs = self.synergy.copied().unwrap_or_default();

        let dot_mult = self.spec.and_then(|spec| spec.dot_mult).unwrap_or(1.0);
        let amount = base.amount_per_second * dot_mult + buffs.synergy_dot;
        if amount <= 0.0 {
            return None;
        }

        let spec_duration = self
            .spec
            .and_then(|spec| spec.dot_duration_mult)
            .unwrap_or(1.0);
        let duration = base.duration.max(buffs.synergy_dot_duration)
            * buffs.dot_duration_mult
            * spec_duration;
        if duration <= 0.0 {
            return None;
        }

        Some(DotEffect {
            amount_per_second: amount,
            duration,
        })
    }

    /// Total enemies struck per chain activation, if the weapon chains.
    #[must_use]
    pub fn chain_count(&self) -> Option<u32> {
        let base = self.config.chain_count?;
        let synergy = self.synergy.map_or(0, |buffs| buffs.extra_chain);
        let spec = self.spec.and_then(|spec| spec.extra_chain).unwrap_or(0);
        Some(base + synergy + spec)
    }

    /// Slow factor a synergy applies to every chain link, if any.
    #[must_use]
    pub fn chain_slow_factor(&self) -> Option<f32> {
        self.synergy.and_then(|buffs| buffs.extra_slow_factor)
    }
}
