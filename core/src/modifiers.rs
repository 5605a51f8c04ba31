//! Modifier bundles layered on top of a weapon's base configuration.

/// Bonuses granted to a weapon by every synergy it currently participates in.
///
/// Multipliers default to `1.0` and additive fields to zero so that an empty
/// bundle is neutral. A fresh bundle is built on every recalculation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynergyBuffs {
    /// Multiplier applied to damage.
    pub damage_mult: f32,
    /// Multiplier applied to fire rate.
    pub fire_rate_mult: f32,
    /// Multiplier applied to range.
    pub range_mult: f32,
    /// Multiplier applied to splash radius.
    pub splash_radius_mult: f32,
    /// Additional chain targets.
    pub extra_chain: u32,
    /// Damage per second of a synergy-granted damage-over-time effect.
    pub synergy_dot: f32,
    /// Duration of the synergy-granted damage-over-time effect.
    pub synergy_dot_duration: f32,
    /// Slow factor applied to every chain link, if granted.
    pub extra_slow_factor: Option<f32>,
    /// Multiplier applied to damage-over-time durations.
    pub dot_duration_mult: f32,
}

impl Default for SynergyBuffs {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl SynergyBuffs {
    /// Bundle that leaves every stat unchanged.
    pub const NEUTRAL: SynergyBuffs = SynergyBuffs {
        damage_mult: 1.0,
        fire_rate_mult: 1.0,
        range_mult: 1.0,
        splash_radius_mult: 1.0,
        extra_chain: 0,
        synergy_dot: 0.0,
        synergy_dot_duration: 0.0,
        extra_slow_factor: None,
        dot_duration_mult: 1.0,
    };

    /// Folds `other` into this bundle.
    ///
    /// Multipliers compose multiplicatively, chain targets and synergy damage
    /// add up, the longest synergy DoT duration wins and the strongest (lowest)
    /// slow factor wins.
    pub fn combine(&mut self, other: &SynergyBuffs) {
        self.damage_mult *= other.damage_mult;
        self.fire_rate_mult *= other.fire_rate_mult;
        self.range_mult *= other.range_mult;
        self.splash_radius_mult *= other.splash_radius_mult;
        self.extra_chain += other.extra_chain;
        self.synergy_dot += other.synergy_dot;
        self.synergy_dot_duration = self.synergy_dot_duration.max(other.synergy_dot_duration);
        self.extra_slow_factor = match (self.extra_slow_factor, other.extra_slow_factor) {
            (Some(current), Some(incoming)) => Some(current.min(incoming)),
            (current, incoming) => current.or(incoming),
        };
        self.dot_duration_mult *= other.dot_duration_mult;
    }
}

/// Behaviour variants a specialization may request from its weapon kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpecialBehavior {
    /// Fire additional projectiles at other eligible enemies.
    FanShot {
        /// Total projectiles per volley, primary included.
        projectiles: u32,
    },
    /// Direct hits remove a fraction of the target's current health on top of damage.
    Execute {
        /// Fraction of current health removed per hit.
        hp_fraction: f32,
    },
    /// Impacts leave a zone that damages every enemy standing in it.
    DamageZone {
        /// Damage per second inside the zone.
        damage_per_second: f32,
        /// Seconds the zone persists.
        duration: f32,
        /// Radius of the zone.
        radius: f32,
    },
    /// Damage-over-time spreads to enemies near the impact.
    Contagion {
        /// Spread radius around the impact.
        radius: f32,
    },
    /// Slows spread to enemies near the impact.
    AreaSlow {
        /// Spread radius around the impact.
        radius: f32,
    },
    /// Chain links deal full damage instead of the reduced link damage.
    ChainNoFalloff,
}

/// Immutable modifier bundle carried by a specialization.
///
/// Every field is optional; absent fields leave the corresponding stat alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpecModifiers {
    /// Multiplier applied to damage.
    pub damage_mult: Option<f32>,
    /// Multiplier applied to range.
    pub range_mult: Option<f32>,
    /// Multiplier applied to fire rate.
    pub fire_rate_mult: Option<f32>,
    /// Multiplier applied to splash radius.
    pub splash_radius_mult: Option<f32>,
    /// Replacement slow factor.
    pub slow_factor: Option<f32>,
    /// Multiplier applied to slow duration.
    pub slow_duration_mult: Option<f32>,
    /// Multiplier applied to damage-over-time amount.
    pub dot_mult: Option<f32>,
    /// Multiplier applied to damage-over-time duration.
    pub dot_duration_mult: Option<f32>,
    /// Additional chain targets.
    pub extra_chain: Option<u32>,
    /// Kind-specific behaviour requested by the specialization.
    pub special: Option<SpecialBehavior>,
}

impl SpecModifiers {
    /// Bundle without any modifier.
    pub const NONE: SpecModifiers = SpecModifiers {
        damage_mult: None,
        range_mult: None,
        fire_rate_mult: None,
        splash_radius_mult: None,
        slow_factor: None,
        slow_duration_mult: None,
        dot_mult: None,
        dot_duration_mult: None,
        extra_chain: None,
        special: None,
    };
}
