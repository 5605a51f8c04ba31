//! Standard catalogue of synergy rules.

use rampart_core::{SynergyBuffs, SynergyId, WeaponKind};

use crate::SynergyMember;

/// Pairing rule between two weapon kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynergyRule {
    /// Identifier of the synergy.
    pub id: SynergyId,
    /// Display name of the synergy.
    pub name: &'static str,
    /// Kind that takes the first role.
    pub first_kind: WeaponKind,
    /// Kind that takes the second role.
    pub second_kind: WeaponKind,
    /// Largest centre-to-centre distance at which the pair qualifies.
    pub max_distance: f32,
    /// Buffs granted to the member in the first role.
    pub first_buffs: SynergyBuffs,
    /// Buffs granted to the member in the second role.
    pub second_buffs: SynergyBuffs,
}

impl SynergyRule {
    /// Orders `a` and `b` into (first, second) roles when their kinds match the rule.
    #[must_use]
    pub fn assign_roles<'m>(
        &self,
        a: &'m SynergyMember,
        b: &'m SynergyMember,
    ) -> Option<(&'m SynergyMember, &'m SynergyMember)> {
        if a.kind == self.first_kind && b.kind == self.second_kind {
            Some((a, b))
        } else if b.kind == self.first_kind && a.kind == self.second_kind {
            Some((b, a))
        } else {
            None
        }
    }
}

static STANDARD_RULES: [SynergyRule; 7] = [
    SynergyRule {
        id: SynergyId::Shatter,
        name: "Shatter",
        first_kind: WeaponKind::Cannon,
        second_kind: WeaponKind::Frost,
        max_distance: 10.0,
        first_buffs: SynergyBuffs {
            damage_mult: 1.2,
            splash_radius_mult: 1.25,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            range_mult: 1.1,
            ..SynergyBuffs::NEUTRAL
        },
    },
    SynergyRule {
        id: SynergyId::StormConduit,
        name: "Storm Conduit",
        first_kind: WeaponKind::Tesla,
        second_kind: WeaponKind::Frost,
        max_distance: 8.0,
        first_buffs: SynergyBuffs {
            extra_chain: 2,
            extra_slow_factor: Some(0.7),
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            fire_rate_mult: 1.1,
            ..SynergyBuffs::NEUTRAL
        },
    },
    SynergyRule {
        id: SynergyId::Wildfire,
        name: "Wildfire",
        first_kind: WeaponKind::Flame,
        second_kind: WeaponKind::Poison,
        max_distance: 8.0,
        first_buffs: SynergyBuffs {
            damage_mult: 1.15,
            dot_duration_mult: 1.5,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            dot_duration_mult: 1.5,
            ..SynergyBuffs::NEUTRAL
        },
    },
    SynergyRule {
        id: SynergyId::Overwatch,
        name: "Overwatch",
        first_kind: WeaponKind::Sniper,
        second_kind: WeaponKind::Arrow,
        max_distance: 10.0,
        first_buffs: SynergyBuffs {
            fire_rate_mult: 1.15,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            range_mult: 1.2,
            ..SynergyBuffs::NEUTRAL
        },
    },
    SynergyRule {
        id: SynergyId::Incendiary,
        name: "Incendiary Shells",
        first_kind: WeaponKind::Cannon,
        second_kind: WeaponKind::Flame,
        max_distance: 8.0,
        first_buffs: SynergyBuffs {
            synergy_dot: 5.0,
            synergy_dot_duration: 3.0,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs::NEUTRAL,
    },
    SynergyRule {
        id: SynergyId::ToxicTar,
        name: "Toxic Tar",
        first_kind: WeaponKind::Poison,
        second_kind: WeaponKind::TarTrap,
        max_distance: 6.0,
        first_buffs: SynergyBuffs {
            damage_mult: 1.25,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            range_mult: 1.2,
            ..SynergyBuffs::NEUTRAL
        },
    },
    SynergyRule {
        id: SynergyId::Resonance,
        name: "Resonance",
        first_kind: WeaponKind::Tesla,
        second_kind: WeaponKind::Tesla,
        max_distance: 6.0,
        first_buffs: SynergyBuffs {
            damage_mult: 1.1,
            fire_rate_mult: 1.1,
            ..SynergyBuffs::NEUTRAL
        },
        second_buffs: SynergyBuffs {
            damage_mult: 1.1,
            fire_rate_mult: 1.1,
            ..SynergyBuffs::NEUTRAL
        },
    },
];

/// Rules shipped with the game.
#[must_use]
pub fn standard_rules() -> &'static [SynergyRule] {
    &STANDARD_RULES
}

/// Standard rule for `id`.
#[must_use]
pub fn rule(id: SynergyId) -> Option<&'static SynergyRule> {
    STANDARD_RULES.iter().find(|rule| rule.id == id)
}
