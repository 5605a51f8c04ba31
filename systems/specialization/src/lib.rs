#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Specialization catalogue and per-weapon bookkeeping.
//!
//! Every tower kind offers exactly two mutually exclusive specializations.
//! A tower may commit to one once it reaches the maximum level; the choice is
//! permanent until the weapon leaves the grid.

use std::collections::BTreeMap;

use rampart_core::{
    SpecModifiers, SpecialBehavior, SpecializationId, WeaponId, WeaponKind, MAX_LEVEL,
};
use thiserror::Error;

/// Named modifier bundle a tower can commit to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Specialization {
    /// Identifier of the specialization.
    pub id: SpecializationId,
    /// Kind of tower offering the specialization.
    pub kind: WeaponKind,
    /// Display name.
    pub name: &'static str,
    /// Short player-facing description.
    pub description: &'static str,
    /// Modifiers applied once chosen.
    pub modifiers: SpecModifiers,
}

static CATALOGUE: [Specialization; 14] = [
    Specialization {
        id: SpecializationId::Volley,
        kind: WeaponKind::Arrow,
        name: "Volley",
        description: "Looses three arrows at once at different enemies.",
        modifiers: SpecModifiers {
            damage_mult: Some(0.85),
            special: Some(SpecialBehavior::FanShot { projectiles: 3 }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Marksman,
        kind: WeaponKind::Arrow,
        name: "Marksman",
        description: "Heavier arrows with a longer reach.",
        modifiers: SpecModifiers {
            damage_mult: Some(1.5),
            range_mult: Some(1.2),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Bombard,
        kind: WeaponKind::Cannon,
        name: "Bombard",
        description: "Bigger shells with a wider blast.",
        modifiers: SpecModifiers {
            damage_mult: Some(1.2),
            splash_radius_mult: Some(1.6),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Firestorm,
        kind: WeaponKind::Cannon,
        name: "Firestorm",
        description: "Shells leave burning ground where they land.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::DamageZone {
                damage_per_second: 12.0,
                duration: 3.0,
                radius: 2.0,
            }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Permafrost,
        kind: WeaponKind::Frost,
        name: "Permafrost",
        description: "Deeper slows that last longer.",
        modifiers: SpecModifiers {
            slow_factor: Some(0.3),
            slow_duration_mult: Some(1.5),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Blizzard,
        kind: WeaponKind::Frost,
        name: "Blizzard",
        description: "Every hit chills enemies around the target.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::AreaSlow { radius: 2.5 }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Plague,
        kind: WeaponKind::Poison,
        name: "Plague",
        description: "Poison spreads to enemies near the target.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::Contagion { radius: 2.5 }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Venom,
        kind: WeaponKind::Poison,
        name: "Venom",
        description: "Twice as potent poison that lingers.",
        modifiers: SpecModifiers {
            dot_mult: Some(2.0),
            dot_duration_mult: Some(1.25),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Inferno,
        kind: WeaponKind::Flame,
        name: "Inferno",
        description: "Flames pool on the ground and keep burning.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::DamageZone {
                damage_per_second: 10.0,
                duration: 4.0,
                radius: 1.5,
            }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Blaze,
        kind: WeaponKind::Flame,
        name: "Blaze",
        description: "Fires half again as fast with hotter flames.",
        modifiers: SpecModifiers {
            fire_rate_mult: Some(1.5),
            dot_mult: Some(1.2),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Overload,
        kind: WeaponKind::Tesla,
        name: "Overload",
        description: "Arcs jump to two more enemies and hit harder.",
        modifiers: SpecModifiers {
            damage_mult: Some(1.2),
            extra_chain: Some(2),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Superconductor,
        kind: WeaponKind::Tesla,
        name: "Superconductor",
        description: "Arcs lose no strength as they jump.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::ChainNoFalloff),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Assassin,
        kind: WeaponKind::Sniper,
        name: "Assassin",
        description: "Each shot also strips a tenth of the target's health.",
        modifiers: SpecModifiers {
            special: Some(SpecialBehavior::Execute { hp_fraction: 0.1 }),
            ..SpecModifiers::NONE
        },
    },
    Specialization {
        id: SpecializationId::Deadeye,
        kind: WeaponKind::Sniper,
        name: "Deadeye",
        description: "Devastating shots from even further away.",
        modifiers: SpecModifiers {
            damage_mult: Some(1.75),
            range_mult: Some(1.25),
            ..SpecModifiers::NONE
        },
    },
];

/// Catalogue entry for `id`.
#[must_use]
pub fn specialization(id: SpecializationId) -> &'static Specialization {
    let index = match id {
        SpecializationId::Volley => 0,
        SpecializationId::Marksman => 1,
        SpecializationId::Bombard => 2,
        SpecializationId::Firestorm => 3,
        SpecializationId::Permafrost => 4,
        SpecializationId::Blizzard => 5,
        SpecializationId::Plague => 6,
        SpecializationId::Venom => 7,
        SpecializationId::Inferno => 8,
        SpecializationId::Blaze => 9,
        SpecializationId::Overload => 10,
        SpecializationId::Superconductor => 11,
        SpecializationId::Assassin => 12,
        SpecializationId::Deadeye => 13,
    };
    &CATALOGUE[index]
}

/// Specializations offered to `kind`; empty for path traps.
pub fn options(kind: WeaponKind) -> impl Iterator<Item = &'static Specialization> {
    CATALOGUE.iter().filter(move |entry| entry.kind == kind)
}

/// Reasons a specialization request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpecializationError {
    /// The weapon has not reached the maximum level.
    #[error("weapon is level {level}; specializing requires level {MAX_LEVEL}")]
    BelowMaxLevel {
        /// Current level of the weapon.
        level: u8,
    },
    /// The weapon already committed to a specialization.
    #[error("weapon already specialized as {0:?}")]
    AlreadySpecialized(SpecializationId),
    /// The weapon kind has no specializations.
    #[error("{} weapons cannot specialize", .0.label())]
    NoOptions(WeaponKind),
    /// The requested specialization belongs to another kind.
    #[error("{id:?} is not available to {} weapons", .kind.label())]
    WrongKind {
        /// Requested specialization.
        id: SpecializationId,
        /// Kind of the weapon.
        kind: WeaponKind,
    },
}

/// Bookkeeping of the specialization chosen by each weapon.
#[derive(Clone, Debug, Default)]
pub struct SpecializationRegistry {
    chosen: BTreeMap<WeaponId, SpecializationId>,
}

impl SpecializationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a weapon may commit to a specialization now.
    #[must_use]
    pub fn can_specialize(&self, weapon: WeaponId, kind: WeaponKind, level: u8) -> bool {
        level == MAX_LEVEL
            && !self.chosen.contains_key(&weapon)
            && options(kind).next().is_some()
    }

    /// Commits `weapon` to the specialization `id`.
    ///
    /// Rejected requests leave the registry unchanged.
    pub fn apply(
        &mut self,
        weapon: WeaponId,
        kind: WeaponKind,
        level: u8,
        id: SpecializationId,
    ) -> Result<&'static Specialization, SpecializationError> {
        if let Some(existing) = self.chosen.get(&weapon) {
            return Err(SpecializationError::AlreadySpecialized(*existing));
        }
        if options(kind).next().is_none() {
            return Err(SpecializationError::NoOptions(kind));
        }
        if level != MAX_LEVEL {
            return Err(SpecializationError::BelowMaxLevel { level });
        }

        let entry = specialization(id);
        if entry.kind != kind {
            return Err(SpecializationError::WrongKind { id, kind });
        }

        let _ = self.chosen.insert(weapon, id);
        Ok(entry)
    }

    /// Forgets the specialization of `weapon`, returning it if one was chosen.
    pub fn remove(&mut self, weapon: WeaponId) -> Option<SpecializationId> {
        self.chosen.remove(&weapon)
    }

    /// Specialization chosen by `weapon`, if any.
    #[must_use]
    pub fn chosen(&self, weapon: WeaponId) -> Option<SpecializationId> {
        self.chosen.get(&weapon).copied()
    }

    /// Modifiers of the specialization chosen by `weapon`, if any.
    #[must_use]
    pub fn modifiers(&self, weapon: WeaponId) -> Option<&'static SpecModifiers> {
        self.chosen(weapon).map(|id| &specialization(id).modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::{options, specialization, SpecializationError, SpecializationRegistry, CATALOGUE};
    use rampart_core::{SpecializationId, WeaponId, WeaponKind, WeaponTable};

    #[test]
    fn lookup_matches_catalogue_entries() {
        for entry in &CATALOGUE {
            assert_eq!(specialization(entry.id), entry);
        }
    }

    #[test]
    fn every_tower_has_exactly_two_options_and_traps_have_none() {
        let table = WeaponTable::standard();
        for config in table.iter() {
            let count = options(config.kind).count();
            if config.path_trap {
                assert_eq!(count, 0, "{:?}", config.kind);
            } else {
                assert_eq!(count, 2, "{:?}", config.kind);
            }
        }
    }

    #[test]
    fn eligibility_requires_max_level() {
        let registry = SpecializationRegistry::new();
        let weapon = WeaponId::new(1);

        assert!(!registry.can_specialize(weapon, WeaponKind::Arrow, 2));
        assert!(registry.can_specialize(weapon, WeaponKind::Arrow, 3));
        assert!(!registry.can_specialize(weapon, WeaponKind::SpikeTrap, 3));
    }

    #[test]
    fn apply_is_permanent_until_removed() {
        let mut registry = SpecializationRegistry::new();
        let weapon = WeaponId::new(4);

        let entry = registry
            .apply(weapon, WeaponKind::Sniper, 3, SpecializationId::Assassin)
            .expect("eligible");
        assert_eq!(entry.name, "Assassin");
        assert!(!registry.can_specialize(weapon, WeaponKind::Sniper, 3));

        let second = registry.apply(weapon, WeaponKind::Sniper, 3, SpecializationId::Deadeye);
        assert_eq!(
            second,
            Err(SpecializationError::AlreadySpecialized(SpecializationId::Assassin))
        );
        assert_eq!(registry.chosen(weapon), Some(SpecializationId::Assassin));

        assert_eq!(registry.remove(weapon), Some(SpecializationId::Assassin));
        assert!(registry.modifiers(weapon).is_none());
        assert!(registry.can_specialize(weapon, WeaponKind::Sniper, 3));
    }

    #[test]
    fn rejections_leave_registry_untouched() {
        let mut registry = SpecializationRegistry::new();
        let weapon = WeaponId::new(9);

        assert_eq!(
            registry.apply(weapon, WeaponKind::Cannon, 2, SpecializationId::Bombard),
            Err(SpecializationError::BelowMaxLevel { level: 2 })
        );
        assert_eq!(
            registry.apply(weapon, WeaponKind::TarTrap, 3, SpecializationId::Bombard),
            Err(SpecializationError::NoOptions(WeaponKind::TarTrap))
        );
        assert_eq!(
            registry.apply(weapon, WeaponKind::Cannon, 3, SpecializationId::Venom),
            Err(SpecializationError::WrongKind {
                id: SpecializationId::Venom,
                kind: WeaponKind::Cannon,
            })
        );
        assert!(registry.chosen(weapon).is_none());
    }
}
