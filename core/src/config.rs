//! Static weapon configuration table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DotEffect, SlowEffect, WeaponKind};

/// Base configuration of a single weapon kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Kind described by this entry.
    pub kind: WeaponKind,
    /// Gold required to place the weapon.
    pub cost: u32,
    /// Base damage per hit.
    pub damage: f32,
    /// Base range, or trigger radius for path traps.
    pub range: f32,
    /// Base activations per second.
    pub fire_rate: f32,
    /// Projectile travel speed in world units per second.
    #[serde(default)]
    pub projectile_speed: f32,
    /// Splash radius around each impact.
    #[serde(default)]
    pub splash_radius: Option<f32>,
    /// Slow applied on impact.
    #[serde(default)]
    pub slow: Option<SlowEffect>,
    /// Damage-over-time applied on impact.
    #[serde(default)]
    pub dot: Option<DotEffect>,
    /// Total enemies struck by a chain attack, primary included.
    #[serde(default)]
    pub chain_count: Option<u32>,
    /// Distinguishes path traps from towers.
    #[serde(default)]
    pub path_trap: bool,
}

/// Reasons a configuration table may be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse weapon table: {0}")]
    Parse(#[from] toml::de::Error),
    /// The same kind was configured twice.
    #[error("weapon kind `{}` is configured more than once", .0.label())]
    DuplicateKind(WeaponKind),
    /// A stat that must be strictly positive was not.
    #[error("weapon kind `{}` has non-positive {stat} ({value})", .kind.label())]
    NonPositiveStat {
        /// Kind carrying the invalid stat.
        kind: WeaponKind,
        /// Name of the invalid stat.
        stat: &'static str,
        /// Offending value.
        value: f32,
    },
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    #[serde(default, rename = "weapon")]
    weapons: Vec<WeaponConfig>,
}

/// Lookup table of weapon configurations keyed by kind.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponTable {
    entries: BTreeMap<WeaponKind, WeaponConfig>,
}

impl WeaponTable {
    /// Builds a table from individual entries, validating each one.
    pub fn from_entries(
        entries: impl IntoIterator<Item = WeaponConfig>,
    ) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();
        for entry in entries {
            validate(&entry)?;
            if table.insert(entry.kind, entry).is_some() {
                return Err(ConfigError::DuplicateKind(entry.kind));
            }
        }
        Ok(Self { entries: table })
    }

    /// Parses a table from a TOML document made of `[[weapon]]` entries.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let document: TableDocument = toml::from_str(contents)?;
        Self::from_entries(document.weapons)
    }

    /// Built-in table shipped with the game.
    #[must_use]
    pub fn standard() -> Self {
        let entries = standard_entries()
            .into_iter()
            .map(|entry| (entry.kind, entry))
            .collect();
        Self { entries }
    }

    /// Configuration of `kind`, if the table carries one.
    #[must_use]
    pub fn get(&self, kind: WeaponKind) -> Option<&WeaponConfig> {
        self.entries.get(&kind)
    }

    /// Iterator over all entries ordered by kind.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponConfig> {
        self.entries.values()
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate(entry: &WeaponConfig) -> Result<(), ConfigError> {
    let positive = [("range", entry.range), ("fire_rate", entry.fire_rate)];
    for (stat, value) in positive {
        if value <= 0.0 || !value.is_finite() {
            return Err(ConfigError::NonPositiveStat {
                kind: entry.kind,
                stat,
                value,
            });
        }
    }
    Ok(())
}

fn tower(kind: WeaponKind, cost: u32, damage: f32, range: f32, fire_rate: f32) -> WeaponConfig {
    WeaponConfig {
        kind,
        cost,
        damage,
        range,
        fire_rate,
        projectile_speed: 0.0,
        splash_radius: None,
        slow: None,
        dot: None,
        chain_count: None,
        path_trap: false,
    }
}

fn standard_entries() -> Vec<WeaponConfig> {
    vec![
        WeaponConfig {
            projectile_speed: 15.0,
            ..tower(WeaponKind::Arrow, 50, 10.0, 5.0, 1.0)
        },
        WeaponConfig {
            projectile_speed: 10.0,
            splash_radius: Some(2.0),
            ..tower(WeaponKind::Cannon, 100, 25.0, 6.0, 0.5)
        },
        WeaponConfig {
            projectile_speed: 12.0,
            slow: Some(SlowEffect {
                factor: 0.5,
                duration: 2.0,
            }),
            ..tower(WeaponKind::Frost, 80, 5.0, 5.5, 0.8)
        },
        WeaponConfig {
            projectile_speed: 12.0,
            dot: Some(DotEffect {
                amount_per_second: 6.0,
                duration: 4.0,
            }),
            ..tower(WeaponKind::Poison, 90, 4.0, 5.0, 0.9)
        },
        WeaponConfig {
            projectile_speed: 14.0,
            dot: Some(DotEffect {
                amount_per_second: 8.0,
                duration: 2.0,
            }),
            ..tower(WeaponKind::Flame, 110, 6.0, 3.5, 2.0)
        },
        WeaponConfig {
            chain_count: Some(3),
            ..tower(WeaponKind::Tesla, 150, 15.0, 4.5, 0.7)
        },
        WeaponConfig {
            projectile_speed: 40.0,
            ..tower(WeaponKind::Sniper, 175, 60.0, 12.0, 0.3)
        },
        WeaponConfig {
            path_trap: true,
            ..tower(WeaponKind::SpikeTrap, 40, 15.0, 1.0, 0.8)
        },
        WeaponConfig {
            path_trap: true,
            slow: Some(SlowEffect {
                factor: 0.4,
                duration: 1.5,
            }),
            ..tower(WeaponKind::TarTrap, 35, 0.0, 1.2, 1.0)
        },
        WeaponConfig {
            path_trap: true,
            dot: Some(DotEffect {
                amount_per_second: 10.0,
                duration: 3.0,
            }),
            ..tower(WeaponKind::FireTrap, 60, 4.0, 1.0, 0.5)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, WeaponTable};
    use crate::WeaponKind;

    #[test]
    fn standard_table_covers_every_kind() {
        let table = WeaponTable::standard();
        for kind in WeaponKind::ALL {
            assert!(table.get(kind).is_some(), "missing {kind:?}");
        }
    }

    #[test]
    fn only_traps_are_flagged_as_path_traps() {
        let table = WeaponTable::standard();
        let traps: Vec<_> = table
            .iter()
            .filter(|entry| entry.path_trap)
            .map(|entry| entry.kind)
            .collect();
        assert_eq!(
            traps,
            vec![WeaponKind::SpikeTrap, WeaponKind::TarTrap, WeaponKind::FireTrap]
        );
    }

    #[test]
    fn parses_toml_document() {
        let table = WeaponTable::from_toml_str(
            r#"
            [[weapon]]
            kind = "arrow"
            cost = 60
            damage = 12.0
            range = 5.5
            fire_rate = 1.25
            projectile_speed = 18.0

            [[weapon]]
            kind = "tar_trap"
            cost = 30
            damage = 0.0
            range = 1.0
            fire_rate = 1.0
            path_trap = true
            slow = { factor = 0.5, duration = 1.0 }
            "#,
        )
        .expect("valid table");

        let arrow = table.get(WeaponKind::Arrow).expect("arrow configured");
        assert_eq!(arrow.cost, 60);
        assert!(arrow.splash_radius.is_none());
        let tar = table.get(WeaponKind::TarTrap).expect("tar configured");
        assert!(tar.path_trap);
        assert!(table.get(WeaponKind::Cannon).is_none());
    }

    #[test]
    fn rejects_duplicate_kinds() {
        let document = r#"
            [[weapon]]
            kind = "arrow"
            cost = 50
            damage = 10.0
            range = 5.0
            fire_rate = 1.0

            [[weapon]]
            kind = "arrow"
            cost = 55
            damage = 11.0
            range = 5.0
            fire_rate = 1.0
        "#;
        let error = WeaponTable::from_toml_str(document).expect_err("duplicate kind");
        assert!(matches!(error, ConfigError::DuplicateKind(WeaponKind::Arrow)));
    }

    #[test]
    fn rejects_zero_fire_rate() {
        let document = r#"
            [[weapon]]
            kind = "sniper"
            cost = 50
            damage = 10.0
            range = 5.0
            fire_rate = 0.0
        "#;
        let error = WeaponTable::from_toml_str(document).expect_err("zero fire rate");
        assert!(matches!(
            error,
            ConfigError::NonPositiveStat {
                kind: WeaponKind::Sniper,
                stat: "fire_rate",
                ..
            }
        ));
    }
}
