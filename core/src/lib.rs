#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart combat engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure combat systems and the adapters. The world owns placed weapons and
//! drives each tick, the systems compute targets, effective stats, synergies
//! and projectile outcomes, and adapters observe the result exclusively
//! through [`Notification`] values delivered to a [`NotificationSink`].

mod config;
mod enemy;
mod modifiers;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, WeaponConfig, WeaponTable};
pub use enemy::{Enemy, PathEnemy};
pub use glam::Vec2;
pub use modifiers::{SpecModifiers, SpecialBehavior, SynergyBuffs};

/// Highest level a tower can be upgraded to.
pub const MAX_LEVEL: u8 = 3;

/// Unique identifier assigned to a placed weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(u32);

impl WeaponId {
    /// Creates a new weapon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the weapon identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy by the surrounding game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space position of the cell centre on the ground plane.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }
}

/// Types of weapons that can be placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Single-target tower with a quick fire rate.
    Arrow,
    /// Slow tower whose shells splash around the impact.
    Cannon,
    /// Tower whose shots slow their target.
    Frost,
    /// Tower whose shots poison their target.
    Poison,
    /// Short-range tower whose shots ignite their target.
    Flame,
    /// Tower that strikes instantly and chains between nearby enemies.
    Tesla,
    /// Long-range tower with heavy, infrequent shots.
    Sniper,
    /// Path trap that damages every enemy crossing it.
    SpikeTrap,
    /// Path trap that slows every enemy crossing it.
    TarTrap,
    /// Path trap that sets every enemy crossing it on fire.
    FireTrap,
}

impl WeaponKind {
    /// Every weapon kind in declaration order.
    pub const ALL: [WeaponKind; 10] = [
        WeaponKind::Arrow,
        WeaponKind::Cannon,
        WeaponKind::Frost,
        WeaponKind::Poison,
        WeaponKind::Flame,
        WeaponKind::Tesla,
        WeaponKind::Sniper,
        WeaponKind::SpikeTrap,
        WeaponKind::TarTrap,
        WeaponKind::FireTrap,
    ];

    /// Stable lowercase label used by configuration files and adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Cannon => "cannon",
            Self::Frost => "frost",
            Self::Poison => "poison",
            Self::Flame => "flame",
            Self::Tesla => "tesla",
            Self::Sniper => "sniper",
            Self::SpikeTrap => "spike_trap",
            Self::TarTrap => "tar_trap",
            Self::FireTrap => "fire_trap",
        }
    }

    /// Parses a label produced by [`WeaponKind::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Damage-over-time flavour inflicted by this kind's effects.
    #[must_use]
    pub const fn dot_kind(self) -> DotKind {
        match self {
            Self::Poison => DotKind::Poison,
            _ => DotKind::Fire,
        }
    }
}

/// Policy a tower uses to choose between eligible enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    /// Enemy furthest along its path.
    #[default]
    First,
    /// Enemy least far along its path.
    Last,
    /// Enemy with the most remaining hit points.
    Strongest,
    /// Enemy nearest to the tower.
    Closest,
}

impl TargetingMode {
    /// Every targeting mode in cycling order.
    pub const ALL: [TargetingMode; 4] = [
        TargetingMode::First,
        TargetingMode::Last,
        TargetingMode::Strongest,
        TargetingMode::Closest,
    ];

    /// Stable lowercase label for the mode.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Strongest => "strongest",
            Self::Closest => "closest",
        }
    }

    /// Parses a label produced by [`TargetingMode::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.label() == label)
    }

    /// Mode that follows this one when the player cycles through policies.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::First => Self::Last,
            Self::Last => Self::Strongest,
            Self::Strongest => Self::Closest,
            Self::Closest => Self::First,
        }
    }
}

/// Flavour of a damage-over-time effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotKind {
    /// Damage inflicted by the poison tower.
    Poison,
    /// Burning damage inflicted by every other source.
    Fire,
}

/// Slow applied to an enemy: movement speed is multiplied by `factor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    /// Multiplier applied to the enemy's speed while slowed.
    pub factor: f32,
    /// Seconds the slow remains active.
    pub duration: f32,
}

/// Damage-over-time applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotEffect {
    /// Damage dealt per second while active.
    pub amount_per_second: f32,
    /// Seconds the effect remains active.
    pub duration: f32,
}

/// Synergies that form between two weapon kinds placed near each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SynergyId {
    /// Frost and cannon: frozen targets shatter under cannon fire.
    Shatter,
    /// Tesla and frost: the cold conducts the arc further.
    StormConduit,
    /// Flame and poison: burns and toxins linger.
    Wildfire,
    /// Sniper and arrow: the sniper spots for the archers.
    Overwatch,
    /// Cannon and flame: shells ignite on impact.
    Incendiary,
    /// Poison tower and tar trap: toxins cling to tarred enemies.
    ToxicTar,
    /// Two tesla towers reinforcing each other.
    Resonance,
}

/// Specializations a maxed-out tower can commit to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecializationId {
    /// Arrow: fires a fan of arrows at several enemies.
    Volley,
    /// Arrow: heavier, longer-ranged single shots.
    Marksman,
    /// Cannon: larger, harder-hitting blasts.
    Bombard,
    /// Cannon: shells leave burning ground behind.
    Firestorm,
    /// Frost: deeper, longer slows.
    Permafrost,
    /// Frost: slows everything around the impact.
    Blizzard,
    /// Poison: poison spreads to nearby enemies.
    Plague,
    /// Poison: far stronger poison.
    Venom,
    /// Flame: impacts leave lingering flames.
    Inferno,
    /// Flame: much faster firing.
    Blaze,
    /// Tesla: longer, stronger chains.
    Overload,
    /// Tesla: chains lose no damage per hop.
    Superconductor,
    /// Sniper: shots also remove a fraction of the target's health.
    Assassin,
    /// Sniper: heavier, longer-ranged shots.
    Deadeye,
}

/// Persisted shape of a placed weapon owned by an external save subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRecord {
    /// Kind of weapon that was placed.
    pub kind: WeaponKind,
    /// Grid cell occupied by the weapon.
    pub cell: CellCoord,
    /// Upgrade level reached by the weapon.
    pub level: u8,
    /// Specialization committed to, if any.
    pub specialization: Option<SpecializationId>,
}

/// Descriptor handed to the rendering layer when a projectile is launched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Identifier allocated to the projectile.
    pub projectile: ProjectileId,
    /// Weapon that fired the projectile.
    pub source: WeaponId,
    /// Enemy the projectile homes in on.
    pub target: EnemyId,
    /// Launch position on the ground plane.
    pub origin: Vec2,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Effective damage carried by the projectile.
    pub damage: f32,
    /// Splash radius around the impact, if any.
    pub splash_radius: Option<f32>,
    /// Slow applied on impact, if any.
    pub slow: Option<SlowEffect>,
    /// Damage-over-time applied on impact, if any.
    pub dot: Option<DotEffect>,
}

/// Final outcome reported for a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOutcome {
    /// The projectile reached its target and its effects were resolved.
    Hit,
    /// The target died or vanished before impact; nothing was applied.
    Missed,
}

/// Notifications emitted synchronously by the engine to its collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// A weapon was placed on the grid.
    WeaponPlaced {
        /// Identifier allocated to the weapon.
        weapon: WeaponId,
        /// Kind of weapon that was placed.
        kind: WeaponKind,
        /// Cell the weapon occupies.
        cell: CellCoord,
    },
    /// A weapon reached a new upgrade level.
    WeaponUpgraded {
        /// Weapon that was upgraded.
        weapon: WeaponId,
        /// Kind of the upgraded weapon.
        kind: WeaponKind,
        /// Level reached after the upgrade.
        level: u8,
    },
    /// A weapon was sold or its placement undone.
    WeaponRemoved {
        /// Weapon that left the grid.
        weapon: WeaponId,
        /// Kind of the removed weapon.
        kind: WeaponKind,
        /// Gold returned to the player.
        refund: u32,
    },
    /// A tower committed to a specialization.
    SpecializationChosen {
        /// Weapon that specialized.
        weapon: WeaponId,
        /// Specialization that was applied.
        specialization: SpecializationId,
        /// Display name of the specialization.
        name: &'static str,
    },
    /// A synergy pair formed for the first time since it was last absent.
    SynergyFormed {
        /// Synergy that formed.
        synergy: SynergyId,
        /// Display name of the synergy.
        name: &'static str,
    },
    /// A projectile was launched.
    ProjectileSpawned(ProjectileSpawn),
    /// A projectile left the simulation.
    ProjectileResolved {
        /// Projectile that was removed.
        projectile: ProjectileId,
        /// Whether the projectile hit.
        outcome: ProjectileOutcome,
    },
    /// A chain attack struck the listed enemies in order.
    ChainFired {
        /// Weapon that produced the chain.
        weapon: WeaponId,
        /// Enemies hit, primary target first.
        links: Vec<EnemyId>,
    },
    /// An enemy death was credited to a weapon.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Weapon credited with the kill.
        weapon: WeaponId,
    },
}

/// Commands that mutate the authoritative world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Places a new weapon, deducting its cost.
    Place {
        /// Kind of weapon to place.
        kind: WeaponKind,
        /// Cell the weapon should occupy.
        cell: CellCoord,
    },
    /// Upgrades a tower to its next level.
    Upgrade {
        /// Weapon to upgrade.
        weapon: WeaponId,
    },
    /// Sells a weapon for half of the gold invested in it.
    Sell {
        /// Weapon to sell.
        weapon: WeaponId,
    },
    /// Removes the most recently placed weapon with a full refund.
    UndoPlacement,
    /// Commits a maxed-out tower to a specialization.
    Specialize {
        /// Weapon to specialize.
        weapon: WeaponId,
        /// Specialization to apply.
        specialization: SpecializationId,
    },
    /// Changes the targeting policy of a tower.
    SetTargeting {
        /// Weapon whose policy changes.
        weapon: WeaponId,
        /// Policy to use from now on.
        mode: TargetingMode,
    },
    /// Reduces a weapon's fire rate for a limited time.
    BossDebuff {
        /// Weapon affected by the debuff.
        weapon: WeaponId,
        /// Fire rate multiplier while the debuff lasts.
        factor: f32,
        /// Seconds the debuff lasts.
        duration: f32,
    },
    /// Recreates a weapon from its persisted record without charging gold.
    Restore {
        /// Record to restore.
        record: WeaponRecord,
    },
}

/// Receiver of engine notifications. Delivery is synchronous and unbuffered.
pub trait NotificationSink {
    /// Handles a single notification.
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl NotificationSink for () {
    fn notify(&mut self, _notification: Notification) {}
}

/// Damage and kill credit owed to a weapon after effects were resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Credit {
    /// Damage dealt by a direct, splash, chain or zone hit.
    Damage {
        /// Weapon responsible for the damage.
        weapon: WeaponId,
        /// Amount of damage applied.
        amount: f32,
    },
    /// Kill attributed to a weapon.
    Kill {
        /// Weapon credited with the kill.
        weapon: WeaponId,
        /// Enemy that died.
        enemy: EnemyId,
    },
}

/// Applies `amount` of damage from `source` to `enemy` and records the credit.
///
/// Dead enemies are ignored. When the hit transitions the enemy from alive to
/// dead and no weapon has been credited with it yet, a kill is recorded and
/// the enemy is marked so that it can never be credited twice.
pub fn strike<E: Enemy + ?Sized>(
    enemy: &mut E,
    source: WeaponId,
    amount: f32,
    credits: &mut Vec<Credit>,
) -> bool {
    if !enemy.is_alive() {
        return false;
    }

    enemy.take_damage(amount);
    enemy.set_last_damaged_by(source);
    credits.push(Credit::Damage {
        weapon: source,
        amount,
    });

    if !enemy.is_alive() && !enemy.kill_attributed() {
        enemy.mark_kill_attributed();
        credits.push(Credit::Kill {
            weapon: source,
            enemy: enemy.id(),
        });
    }

    true
}
