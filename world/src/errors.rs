//! Reasons world operations may be rejected.

use rampart_core::{CellCoord, WeaponId, WeaponKind};
use rampart_system_specialization::SpecializationError;
use thiserror::Error;

/// Reasons a placement or restoration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The weapon table has no entry for the kind.
    #[error("weapon kind `{}` is not configured", .0.label())]
    UnknownKind(WeaponKind),
    /// The cell lies outside the grid.
    #[error("cell ({}, {}) lies outside the grid", .0.column(), .0.row())]
    OutOfBounds(CellCoord),
    /// Another weapon already occupies the cell.
    #[error("cell ({}, {}) is occupied by weapon {}", .cell.column(), .cell.row(), .weapon.get())]
    Occupied {
        /// Requested cell.
        cell: CellCoord,
        /// Weapon occupying the cell.
        weapon: WeaponId,
    },
    /// Towers may not block the enemy path.
    #[error("towers cannot be placed on the path at ({}, {})", .0.column(), .0.row())]
    TowerOnPath(CellCoord),
    /// Traps only work on the enemy path.
    #[error("traps must be placed on the path, ({}, {}) is not", .0.column(), .0.row())]
    TrapOffPath(CellCoord),
    /// The player cannot afford the weapon.
    #[error("placing costs {required} gold but only {available} is available")]
    InsufficientGold {
        /// Gold required.
        required: u32,
        /// Gold available.
        available: u32,
    },
    /// A restored record carries a level the kind cannot reach.
    #[error("level {level} is not valid for `{}` weapons", .kind.label())]
    InvalidLevel {
        /// Kind of the record.
        kind: WeaponKind,
        /// Offending level.
        level: u8,
    },
    /// A restored record carries a specialization the weapon cannot take.
    #[error(transparent)]
    Specialization(#[from] SpecializationError),
}

/// Reasons an operation on a placed weapon may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WeaponError {
    /// No weapon carries the identifier.
    #[error("weapon {} does not exist", .0.get())]
    UnknownWeapon(WeaponId),
    /// Path traps cannot be upgraded or retargeted.
    #[error("weapon {} is a path trap", .0.get())]
    PathTrap(WeaponId),
    /// The tower is already at the maximum level.
    #[error("weapon {} is already at the maximum level", .0.get())]
    MaxLevel(WeaponId),
    /// The player cannot afford the upgrade.
    #[error("upgrading costs {required} gold but only {available} is available")]
    InsufficientGold {
        /// Gold required.
        required: u32,
        /// Gold available.
        available: u32,
    },
    /// No placement is left to undo.
    #[error("no placement to undo")]
    NothingToUndo,
    /// A debuff must reduce the fire rate for a positive duration.
    #[error("invalid boss debuff: factor {factor}, duration {duration}")]
    InvalidDebuff {
        /// Requested fire rate multiplier.
        factor: f32,
        /// Requested duration.
        duration: f32,
    },
    /// The specialization request was rejected.
    #[error(transparent)]
    Specialization(#[from] SpecializationError),
}
