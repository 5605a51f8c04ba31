#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative weapon state and per-tick combat orchestration for Rampart.
//!
//! The world owns every placed weapon together with the player's gold and
//! drives the pure combat systems once per tick. Enemies stay owned by the
//! caller and are only borrowed for the duration of [`World::tick`].

mod armory;
mod errors;
mod firing;

use std::collections::BTreeSet;

use rampart_core::{
    CellCoord, Command, Credit, Enemy, Notification, NotificationSink, SpecializationId,
    TargetingMode, WeaponConfig, WeaponId, WeaponKind, WeaponRecord, WeaponTable, MAX_LEVEL,
};
use rampart_system_projectiles::{ChainAttack, ProjectileSimulator};
use rampart_system_specialization::{Specialization, SpecializationRegistry};
use rampart_system_stats::{sell_value, upgrade_cost};
use rampart_system_synergy::{rule, SynergyEngine, SynergyMember, SynergyPass};
use rampart_system_targeting::TargetRanking;
use tracing::{debug, info};

use armory::{Armory, Enlistment};
use firing::{Arsenal, Shot};

pub use armory::BossDebuff;
pub use errors::{PlacementError, WeaponError};
pub use firing::EffectiveStats;

const DEFAULT_GRID_COLUMNS: u32 = 16;
const DEFAULT_GRID_ROWS: u32 = 12;
const DEFAULT_TILE_LENGTH: f32 = 1.0;

/// Describes the discrete tile layout weapons are placed on.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    tile_length: f32,
    path: BTreeSet<CellCoord>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_TILE_LENGTH)
    }
}

impl GridLayout {
    /// Creates a grid without any path cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
            path: BTreeSet::new(),
        }
    }

    /// Marks the provided cells as part of the enemy path.
    #[must_use]
    pub fn with_path(mut self, cells: impl IntoIterator<Item = CellCoord>) -> Self {
        self.path.extend(cells);
        self
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether enemies walk across `cell`.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.path.contains(&cell)
    }
}

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    table: WeaponTable,
    layout: GridLayout,
    gold: u32,
    armory: Armory,
    specializations: SpecializationRegistry,
    synergy: SynergyEngine,
    synergy_pass: SynergyPass,
    members: Vec<SynergyMember>,
    simulator: ProjectileSimulator,
    chain: ChainAttack,
    ranking: TargetRanking,
    picks: Vec<usize>,
    credits: Vec<Credit>,
    tick_index: u64,
}

impl World {
    /// Creates a world using `table` for weapon stats, starting with `gold`.
    #[must_use]
    pub fn new(table: WeaponTable, layout: GridLayout, gold: u32) -> Self {
        Self {
            table,
            layout,
            gold,
            armory: Armory::new(),
            specializations: SpecializationRegistry::new(),
            synergy: SynergyEngine::new(),
            synergy_pass: SynergyPass::default(),
            members: Vec::new(),
            simulator: ProjectileSimulator::new(),
            chain: ChainAttack::new(),
            ranking: TargetRanking::new(),
            picks: Vec::new(),
            credits: Vec::new(),
            tick_index: 0,
        }
    }

    /// Adds gold earned elsewhere, such as kill bounties.
    pub fn earn(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Places a weapon of `kind` on `cell`, deducting its cost.
    pub fn place<S: NotificationSink>(
        &mut self,
        kind: WeaponKind,
        cell: CellCoord,
        sink: &mut S,
    ) -> Result<WeaponId, PlacementError> {
        let config = *self.validate_cell(kind, cell)?;
        if self.gold < config.cost {
            return Err(PlacementError::InsufficientGold {
                required: config.cost,
                available: self.gold,
            });
        }

        self.gold -= config.cost;
        let weapon = self.enlist(&config, cell, 1, config.cost, true);
        info!(
            weapon = weapon.get(),
            kind = kind.label(),
            column = cell.column(),
            row = cell.row(),
            "weapon placed"
        );
        sink.notify(Notification::WeaponPlaced { weapon, kind, cell });
        Ok(weapon)
    }

    /// Recreates a weapon from its persisted record without charging gold.
    pub fn restore<S: NotificationSink>(
        &mut self,
        record: WeaponRecord,
        sink: &mut S,
    ) -> Result<WeaponId, PlacementError> {
        let config = *self.validate_cell(record.kind, record.cell)?;
        let max_level = if config.path_trap { 1 } else { MAX_LEVEL };
        if record.level == 0 || record.level > max_level {
            return Err(PlacementError::InvalidLevel {
                kind: record.kind,
                level: record.level,
            });
        }

        let invested = (1..record.level).fold(config.cost, |total, level| {
            total.saturating_add(upgrade_cost(config.cost, level).unwrap_or(0))
        });
        let weapon = self.enlist(&config, record.cell, record.level, invested, false);

        if let Some(specialization) = record.specialization {
            if let Err(error) = self
                .specializations
                .apply(weapon, record.kind, record.level, specialization)
            {
                let _ = self.armory.discharge(weapon);
                return Err(error.into());
            }
        }

        info!(
            weapon = weapon.get(),
            kind = record.kind.label(),
            level = record.level,
            "weapon restored"
        );
        sink.notify(Notification::WeaponPlaced {
            weapon,
            kind: record.kind,
            cell: record.cell,
        });
        Ok(weapon)
    }

    /// Upgrades a tower to its next level, returning the level reached.
    pub fn upgrade<S: NotificationSink>(
        &mut self,
        weapon: WeaponId,
        sink: &mut S,
    ) -> Result<u8, WeaponError> {
        let state = self
            .armory
            .get_mut(weapon)
            .ok_or(WeaponError::UnknownWeapon(weapon))?;
        if state.path_trap {
            return Err(WeaponError::PathTrap(weapon));
        }

        let base_cost = self.table.get(state.kind).map_or(0, |config| config.cost);
        let cost = upgrade_cost(base_cost, state.level).ok_or(WeaponError::MaxLevel(weapon))?;
        if self.gold < cost {
            return Err(WeaponError::InsufficientGold {
                required: cost,
                available: self.gold,
            });
        }

        self.gold -= cost;
        state.level += 1;
        state.total_invested = state.total_invested.saturating_add(cost);

        info!(weapon = weapon.get(), level = state.level, cost, "weapon upgraded");
        sink.notify(Notification::WeaponUpgraded {
            weapon,
            kind: state.kind,
            level: state.level,
        });
        Ok(state.level)
    }

    /// Sells a weapon for half of the gold invested in it, returning the refund.
    pub fn sell<S: NotificationSink>(
        &mut self,
        weapon: WeaponId,
        sink: &mut S,
    ) -> Result<u32, WeaponError> {
        let state = self
            .armory
            .get(weapon)
            .ok_or(WeaponError::UnknownWeapon(weapon))?;
        let refund = sell_value(state.total_invested);
        self.remove(weapon, refund, sink);
        Ok(refund)
    }

    /// Removes the most recently placed weapon with a full refund.
    pub fn undo_placement<S: NotificationSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<u32, WeaponError> {
        let weapon = self
            .armory
            .last_placement()
            .ok_or(WeaponError::NothingToUndo)?;
        let refund = self
            .armory
            .get(weapon)
            .map_or(0, |state| state.total_invested);
        self.remove(weapon, refund, sink);
        Ok(refund)
    }

    /// Commits a maxed-out tower to a specialization.
    pub fn specialize<S: NotificationSink>(
        &mut self,
        weapon: WeaponId,
        specialization: SpecializationId,
        sink: &mut S,
    ) -> Result<&'static Specialization, WeaponError> {
        let state = self
            .armory
            .get(weapon)
            .ok_or(WeaponError::UnknownWeapon(weapon))?;
        let entry = self
            .specializations
            .apply(weapon, state.kind, state.level, specialization)?;

        info!(weapon = weapon.get(), specialization = entry.name, "weapon specialized");
        sink.notify(Notification::SpecializationChosen {
            weapon,
            specialization,
            name: entry.name,
        });
        Ok(entry)
    }

    /// Changes the targeting policy of a tower.
    pub fn set_targeting(
        &mut self,
        weapon: WeaponId,
        mode: TargetingMode,
    ) -> Result<(), WeaponError> {
        let state = self
            .armory
            .get_mut(weapon)
            .ok_or(WeaponError::UnknownWeapon(weapon))?;
        if state.path_trap {
            return Err(WeaponError::PathTrap(weapon));
        }
        state.targeting = mode;
        Ok(())
    }

    /// Reduces a weapon's fire rate to `factor` for `duration` seconds.
    ///
    /// A new debuff replaces any debuff still active on the weapon.
    pub fn apply_boss_debuff(
        &mut self,
        weapon: WeaponId,
        factor: f32,
        duration: f32,
    ) -> Result<(), WeaponError> {
        let valid = factor > 0.0 && factor <= 1.0 && duration > 0.0 && duration.is_finite();
        if !valid {
            return Err(WeaponError::InvalidDebuff { factor, duration });
        }

        let state = self
            .armory
            .get_mut(weapon)
            .ok_or(WeaponError::UnknownWeapon(weapon))?;
        state.boss_debuff = Some(BossDebuff {
            factor,
            remaining: duration,
        });
        debug!(weapon = weapon.get(), factor, duration, "boss debuff applied");
        Ok(())
    }

    /// Advances combat by `dt` seconds against the borrowed enemies.
    ///
    /// Synergies are refreshed first, then every ready weapon activates in
    /// identifier order, then projectiles and damage zones resolve. Credits
    /// are folded into the weapons last, followed by kill attribution for
    /// enemies that died without a credited hit.
    pub fn tick<E: Enemy, S: NotificationSink>(
        &mut self,
        enemies: &mut [E],
        dt: f32,
        sink: &mut S,
    ) {
        self.tick_index = self.tick_index.saturating_add(1);
        let sink: &mut dyn NotificationSink = sink;

        self.refresh_synergies(dt, &mut *sink);
        self.fire_weapons(&mut *enemies, dt, &mut *sink);
        self.simulator
            .advance(&mut *enemies, dt, &mut self.credits, &mut *sink);
        self.simulator.tick_zones(&mut *enemies, dt, &mut self.credits);
        self.fold_credits(&mut *sink);
        self.attribute_lingering_kills(enemies, sink);
    }

    fn validate_cell(
        &self,
        kind: WeaponKind,
        cell: CellCoord,
    ) -> Result<&WeaponConfig, PlacementError> {
        let config = self
            .table
            .get(kind)
            .ok_or(PlacementError::UnknownKind(kind))?;
        if !self.layout.contains(cell) {
            return Err(PlacementError::OutOfBounds(cell));
        }
        if let Some(weapon) = self.armory.occupant(cell) {
            return Err(PlacementError::Occupied { cell, weapon });
        }
        match (config.path_trap, self.layout.is_path(cell)) {
            (false, true) => Err(PlacementError::TowerOnPath(cell)),
            (true, false) => Err(PlacementError::TrapOffPath(cell)),
            _ => Ok(config),
        }
    }

    fn enlist(
        &mut self,
        config: &WeaponConfig,
        cell: CellCoord,
        level: u8,
        invested: u32,
        undoable: bool,
    ) -> WeaponId {
        self.armory.enlist(Enlistment {
            kind: config.kind,
            cell,
            position: cell.center(self.layout.tile_length),
            path_trap: config.path_trap,
            level,
            total_invested: invested,
            undoable,
        })
    }

    fn remove<S: NotificationSink + ?Sized>(
        &mut self,
        weapon: WeaponId,
        refund: u32,
        sink: &mut S,
    ) {
        let Some(state) = self.armory.discharge(weapon) else {
            return;
        };
        let _ = self.specializations.remove(weapon);
        self.gold = self.gold.saturating_add(refund);

        info!(weapon = weapon.get(), kind = state.kind.label(), refund, "weapon removed");
        sink.notify(Notification::WeaponRemoved {
            weapon,
            kind: state.kind,
            refund,
        });
    }

    fn refresh_synergies(&mut self, dt: f32, sink: &mut dyn NotificationSink) {
        self.members.clear();
        self.members.extend(self.armory.iter().map(|weapon| SynergyMember {
            weapon: weapon.id,
            kind: weapon.kind,
            cell: weapon.cell,
            position: weapon.position,
        }));

        if !self.synergy.update(dt, &self.members, &mut self.synergy_pass) {
            return;
        }

        for weapon in self.armory.iter_mut() {
            weapon.synergy_buffs = self.synergy_pass.buffs.get(&weapon.id).copied();
        }

        for synergy in &self.synergy_pass.formed {
            let name = rule(*synergy).map_or("", |rule| rule.name);
            info!(synergy = name, "synergy formed");
            sink.notify(Notification::SynergyFormed {
                synergy: *synergy,
                name,
            });
        }
    }

    fn fire_weapons<E: Enemy>(
        &mut self,
        enemies: &mut [E],
        dt: f32,
        sink: &mut dyn NotificationSink,
    ) {
        let mut arsenal = Arsenal {
            simulator: &mut self.simulator,
            chain: &mut self.chain,
            ranking: &mut self.ranking,
            picks: &mut self.picks,
            credits: &mut self.credits,
        };

        for weapon in self.armory.iter_mut() {
            weapon.advance_timers(dt);
            if weapon.cooldown_remaining > 0.0 {
                continue;
            }

            let Some(config) = self.table.get(weapon.kind) else {
                continue;
            };
            let spec = self.specializations.modifiers(weapon.id);
            let stats = EffectiveStats::compose(config, weapon, spec);
            let shot = Shot {
                weapon: weapon.id,
                kind: weapon.kind,
                origin: weapon.position,
                targeting: weapon.targeting,
                stats,
            };

            let fire = firing::strategy_for::<E>(weapon.kind);
            if fire(&shot, &mut arsenal, enemies, &mut *sink) {
                weapon.cooldown_remaining = stats.cooldown;
            }
        }
    }

    fn fold_credits(&mut self, sink: &mut dyn NotificationSink) {
        for credit in self.credits.drain(..) {
            match credit {
                Credit::Damage { weapon, amount } => {
                    if let Some(state) = self.armory.get_mut(weapon) {
                        state.total_damage_dealt += amount;
                    }
                }
                Credit::Kill { weapon, enemy } => {
                    if let Some(state) = self.armory.get_mut(weapon) {
                        state.kills += 1;
                    }
                    sink.notify(Notification::EnemyKilled { enemy, weapon });
                }
            }
        }
    }

    fn attribute_lingering_kills<E: Enemy>(
        &mut self,
        enemies: &mut [E],
        sink: &mut dyn NotificationSink,
    ) {
        for enemy in enemies.iter_mut() {
            if enemy.is_alive() || enemy.kill_attributed() {
                continue;
            }
            let Some(weapon) = enemy.last_damaged_by() else {
                continue;
            };
            enemy.mark_kill_attributed();
            self.credits.push(Credit::Kill {
                weapon,
                enemy: enemy.id(),
            });
        }
        self.fold_credits(sink);
    }
}

/// Applies the provided command to the world.
///
/// Rejected commands leave the world untouched and are logged at debug level.
pub fn apply<S: NotificationSink>(world: &mut World, command: Command, sink: &mut S) {
    let outcome = match command {
        Command::Place { kind, cell } => world
            .place(kind, cell, sink)
            .map(drop)
            .map_err(|error| error.to_string()),
        Command::Upgrade { weapon } => world
            .upgrade(weapon, sink)
            .map(drop)
            .map_err(|error| error.to_string()),
        Command::Sell { weapon } => world
            .sell(weapon, sink)
            .map(drop)
            .map_err(|error| error.to_string()),
        Command::UndoPlacement => world
            .undo_placement(sink)
            .map(drop)
            .map_err(|error| error.to_string()),
        Command::Specialize {
            weapon,
            specialization,
        } => world
            .specialize(weapon, specialization, sink)
            .map(drop)
            .map_err(|error| error.to_string()),
        Command::SetTargeting { weapon, mode } => world
            .set_targeting(weapon, mode)
            .map_err(|error| error.to_string()),
        Command::BossDebuff {
            weapon,
            factor,
            duration,
        } => world
            .apply_boss_debuff(weapon, factor, duration)
            .map_err(|error| error.to_string()),
        Command::Restore { record } => world
            .restore(record, sink)
            .map(drop)
            .map_err(|error| error.to_string()),
    };

    if let Err(reason) = outcome {
        debug!(?command, %reason, "command rejected");
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{EffectiveStats, GridLayout, World};
    use rampart_core::{
        CellCoord, SpecializationId, SynergyBuffs, TargetingMode, WeaponId, WeaponKind,
        WeaponRecord, MAX_LEVEL,
    };
    use rampart_system_projectiles::{DamageZone, Projectile};
    use rampart_system_specialization::{options, Specialization};
    use rampart_system_stats::{sell_value, upgrade_cost};

    use crate::armory::{BossDebuff, Weapon};

    /// Gold available to the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Provides read-only access to the grid layout.
    #[must_use]
    pub fn layout(world: &World) -> &GridLayout {
        &world.layout
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of weapons currently placed.
    #[must_use]
    pub fn weapon_count(world: &World) -> usize {
        world.armory.len()
    }

    /// Weapon occupying `cell`, if any.
    #[must_use]
    pub fn occupant(world: &World, cell: CellCoord) -> Option<WeaponId> {
        world.armory.occupant(cell)
    }

    /// Captures a snapshot of a single weapon.
    #[must_use]
    pub fn weapon(world: &World, weapon: WeaponId) -> Option<WeaponSnapshot> {
        world
            .armory
            .get(weapon)
            .map(|state| WeaponSnapshot::capture(world, state))
    }

    /// Captures snapshots of every weapon in identifier order.
    #[must_use]
    pub fn weapons(world: &World) -> Vec<WeaponSnapshot> {
        world
            .armory
            .iter()
            .map(|state| WeaponSnapshot::capture(world, state))
            .collect()
    }

    /// Effective stats the weapon would fire with right now.
    #[must_use]
    pub fn effective_stats(world: &World, weapon: WeaponId) -> Option<EffectiveStats> {
        let state = world.armory.get(weapon)?;
        let config = world.table.get(state.kind)?;
        Some(EffectiveStats::compose(
            config,
            state,
            world.specializations.modifiers(weapon),
        ))
    }

    /// Reports whether the weapon may be upgraded, ignoring gold.
    #[must_use]
    pub fn can_upgrade(world: &World, weapon: WeaponId) -> bool {
        world
            .armory
            .get(weapon)
            .is_some_and(|state| !state.path_trap && state.level < MAX_LEVEL)
    }

    /// Gold required for the weapon's next upgrade.
    #[must_use]
    pub fn upgrade_price(world: &World, weapon: WeaponId) -> Option<u32> {
        let state = world.armory.get(weapon)?;
        if state.path_trap {
            return None;
        }
        let config = world.table.get(state.kind)?;
        upgrade_cost(config.cost, state.level)
    }

    /// Gold refunded if the weapon were sold now.
    #[must_use]
    pub fn sell_price(world: &World, weapon: WeaponId) -> Option<u32> {
        world
            .armory
            .get(weapon)
            .map(|state| sell_value(state.total_invested))
    }

    /// Reports whether the weapon may commit to a specialization now.
    #[must_use]
    pub fn can_specialize(world: &World, weapon: WeaponId) -> bool {
        world.armory.get(weapon).is_some_and(|state| {
            world
                .specializations
                .can_specialize(weapon, state.kind, state.level)
        })
    }

    /// Specializations offered to the weapon's kind.
    #[must_use]
    pub fn specialization_options(world: &World, weapon: WeaponId) -> Vec<&'static Specialization> {
        world
            .armory
            .get(weapon)
            .map(|state| options(state.kind).collect())
            .unwrap_or_default()
    }

    /// Persisted shape of every weapon in identifier order.
    #[must_use]
    pub fn records(world: &World) -> Vec<WeaponRecord> {
        world
            .armory
            .iter()
            .map(|state| WeaponRecord {
                kind: state.kind,
                cell: state.cell,
                level: state.level,
                specialization: world.specializations.chosen(state.id),
            })
            .collect()
    }

    /// Damage-per-second summary of every weapon in identifier order.
    #[must_use]
    pub fn dps_report(world: &World) -> Vec<DpsEntry> {
        world
            .armory
            .iter()
            .map(|state| DpsEntry {
                weapon: state.id,
                kind: state.kind,
                total_damage_dealt: state.total_damage_dealt,
                active_time: state.active_time,
                dps: dps(state.total_damage_dealt, state.active_time),
            })
            .collect()
    }

    /// Number of synergy pairs active after the latest recalculation.
    #[must_use]
    pub fn active_synergy_pairs(world: &World) -> usize {
        world.synergy.active_pair_count()
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        world.simulator.projectiles()
    }

    /// Damage zones currently burning.
    #[must_use]
    pub fn damage_zones(world: &World) -> &[DamageZone] {
        world.simulator.zones()
    }

    /// Immutable representation of a single weapon's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct WeaponSnapshot {
        /// Identifier allocated to the weapon.
        pub id: WeaponId,
        /// Kind of the weapon.
        pub kind: WeaponKind,
        /// Cell occupied by the weapon.
        pub cell: CellCoord,
        /// Upgrade level reached.
        pub level: u8,
        /// Gold spent on placement and upgrades.
        pub total_invested: u32,
        /// Targeting policy in use.
        pub targeting: TargetingMode,
        /// Kills credited to the weapon.
        pub kills: u32,
        /// Damage credited to the weapon.
        pub total_damage_dealt: f32,
        /// Seconds the weapon spent in combat.
        pub active_time: f32,
        /// Seconds until the weapon may activate again.
        pub cooldown_remaining: f32,
        /// Buffs granted by the latest synergy pass.
        pub synergy_buffs: Option<SynergyBuffs>,
        /// Specialization committed to, if any.
        pub specialization: Option<SpecializationId>,
        /// Boss debuff currently active, if any.
        pub boss_debuff: Option<BossDebuff>,
    }

    impl WeaponSnapshot {
        fn capture(world: &World, state: &Weapon) -> Self {
            Self {
                id: state.id,
                kind: state.kind,
                cell: state.cell,
                level: state.level,
                total_invested: state.total_invested,
                targeting: state.targeting,
                kills: state.kills,
                total_damage_dealt: state.total_damage_dealt,
                active_time: state.active_time,
                cooldown_remaining: state.cooldown_remaining,
                synergy_buffs: state.synergy_buffs,
                specialization: world.specializations.chosen(state.id),
                boss_debuff: state.boss_debuff,
            }
        }

        /// Average damage per second since the weapon was placed.
        #[must_use]
        pub fn dps(&self) -> f32 {
            dps(self.total_damage_dealt, self.active_time)
        }
    }

    /// Damage-per-second summary of a single weapon.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct DpsEntry {
        /// Weapon described by the entry.
        pub weapon: WeaponId,
        /// Kind of the weapon.
        pub kind: WeaponKind,
        /// Damage credited to the weapon.
        pub total_damage_dealt: f32,
        /// Seconds the weapon spent in combat.
        pub active_time: f32,
        /// Average damage per second.
        pub dps: f32,
    }

    fn dps(total_damage_dealt: f32, active_time: f32) -> f32 {
        if active_time > 0.0 {
            total_damage_dealt / active_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, GridLayout, PlacementError, WeaponError, World};
    use rampart_core::{CellCoord, Command, Notification, WeaponKind, WeaponTable};

    fn world(gold: u32) -> World {
        let layout = GridLayout::new(8, 4, 1.0)
            .with_path((0..8).map(|column| CellCoord::new(column, 2)));
        World::new(WeaponTable::standard(), layout, gold)
    }

    #[test]
    fn placement_deducts_cost_and_notifies() {
        let mut world = world(200);
        let mut sink = Vec::new();

        let weapon = world
            .place(WeaponKind::Arrow, CellCoord::new(1, 1), &mut sink)
            .expect("placement");

        assert_eq!(query::gold(&world), 150);
        assert_eq!(query::occupant(&world, CellCoord::new(1, 1)), Some(weapon));
        assert_eq!(
            sink,
            vec![Notification::WeaponPlaced {
                weapon,
                kind: WeaponKind::Arrow,
                cell: CellCoord::new(1, 1),
            }],
        );
    }

    #[test]
    fn placement_rejections_leave_state_untouched() {
        let mut world = world(100);
        let mut sink = Vec::new();
        let arrow = world
            .place(WeaponKind::Arrow, CellCoord::new(0, 0), &mut sink)
            .expect("placement");

        assert_eq!(
            world.place(WeaponKind::Arrow, CellCoord::new(0, 0), &mut sink),
            Err(PlacementError::Occupied {
                cell: CellCoord::new(0, 0),
                weapon: arrow,
            }),
        );
        assert_eq!(
            world.place(WeaponKind::Arrow, CellCoord::new(8, 0), &mut sink),
            Err(PlacementError::OutOfBounds(CellCoord::new(8, 0))),
        );
        assert_eq!(
            world.place(WeaponKind::Arrow, CellCoord::new(3, 2), &mut sink),
            Err(PlacementError::TowerOnPath(CellCoord::new(3, 2))),
        );
        assert_eq!(
            world.place(WeaponKind::SpikeTrap, CellCoord::new(3, 1), &mut sink),
            Err(PlacementError::TrapOffPath(CellCoord::new(3, 1))),
        );
        assert_eq!(
            world.place(WeaponKind::Cannon, CellCoord::new(4, 0), &mut sink),
            Err(PlacementError::InsufficientGold {
                required: 100,
                available: 50,
            }),
        );
        assert_eq!(query::gold(&world), 50);
        assert_eq!(query::weapon_count(&world), 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn upgrades_stop_at_max_level() {
        let mut world = world(1_000);
        let mut sink = Vec::new();
        let weapon = world
            .place(WeaponKind::Arrow, CellCoord::new(0, 0), &mut sink)
            .expect("placement");

        assert_eq!(world.upgrade(weapon, &mut sink), Ok(2));
        assert_eq!(world.upgrade(weapon, &mut sink), Ok(3));
        assert_eq!(world.upgrade(weapon, &mut sink), Err(WeaponError::MaxLevel(weapon)));
        assert_eq!(query::gold(&world), 1_000 - 50 - 30 - 50);
        assert!(!query::can_upgrade(&world, weapon));
        assert!(query::can_specialize(&world, weapon));
    }

    #[test]
    fn traps_refuse_retargeting() {
        let mut world = world(100);
        let mut sink = Vec::new();
        let trap = world
            .place(WeaponKind::TarTrap, CellCoord::new(2, 2), &mut sink)
            .expect("placement");

        assert_eq!(
            world.set_targeting(trap, rampart_core::TargetingMode::Closest),
            Err(WeaponError::PathTrap(trap)),
        );
        assert!(query::specialization_options(&world, trap).is_empty());
    }

    #[test]
    fn rejected_commands_are_silent() {
        let mut world = world(10);
        let mut sink = Vec::new();

        apply(
            &mut world,
            Command::Place {
                kind: WeaponKind::Sniper,
                cell: CellCoord::new(0, 0),
            },
            &mut sink,
        );
        apply(&mut world, Command::UndoPlacement, &mut sink);

        assert!(sink.is_empty());
        assert_eq!(query::gold(&world), 10);
    }

    #[test]
    fn boss_debuff_validates_its_factor() {
        let mut world = world(100);
        let weapon = world
            .place(WeaponKind::Arrow, CellCoord::new(0, 0), &mut ())
            .expect("placement");

        assert!(matches!(
            world.apply_boss_debuff(weapon, 1.5, 2.0),
            Err(WeaponError::InvalidDebuff { .. })
        ));
        assert_eq!(world.apply_boss_debuff(weapon, 0.5, 2.0), Ok(()));

        let stats = query::effective_stats(&world, weapon).expect("stats");
        assert!((stats.fire_rate - 0.5).abs() < 1e-6);
    }
}
