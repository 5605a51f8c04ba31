//! Authoritative weapon state and identifier allocation.

use std::collections::BTreeMap;

use rampart_core::{CellCoord, SynergyBuffs, TargetingMode, Vec2, WeaponId, WeaponKind};

/// Temporary fire rate reduction inflicted on a weapon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossDebuff {
    /// Fire rate multiplier while the debuff lasts.
    pub factor: f32,
    /// Seconds before the debuff wears off.
    pub remaining: f32,
}

/// Weapon stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Weapon {
    pub(crate) id: WeaponId,
    pub(crate) kind: WeaponKind,
    pub(crate) cell: CellCoord,
    pub(crate) position: Vec2,
    pub(crate) path_trap: bool,
    pub(crate) level: u8,
    pub(crate) total_invested: u32,
    pub(crate) targeting: TargetingMode,
    pub(crate) kills: u32,
    pub(crate) total_damage_dealt: f32,
    pub(crate) active_time: f32,
    pub(crate) cooldown_remaining: f32,
    pub(crate) synergy_buffs: Option<SynergyBuffs>,
    pub(crate) boss_debuff: Option<BossDebuff>,
}

impl Weapon {
    /// Fire rate multiplier currently imposed by a boss debuff.
    pub(crate) fn debuff_factor(&self) -> f32 {
        self.boss_debuff.map_or(1.0, |debuff| debuff.factor)
    }

    /// Counts the weapon's timers down by `dt` seconds.
    pub(crate) fn advance_timers(&mut self, dt: f32) {
        self.active_time += dt;
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);

        if let Some(debuff) = &mut self.boss_debuff {
            debuff.remaining -= dt;
            if debuff.remaining <= 0.0 {
                self.boss_debuff = None;
            }
        }
    }
}

/// Parameters of a weapon entering the armory.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Enlistment {
    pub(crate) kind: WeaponKind,
    pub(crate) cell: CellCoord,
    pub(crate) position: Vec2,
    pub(crate) path_trap: bool,
    pub(crate) level: u8,
    pub(crate) total_invested: u32,
    pub(crate) undoable: bool,
}

/// Registry that stores weapons and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct Armory {
    weapons: BTreeMap<WeaponId, Weapon>,
    occupied: BTreeMap<CellCoord, WeaponId>,
    placements: Vec<WeaponId>,
    next_weapon_id: WeaponId,
}

impl Armory {
    /// Creates an empty armory with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            weapons: BTreeMap::new(),
            occupied: BTreeMap::new(),
            placements: Vec::new(),
            next_weapon_id: WeaponId::new(0),
        }
    }

    /// Stores a new weapon and returns its identifier.
    pub(crate) fn enlist(&mut self, enlistment: Enlistment) -> WeaponId {
        let id = self.next_weapon_id;
        self.next_weapon_id = WeaponId::new(id.get().wrapping_add(1));

        let weapon = Weapon {
            id,
            kind: enlistment.kind,
            cell: enlistment.cell,
            position: enlistment.position,
            path_trap: enlistment.path_trap,
            level: enlistment.level,
            total_invested: enlistment.total_invested,
            targeting: TargetingMode::default(),
            kills: 0,
            total_damage_dealt: 0.0,
            active_time: 0.0,
            cooldown_remaining: 0.0,
            synergy_buffs: None,
            boss_debuff: None,
        };

        let _ = self.weapons.insert(id, weapon);
        let _ = self.occupied.insert(enlistment.cell, id);
        if enlistment.undoable {
            self.placements.push(id);
        }
        id
    }

    /// Removes a weapon and frees its cell.
    pub(crate) fn discharge(&mut self, id: WeaponId) -> Option<Weapon> {
        let weapon = self.weapons.remove(&id)?;
        let _ = self.occupied.remove(&weapon.cell);
        Some(weapon)
    }

    /// Weapon placed most recently that is still on the grid.
    pub(crate) fn last_placement(&mut self) -> Option<WeaponId> {
        while let Some(id) = self.placements.last().copied() {
            if self.weapons.contains_key(&id) {
                return Some(id);
            }
            let _ = self.placements.pop();
        }
        None
    }

    pub(crate) fn get(&self, id: WeaponId) -> Option<&Weapon> {
        self.weapons.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: WeaponId) -> Option<&mut Weapon> {
        self.weapons.get_mut(&id)
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<WeaponId> {
        self.occupied.get(&cell).copied()
    }

    /// Weapons in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Weapon> {
        self.weapons.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.weapons.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Armory, BossDebuff, Enlistment};
    use rampart_core::{CellCoord, Vec2, WeaponKind};

    fn enlistment(column: u32) -> Enlistment {
        Enlistment {
            kind: WeaponKind::Arrow,
            cell: CellCoord::new(column, 0),
            position: Vec2::new(column as f32 + 0.5, 0.5),
            path_trap: false,
            level: 1,
            total_invested: 50,
            undoable: true,
        }
    }

    #[test]
    fn identifiers_are_allocated_sequentially() {
        let mut armory = Armory::new();
        let first = armory.enlist(enlistment(0));
        let second = armory.enlist(enlistment(1));

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(armory.occupant(CellCoord::new(1, 0)), Some(second));
    }

    #[test]
    fn last_placement_skips_discharged_weapons() {
        let mut armory = Armory::new();
        let first = armory.enlist(enlistment(0));
        let second = armory.enlist(enlistment(1));

        assert!(armory.discharge(second).is_some());
        assert_eq!(armory.last_placement(), Some(first));
        assert!(armory.occupant(CellCoord::new(1, 0)).is_none());

        assert!(armory.discharge(first).is_some());
        assert_eq!(armory.last_placement(), None);
        assert_eq!(armory.len(), 0);
    }

    #[test]
    fn timers_count_down_and_debuff_expires() {
        let mut armory = Armory::new();
        let id = armory.enlist(enlistment(0));
        let weapon = armory.get_mut(id).expect("weapon");
        weapon.cooldown_remaining = 0.3;
        weapon.boss_debuff = Some(BossDebuff {
            factor: 0.5,
            remaining: 0.5,
        });

        weapon.advance_timers(0.4);
        assert_eq!(weapon.cooldown_remaining, 0.0);
        assert_eq!(weapon.debuff_factor(), 0.5);

        weapon.advance_timers(0.2);
        assert_eq!(weapon.debuff_factor(), 1.0);
        assert!((weapon.active_time - 0.6).abs() < 1e-6);
    }
}
