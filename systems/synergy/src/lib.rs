#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects synergy pairs between placed weapons.
//!
//! A synergy forms when two weapons of a rule's kinds sit within the rule's
//! maximum distance. Buffs are rebuilt from scratch on every pass and fully
//! replace the previous pass's buffs; callers must apply a pass before any
//! weapon fires in the same tick.

mod catalogue;

use std::collections::{BTreeMap, BTreeSet};

use rampart_core::{CellCoord, SynergyBuffs, SynergyId, Vec2, WeaponId, WeaponKind};
use tracing::debug;

pub use catalogue::{rule, standard_rules, SynergyRule};

/// Seconds between periodic recalculation passes.
pub const RECALCULATION_INTERVAL: f32 = 0.5;

/// Snapshot of a placed weapon considered for synergies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynergyMember {
    /// Identifier of the weapon.
    pub weapon: WeaponId,
    /// Kind of the weapon.
    pub kind: WeaponKind,
    /// Grid cell the weapon occupies.
    pub cell: CellCoord,
    /// World-space position of the weapon.
    pub position: Vec2,
}

/// Result of a recalculation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SynergyPass {
    /// Buffs for every participating weapon. Absent weapons have no buffs.
    pub buffs: BTreeMap<WeaponId, SynergyBuffs>,
    /// Synergies with at least one pair that was not active on the previous pass.
    pub formed: Vec<SynergyId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct PairKey {
    synergy: SynergyId,
    first: CellCoord,
    second: CellCoord,
}

impl PairKey {
    fn new(synergy: SynergyId, a: CellCoord, b: CellCoord) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            synergy,
            first,
            second,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    First,
    Second,
}

/// Synergy detection system that tracks which pairs were active last pass.
#[derive(Debug)]
pub struct SynergyEngine {
    rules: Vec<SynergyRule>,
    since_last_pass: f32,
    last_member_count: Option<usize>,
    active_pairs: BTreeSet<PairKey>,
    scratch_pairs: BTreeSet<PairKey>,
    scratch_roles: BTreeSet<(SynergyId, WeaponId, Role)>,
}

impl Default for SynergyEngine {
    fn default() -> Self {
        Self::with_rules(standard_rules().to_vec())
    }
}

impl SynergyEngine {
    /// Creates an engine using the standard synergy catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine using a custom rule set.
    #[must_use]
    fn with_rules(rules: Vec<SynergyRule>) -> Self {
        Self {
            rules,
            since_last_pass: 0.0,
            last_member_count: None,
            active_pairs: BTreeSet::new(),
            scratch_pairs: BTreeSet::new(),
            scratch_roles: BTreeSet::new(),
        }
    }

    /// Advances the recalculation timer and runs a pass when one is due.
    ///
    /// A pass is due when the number of members changed since the previous
    /// pass or when [`RECALCULATION_INTERVAL`] seconds elapsed. Returns `true`
    /// when `out` was overwritten with a fresh pass.
    pub fn update(&mut self, dt: f32, members: &[SynergyMember], out: &mut SynergyPass) -> bool {
        self.since_last_pass += dt;

        let count_changed = self.last_member_count != Some(members.len());
        if !count_changed && self.since_last_pass < RECALCULATION_INTERVAL {
            return false;
        }

        self.recalculate(members, out);
        true
    }

    /// Runs a recalculation pass immediately and resets the timer.
    pub fn recalculate(&mut self, members: &[SynergyMember], out: &mut SynergyPass) {
        self.since_last_pass = 0.0;
        self.last_member_count = Some(members.len());
        out.buffs.clear();
        out.formed.clear();
        self.scratch_pairs.clear();
        self.scratch_roles.clear();

        for rule in &self.rules {
            for (index, a) in members.iter().enumerate() {
                for b in &members[index + 1..] {
                    let Some((first, second)) = rule.assign_roles(a, b) else {
                        continue;
                    };

                    if first.position.distance(second.position) > rule.max_distance {
                        continue;
                    }

                    let key = PairKey::new(rule.id, first.cell, second.cell);
                    let _ = self.scratch_pairs.insert(key);

                    // A same-kind rule has a single role, so a weapon paired on
                    // both sides still takes its buffs once.
                    let (second_role, second_buffs) = if rule.first_kind == rule.second_kind {
                        (Role::First, &rule.first_buffs)
                    } else {
                        (Role::Second, &rule.second_buffs)
                    };

                    if self
                        .scratch_roles
                        .insert((rule.id, first.weapon, Role::First))
                    {
                        out.buffs
                            .entry(first.weapon)
                            .or_default()
                            .combine(&rule.first_buffs);
                    }
                    if self
                        .scratch_roles
                        .insert((rule.id, second.weapon, second_role))
                    {
                        out.buffs
                            .entry(second.weapon)
                            .or_default()
                            .combine(second_buffs);
                    }

                    if !self.active_pairs.contains(&key) && !out.formed.contains(&rule.id) {
                        out.formed.push(rule.id);
                    }
                }
            }
        }

        std::mem::swap(&mut self.active_pairs, &mut self.scratch_pairs);

        debug!(
            members = members.len(),
            active_pairs = self.active_pairs.len(),
            buffed = out.buffs.len(),
            formed = out.formed.len(),
            "synergy pass"
        );
    }

    /// Number of synergy pairs active after the latest pass.
    #[must_use]
    pub fn active_pair_count(&self) -> usize {
        self.active_pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{SynergyEngine, SynergyMember, SynergyPass, RECALCULATION_INTERVAL};
    use rampart_core::{CellCoord, SynergyId, Vec2, WeaponId, WeaponKind};

    fn member(id: u32, kind: WeaponKind, x: f32) -> SynergyMember {
        SynergyMember {
            weapon: WeaponId::new(id),
            kind,
            cell: CellCoord::new(id, 0),
            position: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn first_update_always_recalculates() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        assert!(engine.update(0.0, &[], &mut pass));
        assert!(pass.buffs.is_empty());
    }

    #[test]
    fn waits_for_interval_when_count_is_unchanged() {
        let mut engine = SynergyEngine::new();
        let members = [member(1, WeaponKind::Arrow, 0.0)];
        let mut pass = SynergyPass::default();

        assert!(engine.update(0.1, &members, &mut pass));
        assert!(!engine.update(0.2, &members, &mut pass));
        assert!(!engine.update(0.2, &members, &mut pass));
        assert!(engine.update(RECALCULATION_INTERVAL, &members, &mut pass));
    }

    #[test]
    fn count_change_triggers_immediate_pass() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let one = [member(1, WeaponKind::Sniper, 0.0)];
        let two = [member(1, WeaponKind::Sniper, 0.0), member(2, WeaponKind::Arrow, 3.0)];

        assert!(engine.update(0.0, &one, &mut pass));
        assert!(engine.update(0.01, &two, &mut pass));
        assert_eq!(pass.formed, vec![SynergyId::Overwatch]);
    }

    #[test]
    fn asymmetric_buffs_follow_roles() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [member(1, WeaponKind::Frost, 0.0), member(2, WeaponKind::Tesla, 4.0)];

        engine.recalculate(&members, &mut pass);

        let tesla = pass.buffs[&WeaponId::new(2)];
        assert_eq!(tesla.extra_chain, 2);
        assert!(tesla.extra_slow_factor.is_some());
        let frost = pass.buffs[&WeaponId::new(1)];
        assert_eq!(frost.extra_chain, 0);
        assert!(frost.fire_rate_mult > 1.0);
    }

    #[test]
    fn unrelated_kinds_receive_nothing() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [member(1, WeaponKind::Arrow, 0.0), member(2, WeaponKind::Frost, 1.0)];

        engine.recalculate(&members, &mut pass);

        assert!(pass.buffs.is_empty());
        assert!(pass.formed.is_empty());
    }

    #[test]
    fn same_kind_rules_pair_distinct_weapons() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [member(1, WeaponKind::Tesla, 0.0), member(2, WeaponKind::Tesla, 2.0)];

        engine.recalculate(&members, &mut pass);

        assert_eq!(pass.formed, vec![SynergyId::Resonance]);
        assert!(pass.buffs[&WeaponId::new(1)].fire_rate_mult > 1.0);
        assert!(pass.buffs[&WeaponId::new(2)].fire_rate_mult > 1.0);

        let lonely = [member(1, WeaponKind::Tesla, 0.0)];
        engine.recalculate(&lonely, &mut pass);
        assert!(pass.buffs.is_empty());
    }

    #[test]
    fn rule_applies_once_per_weapon_despite_several_partners() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [
            member(1, WeaponKind::Sniper, 0.0),
            member(2, WeaponKind::Arrow, 2.0),
            member(3, WeaponKind::Arrow, -2.0),
        ];

        engine.recalculate(&members, &mut pass);

        let single = [member(1, WeaponKind::Sniper, 0.0), member(2, WeaponKind::Arrow, 2.0)];
        let mut reference = SynergyPass::default();
        SynergyEngine::new().recalculate(&single, &mut reference);

        assert_eq!(pass.buffs[&WeaponId::new(1)], reference.buffs[&WeaponId::new(1)]);
        assert_eq!(pass.formed, vec![SynergyId::Overwatch]);
    }

    #[test]
    fn same_kind_rule_buffs_a_middle_weapon_once() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [
            member(1, WeaponKind::Tesla, 0.0),
            member(2, WeaponKind::Tesla, 4.0),
            member(3, WeaponKind::Tesla, 8.0),
        ];

        engine.recalculate(&members, &mut pass);

        for id in 1..=3 {
            let buffs = pass.buffs[&WeaponId::new(id)];
            assert!((buffs.damage_mult - 1.1).abs() < 1e-6, "tesla {id}: {buffs:?}");
            assert!((buffs.fire_rate_mult - 1.1).abs() < 1e-6, "tesla {id}: {buffs:?}");
        }
        assert_eq!(pass.formed, vec![SynergyId::Resonance]);
        assert_eq!(engine.active_pair_count(), 2);
    }

    #[test]
    fn formed_is_reported_once_while_pair_stays_active() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let members = [member(1, WeaponKind::Cannon, 0.0), member(2, WeaponKind::Flame, 5.0)];

        engine.recalculate(&members, &mut pass);
        assert_eq!(pass.formed, vec![SynergyId::Incendiary]);

        engine.recalculate(&members, &mut pass);
        assert!(pass.formed.is_empty());
        assert_eq!(engine.active_pair_count(), 1);
    }

    #[test]
    fn broken_pair_notifies_again_when_it_reforms() {
        let mut engine = SynergyEngine::new();
        let mut pass = SynergyPass::default();
        let near = [member(1, WeaponKind::Cannon, 0.0), member(2, WeaponKind::Flame, 5.0)];
        let far = [member(1, WeaponKind::Cannon, 0.0), member(2, WeaponKind::Flame, 50.0)];

        engine.recalculate(&near, &mut pass);
        engine.recalculate(&far, &mut pass);
        assert!(pass.buffs.is_empty());
        assert_eq!(engine.active_pair_count(), 0);

        engine.recalculate(&near, &mut pass);
        assert_eq!(pass.formed, vec![SynergyId::Incendiary]);
    }
}
