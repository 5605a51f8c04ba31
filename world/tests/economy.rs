use rampart_core::{
    CellCoord, Notification, SpecializationId, WeaponKind, WeaponRecord, WeaponTable,
};
use rampart_system_specialization::SpecializationError;
use rampart_world::{query, GridLayout, PlacementError, WeaponError, World};

const PATH_ROW: u32 = 2;

fn world(gold: u32) -> World {
    let layout = GridLayout::new(16, 5, 1.0)
        .with_path((0..16).map(|column| CellCoord::new(column, PATH_ROW)));
    World::new(WeaponTable::standard(), layout, gold)
}

#[test]
fn level_one_tower_upgrades_to_floored_damage() {
    let mut world = world(500);
    let mut sink = Vec::new();
    let arrow = world
        .place(WeaponKind::Arrow, CellCoord::new(3, 1), &mut sink)
        .expect("placement");

    let fresh = query::effective_stats(&world, arrow).expect("stats");
    assert_eq!(fresh.damage, 10.0);
    assert!((fresh.range - 5.0).abs() < 1e-6);
    assert!((fresh.fire_rate - 1.0).abs() < 1e-6);
    assert_eq!(query::upgrade_price(&world, arrow), Some(30));

    assert_eq!(world.upgrade(arrow, &mut sink), Ok(2));
    let upgraded = query::effective_stats(&world, arrow).expect("stats");
    assert_eq!(upgraded.damage, 13.0);
    assert_eq!(query::gold(&world), 500 - 50 - 30);
    assert_eq!(
        sink.last(),
        Some(&Notification::WeaponUpgraded {
            weapon: arrow,
            kind: WeaponKind::Arrow,
            level: 2,
        }),
    );
}

#[test]
fn selling_refunds_half_of_everything_invested() {
    let mut world = world(500);
    let mut sink = Vec::new();
    let cannon = world
        .place(WeaponKind::Cannon, CellCoord::new(4, 0), &mut sink)
        .expect("placement");
    let _ = world.upgrade(cannon, &mut sink).expect("upgrade");

    let cost = 100;
    let upgrade = 60;
    assert_eq!(query::sell_price(&world, cannon), Some((cost + upgrade) / 2));

    let refund = world.sell(cannon, &mut sink).expect("sell");
    assert_eq!(refund, 80);
    assert_eq!(query::gold(&world), 500 - cost - upgrade + 80);
    assert!(query::occupant(&world, CellCoord::new(4, 0)).is_none());
    assert_eq!(world.sell(cannon, &mut sink), Err(WeaponError::UnknownWeapon(cannon)));
}

#[test]
fn traps_reject_upgrades_regardless_of_gold() {
    let mut world = world(1_000_000);
    let mut sink = Vec::new();
    let trap = world
        .place(WeaponKind::SpikeTrap, CellCoord::new(5, PATH_ROW), &mut sink)
        .expect("placement");
    let gold = query::gold(&world);

    assert_eq!(world.upgrade(trap, &mut sink), Err(WeaponError::PathTrap(trap)));
    assert!(!query::can_upgrade(&world, trap));
    assert_eq!(query::upgrade_price(&world, trap), None);
    assert_eq!(query::gold(&world), gold);
    assert_eq!(query::weapon(&world, trap).map(|w| w.level), Some(1));
}

#[test]
fn undo_refunds_the_latest_placement_in_full() {
    let mut world = world(300);
    let mut sink = Vec::new();
    let arrow = world
        .place(WeaponKind::Arrow, CellCoord::new(0, 0), &mut sink)
        .expect("placement");
    let frost = world
        .place(WeaponKind::Frost, CellCoord::new(1, 0), &mut sink)
        .expect("placement");
    let _ = world.upgrade(frost, &mut sink).expect("upgrade");

    assert_eq!(world.undo_placement(&mut sink), Ok(80 + 48));
    assert!(query::weapon(&world, frost).is_none());
    assert_eq!(world.undo_placement(&mut sink), Ok(50));
    assert!(query::weapon(&world, arrow).is_none());
    assert_eq!(world.undo_placement(&mut sink), Err(WeaponError::NothingToUndo));
    assert_eq!(query::gold(&world), 300);
}

#[test]
fn specialization_requires_max_level_and_is_permanent() {
    let mut world = world(1_000);
    let mut sink = Vec::new();
    let sniper = world
        .place(WeaponKind::Sniper, CellCoord::new(6, 4), &mut sink)
        .expect("placement");

    assert_eq!(
        world.specialize(sniper, SpecializationId::Deadeye, &mut sink),
        Err(WeaponError::Specialization(SpecializationError::BelowMaxLevel { level: 1 })),
    );

    let _ = world.upgrade(sniper, &mut sink).expect("upgrade");
    let _ = world.upgrade(sniper, &mut sink).expect("upgrade");
    let before = query::effective_stats(&world, sniper).expect("stats");

    let entry = world
        .specialize(sniper, SpecializationId::Deadeye, &mut sink)
        .expect("specialize");
    assert_eq!(entry.id, SpecializationId::Deadeye);
    assert_eq!(
        sink.last(),
        Some(&Notification::SpecializationChosen {
            weapon: sniper,
            specialization: SpecializationId::Deadeye,
            name: "Deadeye",
        }),
    );

    let after = query::effective_stats(&world, sniper).expect("stats");
    assert!(after.damage > before.damage);
    assert!(after.range > before.range);

    assert_eq!(
        world.specialize(sniper, SpecializationId::Assassin, &mut sink),
        Err(WeaponError::Specialization(SpecializationError::AlreadySpecialized(
            SpecializationId::Deadeye
        ))),
    );
    assert!(!query::can_specialize(&world, sniper));
}

#[test]
fn records_restore_an_identical_layout() {
    let mut original = world(2_000);
    let mut sink = Vec::new();
    let tesla = original
        .place(WeaponKind::Tesla, CellCoord::new(2, 1), &mut sink)
        .expect("placement");
    let _ = original.upgrade(tesla, &mut sink).expect("upgrade");
    let _ = original.upgrade(tesla, &mut sink).expect("upgrade");
    let _ = original
        .specialize(tesla, SpecializationId::Superconductor, &mut sink)
        .expect("specialize");
    let _ = original
        .place(WeaponKind::TarTrap, CellCoord::new(3, PATH_ROW), &mut sink)
        .expect("placement");

    let records = query::records(&original);
    let mut restored = world(0);
    for record in &records {
        let _ = restored.restore(*record, &mut sink).expect("restore");
    }

    assert_eq!(query::records(&restored), records);
    assert_eq!(query::gold(&restored), 0);
    assert_eq!(
        query::weapons(&restored)[0].total_invested,
        query::weapons(&original)[0].total_invested,
    );
    assert_eq!(restored.undo_placement(&mut sink), Err(WeaponError::NothingToUndo));
}

#[test]
fn restoring_invalid_records_is_rejected() {
    let mut world = world(0);
    let mut sink = Vec::new();

    let trap = WeaponRecord {
        kind: WeaponKind::FireTrap,
        cell: CellCoord::new(0, PATH_ROW),
        level: 2,
        specialization: None,
    };
    assert_eq!(
        world.restore(trap, &mut sink),
        Err(PlacementError::InvalidLevel {
            kind: WeaponKind::FireTrap,
            level: 2,
        }),
    );

    let mismatched = WeaponRecord {
        kind: WeaponKind::Frost,
        cell: CellCoord::new(0, 0),
        level: 3,
        specialization: Some(SpecializationId::Venom),
    };
    assert_eq!(
        world.restore(mismatched, &mut sink),
        Err(PlacementError::Specialization(SpecializationError::WrongKind {
            id: SpecializationId::Venom,
            kind: WeaponKind::Frost,
        })),
    );
    assert_eq!(query::weapon_count(&world), 0);
    assert!(sink.is_empty());
}
