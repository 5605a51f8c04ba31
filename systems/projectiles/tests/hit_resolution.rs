use rampart_core::{Credit, Enemy, EnemyId, Notification, PathEnemy, Vec2, WeaponId};
use rampart_system_projectiles::{
    resolve_impact, ChainAttack, ChainStrike, Payload, CHAIN_RADIUS, SPLASH_DAMAGE_FACTOR,
};

fn standing(id: u32, position: Vec2, hp: f32) -> PathEnemy {
    PathEnemy::new(EnemyId::new(id), hp, 1.0, position, Vec2::Y)
}

fn damage_to(credits: &[Credit], before: usize) -> f32 {
    credits[before..]
        .iter()
        .map(|credit| match credit {
            Credit::Damage { amount, .. } => *amount,
            Credit::Kill { .. } => 0.0,
        })
        .sum()
}

#[test]
fn splash_at_the_impact_deals_sixty_percent_and_vanishes_at_the_edge() {
    let damage = 25.0;
    let radius = 2.0;
    let mut enemies = vec![
        standing(1, Vec2::ZERO, 500.0),
        standing(2, Vec2::ZERO, 500.0),
        standing(3, Vec2::new(radius, 0.0), 500.0),
        standing(4, Vec2::new(0.0, radius - 1e-3), 500.0),
    ];
    let payload = Payload {
        splash_radius: Some(radius),
        ..Payload::damage(damage)
    };
    let mut credits = Vec::new();

    let _ = resolve_impact(&mut enemies, 0, Vec2::ZERO, WeaponId::new(1), &payload, &mut credits);

    assert!((enemies[0].hp() - (500.0 - damage)).abs() < 1e-4);
    assert!((enemies[1].hp() - (500.0 - damage * SPLASH_DAMAGE_FACTOR)).abs() < 1e-4);
    assert!((enemies[2].hp() - 500.0).abs() < f32::EPSILON);
    let near_edge = 500.0 - enemies[3].hp();
    assert!(near_edge > 0.0 && near_edge < 0.05, "{near_edge}");
}

#[test]
fn splash_kills_are_credited_once_per_enemy() {
    let mut enemies = vec![standing(1, Vec2::ZERO, 20.0), standing(2, Vec2::new(0.5, 0.0), 5.0)];
    let payload = Payload {
        splash_radius: Some(2.0),
        ..Payload::damage(25.0)
    };
    let mut credits = Vec::new();

    let _ = resolve_impact(&mut enemies, 0, Vec2::ZERO, WeaponId::new(7), &payload, &mut credits);
    let _ = resolve_impact(&mut enemies, 0, Vec2::ZERO, WeaponId::new(8), &payload, &mut credits);

    let kills: Vec<_> = credits
        .iter()
        .filter_map(|credit| match credit {
            Credit::Kill { weapon, enemy } => Some((weapon.get(), enemy.get())),
            Credit::Damage { .. } => None,
        })
        .collect();
    assert_eq!(kills, vec![(7, 1), (7, 2)]);
    assert!(damage_to(&credits, 0) > 25.0);
}

#[test]
fn chain_never_revisits_and_stops_when_the_trail_goes_cold() {
    let mut enemies = vec![
        standing(1, Vec2::ZERO, 100.0),
        standing(2, Vec2::new(2.0, 0.0), 100.0),
        standing(3, Vec2::new(1.0, 0.5), 100.0),
        standing(4, Vec2::new(2.0 + CHAIN_RADIUS + 0.5, 0.0), 100.0),
    ];
    let mut attack = ChainAttack::new();
    let mut credits = Vec::new();
    let mut sink = Vec::new();
    let chain = ChainStrike {
        source: WeaponId::new(2),
        damage: 10.0,
        max_hits: 10,
        link_slow: None,
        no_falloff: false,
    };

    let hits = attack.fire(&mut enemies, 0, &chain, &mut credits, &mut sink);

    assert_eq!(hits, 3);
    let Some(Notification::ChainFired { links, .. }) = sink.pop() else {
        panic!("chain notification missing");
    };
    assert_eq!(links, vec![EnemyId::new(1), EnemyId::new(3), EnemyId::new(2)]);
    let mut unique = links.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), links.len());
    assert!((enemies[3].hp() - 100.0).abs() < f32::EPSILON);
}

#[test]
fn chain_skips_enemies_that_died_earlier() {
    let mut enemies = vec![
        standing(1, Vec2::ZERO, 100.0),
        standing(2, Vec2::new(1.0, 0.0), 1.0),
        standing(3, Vec2::new(2.0, 0.0), 100.0),
    ];
    enemies[1].take_damage(5.0);
    let mut attack = ChainAttack::new();
    let mut credits = Vec::new();
    let chain = ChainStrike {
        source: WeaponId::new(2),
        damage: 10.0,
        max_hits: 3,
        link_slow: None,
        no_falloff: false,
    };

    let hits = attack.fire(&mut enemies, 0, &chain, &mut credits, &mut ());

    assert_eq!(hits, 2);
    assert!((enemies[2].hp() - 94.0).abs() < 1e-4);
}
