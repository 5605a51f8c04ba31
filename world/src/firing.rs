//! Effective stat snapshots and the per-kind fire strategy table.

use rampart_core::{
    DotEffect, Enemy, NotificationSink, SlowEffect, SpecModifiers, SpecialBehavior, TargetingMode,
    Vec2, WeaponConfig, WeaponId, WeaponKind,
};
use rampart_system_projectiles::{
    pulse, resolve_impact, ChainAttack, ChainStrike, Payload, ProjectileSimulator,
};
use rampart_system_stats::StatComposer;
use rampart_system_targeting::{select_target, TargetRanking};

use crate::armory::Weapon;

/// Effective combat stats of a weapon at a single point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectiveStats {
    /// Damage per hit, floored.
    pub damage: f32,
    /// Engagement range, or trigger radius for path traps.
    pub range: f32,
    /// Activations per second.
    pub fire_rate: f32,
    /// Seconds between activations.
    pub cooldown: f32,
    /// Projectile travel speed; zero resolves hits instantly.
    pub projectile_speed: f32,
    /// Splash radius around each impact.
    pub splash_radius: Option<f32>,
    /// Slow applied on impact.
    pub slow: Option<SlowEffect>,
    /// Damage-over-time applied on impact.
    pub dot: Option<DotEffect>,
    /// Total enemies struck per chain activation.
    pub chain_count: Option<u32>,
    /// Slow applied to every chain link.
    pub chain_slow_factor: Option<f32>,
    /// Behaviour requested by the weapon's specialization.
    pub special: Option<SpecialBehavior>,
}

impl EffectiveStats {
    pub(crate) fn compose(
        config: &WeaponConfig,
        weapon: &Weapon,
        spec: Option<&SpecModifiers>,
    ) -> Self {
        let composer = StatComposer::new(config, weapon.level)
            .with_synergy(weapon.synergy_buffs.as_ref())
            .with_spec(spec)
            .with_boss_debuff(weapon.debuff_factor());

        Self {
            damage: composer.damage(),
            range: composer.range(),
            fire_rate: composer.fire_rate(),
            cooldown: composer.cooldown(),
            projectile_speed: config.projectile_speed,
            splash_radius: composer.splash_radius(),
            slow: composer.slow(),
            dot: composer.dot(),
            chain_count: composer.chain_count(),
            chain_slow_factor: composer.chain_slow_factor(),
            special: spec.and_then(|spec| spec.special),
        }
    }
}

/// A ready weapon about to activate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Shot {
    pub(crate) weapon: WeaponId,
    pub(crate) kind: WeaponKind,
    pub(crate) origin: Vec2,
    pub(crate) targeting: TargetingMode,
    pub(crate) stats: EffectiveStats,
}

impl Shot {
    fn payload(&self) -> Payload {
        Payload {
            damage: self.stats.damage,
            splash_radius: self.stats.splash_radius,
            slow: self.stats.slow,
            dot: self.stats.dot,
            dot_kind: self.kind.dot_kind(),
            special: self.stats.special,
        }
    }
}

/// Mutable systems a fire strategy may drive.
pub(crate) struct Arsenal<'a> {
    pub(crate) simulator: &'a mut ProjectileSimulator,
    pub(crate) chain: &'a mut ChainAttack,
    pub(crate) ranking: &'a mut TargetRanking,
    pub(crate) picks: &'a mut Vec<usize>,
    pub(crate) credits: &'a mut Vec<rampart_core::Credit>,
}

/// Activates a weapon, returning `true` when it fired and its cooldown restarts.
pub(crate) type FireStrategy<E> =
    fn(&Shot, &mut Arsenal<'_>, &mut [E], &mut dyn NotificationSink) -> bool;

/// Fire strategy used by `kind`.
pub(crate) fn strategy_for<E: Enemy>(kind: WeaponKind) -> FireStrategy<E> {
    match kind {
        WeaponKind::Tesla => fire_chain::<E>,
        WeaponKind::SpikeTrap | WeaponKind::TarTrap | WeaponKind::FireTrap => fire_pulse::<E>,
        WeaponKind::Arrow
        | WeaponKind::Cannon
        | WeaponKind::Frost
        | WeaponKind::Poison
        | WeaponKind::Flame
        | WeaponKind::Sniper => fire_projectiles::<E>,
    }
}

fn fire_projectiles<E: Enemy>(
    shot: &Shot,
    arsenal: &mut Arsenal<'_>,
    enemies: &mut [E],
    sink: &mut dyn NotificationSink,
) -> bool {
    let volley = match shot.stats.special {
        Some(SpecialBehavior::FanShot { projectiles }) => projectiles.max(1) as usize,
        _ => 1,
    };

    arsenal.picks.clear();
    if volley == 1 {
        arsenal.picks.extend(select_target(
            shot.origin,
            shot.stats.range,
            shot.targeting,
            enemies,
        ));
    } else {
        arsenal.ranking.rank(
            shot.origin,
            shot.stats.range,
            shot.targeting,
            enemies,
            volley,
            arsenal.picks,
        );
    }

    if arsenal.picks.is_empty() {
        return false;
    }

    let payload = shot.payload();
    for &index in arsenal.picks.iter() {
        if shot.stats.projectile_speed > 0.0 {
            let _ = arsenal.simulator.launch(
                shot.weapon,
                enemies[index].id(),
                shot.origin,
                shot.stats.projectile_speed,
                payload,
                &mut *sink,
            );
        } else {
            if !enemies[index].is_alive() {
                continue;
            }
            let impact = enemies[index].position();
            if let Some(zone) =
                resolve_impact(enemies, index, impact, shot.weapon, &payload, arsenal.credits)
            {
                arsenal.simulator.spawn_zone(zone);
            }
        }
    }

    true
}

fn fire_chain<E: Enemy>(
    shot: &Shot,
    arsenal: &mut Arsenal<'_>,
    enemies: &mut [E],
    sink: &mut dyn NotificationSink,
) -> bool {
    let Some(primary) = select_target(shot.origin, shot.stats.range, shot.targeting, enemies) else {
        return false;
    };

    let chain = ChainStrike {
        source: shot.weapon,
        damage: shot.stats.damage,
        max_hits: shot.stats.chain_count.unwrap_or(1),
        link_slow: shot.stats.chain_slow_factor,
        no_falloff: matches!(shot.stats.special, Some(SpecialBehavior::ChainNoFalloff)),
    };

    arsenal
        .chain
        .fire(enemies, primary, &chain, arsenal.credits, &mut *sink)
        > 0
}

fn fire_pulse<E: Enemy>(
    shot: &Shot,
    arsenal: &mut Arsenal<'_>,
    enemies: &mut [E],
    _sink: &mut dyn NotificationSink,
) -> bool {
    let payload = shot.payload();
    pulse(
        enemies,
        shot.origin,
        shot.stats.range,
        shot.weapon,
        &payload,
        arsenal.credits,
    ) > 0
}
