#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies projectiles, resolves their hits and ticks damage zones.
//!
//! Every projectile homes in on a single enemy. A tick first advances all
//! projectiles and collects the ones that arrived, then resolves their hits in
//! launch order, so a projectile never observes damage dealt by another
//! projectile's movement in the same tick.

mod chain;
mod impact;

use rampart_core::{
    strike, Credit, Enemy, EnemyId, Notification, NotificationSink, ProjectileId,
    ProjectileOutcome, ProjectileSpawn, Vec2, WeaponId,
};
use tracing::trace;

pub use chain::{ChainAttack, ChainStrike, CHAIN_LINK_DAMAGE, CHAIN_RADIUS, CHAIN_SLOW_DURATION};
pub use impact::{pulse, resolve_impact, splash_damage, Payload, SPLASH_DAMAGE_FACTOR};

/// Distance below which a projectile counts as having reached its target.
pub const HIT_DISTANCE: f32 = 0.5;

/// Homing projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    source: WeaponId,
    target: EnemyId,
    position: Vec2,
    speed: f32,
    payload: Payload,
}

impl Projectile {
    /// Identifier of the projectile.
    #[must_use]
    pub fn id(&self) -> ProjectileId {
        self.id
    }

    /// Weapon that fired the projectile.
    #[must_use]
    pub fn source(&self) -> WeaponId {
        self.source
    }

    /// Enemy the projectile homes in on.
    #[must_use]
    pub fn target(&self) -> EnemyId {
        self.target
    }

    /// Current position on the ground plane.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Effects resolved on impact.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    fn step_toward(&mut self, destination: Vec2, dt: f32) -> bool {
        let offset = destination - self.position;
        let distance = offset.length();
        let step = self.speed * dt;

        if distance <= step {
            self.position = destination;
        } else if distance > 0.0 {
            self.position += offset / distance * step;
        }

        self.position.distance(destination) < HIT_DISTANCE
    }
}

/// Persistent area that damages every ground enemy standing inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageZone {
    source: WeaponId,
    position: Vec2,
    radius: f32,
    damage_per_second: f32,
    remaining: f32,
}

impl DamageZone {
    /// Creates a zone credited to `source`.
    #[must_use]
    pub fn new(
        source: WeaponId,
        position: Vec2,
        radius: f32,
        damage_per_second: f32,
        duration: f32,
    ) -> Self {
        Self {
            source,
            position,
            radius,
            damage_per_second,
            remaining: duration,
        }
    }

    /// Weapon credited with the zone's damage.
    #[must_use]
    pub fn source(&self) -> WeaponId {
        self.source
    }

    /// Centre of the zone.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Seconds before the zone fades.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    fn tick<E: Enemy>(&mut self, enemies: &mut [E], dt: f32, credits: &mut Vec<Credit>) {
        let active = self.remaining.min(dt);
        self.remaining -= dt;
        if active <= 0.0 {
            return;
        }

        let amount = self.damage_per_second * active;
        for enemy in enemies.iter_mut() {
            if !enemy.is_alive() || enemy.is_airborne() {
                continue;
            }
            if self.position.distance(enemy.position()) <= self.radius {
                let _ = strike(enemy, self.source, amount, credits);
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Arrival {
    projectile: Projectile,
    enemy: usize,
}

/// Projectile and damage zone simulation owned by the world.
#[derive(Debug, Default)]
pub struct ProjectileSimulator {
    projectiles: Vec<Projectile>,
    zones: Vec<DamageZone>,
    next_projectile: u64,
    scratch_projectiles: Vec<Projectile>,
    arrivals: Vec<Arrival>,
}

impl ProjectileSimulator {
    /// Creates an empty simulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches a projectile from `origin` toward `target`.
    pub fn launch<S: NotificationSink + ?Sized>(
        &mut self,
        source: WeaponId,
        target: EnemyId,
        origin: Vec2,
        speed: f32,
        payload: Payload,
        sink: &mut S,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);

        self.projectiles.push(Projectile {
            id,
            source,
            target,
            position: origin,
            speed,
            payload,
        });

        sink.notify(Notification::ProjectileSpawned(ProjectileSpawn {
            projectile: id,
            source,
            target,
            origin,
            speed,
            damage: payload.damage,
            splash_radius: payload.splash_radius,
            slow: payload.slow,
            dot: payload.dot,
        }));

        id
    }

    /// Adds a damage zone that persists for its duration.
    pub fn spawn_zone(&mut self, zone: DamageZone) {
        self.zones.push(zone);
    }

    /// Advances every projectile by `dt` seconds and resolves arrivals.
    ///
    /// Projectiles whose target is dead or no longer present are dropped and
    /// reported as missed without applying any effect.
    pub fn advance<E: Enemy, S: NotificationSink + ?Sized>(
        &mut self,
        enemies: &mut [E],
        dt: f32,
        credits: &mut Vec<Credit>,
        sink: &mut S,
    ) {
        self.arrivals.clear();
        std::mem::swap(&mut self.projectiles, &mut self.scratch_projectiles);

        for mut projectile in self.scratch_projectiles.drain(..) {
            let target = enemies
                .iter()
                .position(|enemy| enemy.id() == projectile.target && enemy.is_alive());
            let Some(enemy) = target else {
                trace!(projectile = projectile.id.get(), "target lost");
                sink.notify(Notification::ProjectileResolved {
                    projectile: projectile.id,
                    outcome: ProjectileOutcome::Missed,
                });
                continue;
            };

            if projectile.step_toward(enemies[enemy].position(), dt) {
                self.arrivals.push(Arrival { projectile, enemy });
            } else {
                self.projectiles.push(projectile);
            }
        }

        for arrival in self.arrivals.drain(..) {
            let Arrival { projectile, enemy } = arrival;
            if !enemies[enemy].is_alive() {
                trace!(projectile = projectile.id.get(), "target died before impact");
                sink.notify(Notification::ProjectileResolved {
                    projectile: projectile.id,
                    outcome: ProjectileOutcome::Missed,
                });
                continue;
            }

            let impact = enemies[enemy].position();
            if let Some(zone) = resolve_impact(
                enemies,
                enemy,
                impact,
                projectile.source,
                &projectile.payload,
                credits,
            ) {
                self.zones.push(zone);
            }

            trace!(
                projectile = projectile.id.get(),
                source = projectile.source.get(),
                damage = projectile.payload.damage,
                "projectile hit"
            );
            sink.notify(Notification::ProjectileResolved {
                projectile: projectile.id,
                outcome: ProjectileOutcome::Hit,
            });
        }
    }

    /// Damages enemies inside active zones and drops expired zones.
    pub fn tick_zones<E: Enemy>(&mut self, enemies: &mut [E], dt: f32, credits: &mut Vec<Credit>) {
        for zone in &mut self.zones {
            zone.tick(enemies, dt, credits);
        }
        self.zones.retain(|zone| zone.remaining > 0.0);
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Damage zones currently active.
    #[must_use]
    pub fn zones(&self) -> &[DamageZone] {
        &self.zones
    }
}
