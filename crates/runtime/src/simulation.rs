//! Fixed-tick world update around the combat engine.
//!
//! [`Simulation`] owns the [`World`], the [`Treasury`] and the template
//! catalog. One [`Simulation::step`] is one tick of the surrounding game loop:
//!
//! ```text
//! advance clock → run due delayed work → tick every actor
//!   → pay rewards from the death log → reap expired actors
//! ```
//!
//! It is synchronous and owns no channels; the simulation worker wraps it for
//! async clients and tests drive it directly.

use serde::{Deserialize, Serialize};

use defense_content::TemplateCatalog;
use defense_core::{
    ActorId, ActorKind, CombatEngine, DeathRecord, EventSink, Position, Tick, World,
};

use crate::api::{Result, RuntimeError};
use crate::treasury::Treasury;

/// Reward paid for one death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub victim: ActorId,
    pub amount: i64,
    pub balance: i64,
}

/// What one step did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub tick: Tick,
    pub tasks_run: usize,
    pub pulses: u32,
    pub expired: usize,
    pub deaths: Vec<DeathRecord>,
    pub payouts: Vec<Payout>,
    pub reaped: Vec<ActorId>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    world: &'a World,
    gold: i64,
}

#[derive(Deserialize)]
struct SnapshotOwned {
    world: World,
    gold: i64,
}

pub struct Simulation {
    world: World,
    treasury: Treasury,
    catalog: TemplateCatalog,
}

impl Simulation {
    pub fn new(world: World, catalog: TemplateCatalog, starting_gold: i64) -> Self {
        Self {
            world,
            treasury: Treasury::new(starting_gold),
            catalog,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn treasury_mut(&mut self) -> &mut Treasury {
        &mut self.treasury
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Combat engine borrowing this simulation's world for one batch of
    /// requests.
    pub fn engine<'a>(&'a mut self, sink: &'a mut dyn EventSink) -> CombatEngine<'a> {
        CombatEngine::new(&mut self.world, sink)
    }

    /// Spawns an actor from the named catalog template.
    pub fn spawn(&mut self, template: &str, position: Position) -> Result<ActorId> {
        let template = self
            .catalog
            .get(template)
            .ok_or_else(|| RuntimeError::UnknownTemplate(template.to_string()))?;
        Ok(self.world.spawn(template, position))
    }

    /// Runs one tick of the world update.
    pub fn step(&mut self, sink: &mut dyn EventSink) -> StepReport {
        let tick = self.world.advance();
        let mut report = StepReport {
            tick,
            ..StepReport::default()
        };

        {
            let mut engine = CombatEngine::new(&mut self.world, sink);
            report.tasks_run = engine.run_due_tasks();
            for (_, tick_report) in engine.tick_all() {
                report.pulses += tick_report.pulses;
                report.expired += tick_report.expired.len();
            }
        }

        report.deaths = self.world.drain_deaths();
        for death in &report.deaths {
            if let Some(payout) = self.pay_out(death) {
                report.payouts.push(payout);
            }
        }

        report.reaped = self.world.reap_expired().into_iter().map(|a| a.id).collect();

        tracing::debug!(
            tick = %tick,
            tasks = report.tasks_run,
            pulses = report.pulses,
            expired = report.expired,
            deaths = report.deaths.len(),
            reaped = report.reaped.len(),
            gold = self.treasury.gold(),
            "step complete"
        );
        report
    }

    /// Enemy deaths pay their reward; tower deaths pay nothing.
    fn pay_out(&mut self, death: &DeathRecord) -> Option<Payout> {
        if death.kind != ActorKind::Enemy || death.reward == 0 {
            return None;
        }
        let amount = i64::from(death.reward);
        let balance = self.treasury.change_gold(amount);
        Some(Payout {
            victim: death.victim,
            amount,
            balance,
        })
    }

    /// Deterministic binary encoding of the world and the gold balance.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let snapshot = SnapshotRef {
            world: &self.world,
            gold: self.treasury.gold(),
        };
        bincode::serialize(&snapshot).map_err(RuntimeError::Snapshot)
    }

    /// Replaces the world and the gold balance with a decoded snapshot.
    /// The template catalog is left as is.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<()> {
        let snapshot: SnapshotOwned =
            bincode::deserialize(bytes).map_err(RuntimeError::Snapshot)?;
        self.world = snapshot.world;
        self.treasury = Treasury::new(snapshot.gold);
        Ok(())
    }

    /// Hex SHA-256 of the world, for reproducibility checks. The gold
    /// balance is not hashed; it follows from the death log.
    pub fn digest_hex(&self) -> Result<String> {
        let digest = self.world.digest().map_err(RuntimeError::Snapshot)?;
        Ok(hex::encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use defense_core::{ActorTemplate, DamageTag, NullSink};

    fn catalog() -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new();
        catalog
            .insert(ActorTemplate::enemy("runner", 30).with_bounty(4))
            .unwrap();
        catalog.insert(ActorTemplate::tower("archer", 1)).unwrap();
        catalog
    }

    #[test]
    fn spawn_unknown_template_fails() {
        let mut sim = Simulation::new(World::default(), catalog(), 0);
        assert!(matches!(
            sim.spawn("dragon", Position::ORIGIN),
            Err(RuntimeError::UnknownTemplate(name)) if name == "dragon"
        ));
    }

    #[test]
    fn kill_pays_bounty_and_reaps_on_next_step() {
        let mut sim = Simulation::new(World::default(), catalog(), 10);
        let runner = sim.spawn("runner", Position::ORIGIN).unwrap();
        let archer = sim.spawn("archer", Position::ORIGIN).unwrap();

        let mut sink = NullSink;
        sim.engine(&mut sink)
            .apply_damage(runner, -30, DamageTag::Physical, Some(archer))
            .unwrap();
        assert!(sim.world().actor(runner).is_some());

        let report = sim.step(&mut sink);
        assert_eq!(report.deaths.len(), 1);
        assert_eq!(report.payouts[0].amount, 4);
        assert_eq!(sim.treasury().gold(), 14);
        assert_eq!(report.reaped, vec![runner]);
        assert!(sim.world().actor(runner).is_none());
        assert_eq!(sim.world().actor(archer).map(|a| a.attribution.kills), Some(1));
    }

    #[test]
    fn tower_deaths_pay_nothing() {
        let mut sim = Simulation::new(World::default(), catalog(), 0);
        let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
        let mut sink = NullSink;
        sim.engine(&mut sink)
            .apply_damage(archer, -5, DamageTag::Fire, None)
            .unwrap();

        let report = sim.step(&mut sink);
        assert_eq!(report.deaths.len(), 1);
        assert!(report.payouts.is_empty());
        assert_eq!(sim.treasury().gold(), 0);
    }

    #[test]
    fn snapshot_round_trip_keeps_the_digest() {
        let mut sim = Simulation::new(World::default(), catalog(), 0);
        sim.spawn("runner", Position::new(3.0, 1.0)).unwrap();
        let bytes = sim.snapshot().unwrap();
        let before = sim.digest_hex().unwrap();

        let mut other = Simulation::new(World::default(), catalog(), 0);
        other.restore(&bytes).unwrap();
        assert_eq!(other.digest_hex().unwrap(), before);
        assert_eq!(before.len(), 64);
    }

    #[test]
    fn snapshot_carries_the_gold_balance() {
        let mut sim = Simulation::new(World::default(), catalog(), 25);
        let runner = sim.spawn("runner", Position::ORIGIN).unwrap();
        let mut sink = NullSink;
        sim.engine(&mut sink)
            .apply_damage(runner, -30, DamageTag::Physical, None)
            .unwrap();
        sim.step(&mut sink);
        assert_eq!(sim.treasury().gold(), 29);

        let bytes = sim.snapshot().unwrap();
        let mut other = Simulation::new(World::default(), catalog(), 0);
        other.restore(&bytes).unwrap();

        assert_eq!(other.treasury().gold(), 29);
        assert_eq!(other.digest_hex().unwrap(), sim.digest_hex().unwrap());
    }
}
