//! Simulation worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`RuntimeHandle`], runs them through the combat
//! engine, and publishes events to the [`EventBus`]. With a tick interval
//! configured it also steps the simulation on its own clock.
//!
//! [`RuntimeHandle`]: crate::api::RuntimeHandle

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error};

use defense_core::{
    ActorId, AppliedResult, AttachOutcome, DamageRequest, EffectSelector, EffectSpec, EngineError,
    GameError, StatSnapshot, Task, TaskId, World,
};

use crate::api::{Result, RuntimeError};
use crate::events::{BusSink, EconomyEvent, Event, EventBus, LifecycleEvent, TickEvent};
use crate::simulation::{Simulation, StepReport};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Spawn an actor from a catalog template.
    Spawn {
        template: String,
        position: defense_core::Position,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    /// Attach an effect through the engine gates.
    Attach {
        actor: ActorId,
        spec: EffectSpec,
        reply: oneshot::Sender<Result<AttachOutcome>>,
    },
    RemoveEffects {
        actor: ActorId,
        selector: EffectSelector,
        origin: Option<ActorId>,
        reply: oneshot::Sender<Result<usize>>,
    },
    ApplyDamage {
        request: DamageRequest,
        reply: oneshot::Sender<Result<AppliedResult>>,
    },
    /// Queue delayed work `delay` ticks from now.
    Schedule {
        delay: u64,
        task: Task,
        reply: oneshot::Sender<TaskId>,
    },
    /// Run one tick of the world update.
    Step { reply: oneshot::Sender<StepReport> },
    EffectiveStats {
        actor: ActorId,
        reply: oneshot::Sender<Result<StatSnapshot>>,
    },
    /// Query the current world (read-only clone).
    QueryWorld { reply: oneshot::Sender<World> },
    QueryGold { reply: oneshot::Sender<i64> },
    Digest { reply: oneshot::Sender<Result<String>> },
}

/// Background task that processes simulation commands.
pub struct SimulationWorker {
    simulation: Simulation,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        simulation: Simulation,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        tracing::info!(
            enemies = simulation.world().enemies().count(),
            towers = simulation.world().towers().count(),
            templates = simulation.catalog().len(),
            "SimulationWorker initialized"
        );

        Self {
            simulation,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    ///
    /// Exits once every command sender has been dropped.
    pub async fn run(mut self, tick_interval: Option<Duration>) {
        let mut ticker = tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => {
                    self.step();
                }
            }
        }
        debug!(tick = %self.simulation.world().now(), "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let now = self.simulation.world().now();
        match cmd {
            Command::Spawn {
                template,
                position,
                reply,
            } => {
                let result = self.simulation.spawn(&template, position);
                if let Ok(actor) = result {
                    self.event_bus.publish(Event::Lifecycle(LifecycleEvent::Spawned {
                        actor,
                        template,
                        tick: now,
                    }));
                }
                if reply.send(result).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Attach { actor, spec, reply } => {
                let mut sink = BusSink::new(&self.event_bus, now);
                let result = self
                    .simulation
                    .engine(&mut sink)
                    .attach_detailed(actor, spec)
                    .map_err(report_engine_error);
                if reply.send(result).is_err() {
                    debug!("Attach reply channel closed (caller dropped)");
                }
            }
            Command::RemoveEffects {
                actor,
                selector,
                origin,
                reply,
            } => {
                let mut sink = BusSink::new(&self.event_bus, now);
                let result = self
                    .simulation
                    .engine(&mut sink)
                    .remove_effects(actor, selector, origin)
                    .map_err(report_engine_error);
                if reply.send(result).is_err() {
                    debug!("RemoveEffects reply channel closed (caller dropped)");
                }
            }
            Command::ApplyDamage { request, reply } => {
                let mut sink = BusSink::new(&self.event_bus, now);
                let result = self
                    .simulation
                    .engine(&mut sink)
                    .apply_damage(request.target, request.delta, request.tag, request.origin)
                    .map_err(report_engine_error);
                if reply.send(result).is_err() {
                    debug!("ApplyDamage reply channel closed (caller dropped)");
                }
            }
            Command::Schedule { delay, task, reply } => {
                let id = self.simulation.world_mut().tasks.schedule(now + delay, task);
                if reply.send(id).is_err() {
                    debug!("Schedule reply channel closed (caller dropped)");
                }
            }
            Command::Step { reply } => {
                let report = self.step();
                if reply.send(report).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
            Command::EffectiveStats { actor, reply } => {
                let mut sink = BusSink::new(&self.event_bus, now);
                let result = self
                    .simulation
                    .engine(&mut sink)
                    .effective_stats(actor)
                    .map_err(report_engine_error);
                if reply.send(result).is_err() {
                    debug!("EffectiveStats reply channel closed (caller dropped)");
                }
            }
            Command::QueryWorld { reply } => {
                if reply.send(self.simulation.world().clone()).is_err() {
                    debug!("QueryWorld reply channel closed (caller dropped)");
                }
            }
            Command::QueryGold { reply } => {
                if reply.send(self.simulation.treasury().gold()).is_err() {
                    debug!("QueryGold reply channel closed (caller dropped)");
                }
            }
            Command::Digest { reply } => {
                if reply.send(self.simulation.digest_hex()).is_err() {
                    debug!("Digest reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Steps the simulation and publishes what happened.
    fn step(&mut self) -> StepReport {
        let next = self.simulation.world().now() + 1;
        let mut sink = BusSink::new(&self.event_bus, next);
        let report = self.simulation.step(&mut sink);

        for death in &report.deaths {
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Died(death.clone())));
        }
        for payout in &report.payouts {
            self.event_bus.publish(Event::Economy(EconomyEvent::GoldChanged {
                tick: report.tick,
                delta: payout.amount,
                balance: payout.balance,
                victim: Some(payout.victim),
            }));
        }
        for &actor in &report.reaped {
            self.event_bus.publish(Event::Lifecycle(LifecycleEvent::Reaped {
                actor,
                tick: report.tick,
            }));
        }
        self.event_bus.publish(Event::Tick(TickEvent {
            tick: report.tick,
            tasks_run: report.tasks_run,
            pulses: report.pulses,
            expired: report.expired,
            deaths: report.deaths.len(),
            reaped: report.reaped.len(),
        }));

        report
    }
}

/// Logs an engine error by severity before handing it back to the caller.
fn report_engine_error(err: EngineError) -> RuntimeError {
    let severity = err.severity();
    if severity.is_internal() {
        error!(
            code = err.error_code(),
            severity = severity.as_str(),
            %err,
            "engine request failed"
        );
    } else {
        debug!(
            code = err.error_code(),
            severity = severity.as_str(),
            %err,
            "engine request rejected"
        );
    }
    err.into()
}

/// Resolves on the next interval tick, or never without an interval.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
