//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the combat engine or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use defense_core::{
    ActorId, AppliedResult, AttachOutcome, DamageRequest, EffectSelector, EffectSpec, Position,
    StatSnapshot, Task, TaskId, World,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::simulation::StepReport;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends a command built around a fresh reply channel and awaits the
    /// reply.
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Spawn an actor from the named template
    pub async fn spawn(&self, template: impl Into<String>, position: Position) -> Result<ActorId> {
        let template = template.into();
        self.request(|reply| Command::Spawn {
            template,
            position,
            reply,
        })
        .await?
    }

    /// Attach an effect, reporting which gate (if any) stopped it
    pub async fn attach(&self, actor: ActorId, spec: EffectSpec) -> Result<AttachOutcome> {
        self.request(|reply| Command::Attach { actor, spec, reply })
            .await?
    }

    /// Flag matching effects for removal on the actor's next tick
    pub async fn remove_effects(
        &self,
        actor: ActorId,
        selector: EffectSelector,
        origin: Option<ActorId>,
    ) -> Result<usize> {
        self.request(|reply| Command::RemoveEffects {
            actor,
            selector,
            origin,
            reply,
        })
        .await?
    }

    /// Resolve a health delta through the damage pipeline
    pub async fn apply_damage(&self, request: DamageRequest) -> Result<AppliedResult> {
        self.request(|reply| Command::ApplyDamage { request, reply })
            .await?
    }

    /// Queue delayed work `delay` ticks from the current tick
    pub async fn schedule(&self, delay: u64, task: Task) -> Result<TaskId> {
        self.request(|reply| Command::Schedule { delay, task, reply })
            .await
    }

    /// Run one tick of the world update
    pub async fn step(&self) -> Result<StepReport> {
        self.request(|reply| Command::Step { reply }).await
    }

    /// Effective stats of an actor computed from its live effects
    pub async fn effective_stats(&self, actor: ActorId) -> Result<StatSnapshot> {
        self.request(|reply| Command::EffectiveStats { actor, reply })
            .await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn query_world(&self) -> Result<World> {
        self.request(|reply| Command::QueryWorld { reply }).await
    }

    /// Current gold balance
    pub async fn gold(&self) -> Result<i64> {
        self.request(|reply| Command::QueryGold { reply }).await
    }

    /// Hex SHA-256 of the current world
    pub async fn digest(&self) -> Result<String> {
        self.request(|reply| Command::Digest { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Engine emissions (effects, health, shields)
    /// - `Topic::Lifecycle` - Spawns, deaths, reaping
    /// - `Topic::Economy` - Gold changes
    /// - `Topic::Tick` - Per-step summaries
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
