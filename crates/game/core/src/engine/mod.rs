//! Combat engine entry points.
//!
//! The [`CombatEngine`] is the facade the surrounding simulation talks to. It
//! borrows the [`World`] and an [`EventSink`] for the duration of a batch of
//! requests; every state change made on behalf of a caller flows through it.

mod attach;
mod errors;
mod tick;

pub use attach::{AttachOutcome, RejectReason};
pub use errors::EngineError;
pub use tick::TickReport;

pub(crate) use attach::attach_effect;

use crate::combat::{AppliedResult, DamagePipeline, DamageRequest};
use crate::effect::{EffectRecord, EffectSelector, EffectSpec};
use crate::events::{EventKind, EventPayload, EventSink};
use crate::lifecycle::{DeathHook, DeathRecord, LifecycleController};
use crate::schedule::Task;
use crate::state::{ActorId, DamageTag, Immunity, TaskId, Tick, World};
use crate::stats::{StatAggregator, StatSnapshot};

/// Status effect and combat resolution engine.
pub struct CombatEngine<'a> {
    world: &'a mut World,
    sink: &'a mut dyn EventSink,
}

impl<'a> CombatEngine<'a> {
    pub fn new(world: &'a mut World, sink: &'a mut dyn EventSink) -> Self {
        Self { world, sink }
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    fn not_found(&self, actor: ActorId) -> EngineError {
        EngineError::actor_not_found(actor, self.world.now())
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Attaches an effect. Returns whether it was inserted.
    pub fn attach(&mut self, actor: ActorId, spec: EffectSpec) -> Result<bool, EngineError> {
        Ok(self.attach_detailed(actor, spec)?.is_applied())
    }

    /// Attaches an effect and reports which gate, if any, stopped it.
    pub fn attach_detailed(
        &mut self,
        actor: ActorId,
        spec: EffectSpec,
    ) -> Result<AttachOutcome, EngineError> {
        attach_effect(self.world, self.sink, actor, spec)
    }

    /// Flags matching live effects for removal on the next sweep.
    pub fn remove_effects(
        &mut self,
        actor: ActorId,
        selector: EffectSelector,
        origin: Option<ActorId>,
    ) -> Result<usize, EngineError> {
        let now = self.world.now();
        let target = self
            .world
            .actor_mut(actor)
            .ok_or_else(|| EngineError::actor_not_found(actor, now))?;
        let flagged = target.effects.remove_selected(selector, origin);
        tracing::debug!(actor = %actor, ?selector, flagged, "effects flagged for removal");
        Ok(flagged)
    }

    /// Immunity check by textual tag (`poison`, `poisonresist`, `slow`, ...).
    ///
    /// Unknown tags are logged and reported as not immune.
    pub fn is_immune_to(&self, actor: ActorId, tag: &str) -> Result<bool, EngineError> {
        let target = self.world.actor(actor).ok_or_else(|| self.not_found(actor))?;
        match tag.parse::<Immunity>() {
            Ok(immunity) => Ok(target.is_immune_to(&immunity)),
            Err(err) => {
                tracing::warn!(actor = %actor, %err, "immunity query for unknown tag");
                Ok(false)
            }
        }
    }

    /// Effective stats computed fresh from the live effects.
    pub fn effective_stats(&self, actor: ActorId) -> Result<StatSnapshot, EngineError> {
        let target = self.world.actor(actor).ok_or_else(|| self.not_found(actor))?;
        Ok(StatAggregator::aggregate(target, &self.world.config))
    }

    /// Flat records of every live effect on `actor`, for persistence.
    pub fn capture_effects(&self, actor: ActorId) -> Result<Vec<EffectRecord>, EngineError> {
        let target = self.world.actor(actor).ok_or_else(|| self.not_found(actor))?;
        Ok(target.effects.active().map(EffectRecord::capture).collect())
    }

    /// Re-inserts persisted effects, bypassing the attach gates.
    ///
    /// A record keeps its id unless this world has already issued it, in
    /// which case the instance gets a fresh id. Records naming unknown kinds
    /// are skipped. Returns how many were restored.
    pub fn restore_effects(
        &mut self,
        actor: ActorId,
        records: &[EffectRecord],
    ) -> Result<usize, EngineError> {
        let now = self.world.now();
        if !self.world.contains(actor) {
            return Err(self.not_found(actor));
        }

        let mut restored = 0;
        for mut effect in records.iter().filter_map(EffectRecord::restore) {
            if self.world.effect_id_issued(effect.id()) {
                let fresh = self.world.allocate_effect_id();
                tracing::debug!(
                    %actor,
                    persisted = %effect.id(),
                    %fresh,
                    "restored effect re-keyed"
                );
                effect.reassign_id(fresh);
            } else {
                self.world.reserve_effect_ids(effect.id());
            }
            let target = self
                .world
                .actor_mut(actor)
                .ok_or_else(|| EngineError::registry_inconsistent(actor, now, "restore"))?;
            target.effects.insert(effect);
            restored += 1;
        }
        Ok(restored)
    }

    // ========================================================================
    // Ticks
    // ========================================================================

    /// Sweeps expired effects, fires periodic pulses and refreshes the cached
    /// stats of one actor.
    pub fn tick(&mut self, actor: ActorId) -> Result<TickReport, EngineError> {
        tick::tick_actor(self.world, self.sink, actor)
    }

    /// Ticks every registered actor, enemies first, in spawn order.
    pub fn tick_all(&mut self) -> Vec<(ActorId, TickReport)> {
        let mut reports = Vec::new();
        for id in self.world.actor_ids() {
            match tick::tick_actor(self.world, self.sink, id) {
                Ok(report) => reports.push((id, report)),
                Err(err) => tracing::debug!(actor = %id, %err, "actor vanished during tick"),
            }
        }
        reports
    }

    // ========================================================================
    // Health
    // ========================================================================

    pub fn apply_damage(
        &mut self,
        actor: ActorId,
        delta: i64,
        tag: DamageTag,
        origin: Option<ActorId>,
    ) -> Result<AppliedResult, EngineError> {
        let mut request = DamageRequest::new(actor, delta, tag);
        request.origin = origin;
        DamagePipeline::apply(self.world, self.sink, request)
    }

    /// Runs the death transition if `actor` sits at zero HP.
    pub fn check_death(
        &mut self,
        actor: ActorId,
        killer: Option<ActorId>,
    ) -> Result<Option<DeathRecord>, EngineError> {
        if !self.world.contains(actor) {
            return Err(self.not_found(actor));
        }
        Ok(LifecycleController::check_death(
            self.world, self.sink, actor, killer,
        ))
    }

    pub fn register_death_hook(
        &mut self,
        actor: ActorId,
        hook: DeathHook,
    ) -> Result<bool, EngineError> {
        let now = self.world.now();
        let target = self
            .world
            .actor_mut(actor)
            .ok_or_else(|| EngineError::actor_not_found(actor, now))?;
        Ok(target.register_death_hook(hook))
    }

    // ========================================================================
    // Delayed work
    // ========================================================================

    pub fn schedule(&mut self, due: Tick, task: Task) -> TaskId {
        self.world.tasks.schedule(due, task)
    }

    /// Runs every task due at the current tick, in `(due, id)` order.
    ///
    /// Tasks whose target is gone or dead are dropped. Returns how many tasks
    /// actually ran.
    pub fn run_due_tasks(&mut self) -> usize {
        let now = self.world.now();
        let mut ran = 0;
        while let Some((id, task)) = self.world.tasks.pop_due(now) {
            let target = task.target();
            if !self.world.actor(target).is_some_and(|a| !a.is_dead()) {
                tracing::debug!(task = id.0, actor = %target, "task target gone; dropped");
                let position = self.world.actor(target).map(|a| a.position);
                self.sink.emit(
                    EventKind::TaskDropped,
                    position.unwrap_or_default(),
                    EventPayload::Task { id, target },
                );
                continue;
            }

            let outcome = match task {
                Task::Damage {
                    delta, tag, origin, ..
                } => self.apply_damage(target, delta, tag, origin).map(|_| ()),
                Task::Attach { spec, .. } => self.attach_detailed(target, spec).map(|_| ()),
                Task::Remove {
                    selector, origin, ..
                } => self.remove_effects(target, selector, origin).map(|_| ()),
            };
            if let Err(err) = outcome {
                tracing::warn!(task = id.0, %err, "delayed task failed");
                continue;
            }
            ran += 1;
        }
        ran
    }
}
