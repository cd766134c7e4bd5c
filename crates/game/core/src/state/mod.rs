//! Authoritative simulation state.
//!
//! [`World`] owns the tick counter, both actor registries, the id allocators,
//! the delayed-work queue and the death log. Registries are ordered by id,
//! which is spawn order, so every iteration is deterministic. Engine
//! operations borrow the world mutably for their duration; nothing else holds
//! references into it.
pub mod types;

use std::collections::BTreeMap;

pub use types::{
    Actor, ActorFlags, ActorId, ActorKind, ActorTemplate, Attribution, DamageTag, EffectId,
    Immunity, ImmunitySet, LifeState, Position, SpecialRule, TaskId, Tick, UnknownImmunity,
};

use crate::config::EngineConfig;
use crate::lifecycle::DeathRecord;
use crate::schedule::DelayedWork;

/// Explicit simulation context.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    pub config: EngineConfig,
    now: Tick,

    /// Next actor id to hand out. Never reused.
    next_actor_id: u32,
    /// Next effect id to hand out. Never reused.
    next_effect_id: u64,

    enemies: BTreeMap<ActorId, Actor>,
    towers: BTreeMap<ActorId, Actor>,

    pub tasks: DelayedWork,
    deaths: Vec<DeathRecord>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl World {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            now: Tick::ZERO,
            next_actor_id: 1,
            next_effect_id: 1,
            enemies: BTreeMap::new(),
            towers: BTreeMap::new(),
            tasks: DelayedWork::new(),
            deaths: Vec::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Moves the clock forward by one tick and returns the new tick.
    pub fn advance(&mut self) -> Tick {
        self.now = self.now + 1;
        self.now
    }

    // ========================================================================
    // Registries
    // ========================================================================

    /// Creates an actor from `template` and registers it by kind.
    pub fn spawn(&mut self, template: &ActorTemplate, position: Position) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.saturating_add(1);

        let actor = Actor::from_template(id, template, position);
        tracing::debug!(actor = %id, name = %actor.name, kind = %actor.kind, "spawned");
        self.registry_mut(actor.kind).insert(id, actor);
        id
    }

    /// Puts back an actor whose id was allocated earlier (save restore).
    ///
    /// Keeps the allocator ahead of every registered id.
    pub fn insert_actor(&mut self, actor: Actor) {
        self.next_actor_id = self.next_actor_id.max(actor.id.0.saturating_add(1));
        if let Some(highest) = actor.effects.iter().map(|e| e.id()).max() {
            self.reserve_effect_ids(highest);
        }
        self.registry_mut(actor.kind).insert(actor.id, actor);
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.enemies.get(&id).or_else(|| self.towers.get(&id))
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        match self.enemies.get_mut(&id) {
            Some(actor) => Some(actor),
            None => self.towers.get_mut(&id),
        }
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.enemies.contains_key(&id) || self.towers.contains_key(&id)
    }

    /// Life state of `id`, `Removed` once it has left the registries.
    pub fn life_state(&self, id: ActorId) -> LifeState {
        self.actor(id)
            .map_or(LifeState::Removed, Actor::life_state)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Actor> {
        self.enemies.values()
    }

    pub fn towers(&self) -> impl Iterator<Item = &Actor> {
        self.towers.values()
    }

    /// Every registered id: enemies first, then towers, each in spawn order.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.enemies.keys().chain(self.towers.keys()).copied().collect()
    }

    /// Living actors registered on the same side as `id`, excluding `id`.
    pub fn allies_of(&self, id: ActorId) -> Vec<ActorId> {
        let Some(kind) = self.actor(id).map(|a| a.kind) else {
            return Vec::new();
        };
        self.registry(kind)
            .values()
            .filter(|a| a.id != id && !a.is_dead())
            .map(|a| a.id)
            .collect()
    }

    fn registry(&self, kind: ActorKind) -> &BTreeMap<ActorId, Actor> {
        match kind {
            ActorKind::Enemy => &self.enemies,
            ActorKind::Tower => &self.towers,
        }
    }

    fn registry_mut(&mut self, kind: ActorKind) -> &mut BTreeMap<ActorId, Actor> {
        match kind {
            ActorKind::Enemy => &mut self.enemies,
            ActorKind::Tower => &mut self.towers,
        }
    }

    /// Drops every actor flagged expired. Returns the removed actors.
    pub fn reap_expired(&mut self) -> Vec<Actor> {
        let mut removed = Vec::new();
        for registry in [&mut self.enemies, &mut self.towers] {
            let expired: Vec<ActorId> = registry
                .values()
                .filter(|a| a.is_expired())
                .map(|a| a.id)
                .collect();
            removed.extend(expired.iter().filter_map(|id| registry.remove(id)));
        }
        removed
    }

    // ========================================================================
    // Effects and deaths
    // ========================================================================

    /// Hands out the next engine-wide unique effect id.
    pub fn allocate_effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect_id);
        self.next_effect_id = self.next_effect_id.saturating_add(1);
        id
    }

    /// Whether `id` has already been handed out by this world's allocator.
    pub fn effect_id_issued(&self, id: EffectId) -> bool {
        id.0 < self.next_effect_id
    }

    /// Keeps future effect ids above `highest`, which is already in use.
    pub fn reserve_effect_ids(&mut self, highest: EffectId) {
        self.next_effect_id = self.next_effect_id.max(highest.0.saturating_add(1));
    }

    pub(crate) fn record_death(&mut self, record: DeathRecord) {
        self.deaths.push(record);
    }

    /// Deaths not yet collected by the caller, oldest first.
    pub fn deaths(&self) -> &[DeathRecord] {
        &self.deaths
    }

    pub fn drain_deaths(&mut self) -> Vec<DeathRecord> {
        std::mem::take(&mut self.deaths)
    }

    /// SHA-256 over the bincode encoding of the whole world.
    ///
    /// Cached stat snapshots are not part of the encoding, so two worlds that
    /// differ only in when they were last ticked hash the same.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut world = World::default();
        let a = world.spawn(&ActorTemplate::enemy("a", 10), Position::ORIGIN);
        let b = world.spawn(&ActorTemplate::tower("b", 10), Position::ORIGIN);
        assert!(a < b);

        if let Some(actor) = world.actor_mut(a) {
            actor.flags.insert(ActorFlags::EXPIRED);
        }
        assert_eq!(world.reap_expired().len(), 1);
        assert_eq!(world.life_state(a), LifeState::Removed);

        let c = world.spawn(&ActorTemplate::enemy("c", 10), Position::ORIGIN);
        assert!(c > b);
        assert_ne!(world.allocate_effect_id(), world.allocate_effect_id());
    }

    #[test]
    fn actor_ids_list_enemies_before_towers() {
        let mut world = World::default();
        let t = world.spawn(&ActorTemplate::tower("t", 10), Position::ORIGIN);
        let e = world.spawn(&ActorTemplate::enemy("e", 10), Position::ORIGIN);
        assert_eq!(world.actor_ids(), vec![e, t]);
    }

    #[test]
    fn allies_share_a_registry() {
        let mut world = World::default();
        let e1 = world.spawn(&ActorTemplate::enemy("e1", 10), Position::ORIGIN);
        let e2 = world.spawn(&ActorTemplate::enemy("e2", 10), Position::ORIGIN);
        world.spawn(&ActorTemplate::tower("t", 10), Position::ORIGIN);
        assert_eq!(world.allies_of(e1), vec![e2]);
        assert!(world.allies_of(ActorId(99)).is_empty());
    }
}
