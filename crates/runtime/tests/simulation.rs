//! End-to-end world update scenarios driven through `Simulation`.

use defense_content::{ActorLoader, TemplateCatalog};
use defense_core::{
    DamageTag, EffectKind, EffectSpec, EventKind, LifeState, Position, RecordingSink, Task, Tick,
};
use defense_runtime::{Simulation, TracingSink};

const CATALOG: &str = r#"
[
    (name: "archer", kind: tower, max_hp: 1, boss_damage_ratio: 2.0),
    (name: "runner", max_hp: 40, bounty: 3),
    (
        name: "shaman",
        max_hp: 60,
        bounty: 10,
        on_death: [HealAllies(amount: 25), CurseKiller(effect: Stun, duration: 30)],
    ),
    (
        name: "bomber",
        max_hp: 20,
        bounty: 1,
        on_death: [DelayedBurst(delay: 3, damage: 50, tag: explosion)],
    ),
    (name: "warlord", max_hp: 300, bounty: 50, boss: true, immunities: ["fireresist"]),
]
"#;

fn simulation() -> Simulation {
    let catalog: TemplateCatalog = ActorLoader::parse(CATALOG).expect("catalog parses");
    Simulation::new(Default::default(), catalog, 0)
}

#[test]
fn burning_enemy_dies_pays_out_and_is_reaped() {
    let mut sim = simulation();
    let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
    let runner = sim.spawn("runner", Position::new(5.0, 0.0)).unwrap();

    let mut sink = RecordingSink::new();
    let burn = EffectSpec::new(
        EffectKind::Burn {
            damage: 10,
            period: 1,
        },
        100,
    )
    .from_origin(archer);
    assert!(sim.engine(&mut sink).attach(runner, burn).unwrap());

    let mut reaped_at = None;
    for _ in 0..10 {
        let report = sim.step(&mut sink);
        if report.reaped.contains(&runner) {
            reaped_at = Some(report.tick);
            assert_eq!(report.payouts.len(), 1);
            break;
        }
    }

    // 40 HP at 10 per tick: dead on tick 4, reaped in the same step.
    assert_eq!(reaped_at, Some(Tick(4)));
    assert_eq!(sim.treasury().gold(), 3);
    assert_eq!(sim.world().life_state(runner), LifeState::Removed);
    let archer = sim.world().actor(archer).unwrap();
    assert_eq!(archer.attribution.kills, 1);
    assert_eq!(archer.attribution.damage_dealt, 40);
    assert_eq!(sink.count(EventKind::Death), 1);
}

#[test]
fn death_hooks_heal_allies_and_curse_the_killer() {
    let mut sim = simulation();
    let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
    let shaman = sim.spawn("shaman", Position::ORIGIN).unwrap();
    let runner = sim.spawn("runner", Position::ORIGIN).unwrap();

    let mut sink = RecordingSink::new();
    {
        let mut engine = sim.engine(&mut sink);
        engine
            .apply_damage(runner, -30, DamageTag::Physical, Some(archer))
            .unwrap();
        let result = engine
            .apply_damage(shaman, -60, DamageTag::Physical, Some(archer))
            .unwrap();
        assert!(result.actor_died);
    }

    assert_eq!(sim.world().actor(runner).map(|a| a.hp()), Some(35));
    let mut sink = TracingSink::new();
    let stats = sim.engine(&mut sink).effective_stats(archer).unwrap();
    assert!(!stats.can_attack());

    let report = sim.step(&mut sink);
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].killer, Some(archer));
    assert_eq!(sim.treasury().gold(), 10);
}

#[test]
fn delayed_burst_hits_the_killer_later_only_if_it_lives() {
    let mut sim = simulation();
    let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
    let bomber = sim.spawn("bomber", Position::ORIGIN).unwrap();
    let warlord = sim.spawn("warlord", Position::ORIGIN).unwrap();

    let mut sink = RecordingSink::new();
    sim.engine(&mut sink)
        .apply_damage(bomber, -20, DamageTag::Physical, Some(warlord))
        .unwrap();
    assert_eq!(sim.world().tasks.len(), 1);

    for _ in 0..2 {
        sim.step(&mut sink);
    }
    assert_eq!(sim.world().actor(warlord).map(|a| a.hp()), Some(300));

    let report = sim.step(&mut sink);
    assert_eq!(report.tasks_run, 1);
    assert_eq!(sim.world().actor(warlord).map(|a| a.hp()), Some(250));

    // A burst aimed at an actor that died first is dropped.
    sim.world_mut().tasks.schedule(
        Tick(5),
        Task::Damage {
            target: archer,
            delta: -10,
            tag: DamageTag::Explosion,
            origin: None,
        },
    );
    sim.engine(&mut sink)
        .apply_damage(archer, -1, DamageTag::Physical, None)
        .unwrap();
    sim.step(&mut sink);
    let report = sim.step(&mut sink);
    assert_eq!(report.tick, Tick(5));
    assert_eq!(report.tasks_run, 0);
    assert_eq!(sink.count(EventKind::TaskDropped), 1);
}

#[test]
fn boss_damage_and_resistance_compose() {
    let mut sim = simulation();
    let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
    let warlord = sim.spawn("warlord", Position::ORIGIN).unwrap();

    let mut sink = RecordingSink::new();
    let mut engine = sim.engine(&mut sink);
    engine
        .attach(warlord, EffectSpec::new(EffectKind::Weaken { ratio: 1.5 }, 10))
        .unwrap();
    // -10 × 2.0 boss factor × 1.5 weaken × 0.5 fire resist = -15
    let result = engine
        .apply_damage(warlord, -10, DamageTag::Fire, Some(archer))
        .unwrap();
    assert_eq!(result.effective_delta, -15);
    assert_eq!(engine.world().actor(warlord).map(|a| a.hp()), Some(285));
}

#[test]
fn identical_runs_produce_identical_digests() {
    let run = || {
        let mut sim = simulation();
        let archer = sim.spawn("archer", Position::ORIGIN).unwrap();
        let warlord = sim.spawn("warlord", Position::ORIGIN).unwrap();
        let mut sink = RecordingSink::new();
        {
            let mut engine = sim.engine(&mut sink);
            let poison = EffectSpec::new(
                EffectKind::Poison {
                    damage: 7,
                    period: 2,
                },
                20,
            )
            .from_origin(archer);
            engine.attach(warlord, poison).unwrap();
            engine
                .attach(warlord, EffectSpec::new(EffectKind::MysteryShield { charges: 1 }, 50))
                .unwrap();
            engine.schedule(
                Tick(6),
                Task::Attach {
                    target: warlord,
                    spec: EffectSpec::new(EffectKind::Slow { ratio: 0.5 }, 10),
                },
            );
        }
        for _ in 0..12 {
            sim.step(&mut sink);
        }
        (sim.digest_hex().unwrap(), sink.kinds())
    };

    let (first_digest, first_events) = run();
    let (second_digest, second_events) = run();
    assert_eq!(first_digest, second_digest);
    assert_eq!(first_events, second_events);
}

#[test]
fn snapshot_restore_preserves_pending_work_and_effects() {
    let mut sim = simulation();
    let runner = sim.spawn("runner", Position::ORIGIN).unwrap();
    let mut sink = RecordingSink::new();
    {
        let mut engine = sim.engine(&mut sink);
        engine
            .attach(runner, EffectSpec::new(EffectKind::Slow { ratio: 0.7 }, 30))
            .unwrap();
        engine.schedule(
            Tick(2),
            Task::Damage {
                target: runner,
                delta: -5,
                tag: DamageTag::Ice,
                origin: None,
            },
        );
    }
    sim.step(&mut sink);

    let bytes = sim.snapshot().unwrap();
    let mut restored = simulation();
    restored.restore(&bytes).unwrap();
    assert_eq!(restored.digest_hex().unwrap(), sim.digest_hex().unwrap());

    sim.step(&mut sink);
    restored.step(&mut sink);
    assert_eq!(restored.world().actor(runner).map(|a| a.hp()), Some(35));
    assert_eq!(restored.digest_hex().unwrap(), sim.digest_hex().unwrap());
}
