//! Runtime orchestration through the async handle.

use std::time::Duration;

use defense_content::TemplateCatalog;
use defense_core::{
    ActorTemplate, AttachOutcome, DamageRequest, DamageTag, EffectKind, EffectSpec, Position,
};
use defense_runtime::{
    EconomyEvent, Event, LifecycleEvent, Runtime, RuntimeConfig, RuntimeError, Topic,
};

fn catalog() -> TemplateCatalog {
    let mut catalog = TemplateCatalog::new();
    catalog
        .insert(ActorTemplate::enemy("imp", 25).with_bounty(7))
        .unwrap();
    catalog
        .insert(ActorTemplate::tower("cannon", 1).with_boss_damage_ratio(1.5))
        .unwrap();
    catalog
}

#[tokio::test]
async fn commands_drive_the_world_and_publish_events() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            starting_gold: 100,
            ..RuntimeConfig::default()
        })
        .templates(catalog())
        .build()
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut economy = handle.subscribe(Topic::Economy);

    let cannon = handle.spawn("cannon", Position::ORIGIN).await.unwrap();
    let imp = handle.spawn("imp", Position::new(4.0, 0.0)).await.unwrap();
    assert!(matches!(
        lifecycle.recv().await,
        Ok(Event::Lifecycle(LifecycleEvent::Spawned { .. }))
    ));

    let outcome = handle
        .attach(imp, EffectSpec::new(EffectKind::Slow { ratio: 0.6 }, 10))
        .await
        .unwrap();
    assert!(matches!(outcome, AttachOutcome::Applied(_)));
    assert_eq!(handle.effective_stats(imp).await.unwrap().speed, 0.6);

    let result = handle
        .apply_damage(DamageRequest::new(imp, -25, DamageTag::Physical).from_origin(cannon))
        .await
        .unwrap();
    assert!(result.actor_died);

    let report = handle.step().await.unwrap();
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(handle.gold().await.unwrap(), 107);

    match economy.recv().await {
        Ok(Event::Economy(EconomyEvent::GoldChanged { delta, balance, .. })) => {
            assert_eq!(delta, 7);
            assert_eq!(balance, 107);
        }
        other => panic!("unexpected {other:?}"),
    }

    let world = handle.query_world().await.unwrap();
    assert!(world.actor(imp).is_none());
    assert_eq!(handle.digest().await.unwrap().len(), 64);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_template_and_actor_are_errors() {
    let runtime = Runtime::builder().templates(catalog()).build().unwrap();
    let handle = runtime.handle();

    assert!(matches!(
        handle.spawn("dragon", Position::ORIGIN).await,
        Err(RuntimeError::UnknownTemplate(_))
    ));
    assert!(matches!(
        handle.effective_stats(defense_core::ActorId(99)).await,
        Err(RuntimeError::Engine(_))
    ));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn tick_interval_steps_without_requests() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            tick_interval: Some(Duration::from_millis(5)),
            ..RuntimeConfig::default()
        })
        .build()
        .unwrap();
    let handle = runtime.handle();
    let mut ticks = handle.subscribe(Topic::Tick);

    for _ in 0..3 {
        assert!(matches!(ticks.recv().await, Ok(Event::Tick(_))));
    }
    let world = handle.query_world().await.unwrap();
    assert!(world.now().0 >= 3);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn content_directory_is_loaded_at_build() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "resist_ratio = 0.25\n").unwrap();
    std::fs::write(
        dir.path().join("actors.ron"),
        r#"[(name: "slime", max_hp: 10, immunities: ["poisonresist"])]"#,
    )
    .unwrap();

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        })
        .build()
        .unwrap();
    let handle = runtime.handle();

    let slime = handle.spawn("slime", Position::ORIGIN).await.unwrap();
    let result = handle
        .apply_damage(DamageRequest::new(slime, -8, DamageTag::Poison))
        .await
        .unwrap();
    assert_eq!(result.effective_delta, -2);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn broken_content_fails_the_build() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("actors.ron"), "not ron").unwrap();

    let result = Runtime::builder()
        .config(RuntimeConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        })
        .build();
    assert!(matches!(result, Err(RuntimeError::Content(_))));
}
