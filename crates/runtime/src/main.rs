//! Headless simulation entry point.
//!
//! Loads content from `DEFENSE_DATA_DIR`, spawns one actor per template,
//! runs a fixed number of ticks and prints a JSON summary to stdout.
use anyhow::Result;
use defense_content::{ContentFactory, TemplateCatalog};
use defense_core::Position;
use defense_runtime::{Runtime, RuntimeConfig, logging};

/// Ticks to run when no count is given on the command line.
const DEFAULT_TICKS: u64 = 600;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    logging::init(logging::DEFAULT_FILTER)?;

    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_TICKS,
    };

    let mut config = RuntimeConfig::from_env();
    // Stepping is driven from here, never by the worker's clock.
    config.tick_interval = None;

    let catalog = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_templates()?,
        None => TemplateCatalog::new(),
    };
    let names: Vec<String> = catalog.names().map(str::to_owned).collect();

    let runtime = Runtime::builder().config(config).templates(catalog).build()?;
    let handle = runtime.handle();

    for (index, name) in names.iter().enumerate() {
        let position = Position::new(index as f32, 0.0);
        let actor = handle.spawn(name.clone(), position).await?;
        tracing::info!(%actor, template = %name, "spawned");
    }

    let mut deaths = 0;
    for _ in 0..ticks {
        deaths += handle.step().await?.deaths.len();
    }

    let summary = serde_json::json!({
        "ticks": ticks,
        "deaths": deaths,
        "gold": handle.gold().await?,
        "digest": handle.digest().await?,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    drop(handle);
    runtime.shutdown().await?;
    Ok(())
}
