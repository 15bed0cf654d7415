use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;

use reef_core::EntityKind;
use reef_simulation::{SimConfig, SimEvent, SimEventKind, Simulation};

use super::WorldSource;

pub struct RunOptions {
    pub steps: u64,
    pub step_ms: u64,
    pub seed: u64,
    pub time_scale: f64,
    pub verbose: bool,
    pub map: bool,
    pub json: bool,
}

/// What `--json` prints.
#[derive(Serialize)]
struct Snapshot<'a> {
    time_ms: u64,
    steps: u64,
    seed: u64,
    entities: usize,
    queued: usize,
    census: BTreeMap<EntityKind, usize>,
    events: &'a [SimEvent],
}

pub fn run(source: &WorldSource, opts: &RunOptions) -> Result<(), String> {
    let loaded = super::load(source)?;

    let config = SimConfig::default()
        .with_seed(opts.seed)
        .with_step_ms(opts.step_ms)
        .with_time_scale(opts.time_scale)
        .with_max_events(if opts.verbose || opts.json { 0 } else { 500 });

    let mut sim = Simulation::new(loaded.world, loaded.images, config)
        .map_err(|e| format!("simulation setup failed: {e}"))?;
    sim.arm_all()
        .map_err(|e| format!("simulation setup failed: {e}"))?;
    let dispatched = sim
        .run(opts.steps)
        .map_err(|e| format!("simulation error: {e}"))?;

    if opts.json {
        let snapshot = Snapshot {
            time_ms: sim.clock().now_ms(),
            steps: sim.clock().steps(),
            seed: opts.seed,
            entities: sim.world().len(),
            queued: sim.scheduler().len(),
            census: sim.world().census(),
            events: sim.events().events(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("cannot serialize snapshot: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    // Header
    println!(
        "  {} {} {}",
        "Simulation".bold(),
        source.world.display(),
        format!(
            "({} steps x {} ms, seed={}, time scale={})",
            opts.steps,
            opts.step_ms,
            opts.seed,
            sim.scheduler().time_scale()
        )
        .dimmed()
    );
    println!(
        "  {} events run, {} logged, {} still queued",
        dispatched,
        sim.events().len(),
        sim.scheduler().len()
    );
    println!("  Simulated time: {} ms", sim.clock().now_ms());
    println!();

    if opts.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let time_label = format!("[{:>7} ms]", event.time).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {time_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<&SimEvent> = sim
            .events()
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    SimEventKind::OctoUnloaded { .. } | SimEventKind::AtlantisSank { .. }
                )
            })
            .collect();
        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            for event in &notable {
                println!("  {}", colorize_event(&event.kind, &event.description));
            }
            println!();
        }
    }

    println!("  {}", "Population".bold().underline());
    println!();
    if sim.world().is_empty() {
        println!("  No entities left.");
    } else {
        println!("{}", super::census_table(sim.world()));
    }
    println!();

    if opts.map {
        println!("  {}", "Map".bold().underline());
        println!();
        print!("{}", sim.world().render_ascii());
        println!();
    }

    Ok(())
}

fn colorize_event(kind: &SimEventKind, description: &str) -> String {
    match kind {
        SimEventKind::FishSpawned { .. } | SimEventKind::FishMatured { .. } => {
            description.green().to_string()
        }
        SimEventKind::SeaGrassDevoured { .. } => description.red().to_string(),
        SimEventKind::QuakeStarted { .. }
        | SimEventKind::QuakeSubsided { .. }
        | SimEventKind::EntityDisplaced { .. } => description.yellow().to_string(),
        SimEventKind::FishCaught { .. }
        | SimEventKind::OctoFilled { .. }
        | SimEventKind::OctoUnloaded { .. } => description.cyan().to_string(),
        SimEventKind::AtlantisSank { .. } => description.magenta().bold().to_string(),
    }
}
