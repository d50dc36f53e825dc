//! replay-runner: headless battle replay runner.
//!
//! Usage:
//!   replay-runner --battle data/battles/skirmish.json
//!   replay-runner --battle b.json --map data/maps/plains.json --db replay.db
//!   replay-runner --battle b.json --auto --interval-ms 250
//!   replay-runner --random-map 12 --seed 7 --save-map maps/random.json

use anyhow::{Context, Result};
use battle_replay_core::{
    config::ReplayConfig,
    engine::RoundEngine,
    event::{BattleEvent, EventLogEntry},
    map::MapGrid,
    model::GameData,
    observer::EventLog,
    playback::{PlaybackController, StepOutcome},
    store::ReplayStore,
    voxel::VoxelGenerator,
};
use std::env;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let battle = arg_value(&args, "--battle");
    let map = arg_value(&args, "--map");
    let save_map = arg_value(&args, "--save-map");
    let dump = arg_value(&args, "--dump");
    let db = arg_value(&args, "--db");
    let random_width = parse_arg(&args, "--random-map", 0usize);
    let seed = parse_arg(&args, "--seed", 42u64);
    let auto = args.iter().any(|a| a == "--auto");

    let config = ReplayConfig::load(data_dir)
        .with_context(|| format!("loading config from {data_dir}"))?;
    let interval = arg_value(&args, "--interval-ms")
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.playback.round_interval());

    println!("battle replay runner");
    println!("  data_dir:  {data_dir}");
    println!("  interval:  {interval:?}");
    println!();

    let data = match battle {
        Some(path) => {
            let data = GameData::from_file(path).with_context(|| format!("loading battle {path}"))?;
            if let Some(out) = dump {
                std::fs::write(out, data.to_json_pretty()?)
                    .with_context(|| format!("writing {out}"))?;
            }
            Some(data)
        }
        None => None,
    };

    let default_width = config.playback.default_map_width;
    let grid = if random_width > 0 {
        Some(MapGrid::random(format!("random-{seed}"), random_width, seed, 1..4))
    } else if let Some(path) = map {
        Some(MapGrid::load_with_width(path, default_width).with_context(|| format!("loading map {path}"))?)
    } else if let Some(meta) = data.as_ref().and_then(|d| d.map_metadata.as_ref()) {
        Some(MapGrid::from_data(meta, default_width)?)
    } else {
        None
    };

    if let Some(grid) = &grid {
        let mut generator = VoxelGenerator::new();
        let columns = generator.generate(grid).len();
        println!("=== MAP ===");
        println!("  name:      {}", grid.name);
        println!("  about:     {}", grid.description);
        println!("  width:     {}", grid.width());
        println!("  columns:   {columns}");
        println!("  voxels:    {}", generator.voxel_count());
        println!();
        if let Some(path) = save_map {
            grid.save(path).with_context(|| format!("saving map to {path}"))?;
        }
    }

    let (Some(battle), Some(data)) = (battle, data) else {
        return Ok(());
    };

    let engine = RoundEngine::load(&data, &config.catalog)?;
    for err in engine.spawn_errors() {
        println!("  skipped:   {err}");
    }

    let recorder = match db {
        Some(path) => {
            let store = ReplayStore::open(path)?;
            store.migrate()?;
            let run_id = format!("replay-{}", uuid::Uuid::new_v4());
            store.insert_run(&run_id, battle, chrono::Utc::now().timestamp())?;
            Some((store, run_id))
        }
        None => None,
    };

    let mut controller = PlaybackController::new(engine, EventLog::new(), interval);
    controller.start();
    record(&mut controller, recorder.as_ref())?;

    if auto {
        controller.toggle_auto_play(interval);
        record(&mut controller, recorder.as_ref())?;
        while controller.is_auto_playing() {
            std::thread::sleep(interval);
            controller.tick(interval);
            record(&mut controller, recorder.as_ref())?;
        }
    } else {
        loop {
            match controller.step_forward() {
                StepOutcome::Advanced { round_number, skipped } => {
                    if skipped > 0 {
                        log::warn!("round {round_number}: {skipped} actions skipped");
                    }
                    record(&mut controller, recorder.as_ref())?;
                }
                _ => break,
            }
        }
    }

    print_summary(&controller, recorder.as_ref())?;
    Ok(())
}

/// Drain the controller's event log, persisting it when recording.
fn record(
    controller: &mut PlaybackController<EventLog>,
    recorder: Option<&(ReplayStore, String)>,
) -> Result<()> {
    let round = controller.current_round_index();
    let events = controller.observer_mut().take();
    for event in &events {
        if let BattleEvent::RoundProcessed { round_number } = event {
            println!("  round {round_number} processed");
        }
        if let Some((store, run_id)) = recorder {
            store.append_event(&EventLogEntry::from_event(run_id, round, event)?)?;
        }
    }
    Ok(())
}

fn print_summary(
    controller: &PlaybackController<EventLog>,
    recorder: Option<&(ReplayStore, String)>,
) -> Result<()> {
    let engine = controller.engine();
    let roster = engine.roster();

    println!();
    println!("=== REPLAY SUMMARY ===");
    println!("  rounds:    {}/{}", engine.current_round_index(), engine.total_rounds());
    println!("  soldiers:  {} ({} alive)", roster.len(), roster.alive_count());
    for s in roster.iter() {
        println!(
            "  #{:<3} {:<8} {:<5} HP {:>4}  STR {:>3}  MANA {:>3}  at {}{}",
            s.id,
            s.soldier_type,
            String::from(s.camp),
            s.stats.health,
            s.stats.strength,
            s.stats.mana,
            s.position,
            if s.alive { "" } else { "  (defeated)" }
        );
    }
    if let Some((store, run_id)) = recorder {
        println!("  run_id:    {run_id}");
        println!("  events:    {}", store.event_count(run_id)?);
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
