//! Deterministic replay of a recorded activity stream in simulated time.

use std::path::{Path, PathBuf};

use clap::Args;
use deskgym_core::{ActivityEvent, Mode};
use tracing::{info, warn};

use super::session;

/// Extra simulated time, on top of one exercise, that a replay may run after
/// its last event while waiting for the controller to settle.
const SETTLE_MARGIN_SECS: f32 = 15.0;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSONL file with one activity event per line, e.g. {"type":"reading"}
    pub file: PathBuf,
    /// Simulated milliseconds between consecutive events
    #[arg(long, default_value_t = 200)]
    pub speed_ms: u64,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Seed for exercise and idle picks
    #[arg(long)]
    pub seed: Option<u64>,
    /// Accept every prompt immediately
    #[arg(long)]
    pub auto_accept: bool,
    /// Keep simulating until this many seconds have passed. Without it the
    /// replay runs past the last event until the companion is idle again.
    #[arg(long)]
    pub max_seconds: Option<f32>,
}

fn read_events(path: &Path) -> Result<Vec<ActivityEvent>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

    let mut events = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(event) => events.push(event),
            Err(e) => warn!("{}:{}: skipping bad event: {e}", path.display(), n + 1),
        }
    }
    Ok(events)
}

pub fn run(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.fps == 0 {
        return Err("--fps must be at least 1".into());
    }
    let events = read_events(&args.file)?;
    let config = session::load_config();
    let mut controller = session::build_controller(&config, Some(args.seed.unwrap_or(0)));

    let dt = 1.0 / args.fps as f32;
    let spacing = args.speed_ms as f32 / 1000.0;
    let mut clock = 0.0f32;
    let mut next_at = 0.0f32;
    let mut pending = events.iter();
    let mut next = pending.next();
    let settle_secs = config.exercise.duration_seconds + SETTLE_MARGIN_SECS;
    let mut drained_at = None;

    loop {
        // One event per spacing, at most one per frame.
        if let Some(event) = next {
            if clock >= next_at {
                controller.handle_event(event);
                next = pending.next();
                next_at += spacing;
            }
        }

        let keys = session::auto_keys(&controller, args.auto_accept);
        controller.frame(dt, keys);
        clock += dt;
        session::emit(controller.elapsed(), &controller.drain_events())?;

        let done = match (args.max_seconds, next) {
            (Some(max), _) => clock >= max,
            (None, Some(_)) => false,
            (None, None) => {
                let since = *drained_at.get_or_insert(clock);
                matches!(controller.mode(), Mode::Idle | Mode::Prompting)
                    || clock - since >= settle_secs
            }
        };
        if done {
            break;
        }
    }

    info!(
        events = events.len(),
        simulated_secs = clock,
        mode = ?controller.mode(),
        "replay finished"
    );
    Ok(())
}
