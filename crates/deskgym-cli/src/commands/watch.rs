//! Real-time run: activity events arrive as JSONL on stdin.

use std::time::Duration;

use clap::Args;
use deskgym_core::activity::{self, ActivitySender};
use deskgym_core::{ActivityEvent, Mode};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::session;

#[derive(Args)]
pub struct WatchArgs {
    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Accept every prompt immediately
    #[arg(long)]
    pub auto_accept: bool,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.fps == 0 {
        return Err("--fps must be at least 1".into());
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch(args))
}

async fn read_stdin(tx: ActivitySender) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ActivityEvent>(line) {
            Ok(event) => {
                if !tx.send(event.stamped()) {
                    break;
                }
            }
            Err(e) => warn!("skipping bad event: {e}"),
        }
    }
    debug!("activity input closed");
    Ok(())
}

async fn watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = session::load_config();
    let mut controller = session::build_controller(&config, None);

    let (tx, feed) = activity::channel();
    controller.attach_feed(feed);
    let reader = tokio::spawn(read_stdin(tx));

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(args.fps)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        let keys = session::auto_keys(&controller, args.auto_accept);
        controller.frame(dt, keys);
        session::emit(controller.elapsed(), &controller.drain_events())?;

        // Input is exhausted and nothing is in progress.
        if controller.feed_closed() && matches!(controller.mode(), Mode::Idle | Mode::Prompting) {
            break;
        }
    }

    reader.await??;
    Ok(())
}
