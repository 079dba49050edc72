// Acidflow Host - Headless real-time runner
// Drives the engine from the system clock, polls the watchdog, and logs gameplay cues

use std::path::PathBuf;
use std::time::{Duration, Instant};

use acidflow_lib::engine::{Engine, NullBackend, Timeline, Transport};
use acidflow_lib::events::{MusicEvent, TraceEntry, TraceWriter};
use acidflow_lib::patterns::Genre;
use acidflow_lib::settings::EngineConfig;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// How often the timeline catches up with the wall clock
const PUMP_INTERVAL: Duration = Duration::from_millis(25);

/// Steps are handed to the backend this far ahead of time (seconds)
const LOOKAHEAD_SECS: f64 = 0.1;

/// Share of hi-hat hits that spawn an obstacle
const OBSTACLE_CHANCE: f64 = 0.2;

/// Share of acid notes that spawn a power-up
const POWER_UP_CHANCE: f64 = 0.1;

#[derive(Parser)]
#[command(name = "acidflow", version, about = "Procedural acid techno arrangement engine")]
struct Args {
    /// Config file (defaults to <config dir>/acidflow/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed random seed for a reproducible arrangement
    #[arg(long)]
    seed: Option<u64>,

    /// Tempo override (40-240)
    #[arg(long)]
    bpm: Option<f64>,

    /// techno, dnb, tropical, dubstep, or trance
    #[arg(short, long)]
    genre: Option<Genre>,

    /// Energy/tension preset (chill, driving, peak, acid, dark, hypnotic, anthem)
    #[arg(short, long)]
    preset: Option<String>,

    /// Stop after this many bars
    #[arg(long)]
    bars: Option<u64>,

    /// Append every broadcast event to this JSONL file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Log every broadcast event at debug level
    #[arg(long)]
    debug_events: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => EngineConfig::default_path()?,
    };
    let mut config = EngineConfig::load_or_default(&config_path)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.bpm.is_some() {
        config.bpm = args.bpm;
    }
    if let Some(genre) = args.genre {
        config.genre = genre;
    }
    if args.preset.is_some() {
        config.preset = args.preset;
    }
    config.validate()?;
    let config = config.clamped();

    let timeline = Timeline::with_lookahead(config.effective_bpm(), LOOKAHEAD_SECS);
    let mut engine = Engine::new(timeline, NullBackend, &config);
    engine.bus_mut().set_debug_mode(args.debug_events);
    let events = engine.bus_mut().channel();

    engine.start();
    let session = engine.session_id().unwrap_or_else(Uuid::nil);
    let trace = args.trace.map(TraceWriter::new);
    let consumer = tokio::spawn(consume_events(events, session, trace));

    let clock = Instant::now();
    let mut pump = tokio::time::interval(PUMP_INTERVAL);
    let mut watchdog = tokio::time::interval(Duration::from_secs_f64(config.watchdog.poll_interval_secs));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut shown_bar = None;

    loop {
        tokio::select! {
            _ = pump.tick() => {
                engine.transport_mut().advance_to(clock.elapsed().as_secs_f64());
                engine.pump();

                if let Some(ctx) = engine.current_bar() {
                    if shown_bar != Some(ctx.bar) {
                        shown_bar = Some(ctx.bar);
                        log::info!("{}", engine.status().summary());
                    }
                }
                if let Some(limit) = args.bars {
                    if engine.arrangement().current_bar > limit {
                        log::info!("Played {} bars", limit);
                        break;
                    }
                }
            }
            _ = watchdog.tick() => {
                let now = engine.transport().now();
                engine.poll_watchdog(now);
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                }
                log::info!("Interrupted");
                break;
            }
        }
    }

    engine.stop();
    // Dropping the engine closes the event channel
    drop(engine);
    consumer.await?;
    Ok(())
}

/// Turn broadcast events into gameplay cues and optionally trace them.
/// Trace entries are flushed once per bar.
async fn consume_events(mut events: UnboundedReceiver<MusicEvent>, session: Uuid, trace: Option<TraceWriter>) {
    let mut rng = Pcg32::from_entropy();
    let mut pending: Vec<TraceEntry> = Vec::new();
    let mut bar = None;

    while let Some(event) = events.recv().await {
        match &event {
            MusicEvent::Kick { time } => log::trace!("cue: beat @ {:.3}", time),
            MusicEvent::Snare { time } => log::trace!("cue: enemy @ {:.3}", time),
            MusicEvent::Hihat { time } => {
                if rng.gen_bool(OBSTACLE_CHANCE) {
                    log::debug!("cue: obstacle @ {:.3}", time);
                }
            }
            MusicEvent::Acid { time, note } => {
                if rng.gen_bool(POWER_UP_CHANCE) {
                    log::debug!("cue: power-up ({}) @ {:.3}", note, time);
                }
            }
            MusicEvent::Stab { time } => log::trace!("cue: drifter @ {:.3}", time),
            MusicEvent::Sub { time, .. } => log::trace!("cue: grid pulse @ {:.3}", time),
            MusicEvent::Bar { bar: n } => bar = Some(*n),
            MusicEvent::Section { section } => log::info!("Section: {}", section),
            MusicEvent::TempoChange { bpm } => log::info!("Tempo: {:.0} BPM", bpm),
            MusicEvent::EnergyChange { level } => log::info!("Energy: {:.0}", level),
            MusicEvent::TensionChange { level } => log::info!("Tension: {:.0}", level),
            MusicEvent::TrackMute { track } => log::info!("Muted {}", track),
            MusicEvent::TrackUnmute { track } => log::info!("Unmuted {}", track),
        }

        if let Some(writer) = &trace {
            let is_bar = matches!(event, MusicEvent::Bar { .. });
            let entry = TraceEntry::new(session, event);
            pending.push(match bar {
                Some(n) => entry.at_bar(n),
                None => entry,
            });
            if is_bar {
                flush_trace(writer, &mut pending);
            }
        }
    }

    if let Some(writer) = &trace {
        flush_trace(writer, &mut pending);
    }
}

fn flush_trace(writer: &TraceWriter, pending: &mut Vec<TraceEntry>) {
    if pending.is_empty() {
        return;
    }
    if let Err(e) = writer.write_batch(pending) {
        log::warn!("Failed to write trace to {}: {}", writer.path().display(), e);
    }
    pending.clear();
}
