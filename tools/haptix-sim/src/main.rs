//! Runs the haptic and physics loops on their own threads against a demo
//! scene, driving the device from a scripted trajectory.

mod config;
mod scene;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use haptix_bus::DoubleBuffer;
use haptix_core::{Pacer, PhysicsCommandList, Rgb, Role, SimClock};
use haptix_haptics::{HapticEngine, TickReport};
use haptix_physics::{Backend, PhysicsEngine, RapierBackend, ToyIntegrator};
use haptix_viz::{Ledger, LedgerEvent};
use haptix_world::World;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{BackendKind, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "haptix-sim", version, about = "Haptic + physics co-simulation demo")]
struct Opts {
    /// JSON config; CLI flags and HAPTIX_* variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Seconds of simulated wall-clock time
    #[arg(long)]
    duration: Option<f64>,

    /// Print ledgers every N loop iterations (0 = off)
    #[arg(long)]
    print_every: Option<u32>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let level = match opts.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut cfg = match &opts.config {
        Some(p) => SimConfig::load(p)?,
        None => SimConfig::default(),
    };
    cfg.apply_env();
    if let Some(b) = opts.backend { cfg.backend = b; }
    if let Some(d) = opts.duration { cfg.duration = d; }
    if let Some(n) = opts.print_every { cfg.debug.print_every = n; }
    info!(backend = ?cfg.backend, duration = cfg.duration, "haptix-sim");

    match cfg.backend {
        BackendKind::Toy => run(ToyIntegrator::new(&cfg.physics), &cfg),
        BackendKind::Rapier => run(RapierBackend::new(&cfg.physics), &cfg),
    }
}

fn run<B: Backend + Send + 'static>(backend: B, cfg: &SimConfig) -> Result<()> {
    let clock = SimClock::new();
    let mut world = World::new();
    let scene = scene::build(&mut world)?;
    world.publish_snapshot(clock.now());

    let (cmd_tx, cmd_rx) = DoubleBuffer::new(PhysicsCommandList::default());
    let (haptics, mut feed, view) = HapticEngine::new(world.reader(), cmd_tx, cfg.haptics)
        .context("haptic parameters")?;
    let mut haptics = haptics.with_clock(clock);

    let mut physics = PhysicsEngine::new(world, cmd_rx, backend, cfg.physics).with_clock(clock);
    physics.set_debug(cfg.debug);
    for (id, p) in &scene.props { physics.set_physics_props(*id, *p); }
    physics.rebuild_actors();
    let mut editor = physics.editor(256);
    let world_view = physics.reader();

    // device pose must exist before the first haptic tick
    feed.submit_tool_pose(scene::device_pose(&cfg.trajectory, 0.0), clock.now());

    let stop = Arc::new(AtomicBool::new(false));
    let haptic_thread = {
        let stop = stop.clone();
        thread::Builder::new().name("haptics".into())
            .spawn(move || { haptics.run(&stop); haptics })
            .context("spawning haptic thread")?
    };
    let physics_thread = {
        let stop = stop.clone();
        thread::Builder::new().name("physics".into())
            .spawn(move || { physics.run(&stop); physics })
            .context("spawning physics thread")?
    };

    // device + presentation side, on this thread
    let t0 = clock.now();
    let mut pacer = Pacer::new(cfg.haptics.dt);
    let mut frame = 0u64;
    let mut recoloured = false;
    loop {
        let t = clock.now() - t0;
        if t >= cfg.duration { break; }
        feed.submit_tool_pose(scene::device_pose(&cfg.trajectory, t), clock.now());

        // ~60 Hz gizmo refresh through the edit channel
        if frame % 16 == 0 {
            for role in Role::ALL {
                let Some(pose) = view.role_pose(role) else { continue };
                if let Err(e) = editor.set_pose(scene.markers[role.index()], pose) {
                    warn!(error = %e, "marker edit dropped");
                }
            }
        }
        if !recoloured && t >= 0.5 * cfg.duration {
            recoloured = editor.set_colour(scene.light, Rgb::new(1.0, 0.85, 0.1)).is_ok();
        }
        // haptic ledger output happens here, off the haptic thread
        if cfg.debug.due_print(frame + 1) {
            let h = view.read_snapshot();
            let (_, rep) = view.read_report();
            let f = h.force_world;
            let hit = rep.contact.map_or("-".to_string(), |c| c.entity.to_string());
            println!("t={t:7.3}  tick={}  contact={hit}  proxy=({:+.4},{:+.4},{:+.4})  |F|={:6.3} N",
                     rep.tick, h.proxy_pose.p.x, h.proxy_pose.p.y, h.proxy_pose.p.z, f.length());
        }
        if cfg.debug.due_json(frame + 1) {
            let (_, rep) = view.read_report();
            if let Err(e) = haptic_ledger(&rep).write_jsonl("out", "haptic", rep.tick) {
                warn!(error = %e, "haptic ledger dump failed");
            }
        }
        frame += 1;
        pacer.wait();
    }

    stop.store(true, Ordering::Relaxed);
    let haptics = haptic_thread.join().map_err(|_| anyhow!("haptic thread panicked"))?;
    let physics = physics_thread.join().map_err(|_| anyhow!("physics thread panicked"))?;

    let (version, snap) = world_view.read_versioned();
    for s in snap.surfaces() {
        let p = s.pose.p;
        println!("{} {:<7} pos=({:+.4},{:+.4},{:+.4}) role={:?}", s.id, s.kind.name(), p.x, p.y, p.z, s.role);
    }
    info!(
        haptic_ticks = haptics.ticks(),
        physics_steps = physics.steps(),
        dropped_lists = physics.dropped_lists(),
        snapshot_version = version,
        ground = %scene.ground,
        heavy = %scene.heavy,
        "done"
    );
    println!("final digest = {:02x?}", snap.digest());
    Ok(())
}

fn haptic_ledger(rep: &TickReport) -> Ledger {
    let mut l = Ledger::new(2);
    if let Some(c) = rep.contact {
        l.push(LedgerEvent::Contact { id: c.entity.0, phi: c.phi, point: c.point, normal: c.normal });
    }
    l.push(LedgerEvent::HapticTick { tick: rep.tick, force: rep.force, in_contact: rep.contact.is_some() });
    l
}
