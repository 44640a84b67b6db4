use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use haptix_bus::Reader;
use haptix_core::{EntityId, Pacer, PhysicsCommandList, PhysicsProps, Pose, SimClock};
use haptix_viz::{DebugSettings, Ledger, LedgerEvent};
use haptix_world::{World, WorldEditor, WorldReader};
use tracing::{debug, info, warn};

use crate::{Backend, PhysicsParams, PropsTable, StepStats};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    pub step: u64,
    pub consumed_seq: Option<u64>,
    pub applied: u32,
    pub dropped_lists: u64,
    pub edits: usize,
    pub stats: StepStats,
    pub version: u64,
}

/// Owns the World and is its only publisher.
///
/// Per step: pending edits, latest command list (once per `seq`), wrenches,
/// backend advance, dynamic pose write-back, snapshot publish.
pub struct PhysicsEngine<B: Backend> {
    world: World,
    backend: B,
    props: PropsTable,
    commands: Reader<PhysicsCommandList>,
    params: PhysicsParams,
    clock: SimClock,
    last_seq: u64,
    dropped_total: u64,
    built_for: usize,
    step: u64,
    scratch: Vec<(EntityId, Pose)>,
    ledger: Ledger,
    debug: DebugSettings,
}

impl<B: Backend> PhysicsEngine<B> {
    pub fn new(world: World, commands: Reader<PhysicsCommandList>, backend: B, params: PhysicsParams) -> Self {
        let mut e = Self {
            world,
            backend,
            props: PropsTable::new(),
            commands,
            params,
            clock: SimClock::new(),
            last_seq: 0,
            dropped_total: 0,
            built_for: 0,
            step: 0,
            scratch: Vec::new(),
            ledger: Ledger::new(1024),
            debug: DebugSettings::default(),
        };
        e.rebuild_actors();
        e
    }

    pub fn with_clock(mut self, clock: SimClock) -> Self { self.clock = clock; self }
    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }

    #[inline] pub fn world(&self) -> &World { &self.world }
    /// Direct scene authoring on the owner thread. New surfaces are picked up next step.
    #[inline] pub fn world_mut(&mut self) -> &mut World { &mut self.world }
    #[inline] pub fn reader(&self) -> WorldReader { self.world.reader() }
    #[inline] pub fn editor(&mut self, capacity: usize) -> WorldEditor { self.world.editor(capacity) }
    #[inline] pub fn backend(&self) -> &B { &self.backend }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }
    #[inline] pub fn steps(&self) -> u64 { self.step }
    #[inline] pub fn dropped_lists(&self) -> u64 { self.dropped_total }

    /// Takes effect on the next [`Self::rebuild_actors`]. False for unknown ids.
    pub fn set_physics_props(&mut self, id: EntityId, props: PhysicsProps) -> bool {
        if self.world.try_surface(id).is_err() { return false; }
        self.props.set(id, props);
        true
    }

    pub fn get_physics_props(&self, id: EntityId) -> PhysicsProps { self.props.get(id) }

    pub fn rebuild_actors(&mut self) {
        self.backend.rebuild(self.world.surfaces(), &self.props);
        self.built_for = self.world.len();
        debug!(backend = self.backend.name(), surfaces = self.built_for, "actors rebuilt");
    }

    pub fn step(&mut self, dt: f64) -> StepReport {
        self.ledger.clear();
        self.step += 1;

        let edits = self.world.apply_pending_edits();
        self.scratch.clear();
        let moved: Vec<EntityId> = self.world.drain_moved().collect();
        for id in moved {
            if let Some(s) = self.world.surface(id) { self.backend.sync_pose(id, s.pose); }
        }
        if self.world.len() != self.built_for { self.rebuild_actors(); }

        let (consumed_seq, applied, dropped_lists) = self.consume_commands();

        let stats = self.backend.advance(dt);
        if stats.substeps != 1 || stats.dropped_s > 0.0 {
            self.ledger.push(LedgerEvent::Substeps { n: stats.substeps, dropped_s: stats.dropped_s });
        }

        self.backend.write_back(&mut self.scratch);
        self.world.set_poses(&self.scratch);

        let now = self.clock.now();
        let version = self.world.publish_snapshot(now);
        self.ledger.push(LedgerEvent::Published { version, count: self.world.len() as u32, timestamp: now });

        StepReport { step: self.step, consumed_seq, applied, dropped_lists, edits, stats, version }
    }

    // Latest-wins, at-most-once: a list is applied only if its seq is new.
    fn consume_commands(&mut self) -> (Option<u64>, u32, u64) {
        let list = self.commands.read();
        if list.seq <= self.last_seq { return (None, 0, 0); }

        let dropped = list.seq - self.last_seq - 1;
        if dropped > 0 {
            self.dropped_total += dropped;
            self.ledger.push(LedgerEvent::CommandsDropped { from_seq: self.last_seq + 1, to_seq: list.seq - 1 });
            debug!(dropped, seq = list.seq, "command lists overwritten before consumption");
        }
        self.last_seq = list.seq;

        // a newer list replaces one that never reached a sub-step
        self.backend.clear_wrenches();
        let mut applied = 0;
        for c in list.commands() {
            if self.backend.apply_wrench(c) { applied += 1; }
        }
        self.ledger.push(LedgerEvent::CommandsConsumed { seq: list.seq, count: list.len() as u32 });
        (Some(list.seq), applied, dropped)
    }

    /// Blocking loop at `params.outer_dt`, fed with measured wall-clock deltas.
    pub fn run(&mut self, stop: &AtomicBool) {
        info!(backend = self.backend.name(), hz = 1.0 / self.params.outer_dt, "physics loop start");
        let mut pacer = Pacer::new(self.params.outer_dt);
        let mut last = Instant::now();
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            let dt = (now - last).as_secs_f64();
            last = now;
            self.step(dt);
            if self.debug.due_print(self.step) { self.print_debug_block(); }
            if self.debug.due_json(self.step) {
                if let Err(e) = self.ledger.write_jsonl("out", "physics", self.step) {
                    warn!(error = %e, "ledger dump failed");
                }
            }
            pacer.wait();
        }
        info!(steps = self.step, dropped_lists = self.dropped_total, late = pacer.late(), "physics loop stop");
    }

    fn print_debug_block(&self) {
        self.ledger.print("physics", self.step, self.debug.max_lines);
        if !self.debug.show_bodies { return; }
        for s in self.world.surfaces().iter().take(self.debug.max_lines) {
            let p = s.pose.p;
            println!("{} {:<7} pos=({:+.4},{:+.4},{:+.4})", s.id, s.kind.name(), p.x, p.y, p.z);
        }
    }
}
