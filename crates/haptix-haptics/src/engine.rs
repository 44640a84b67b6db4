use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use haptix_bus::{DoubleBuffer, Publisher, Reader, SeqlockSlots, SlotWriter};
use haptix_core::{
    EntityId, HapticSnapshot, Pacer, PhysicsCommand, PhysicsCommandList, Pose, Role, SimClock, ToolIn,
    ToolOut, Vec3, WorldSnapshot,
};
use haptix_env::{Environment, Primitive};
use haptix_viz::{Ledger, LedgerEvent};
use haptix_world::WorldReader;
use tracing::{info, warn};

use crate::{clamp_force, coupling_force, HapticParams, HapticView, ParamError, ToolFeed};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub entity: EntityId,
    pub phi: f64,       // at the reference point
    pub point: Vec3,    // projected proxy position
    pub normal: Vec3,   // zero when the gradient vanishes
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub contact: Option<Contact>,
    pub force: Vec3,   // on the tool, world frame, clamped
    pub proxy: Vec3,
}

pub struct HapticEngine {
    params: HapticParams,
    world: WorldReader,
    tool_in: Reader<ToolIn>,
    commands: Publisher<PhysicsCommandList>,
    tool_out: Publisher<ToolOut>,
    snapshot: Publisher<HapticSnapshot>,
    roles: SlotWriter<Pose>,
    report: Publisher<TickReport>,
    clock: SimClock,
    proxy_prev: Option<Vec3>,
    tick: u64,
    warned: HashSet<EntityId>,
    ledger: Ledger,
}

impl HapticEngine {
    pub fn new(
        world: WorldReader,
        commands: Publisher<PhysicsCommandList>,
        params: HapticParams,
    ) -> Result<(HapticEngine, ToolFeed, HapticView), ParamError> {
        params.validate()?;
        let (feed_tx, tool_in) = DoubleBuffer::new(ToolIn::default());
        let (tool_out, out_rx) = DoubleBuffer::new(ToolOut::default());
        let (snapshot, snap_rx) = DoubleBuffer::new(HapticSnapshot::default());
        let (roles, roles_rx) = SeqlockSlots::new(Role::COUNT, Pose::IDENTITY);
        let (report, report_rx) = DoubleBuffer::new(TickReport::default());
        let engine = HapticEngine {
            params,
            world,
            tool_in,
            commands,
            tool_out,
            snapshot,
            roles,
            report,
            clock: SimClock::new(),
            proxy_prev: None,
            tick: 0,
            warned: HashSet::new(),
            ledger: Ledger::new(1024),
        };
        let feed = ToolFeed { tx: feed_tx, last: ToolIn::default() };
        let view = HapticView { snapshot: snap_rx, tool_out: out_rx, roles: roles_rx, report: report_rx };
        Ok((engine, feed, view))
    }

    pub fn with_clock(mut self, clock: SimClock) -> Self { self.clock = clock; self }

    #[inline] pub fn ticks(&self) -> u64 { self.tick }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Surface with the smallest phi at `x`, if it is penetrated.
    /// Equal depths keep the first surface in snapshot order.
    pub fn find_contact(&mut self, snap: &WorldSnapshot, x: Vec3) -> Option<Contact> {
        let mut best: Option<(f64, EntityId, Primitive)> = None;
        for s in snap.surfaces() {
            let prim = match Primitive::from_surface(s) {
                Ok(Some(p)) => p,
                Ok(None) => continue,
                Err(e) => {
                    if self.warned.insert(s.id) {
                        warn!(id = s.id.0, error = %e, "surface skipped by contact search");
                    }
                    self.ledger.push(LedgerEvent::SurfaceSkipped { id: s.id.0 });
                    continue;
                }
            };
            let phi = prim.phi(x);
            if best.as_ref().map_or(true, |(b, _, _)| phi < *b) { best = Some((phi, s.id, prim)); }
        }

        let (phi, entity, prim) = best?;
        if phi >= -self.params.surface_eps { return None; }
        let point = prim.project(x);
        let normal = prim.normal(point).unwrap_or(Vec3::ZERO);
        Some(Contact { entity, phi, point, normal })
    }

    pub fn tick(&mut self) -> TickReport {
        self.ledger.clear();
        self.tick += 1;
        let now = self.clock.now();
        let dt = self.params.dt;

        let (version, input) = self.tool_in.read_versioned();
        if version == 0 {
            // no device pose yet: hold still, exert nothing
            self.tool_out.write(ToolOut { timestamp: now, ..ToolOut::default() });
            self.snapshot.write(HapticSnapshot { timestamp: now, ..HapticSnapshot::default() });
            let rep = TickReport { tick: self.tick, ..TickReport::default() };
            self.report.write(rep);
            return rep;
        }
        let snap = self.world.read_snapshot();
        let device = input.device_pose;
        let reference = if self.params.reference_passthrough { device } else { input.reference_pose };

        let contact = self.find_contact(&snap, reference.p);
        let proxy = contact.map_or(reference.p, |c| c.point);

        let prev = self.proxy_prev.unwrap_or(proxy);
        let proxy_vel = (proxy - prev) / dt;
        let tool_vel = Vec3::ZERO; // no device-rate estimate
        let force = clamp_force(
            coupling_force(&self.params, device.p, tool_vel, proxy, proxy_vel),
            self.params.max_force,
        );

        let mut cmds = PhysicsCommandList::new(self.tick, now);
        if let Some(c) = contact {
            cmds.push(PhysicsCommand { target: c.entity, force: -force, point: c.point, duration: dt, timestamp: now });
            self.ledger.push(LedgerEvent::Contact { id: c.entity.0, phi: c.phi, point: c.point, normal: c.normal });
        }
        self.commands.write(cmds);

        let proxy_pose = reference.with_position(proxy);
        self.tool_out.write(ToolOut { proxy_pose, force_device: force, timestamp: now });
        self.snapshot.write(HapticSnapshot {
            device_pose: device,
            reference_pose: reference,
            proxy_pose,
            force_world: force,
            timestamp: now,
        });
        self.roles.write_batch(&[
            (Role::Tool.index(), device),
            (Role::Proxy.index(), proxy_pose),
            (Role::Reference.index(), reference),
        ]);

        self.proxy_prev = Some(proxy);
        self.ledger.push(LedgerEvent::HapticTick { tick: self.tick, force, in_contact: contact.is_some() });
        let rep = TickReport { tick: self.tick, contact, force, proxy };
        self.report.write(rep);
        rep
    }

    /// Blocking loop at `params.dt` until `stop` is set. The loop body does no
    /// I/O; readers pick up each tick through `HapticView::read_report`.
    pub fn run(&mut self, stop: &AtomicBool) {
        info!(hz = 1.0 / self.params.dt, "haptic loop start");
        let mut pacer = Pacer::new(self.params.dt);
        while !stop.load(Ordering::Relaxed) {
            self.tick();
            pacer.wait();
        }
        info!(ticks = self.tick, late = pacer.late(), "haptic loop stop");
    }
}
