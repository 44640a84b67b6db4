use haptix_bus::{Publisher, Reader, SlotReader};
use haptix_core::{HapticSnapshot, Pose, Role, ToolIn, ToolOut};

use crate::TickReport;

/// Device I/O side. Sole writer of `ToolIn`.
pub struct ToolFeed {
    pub(crate) tx: Publisher<ToolIn>,
    pub(crate) last: ToolIn,
}

impl ToolFeed {
    pub fn submit_tool_pose(&mut self, pose: Pose, timestamp: f64) {
        self.last.device_pose = pose;
        self.last.timestamp = timestamp;
        self.tx.write(self.last);
    }

    /// Only read by the engine when reference passthrough is off.
    pub fn submit_reference_pose(&mut self, pose: Pose, timestamp: f64) {
        self.last.reference_pose = pose;
        self.last.timestamp = timestamp;
        self.tx.write(self.last);
    }
}

/// Render/UI side. Read only.
#[derive(Clone)]
pub struct HapticView {
    pub(crate) snapshot: Reader<HapticSnapshot>,
    pub(crate) tool_out: Reader<ToolOut>,
    pub(crate) roles: SlotReader<Pose>,
    pub(crate) report: Reader<TickReport>,
}

impl HapticView {
    pub fn read_snapshot(&self) -> HapticSnapshot { self.snapshot.read() }
    pub fn read_tool_out(&self) -> ToolOut { self.tool_out.read() }
    pub fn role_pose(&self, role: Role) -> Option<Pose> { self.roles.try_read(role.index()) }
    /// Latest tick outcome; version 0 until the first tick.
    pub fn read_report(&self) -> (u64, TickReport) { self.report.read_versioned() }
}
