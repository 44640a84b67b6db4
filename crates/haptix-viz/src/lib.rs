use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use haptix_core::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub print_every: u32,   // 0 = never
    pub json_every: u32,    // 0 = never
    pub show_bodies: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { print_every: 0, json_every: 0, show_bodies: false, max_lines: 8 }
    }
}

impl DebugSettings {
    #[inline] pub fn due_print(&self, tick: u64) -> bool { self.print_every != 0 && tick % self.print_every as u64 == 0 }
    #[inline] pub fn due_json(&self, tick: u64) -> bool { self.json_every != 0 && tick % self.json_every as u64 == 0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ev")]
pub enum LedgerEvent {
    HapticTick { tick: u64, force: Vec3, in_contact: bool },
    Contact { id: u32, phi: f64, point: Vec3, normal: Vec3 },
    SurfaceSkipped { id: u32 },
    CommandsConsumed { seq: u64, count: u32 },
    CommandsDropped { from_seq: u64, to_seq: u64 },
    Substeps { n: u32, dropped_s: f64 },
    Published { version: u64, count: u32, timestamp: f64 },
}

/// Bounded event log. Oldest events fall off once `cap` is reached.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    cap: usize,
    events: VecDeque<LedgerEvent>,
}

impl Ledger {
    pub fn new(cap: usize) -> Self { Self { cap, events: VecDeque::with_capacity(cap.min(4096)) } }

    pub fn push(&mut self, e: LedgerEvent) {
        if self.cap == 0 { return; }
        if self.events.len() == self.cap { self.events.pop_front(); }
        self.events.push_back(e);
    }

    pub fn clear(&mut self) { self.events.clear(); }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }

    /// Prints up to `max` events, one per line.
    pub fn print(&self, tag: &str, tick: u64, max: usize) {
        println!("--- {tag} ledger @ tick {tick} ({} events) ---", self.len());
        for e in self.events.iter().take(max) { println!("{e:?}"); }
    }

    /// Writes `<dir>/<tag>_<tick>.jsonl`.
    pub fn write_jsonl(&self, dir: impl AsRef<Path>, tag: &str, tick: u64) -> io::Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut w = BufWriter::new(File::create(dir.join(format!("{tag}_{tick:08}.jsonl")))?);
        for e in &self.events {
            serde_json::to_writer(&mut w, e)?;
            w.write_all(b"\n")?;
        }
        w.flush()
    }
}
