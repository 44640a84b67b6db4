use std::cell::UnsafeCell;
use std::hint::spin_loop;
use std::sync::atomic::{fence, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/* ---- shared state ---- */

struct Slot<T> {
    seq: AtomicU64,                // odd while the writer is inside
    val: UnsafeCell<(u64, T)>,     // (version, value)
}

struct Shared<T> {
    slots: [Slot<T>; 2],
    active: AtomicUsize,
}

// Writes are confined to the single Publisher; readers only copy out under seq validation.
unsafe impl<T: Copy + Send> Sync for Shared<T> {}

/// Two-slot value store with an atomically flipped active index.
pub struct DoubleBuffer;

impl DoubleBuffer {
    /// `init` is visible to readers as version 0 ("never published").
    pub fn new<T: Copy + Send>(init: T) -> (Publisher<T>, Reader<T>) {
        let shared = Arc::new(Shared {
            slots: [
                Slot { seq: AtomicU64::new(0), val: UnsafeCell::new((0, init)) },
                Slot { seq: AtomicU64::new(0), val: UnsafeCell::new((0, init)) },
            ],
            active: AtomicUsize::new(0),
        });
        (Publisher { shared: shared.clone(), version: 0 }, Reader { shared })
    }
}

/* ---- writer ---- */

/// Sole writer. Not `Clone`; `write` needs `&mut self`.
pub struct Publisher<T: Copy + Send> {
    shared: Arc<Shared<T>>,
    version: u64,
}

impl<T: Copy + Send> Publisher<T> {
    pub fn write(&mut self, v: T) {
        let sh = &*self.shared;
        let idx = 1 - sh.active.load(Ordering::Relaxed);
        let slot = &sh.slots[idx];
        self.version += 1;

        slot.seq.fetch_add(1, Ordering::Relaxed);
        fence(Ordering::Release);
        // SAFETY: only this publisher writes; concurrent readers of this slot
        // will see an odd/changed seq and discard what they copied.
        unsafe { std::ptr::write_volatile(slot.val.get(), (self.version, v)); }
        slot.seq.fetch_add(1, Ordering::Release);

        sh.active.store(idx, Ordering::Release);
    }

    #[inline] pub fn version(&self) -> u64 { self.version }
    pub fn reader(&self) -> Reader<T> { Reader { shared: self.shared.clone() } }
}

/* ---- readers ---- */

pub struct Reader<T: Copy + Send> {
    shared: Arc<Shared<T>>,
}

impl<T: Copy + Send> Clone for Reader<T> {
    fn clone(&self) -> Self { Reader { shared: self.shared.clone() } }
}

impl<T: Copy + Send> Reader<T> {
    #[inline] pub fn read(&self) -> T { self.read_versioned().1 }

    /// Returns (version, value). Version 0 means nothing was published yet.
    pub fn read_versioned(&self) -> (u64, T) {
        let sh = &*self.shared;
        loop {
            let slot = &sh.slots[sh.active.load(Ordering::Acquire)];
            let s1 = slot.seq.load(Ordering::Acquire);
            if s1 & 1 == 1 { spin_loop(); continue; }
            // SAFETY: value is only used if seq is unchanged afterwards.
            let v = unsafe { std::ptr::read_volatile(slot.val.get()) };
            fence(Ordering::Acquire);
            if slot.seq.load(Ordering::Relaxed) == s1 { return v; }
            spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpublished_read_is_version_zero() {
        let (_w, r) = DoubleBuffer::new(7u32);
        assert_eq!(r.read_versioned(), (0, 7));
    }

    #[test]
    fn reads_latest_write() {
        let (mut w, r) = DoubleBuffer::new(0u32);
        w.write(1);
        w.write(2);
        w.write(3);
        assert_eq!(r.read_versioned(), (3, 3));
        assert_eq!(r.clone().read(), 3);
        assert_eq!(w.version(), 3);
    }

    #[test]
    fn consecutive_reads_without_write_are_identical() {
        let (mut w, r) = DoubleBuffer::new([0u64; 4]);
        w.write([5, 6, 7, 8]);
        assert_eq!(r.read_versioned(), r.read_versioned());
    }
}
