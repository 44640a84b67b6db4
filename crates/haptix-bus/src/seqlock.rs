use std::cell::UnsafeCell;
use std::hint::spin_loop;
use std::sync::atomic::{fence, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

struct Generation<T> {
    seq: AtomicU64,
    slots: Box<[UnsafeCell<T>]>,
}

impl<T: Copy> Generation<T> {
    fn new(len: usize, init: T) -> Self {
        Self { seq: AtomicU64::new(0), slots: (0..len).map(|_| UnsafeCell::new(init)).collect() }
    }

    // Caller must be the single writer.
    unsafe fn write_all(&self, items: &[(usize, T)]) {
        self.seq.fetch_add(1, Ordering::Relaxed);
        fence(Ordering::Release);
        for &(i, v) in items {
            if let Some(cell) = self.slots.get(i) { std::ptr::write_volatile(cell.get(), v); }
        }
        self.seq.fetch_add(1, Ordering::Release);
    }
}

struct Shared<T> {
    gens: [Generation<T>; 2],
    current: AtomicUsize,
}

unsafe impl<T: Copy + Send> Sync for Shared<T> {}

/// Fixed array of independently updated slots behind a per-generation seqlock.
///
/// The writer always mutates the generation readers are not pointed at, flips
/// `current`, then patches the other generation so both stay in sync.
pub struct SeqlockSlots;

impl SeqlockSlots {
    pub fn new<T: Copy + Send>(len: usize, init: T) -> (SlotWriter<T>, SlotReader<T>) {
        let shared = Arc::new(Shared {
            gens: [Generation::new(len, init), Generation::new(len, init)],
            current: AtomicUsize::new(0),
        });
        (SlotWriter { shared: shared.clone() }, SlotReader { shared })
    }
}

pub struct SlotWriter<T: Copy + Send> {
    shared: Arc<Shared<T>>,
}

impl<T: Copy + Send> SlotWriter<T> {
    #[inline] pub fn len(&self) -> usize { self.shared.gens[0].slots.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Out-of-range indices are ignored.
    pub fn write(&mut self, i: usize, v: T) { self.write_batch(&[(i, v)]); }

    /// One flip for the whole batch.
    pub fn write_batch(&mut self, items: &[(usize, T)]) {
        if items.is_empty() { return; }
        let sh = &*self.shared;
        let cur = sh.current.load(Ordering::Relaxed);
        let stale = 1 - cur;
        // SAFETY: &mut self makes this the only writer.
        unsafe { sh.gens[stale].write_all(items); }
        sh.current.store(stale, Ordering::Release);
        unsafe { sh.gens[cur].write_all(items); }
    }

    pub fn reader(&self) -> SlotReader<T> { SlotReader { shared: self.shared.clone() } }
}

pub struct SlotReader<T: Copy + Send> {
    shared: Arc<Shared<T>>,
}

impl<T: Copy + Send> Clone for SlotReader<T> {
    fn clone(&self) -> Self { SlotReader { shared: self.shared.clone() } }
}

impl<T: Copy + Send> SlotReader<T> {
    #[inline] pub fn len(&self) -> usize { self.shared.gens[0].slots.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn try_read(&self, i: usize) -> Option<T> {
        let sh = &*self.shared;
        if i >= self.len() { return None; }
        loop {
            let g = &sh.gens[sh.current.load(Ordering::Acquire)];
            let s1 = g.seq.load(Ordering::Acquire);
            if s1 & 1 == 1 { spin_loop(); continue; }
            // SAFETY: discarded unless seq is unchanged.
            let v = unsafe { std::ptr::read_volatile(g.slots[i].get()) };
            fence(Ordering::Acquire);
            if g.seq.load(Ordering::Relaxed) == s1 { return Some(v); }
            spin_loop();
        }
    }
}
