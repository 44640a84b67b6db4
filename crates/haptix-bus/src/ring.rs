use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Shared<T> {
    buf: Box<[UnsafeCell<MaybeUninit<T>>]>,
    head: AtomicUsize, // next read, owned by consumer
    tail: AtomicUsize, // next write, owned by producer
}

unsafe impl<T: Copy + Send> Sync for Shared<T> {}

/// Bounded single-producer/single-consumer FIFO for `Copy` messages.
pub struct EditRing;

impl EditRing {
    pub fn new<T: Copy + Send>(capacity: usize) -> (RingProducer<T>, RingConsumer<T>) {
        let capacity = capacity.max(1);
        let shared = Arc::new(Shared {
            buf: (0..capacity).map(|_| UnsafeCell::new(MaybeUninit::uninit())).collect(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        });
        (RingProducer { shared: shared.clone() }, RingConsumer { shared })
    }
}

pub struct RingProducer<T: Copy + Send> { shared: Arc<Shared<T>> }
pub struct RingConsumer<T: Copy + Send> { shared: Arc<Shared<T>> }

impl<T: Copy + Send> RingProducer<T> {
    #[inline] pub fn capacity(&self) -> usize { self.shared.buf.len() }

    /// Hands `v` back when the ring is full.
    pub fn push(&mut self, v: T) -> Result<(), T> {
        let sh = &*self.shared;
        let tail = sh.tail.load(Ordering::Relaxed);
        let head = sh.head.load(Ordering::Acquire);
        if tail.wrapping_sub(head) >= sh.buf.len() { return Err(v); }
        // SAFETY: slot `tail` is not visible to the consumer until tail is bumped.
        unsafe { (*sh.buf[tail % sh.buf.len()].get()).write(v); }
        sh.tail.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }
}

impl<T: Copy + Send> RingConsumer<T> {
    pub fn pop(&mut self) -> Option<T> {
        let sh = &*self.shared;
        let head = sh.head.load(Ordering::Relaxed);
        let tail = sh.tail.load(Ordering::Acquire);
        if head == tail { return None; }
        // SAFETY: producer initialized this slot and published it with Release on tail.
        let v = unsafe { (*sh.buf[head % sh.buf.len()].get()).assume_init() };
        sh.head.store(head.wrapping_add(1), Ordering::Release);
        Some(v)
    }

    pub fn len(&self) -> usize {
        let sh = &*self.shared;
        sh.tail.load(Ordering::Acquire).wrapping_sub(sh.head.load(Ordering::Relaxed))
    }
    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }
}
