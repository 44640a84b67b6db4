use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use haptix_bus::{DoubleBuffer, EditRing, SeqlockSlots};
use proptest::prelude::*;

// Every lane carries the same word; a torn read would mix two writes.
type Lanes = [u64; 16];

fn uniform(v: &Lanes) -> bool { v.iter().all(|x| *x == v[0]) }

#[test]
fn double_buffer_never_tears() {
    let (mut w, r) = DoubleBuffer::new([0u64; 16]);
    let stop = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..3).map(|_| {
        let r = r.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            let mut last = 0u64;
            while !stop.load(Ordering::Relaxed) {
                let (ver, v) = r.read_versioned();
                assert!(uniform(&v), "torn read at version {ver}");
                assert!(ver >= last, "version went backwards");
                last = ver;
            }
        })
    }).collect();
    for k in 1..=20_000u64 { w.write([k; 16]); }
    stop.store(true, Ordering::Relaxed);
    for h in readers { h.join().unwrap(); }
    assert_eq!(r.read(), [20_000u64; 16]);
}

#[test]
fn seqlock_slots_never_tear() {
    let (mut w, r) = SeqlockSlots::new(8, [0u64; 16]);
    let stop = Arc::new(AtomicBool::new(false));
    let h = {
        let stop = stop.clone();
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                for i in 0..8 {
                    let v = r.try_read(i).unwrap();
                    assert!(uniform(&v));
                }
            }
        })
    };
    for k in 1..=10_000u64 { w.write((k % 8) as usize, [k; 16]); }
    stop.store(true, Ordering::Relaxed);
    h.join().unwrap();
}

#[test]
fn ring_delivers_in_order_across_threads() {
    let (mut tx, mut rx) = EditRing::new::<u64>(16);
    let h = thread::spawn(move || {
        let mut next = 0u64;
        while next < 5_000 {
            if let Some(v) = rx.pop() { assert_eq!(v, next); next += 1; }
        }
    });
    let mut k = 0u64;
    while k < 5_000 {
        if tx.push(k).is_ok() { k += 1; } else { std::hint::spin_loop(); }
    }
    h.join().unwrap();
}

proptest! {
    #[test]
    fn slots_hold_last_write_per_index(writes in prop::collection::vec((0usize..6, any::<i64>()), 0..64)) {
        let (mut w, r) = SeqlockSlots::new(6, 0i64);
        let mut model = [0i64; 6];
        for (i, v) in &writes {
            w.write(*i, *v);
            model[*i] = *v;
        }
        for (i, m) in model.iter().enumerate() {
            prop_assert_eq!(r.try_read(i), Some(*m));
        }
    }

    #[test]
    fn double_buffer_version_counts_writes(vals in prop::collection::vec(any::<u32>(), 1..32)) {
        let (mut w, r) = DoubleBuffer::new(0u32);
        for v in &vals { w.write(*v); }
        prop_assert_eq!(r.read_versioned(), (vals.len() as u64, *vals.last().unwrap()));
    }
}
