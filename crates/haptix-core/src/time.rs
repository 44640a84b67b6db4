use std::time::{Duration, Instant};

/// Monotonic seconds since construction. Shared epoch for all loops when cloned.
#[derive(Copy, Clone, Debug)]
pub struct SimClock { epoch: Instant }

impl SimClock {
    pub fn new() -> Self { Self { epoch: Instant::now() } }
    #[inline] pub fn now(&self) -> f64 { self.epoch.elapsed().as_secs_f64() }
}

impl Default for SimClock {
    fn default() -> Self { Self::new() }
}

/// Fixed-period deadline pacer: sleep most of the gap, spin the tail.
#[derive(Clone, Debug)]
pub struct Pacer {
    period: Duration,
    spin: Duration,
    next: Instant,
    late: u64,
}

impl Pacer {
    pub fn new(period_s: f64) -> Self {
        let period = Duration::from_secs_f64(period_s.max(1e-6));
        Self { period, spin: Duration::from_micros(200).min(period / 2), next: Instant::now() + period, late: 0 }
    }

    /// Deadlines missed by more than a full period so far.
    #[inline] pub fn late(&self) -> u64 { self.late }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if now > self.next + self.period {
            // too far behind: resync instead of bursting
            self.late += 1;
            self.next = now + self.period;
            return;
        }
        if self.next > now + self.spin { std::thread::sleep(self.next - now - self.spin); }
        while Instant::now() < self.next { std::hint::spin_loop(); }
        self.next += self.period;
    }
}
