//! Lock-free single-writer publication primitives shared by every loop.
//!
//! Readers never block and never observe a torn value; a read may be one
//! write stale. Each constructor hands out exactly one writer handle.

pub mod double_buffer;
pub mod seqlock;
pub mod ring;
pub mod error;

pub use double_buffer::{DoubleBuffer, Publisher, Reader};
pub use seqlock::{SeqlockSlots, SlotWriter, SlotReader};
pub use ring::{EditRing, RingProducer, RingConsumer};
pub use error::BusError;
