//! First-in-first-out buffers.
//!
//! [`FifoBuffer`] manages the readable window over storage it is handed,
//! [`GrowableFifoBuffer`] owns its storage and reallocates when shifting the
//! window is not enough.

pub mod foreign;
pub mod growable;

mod io;

pub use foreign::{FifoBuffer, ForeignFifoBuffer};
pub use growable::{AllocError, GrowableFifoBuffer};
