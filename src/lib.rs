/// First-in-first-out buffers.
pub mod fifo;
