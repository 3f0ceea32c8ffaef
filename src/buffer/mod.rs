//! Page-oriented buffer pool prototype
//!
//! A standalone page cache: disk manager doing fixed 4096-byte page I/O,
//! LRU replacer, and a fixed-frame buffer pool with pin counts and dirty
//! tracking. It is **not wired into** the graph engine; it exists as the
//! seam a future disk-backed persistence layer would plug into.

pub mod disk;
pub mod pool;
pub mod replacer;

use std::io;
use thiserror::Error;

/// Buffer subsystem errors.
#[derive(Error, Debug)]
pub enum BufferError {
    #[error("page I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("all buffer frames are pinned")]
    NoFreeFrames,
}

pub use disk::{DiskManager, PageId};
pub use pool::{BufferPoolManager, Page, PAGE_SIZE};
pub use replacer::{FrameId, LruReplacer};
