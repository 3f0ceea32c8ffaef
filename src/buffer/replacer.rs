//! LRU victim selection for buffer frames

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Frame slot index inside the buffer pool.
pub type FrameId = usize;

/// Tracks evictable frames in least-recently-used order.
///
/// A frame is a victim candidate only while its page is unpinned: the
/// pool calls [`LruReplacer::pin`] when a page gains its first pin
/// (detaching the frame) and [`LruReplacer::unpin`] when the pin count
/// drops to zero (attaching it as most recently used).
pub struct LruReplacer {
    inner: Mutex<LruCache<FrameId, ()>>,
}

impl LruReplacer {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        LruReplacer {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Evict the least recently used frame, if any frame is evictable.
    pub fn victim(&self) -> Option<FrameId> {
        self.inner.lock().unwrap().pop_lru().map(|(frame, ())| frame)
    }

    /// Remove a frame from the candidate set (its page got pinned).
    pub fn pin(&self, frame: FrameId) {
        self.inner.lock().unwrap().pop(&frame);
    }

    /// Add a frame to the candidate set as most recently used. Already
    /// tracked frames keep their position.
    pub fn unpin(&self, frame: FrameId) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.contains(&frame) {
            inner.push(frame, ());
        }
    }

    /// Number of evictable frames.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
