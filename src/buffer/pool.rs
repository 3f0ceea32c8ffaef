//! Fixed-capacity page buffer over a disk manager

use super::disk::{DiskManager, PageId};
use super::replacer::{FrameId, LruReplacer};
use super::BufferError;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::trace;

/// Fixed page size, matching the disk manager's I/O unit.
pub const PAGE_SIZE: usize = 4096;

/// One in-memory page frame.
#[derive(Debug)]
pub struct Page {
    data: [u8; PAGE_SIZE],
    page_id: PageId,
    pin_count: u32,
    is_dirty: bool,
}

impl Page {
    fn empty() -> Self {
        Page {
            data: [0; PAGE_SIZE],
            page_id: 0,
            pin_count: 0,
            is_dirty: false,
        }
    }

    pub fn id(&self) -> PageId {
        self.page_id
    }

    pub fn data(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Mutable page bytes. Callers report the write through
    /// [`BufferPoolManager::unpin_page`]'s dirty flag.
    pub fn data_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }

    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }
}

#[derive(Debug, Default)]
struct PoolInner {
    page_table: FxHashMap<PageId, FrameId>,
    free_list: Vec<FrameId>,
}

/// Page cache with a fixed frame count, pin/unpin protocol, dirty
/// tracking, and LRU victim selection.
///
/// This subsystem is a standalone prototype: nothing in the graph engine
/// calls it. The seam for a future persistence backend is
/// `fetch_page`/`new_page`/`unpin_page`/`flush_page`/`flush_all`/
/// `delete_page`.
pub struct BufferPoolManager {
    disk: DiskManager,
    replacer: LruReplacer,
    frames: Vec<Arc<RwLock<Page>>>,
    inner: Mutex<PoolInner>,
    // Page-id allocation belongs to the pool instance, not to a
    // process-wide static.
    next_page_id: AtomicU32,
}

impl BufferPoolManager {
    pub fn new(pool_size: usize, disk: DiskManager) -> Self {
        let frames = (0..pool_size)
            .map(|_| Arc::new(RwLock::new(Page::empty())))
            .collect();
        BufferPoolManager {
            disk,
            replacer: LruReplacer::new(pool_size),
            frames,
            inner: Mutex::new(PoolInner {
                page_table: FxHashMap::default(),
                free_list: (0..pool_size).collect(),
            }),
            next_page_id: AtomicU32::new(0),
        }
    }

    /// Pin a page into the pool, reading it from disk on a miss.
    /// Fails with [`BufferError::NoFreeFrames`] when every frame is pinned.
    pub fn fetch_page(&self, page_id: PageId) -> Result<Arc<RwLock<Page>>, BufferError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(&frame_id) = inner.page_table.get(&page_id) {
            let frame = Arc::clone(&self.frames[frame_id]);
            frame.write().unwrap().pin_count += 1;
            self.replacer.pin(frame_id);
            return Ok(frame);
        }

        let frame_id = self.acquire_frame(&mut inner)?;
        let frame = Arc::clone(&self.frames[frame_id]);
        {
            let mut page = frame.write().unwrap();
            page.page_id = page_id;
            page.pin_count = 1;
            page.is_dirty = false;
            self.disk.read_page(page_id, &mut page.data)?;
        }
        inner.page_table.insert(page_id, frame_id);
        self.replacer.pin(frame_id);
        trace!(page = page_id, frame = frame_id, "fetched page");
        Ok(frame)
    }

    /// Allocate a fresh page id and pin its (zeroed) page.
    pub fn new_page(&self) -> Result<(PageId, Arc<RwLock<Page>>), BufferError> {
        let page_id = self.next_page_id.fetch_add(1, Ordering::Relaxed);
        let frame = self.fetch_page(page_id)?;
        Ok((page_id, frame))
    }

    /// Drop one pin; `is_dirty` marks that the caller wrote the page.
    /// False if the page is not resident or was not pinned.
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> bool {
        let inner = self.inner.lock().unwrap();
        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return false;
        };
        let mut page = self.frames[frame_id].write().unwrap();
        if page.pin_count == 0 {
            return false;
        }
        page.pin_count -= 1;
        if is_dirty {
            page.is_dirty = true;
        }
        if page.pin_count == 0 {
            self.replacer.unpin(frame_id);
        }
        true
    }

    /// Write a resident page back to disk if dirty. False if not resident.
    pub fn flush_page(&self, page_id: PageId) -> Result<bool, BufferError> {
        let inner = self.inner.lock().unwrap();
        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return Ok(false);
        };
        self.flush_frame(frame_id)?;
        Ok(true)
    }

    /// Flush every resident dirty page.
    pub fn flush_all(&self) -> Result<(), BufferError> {
        let inner = self.inner.lock().unwrap();
        for &frame_id in inner.page_table.values() {
            self.flush_frame(frame_id)?;
        }
        Ok(())
    }

    /// Evict a page from the pool, flushing it first if dirty. Ok(true)
    /// if the page is gone from the pool afterwards; Ok(false) if it is
    /// pinned and cannot be removed.
    pub fn delete_page(&self, page_id: PageId) -> Result<bool, BufferError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(&frame_id) = inner.page_table.get(&page_id) else {
            return Ok(true);
        };
        {
            let page = self.frames[frame_id].read().unwrap();
            if page.pin_count > 0 {
                return Ok(false);
            }
        }
        self.flush_frame(frame_id)?;
        inner.page_table.remove(&page_id);
        self.replacer.pin(frame_id);
        inner.free_list.push(frame_id);
        Ok(true)
    }

    /// Number of frames currently available for eviction.
    pub fn evictable_frames(&self) -> usize {
        self.replacer.len()
    }

    fn acquire_frame(&self, inner: &mut PoolInner) -> Result<FrameId, BufferError> {
        if let Some(frame_id) = inner.free_list.pop() {
            return Ok(frame_id);
        }
        let frame_id = self.replacer.victim().ok_or(BufferError::NoFreeFrames)?;
        let mut victim = self.frames[frame_id].write().unwrap();
        if victim.is_dirty {
            self.disk.write_page(victim.page_id, &victim.data)?;
            victim.is_dirty = false;
        }
        inner.page_table.remove(&victim.page_id);
        Ok(frame_id)
    }

    fn flush_frame(&self, frame_id: FrameId) -> Result<(), BufferError> {
        let mut page = self.frames[frame_id].write().unwrap();
        if page.is_dirty {
            self.disk.write_page(page.page_id, &page.data)?;
            page.is_dirty = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(frames: usize) -> (tempfile::TempDir, BufferPoolManager) {
        let dir = tempfile::tempdir().unwrap();
        let disk = DiskManager::open(dir.path().join("pool.db")).unwrap();
        let pool = BufferPoolManager::new(frames, disk);
        (dir, pool)
    }

    #[test]
    fn test_new_page_ids_are_sequential_per_pool() {
        let (_dir, pool) = pool(4);
        let (a, _) = pool.new_page().unwrap();
        let (b, _) = pool.new_page().unwrap();
        assert_eq!((a, b), (0, 1));
    }

    #[test]
    fn test_data_survives_eviction_roundtrip() {
        let (_dir, pool) = pool(1);

        let (id, frame) = pool.new_page().unwrap();
        frame.write().unwrap().data_mut()[0] = 0x5A;
        drop(frame);
        assert!(pool.unpin_page(id, true));

        // A second page steals the only frame, forcing a dirty writeback.
        let (other, _) = pool.new_page().unwrap();
        assert!(pool.unpin_page(other, false));

        let frame = pool.fetch_page(id).unwrap();
        assert_eq!(frame.read().unwrap().data()[0], 0x5A);
    }

    #[test]
    fn test_pinned_pages_are_never_victims() {
        let (_dir, pool) = pool(1);
        let (id, _frame) = pool.new_page().unwrap();

        // The only frame is pinned; there is nothing to evict.
        assert!(matches!(pool.new_page(), Err(BufferError::NoFreeFrames)));

        assert!(pool.unpin_page(id, false));
        assert!(pool.new_page().is_ok());
    }

    #[test]
    fn test_delete_page_refuses_pinned() {
        let (_dir, pool) = pool(2);
        let (id, _frame) = pool.new_page().unwrap();
        assert!(!pool.delete_page(id).unwrap());

        pool.unpin_page(id, false);
        assert!(pool.delete_page(id).unwrap());
        // Absent pages delete trivially.
        assert!(pool.delete_page(id).unwrap());
    }

    #[test]
    fn test_unpin_underflow_is_rejected() {
        let (_dir, pool) = pool(2);
        let (id, _frame) = pool.new_page().unwrap();
        assert!(pool.unpin_page(id, false));
        assert!(!pool.unpin_page(id, false));
        assert!(!pool.unpin_page(999, false));
    }
}
