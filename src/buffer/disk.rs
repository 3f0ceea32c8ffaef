//! Fixed-size page I/O by page id

use super::pool::PAGE_SIZE;
use super::BufferError;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Page id within a database file. Pages are addressed by offset
/// `id * PAGE_SIZE`.
pub type PageId = u32;

/// Reads and writes fixed 4096-byte pages of a single database file.
#[derive(Debug)]
pub struct DiskManager {
    file: Mutex<File>,
    path: PathBuf,
}

impl DiskManager {
    /// Open (or create) the backing file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)?;
        Ok(DiskManager {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one page at its fixed offset.
    pub fn write_page(&self, page_id: PageId, data: &[u8; PAGE_SIZE]) -> Result<(), BufferError> {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(page_id as u64 * PAGE_SIZE as u64))?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    /// Read one page at its fixed offset. A page that was never written
    /// (offset past end of file) reads back as zeros.
    pub fn read_page(&self, page_id: PageId, data: &mut [u8; PAGE_SIZE]) -> Result<(), BufferError> {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(page_id as u64 * PAGE_SIZE as u64))?;
        let mut filled = 0;
        while filled < PAGE_SIZE {
            let n = file.read(&mut data[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        data[filled..].fill(0);
        Ok(())
    }
}
