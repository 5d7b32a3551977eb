//! Append-only file store.
//!
//! Record frame layout: `[len: u32 LE][crc32: u32 LE][bytes]`. Appends are
//! written as one frame and fsynced; a crash can only leave an incomplete
//! frame at the tail, which is discarded on load — so a record is either
//! fully durable or absent. A complete frame whose CRC does not match is
//! still surfaced (the buffer's AEAD layer will flag it as corrupt), with a
//! warning at load time.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::StoreError;
use crate::ports::BufferStore;

const FRAME_HEADER_LEN: usize = 8;

/// File-backed append-only store for sealed buffer records.
pub struct FileBufferStore {
    path: PathBuf,
    records: Vec<Vec<u8>>,
}

impl FileBufferStore {
    /// Open the store at `path`, creating it (and parent directories) if
    /// absent, and loading any existing records.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let records = match File::open(&path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                let records = parse_frames(&bytes);
                if !records.is_empty() {
                    info!(
                        path = %path.display(),
                        records = records.len(),
                        "Loaded existing buffer store"
                    );
                }
                records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, records })
    }

    /// Store location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_frames(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut records = Vec::new();
    let mut cursor = 0;

    while cursor + FRAME_HEADER_LEN <= bytes.len() {
        let len = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap_or([0; 4]))
            as usize;
        let stored_crc =
            u32::from_le_bytes(bytes[cursor + 4..cursor + 8].try_into().unwrap_or([0; 4]));
        cursor += FRAME_HEADER_LEN;

        if cursor + len > bytes.len() {
            // Torn tail frame from an interrupted append.
            warn!(offset = cursor - FRAME_HEADER_LEN, "Discarding incomplete tail frame");
            break;
        }
        let record = bytes[cursor..cursor + len].to_vec();
        cursor += len;

        if crc32fast::hash(&record) != stored_crc {
            warn!(
                record = records.len() + 1,
                "Buffer frame checksum mismatch; record will fail decryption"
            );
        }
        records.push(record);
    }

    records
}

impl BufferStore for FileBufferStore {
    fn append(&mut self, record: &[u8]) -> Result<u64, StoreError> {
        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + record.len());
        frame.extend_from_slice(&(record.len() as u32).to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(record).to_le_bytes());
        frame.extend_from_slice(record);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&frame)?;
        file.sync_all()?;

        self.records.push(record.to_vec());
        Ok(self.records.len() as u64)
    }

    fn scan(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        Ok(self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (i as u64 + 1, r.clone()))
            .collect())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let file = File::create(&self.path)?;
        file.sync_all()?;
        self.records.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_scan_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileBufferStore::open(dir.path().join("buffer.dat")).unwrap();

        assert_eq!(store.append(b"first").unwrap(), 1);
        assert_eq!(store.append(b"second").unwrap(), 2);

        let records = store.scan().unwrap();
        assert_eq!(records, vec![(1, b"first".to_vec()), (2, b"second".to_vec())]);
    }

    #[test]
    fn test_reopen_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffer.dat");

        {
            let mut store = FileBufferStore::open(&path).unwrap();
            store.append(b"persisted").unwrap();
        }

        let store = FileBufferStore::open(&path).unwrap();
        assert_eq!(store.scan().unwrap(), vec![(1, b"persisted".to_vec())]);
    }

    #[test]
    fn test_torn_tail_frame_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffer.dat");

        {
            let mut store = FileBufferStore::open(&path).unwrap();
            store.append(b"complete").unwrap();
        }

        // Simulate a crash mid-append: a header promising more bytes than exist.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&100u32.to_le_bytes()).unwrap();
        file.write_all(&0u32.to_le_bytes()).unwrap();
        file.write_all(b"tru").unwrap();
        drop(file);

        let store = FileBufferStore::open(&path).unwrap();
        assert_eq!(store.scan().unwrap(), vec![(1, b"complete".to_vec())]);
    }

    #[test]
    fn test_clear_empties_store_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buffer.dat");

        let mut store = FileBufferStore::open(&path).unwrap();
        store.append(b"gone").unwrap();
        store.clear().unwrap();
        assert_eq!(store.len().unwrap(), 0);

        let reopened = FileBufferStore::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 0);
    }
}
