//! File-based fragment store for persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::log::{Fragment, FragmentStore};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Magic bytes identifying a fragment frame.
const FRAME_MAGIC: [u8; 4] = *b"FLOG";

/// Current log format version.
const FRAME_VERSION: u16 = 1;

/// Frame header size: magic (4) + version (2) + length (4).
const HEADER_SIZE: usize = 10;

/// CRC trailer size.
const CRC_SIZE: usize = 4;

/// Name of the process lock file at the store root.
const LOCK_FILE: &str = "LOCK";

/// A file-based fragment store.
///
/// Each document's log is one append-only file under the store root:
///
/// ```text
/// <root>/<base64url(group)>/<base64url(doc_key)>.log
/// ```
///
/// Group and document keys are opaque strings, so file names carry them
/// URL-safe-Base64 encoded rather than trusting them as path components.
///
/// Each fragment is framed as magic + version + length + payload + CRC32.
/// A torn trailing frame (crashed mid-append) is skipped on load; a corrupt
/// interior frame surfaces as [`StoreError::Corrupted`].
///
/// # Durability
///
/// With `sync_on_write` enabled (the default), every append ends with
/// `File::sync_all()`, so an acknowledged fragment survives process death.
///
/// # Thread Safety
///
/// Appends are serialized by an internal mutex; loads read whole files and
/// tolerate a concurrent in-flight append by ignoring its torn tail, so a
/// reader never observes a partially written fragment. A lock file taken via
/// `fs2` keeps two processes from sharing one root.
#[derive(Debug)]
pub struct FileFragmentStore {
    root: PathBuf,
    append_lock: Mutex<()>,
    sync_on_write: bool,
    // Held for the lifetime of the store; dropping it releases the lock.
    _lock_file: File,
}

impl FileFragmentStore {
    /// Opens or creates a file store rooted at `root`.
    ///
    /// Creates the directory if needed and takes an exclusive process lock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another process holds the root, or
    /// an I/O error if the directory or lock file cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(root.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked(root));
        }

        Ok(Self {
            root,
            append_lock: Mutex::new(()),
            sync_on_write: true,
            _lock_file: lock_file,
        })
    }

    /// Disables (or re-enables) fsync after each append.
    ///
    /// Turning sync off trades durability of the most recent appends for
    /// write throughput; acknowledged fragments may be lost on power failure.
    #[must_use]
    pub fn with_sync_on_write(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    /// Returns the store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(URL_SAFE_NO_PAD.encode(group))
    }

    fn log_path(&self, group: &str, doc_key: &str) -> PathBuf {
        self.group_dir(group)
            .join(format!("{}.log", URL_SAFE_NO_PAD.encode(doc_key)))
    }

    fn decode_doc_key(file_stem: &str, path: &Path) -> StoreResult<String> {
        let raw = URL_SAFE_NO_PAD.decode(file_stem).map_err(|_| {
            StoreError::Corrupted(format!("undecodable log file name: {}", path.display()))
        })?;
        String::from_utf8(raw).map_err(|_| {
            StoreError::Corrupted(format!("non-UTF-8 document key: {}", path.display()))
        })
    }

    fn load_log_file(path: &Path) -> StoreResult<Vec<Fragment>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        decode_frames(&bytes, path)
    }
}

impl FragmentStore for FileFragmentStore {
    fn append(&self, group: &str, doc_key: &str, fragment: &[u8]) -> StoreResult<()> {
        let frame = encode_frame(fragment)?;

        let _guard = self.append_lock.lock();
        std::fs::create_dir_all(self.group_dir(group))?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.log_path(group, doc_key))?;
        file.write_all(&frame)?;
        if self.sync_on_write {
            file.sync_all()?;
        }
        Ok(())
    }

    fn load_all(&self, group: &str, doc_key: &str) -> StoreResult<Vec<Fragment>> {
        Self::load_log_file(&self.log_path(group, doc_key))
    }

    fn load_group(&self, group: &str) -> StoreResult<BTreeMap<String, Vec<Fragment>>> {
        let dir = self.group_dir(group);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut logs = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("log") {
                continue;
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    StoreError::Corrupted(format!("unreadable log file name: {}", path.display()))
                })?;
            let doc_key = Self::decode_doc_key(stem, &path)?;
            let fragments = Self::load_log_file(&path)?;
            if !fragments.is_empty() {
                logs.insert(doc_key, fragments);
            }
        }
        Ok(logs)
    }
}

/// Checks a payload length against the u32 frame length field.
fn checked_frame_len(len: usize) -> StoreResult<u32> {
    u32::try_from(len).map_err(|_| StoreError::FragmentTooLarge(len))
}

/// Encodes one fragment as a framed record.
fn encode_frame(fragment: &[u8]) -> StoreResult<Vec<u8>> {
    let len = checked_frame_len(fragment.len())?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + fragment.len() + CRC_SIZE);
    frame.extend_from_slice(&FRAME_MAGIC);
    frame.extend_from_slice(&FRAME_VERSION.to_le_bytes());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(fragment);
    let crc = compute_crc32(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    Ok(frame)
}

/// Decodes all complete frames in `bytes`.
///
/// A trailing incomplete or CRC-failing frame is treated as a torn append
/// and skipped; damage anywhere else is a hard corruption error.
fn decode_frames(bytes: &[u8], path: &Path) -> StoreResult<Vec<Fragment>> {
    let mut fragments = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let remaining = &bytes[offset..];
        if remaining.len() < HEADER_SIZE + CRC_SIZE {
            // Torn tail from a crashed append.
            break;
        }

        if remaining[..4] != FRAME_MAGIC {
            return Err(StoreError::Corrupted(format!(
                "bad frame magic at offset {} in {}",
                offset,
                path.display()
            )));
        }

        let version = u16::from_le_bytes([remaining[4], remaining[5]]);
        if version != FRAME_VERSION {
            return Err(StoreError::Corrupted(format!(
                "unsupported frame version {} in {}",
                version,
                path.display()
            )));
        }

        let len = u32::from_le_bytes([remaining[6], remaining[7], remaining[8], remaining[9]])
            as usize;
        let frame_end = HEADER_SIZE + len + CRC_SIZE;
        if remaining.len() < frame_end {
            // Torn tail: header landed but the payload didn't.
            break;
        }

        let stored_crc = u32::from_le_bytes([
            remaining[frame_end - 4],
            remaining[frame_end - 3],
            remaining[frame_end - 2],
            remaining[frame_end - 1],
        ]);
        let computed_crc = compute_crc32(&remaining[..HEADER_SIZE + len]);
        if stored_crc != computed_crc {
            if offset + frame_end == bytes.len() {
                // Final frame with a partially flushed trailer.
                break;
            }
            return Err(StoreError::Corrupted(format!(
                "CRC mismatch at offset {} in {}",
                offset,
                path.display()
            )));
        }

        fragments.push(remaining[HEADER_SIZE..HEADER_SIZE + len].to_vec());
        offset += frame_end;
    }

    Ok(fragments)
}

/// Computes a CRC32 (IEEE polynomial) checksum.
fn compute_crc32(data: &[u8]) -> u32 {
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    crc ^ 0xFFFF_FFFF
}
