// Powerkey Input Layer - Device Reader
// Blocking, one-record-at-a-time reads from an event device node

use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::event::{InputEvent, RECORD_SIZE};
use crate::watcher::{WatcherError, WatcherResult};

/// Reader of fixed-size input event records.
///
/// Owns the underlying handle for its whole lifetime; the device is
/// closed when the reader is dropped.
#[derive(Debug)]
pub struct EventReader<R = File> {
    inner: R,
    path: Option<PathBuf>,
}

impl EventReader<File> {
    /// Open an event device read-only.
    ///
    /// The handle is left in blocking mode so that `read_event` sleeps
    /// in the kernel until the next record arrives.
    pub fn open<P: AsRef<Path>>(path: P) -> WatcherResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| WatcherError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!("Opened event device {}", path.display());

        Ok(Self {
            inner: file,
            path: Some(path.to_path_buf()),
        })
    }
}

impl<R: Read> EventReader<R> {
    /// Wrap an already open byte stream.
    pub fn new(inner: R) -> Self {
        Self { inner, path: None }
    }

    /// Device path, if the reader was opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read exactly one event record with a single read call.
    ///
    /// # Errors
    /// `ErrorKind::Interrupted` is passed through untouched so the caller
    /// can retry it silently. A read that returns fewer bytes than one
    /// record is reported as `ErrorKind::UnexpectedEof`.
    pub fn read_event(&mut self) -> io::Result<InputEvent> {
        let mut record = [0u8; RECORD_SIZE];
        let n = self.inner.read(&mut record)?;
        if n != RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read: got {} of {} bytes", n, RECORD_SIZE),
            ));
        }
        Ok(InputEvent::from_record(&record))
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KEY_POWER;
    use std::io::Cursor;

    #[test]
    fn test_read_event_decodes_records_in_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&InputEvent::key(KEY_POWER, 0).to_record());
        bytes.extend_from_slice(&InputEvent::key(KEY_POWER, 1).to_record());

        let mut reader = EventReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_event().unwrap(), InputEvent::key(KEY_POWER, 0));
        assert_eq!(reader.read_event().unwrap(), InputEvent::key(KEY_POWER, 1));
    }

    #[test]
    fn test_read_event_at_end_of_stream_is_eof() {
        let mut reader = EventReader::new(Cursor::new(Vec::new()));
        let err = reader.read_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_event_short_record_is_eof() {
        let record = InputEvent::key(KEY_POWER, 1).to_record();
        let mut reader = EventReader::new(Cursor::new(record[..RECORD_SIZE - 1].to_vec()));
        let err = reader.read_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_open_missing_device_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("event0");

        match EventReader::open(&missing) {
            Err(WatcherError::Open { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected open error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_regular_file_keeps_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let reader = EventReader::open(file.path()).unwrap();
        assert_eq!(reader.path(), Some(file.path()));
    }
}
