//! LCBRIDGE Reader - Event Reader Trait and Readers
//!
//! An [`EventReader`] is a pull-based source of decoded events backed by an
//! ordered list of input files. The bridge never looks inside the file
//! format; it only asks for the next event until the reader reports end of
//! stream.
//!
//! Readers shipped here:
//! - [`JsonlReader`]: one JSON-encoded event per line
//! - [`MemoryReader`]: a queue of events held in memory

mod jsonl;
mod memory;

pub use jsonl::JsonlReader;
pub use memory::MemoryReader;

use lcbridge_core::{AccessMode, LcEvent, ReaderError};
use std::path::PathBuf;

/// Result type alias for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Pull-based source of decoded events.
pub trait EventReader: Send {
    /// Attach the reader to an ordered list of input files.
    ///
    /// Implementations may defer touching the files until the first read, in
    /// which case problems with them surface from
    /// [`EventReader::read_next_event`].
    fn open(&mut self, files: Vec<PathBuf>) -> ReaderResult<()>;

    /// Read the next event. `Ok(None)` means end of stream.
    fn read_next_event(&mut self, access: AccessMode) -> ReaderResult<Option<LcEvent>>;

    /// Drop up to `count` events from the head of the stream. Returns how many
    /// were actually skipped, which is less than `count` only at end of stream.
    fn skip_events(&mut self, count: u64) -> ReaderResult<u64> {
        let mut skipped = 0;
        while skipped < count {
            if self.read_next_event(AccessMode::Read)?.is_none() {
                break;
            }
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Release any open files.
    fn close(&mut self) -> ReaderResult<()>;
}

impl<R: EventReader + ?Sized> EventReader for Box<R> {
    fn open(&mut self, files: Vec<PathBuf>) -> ReaderResult<()> {
        (**self).open(files)
    }

    fn read_next_event(&mut self, access: AccessMode) -> ReaderResult<Option<LcEvent>> {
        (**self).read_next_event(access)
    }

    fn skip_events(&mut self, count: u64) -> ReaderResult<u64> {
        (**self).skip_events(count)
    }

    fn close(&mut self) -> ReaderResult<()> {
        (**self).close()
    }
}
