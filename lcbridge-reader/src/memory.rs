//! In-memory event reader.

use crate::{EventReader, ReaderResult};
use lcbridge_core::{AccessMode, LcEvent, ReaderError};
use std::collections::VecDeque;
use std::path::PathBuf;

/// [`EventReader`] over a queue of already-decoded events.
///
/// The file list passed to `open` is recorded but not read.
#[derive(Debug, Default)]
pub struct MemoryReader {
    pending: VecDeque<LcEvent>,
    files: Vec<PathBuf>,
    opened: bool,
}

impl MemoryReader {
    pub fn new(events: impl IntoIterator<Item = LcEvent>) -> Self {
        Self {
            pending: events.into_iter().collect(),
            files: Vec::new(),
            opened: false,
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl EventReader for MemoryReader {
    fn open(&mut self, files: Vec<PathBuf>) -> ReaderResult<()> {
        if files.is_empty() {
            return Err(ReaderError::NoInputFiles);
        }
        self.files = files;
        self.opened = true;
        Ok(())
    }

    fn read_next_event(&mut self, access: AccessMode) -> ReaderResult<Option<LcEvent>> {
        if !self.opened {
            return Err(ReaderError::NotOpen);
        }
        Ok(self.pending.pop_front().map(|e| e.with_access(access)))
    }

    fn close(&mut self) -> ReaderResult<()> {
        self.opened = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_order() {
        let mut reader = MemoryReader::new((1..=3).map(|n| LcEvent::new(1, n)));
        reader.open(vec![PathBuf::from("run1.dat")]).unwrap();
        assert_eq!(reader.files(), &[PathBuf::from("run1.dat")]);

        let numbers: Vec<i32> = std::iter::from_fn(|| {
            reader
                .read_next_event(AccessMode::Update)
                .unwrap()
                .map(|e| e.event_number())
        })
        .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_requires_open() {
        let mut reader = MemoryReader::new([LcEvent::new(1, 1)]);
        assert_eq!(
            reader.read_next_event(AccessMode::Read),
            Err(ReaderError::NotOpen)
        );
        assert_eq!(reader.open(vec![]), Err(ReaderError::NoInputFiles));
    }

    #[test]
    fn test_default_skip_stops_at_end_of_stream() {
        let mut reader = MemoryReader::new((1..=2).map(|n| LcEvent::new(1, n)));
        reader.open(vec![PathBuf::from("run1.dat")]).unwrap();
        assert_eq!(reader.skip_events(5).unwrap(), 2);
        assert!(reader.read_next_event(AccessMode::Read).unwrap().is_none());
    }

    #[test]
    fn test_boxed_reader_delegates() {
        let mut reader: Box<dyn EventReader> = Box::new(MemoryReader::new([LcEvent::new(2, 9)]));
        reader.open(vec![PathBuf::from("run2.dat")]).unwrap();
        let event = reader.read_next_event(AccessMode::Update).unwrap().unwrap();
        assert_eq!(event.event_number(), 9);
        assert!(!event.is_read_only());
    }
}
