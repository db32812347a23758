//! Reader for JSON-lines event files.
//!
//! Each non-blank line holds one event as a JSON object, for example
//!
//! ```text
//! {"run_number": 1, "event_number": 1, "detector_name": "ILD_l5_v02"}
//! ```
//!
//! Files are consumed in the order given to [`EventReader::open`] and are
//! opened only when the previous one is exhausted.

use crate::{EventReader, ReaderResult};
use lcbridge_core::{AccessMode, LcEvent, ReaderError};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
}

/// [`EventReader`] over JSON-lines files.
#[derive(Debug, Default)]
pub struct JsonlReader {
    files: Vec<PathBuf>,
    next_file: usize,
    current: Option<OpenFile>,
    opened: bool,
    events_read: u64,
}

impl JsonlReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events handed out since the last open, skipped events included.
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    /// File currently being read, if any.
    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_ref().map(|f| f.path.as_path())
    }

    fn open_next_file(&mut self) -> ReaderResult<Option<OpenFile>> {
        let Some(path) = self.files.get(self.next_file) else {
            return Ok(None);
        };
        let file = File::open(path).map_err(|e| io_error(path, &e))?;
        self.next_file += 1;
        tracing::debug!(path = %path.display(), "Opened input file");
        Ok(Some(OpenFile {
            path: path.clone(),
            lines: BufReader::new(file).lines(),
            line_number: 0,
        }))
    }
}

impl EventReader for JsonlReader {
    fn open(&mut self, files: Vec<PathBuf>) -> ReaderResult<()> {
        if files.is_empty() {
            return Err(ReaderError::NoInputFiles);
        }
        self.files = files;
        self.next_file = 0;
        self.current = None;
        self.opened = true;
        self.events_read = 0;
        Ok(())
    }

    fn read_next_event(&mut self, access: AccessMode) -> ReaderResult<Option<LcEvent>> {
        if !self.opened {
            return Err(ReaderError::NotOpen);
        }

        loop {
            if self.current.is_none() {
                match self.open_next_file()? {
                    Some(file) => self.current = Some(file),
                    None => return Ok(None),
                }
            }
            let Some(current) = self.current.as_mut() else {
                continue;
            };

            match current.lines.next() {
                None => {
                    tracing::debug!(
                        path = %current.path.display(),
                        lines = current.line_number,
                        "Input file exhausted"
                    );
                    self.current = None;
                }
                Some(Err(e)) => return Err(io_error(&current.path, &e)),
                Some(Ok(line)) => {
                    current.line_number += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let event: LcEvent =
                        serde_json::from_str(&line).map_err(|e| ReaderError::Malformed {
                            path: current.path.display().to_string(),
                            line: current.line_number,
                            reason: e.to_string(),
                        })?;
                    self.events_read += 1;
                    return Ok(Some(event.with_access(access)));
                }
            }
        }
    }

    fn close(&mut self) -> ReaderResult<()> {
        self.current = None;
        self.files.clear();
        self.next_file = 0;
        self.opened = false;
        Ok(())
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> ReaderError {
    ReaderError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn event_line(run: i32, event: i32) -> String {
        format!("{{\"run_number\": {run}, \"event_number\": {event}}}\n")
    }

    #[test]
    fn test_read_before_open() {
        let mut reader = JsonlReader::new();
        assert_eq!(
            reader.read_next_event(AccessMode::Update),
            Err(ReaderError::NotOpen)
        );
    }

    #[test]
    fn test_open_without_files() {
        let mut reader = JsonlReader::new();
        assert_eq!(reader.open(vec![]), Err(ReaderError::NoInputFiles));
    }

    #[test]
    fn test_reads_files_in_order() {
        let dir = TempDir::new().unwrap();
        let first = write_file(&dir, "run1.dat", &(event_line(1, 1) + &event_line(1, 2)));
        let second = write_file(&dir, "run2.dat", &event_line(2, 1));

        let mut reader = JsonlReader::new();
        reader.open(vec![first, second]).unwrap();

        let mut seen = Vec::new();
        while let Some(event) = reader.read_next_event(AccessMode::Update).unwrap() {
            assert_eq!(event.access(), AccessMode::Update);
            seen.push((event.run_number(), event.event_number()));
        }
        assert_eq!(seen, vec![(1, 1), (1, 2), (2, 1)]);
        assert_eq!(reader.events_read(), 3);
        assert!(reader.read_next_event(AccessMode::Update).unwrap().is_none());
    }

    #[test]
    fn test_blank_lines_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        let contents = format!("\n{}   \n{}", event_line(1, 1), "{\"run_number\": 1}\n");
        let path = write_file(&dir, "run1.dat", &contents);

        let mut reader = JsonlReader::new();
        reader.open(vec![path]).unwrap();
        assert_eq!(
            reader
                .read_next_event(AccessMode::Read)
                .unwrap()
                .map(|e| e.event_number()),
            Some(1)
        );

        match reader.read_next_event(AccessMode::Read) {
            Err(ReaderError::Malformed { line, path, .. }) => {
                assert_eq!(line, 4);
                assert!(path.ends_with("run1.dat"));
            }
            other => panic!("expected malformed line error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_fails_on_first_read() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.dat");

        let mut reader = JsonlReader::new();
        reader.open(vec![missing]).unwrap();
        assert!(matches!(
            reader.read_next_event(AccessMode::Update),
            Err(ReaderError::Io { .. })
        ));
    }

    #[test]
    fn test_skip_events() {
        let dir = TempDir::new().unwrap();
        let contents: String = (1..=4).map(|n| event_line(1, n)).collect();
        let path = write_file(&dir, "run1.dat", &contents);

        let mut reader = JsonlReader::new();
        reader.open(vec![path]).unwrap();
        assert_eq!(reader.skip_events(3).unwrap(), 3);
        let next = reader.read_next_event(AccessMode::Update).unwrap().unwrap();
        assert_eq!(next.event_number(), 4);
        assert_eq!(reader.skip_events(10).unwrap(), 0);
    }

    #[test]
    fn test_close_resets_reader() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "run1.dat", &event_line(1, 1));

        let mut reader = JsonlReader::new();
        reader.open(vec![path]).unwrap();
        reader.read_next_event(AccessMode::Read).unwrap();
        assert!(reader.current_file().is_some());

        reader.close().unwrap();
        assert!(reader.current_file().is_none());
        assert_eq!(
            reader.read_next_event(AccessMode::Read),
            Err(ReaderError::NotOpen)
        );
    }
}
