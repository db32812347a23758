//! LCBRIDGE Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Fixtures for events and JSON-lines run files
//! - Proptest generators for events
//! - A scripted reader whose calls can be observed after it is boxed away
//! - A fault-injecting event store
//! - A run controller that records stop requests

pub use lcbridge_core::{
    AccessMode, DataObject, LcCollection, LcEvent, LcEventWrapper, LcEventWrapperStatus,
    ReaderError, RunController, StopRunError, StoreError, StorePath,
};
pub use lcbridge_reader::{EventReader, ReaderResult};
pub use lcbridge_store::{EventStore, EventStoreExt, StoreResult, TransientEventStore};

use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// ============================================================================
// FIXTURES
// ============================================================================

pub const TEST_DETECTOR: &str = "ILD_l5_v02";

/// An event with a single hit collection.
pub fn make_event(run: i32, event: i32) -> LcEvent {
    LcEvent::new(run, event)
        .with_detector(TEST_DETECTOR)
        .with_collection(
            "VXDCollection",
            LcCollection::new("SimTrackerHit")
                .with_elements(vec![json!({"cellID0": event, "EDep": 0.5})]),
        )
}

/// Events `1..=count` of `run`.
pub fn make_run(run: i32, count: i32) -> Vec<LcEvent> {
    (1..=count).map(|n| make_event(run, n)).collect()
}

/// Write events `1..=count` of `run` as a JSON-lines file in `dir`.
pub fn write_run_file(dir: &Path, name: &str, run: i32, count: i32) -> PathBuf {
    let path = dir.join(name);
    let contents: String = make_run(run, count)
        .iter()
        .map(|event| serde_json::to_string(event).expect("serialize event") + "\n")
        .collect();
    std::fs::write(&path, contents).expect("write run file");
    path
}

/// Read the presence flag of the current cycle, if any.
pub fn presence_flag(store: &dyn EventStore) -> Option<bool> {
    store
        .with_object::<LcEventWrapperStatus, _>(&StorePath::lc_event_status(), |s| s.has_lc_event)
        .expect("read presence flag")
}

/// (run, event) of the wrapped event in the current cycle, if any.
pub fn wrapped_event_id(store: &dyn EventStore) -> Option<(i32, i32)> {
    store
        .with_object::<LcEventWrapper, _>(&StorePath::lc_event(), |w| {
            (w.event().run_number(), w.event().event_number())
        })
        .expect("read wrapped event")
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Strategy for a single event with up to three collections.
pub fn arb_event() -> impl Strategy<Value = LcEvent> {
    (
        0i32..1000,
        0i32..100_000,
        prop::collection::btree_map("[A-Z][A-Za-z]{0,11}", 0usize..8, 0..3),
    )
        .prop_map(|(run, event, collections)| {
            collections
                .into_iter()
                .fold(LcEvent::new(run, event).with_detector(TEST_DETECTOR), |ev, (name, len)| {
                    let elements = (0..len).map(|i| json!({ "index": i })).collect();
                    ev.with_collection(name, LcCollection::new("LCGenericObject").with_elements(elements))
                })
        })
}

/// Strategy for a run of events with distinct, increasing event numbers.
pub fn arb_run(max_len: usize) -> impl Strategy<Value = Vec<LcEvent>> {
    (0i32..1000, 0usize..=max_len).prop_map(|(run, len)| make_run(run, len as i32))
}

// ============================================================================
// SCRIPTED READER
// ============================================================================

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ProbeState {
    opened_files: Option<Vec<PathBuf>>,
    accesses: Vec<AccessMode>,
    closed: bool,
}

/// Observer handle of a [`ScriptedReader`], usable after the reader has been
/// moved into an algorithm.
#[derive(Debug, Clone, Default)]
pub struct ReaderProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl ReaderProbe {
    /// Files passed to `open`, or `None` if never opened.
    pub fn opened_files(&self) -> Option<Vec<PathBuf>> {
        lock(&self.state).opened_files.clone()
    }

    /// Number of `read_next_event` calls, skips included.
    pub fn read_calls(&self) -> usize {
        lock(&self.state).accesses.len()
    }

    /// Access modes requested, in call order.
    pub fn accesses(&self) -> Vec<AccessMode> {
        lock(&self.state).accesses.clone()
    }

    pub fn closed(&self) -> bool {
        lock(&self.state).closed
    }
}

/// Reader that replays a fixed script of outcomes.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: VecDeque<ReaderResult<Option<LcEvent>>>,
    probe: ReaderProbe,
}

impl ScriptedReader {
    /// Replay `events`, then report end of stream forever.
    pub fn new(events: impl IntoIterator<Item = LcEvent>) -> Self {
        Self {
            script: events.into_iter().map(|e| Ok(Some(e))).collect(),
            probe: ReaderProbe::default(),
        }
    }

    /// Append a read failure to the script.
    pub fn then_fail(mut self, error: ReaderError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    pub fn probe(&self) -> ReaderProbe {
        self.probe.clone()
    }
}

impl EventReader for ScriptedReader {
    fn open(&mut self, files: Vec<PathBuf>) -> ReaderResult<()> {
        if files.is_empty() {
            return Err(ReaderError::NoInputFiles);
        }
        lock(&self.probe.state).opened_files = Some(files);
        Ok(())
    }

    fn read_next_event(&mut self, access: AccessMode) -> ReaderResult<Option<LcEvent>> {
        let mut state = lock(&self.probe.state);
        if state.opened_files.is_none() {
            return Err(ReaderError::NotOpen);
        }
        state.accesses.push(access);
        match self.script.pop_front() {
            Some(outcome) => outcome.map(|event| event.map(|e| e.with_access(access))),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> ReaderResult<()> {
        lock(&self.probe.state).closed = true;
        Ok(())
    }
}

// ============================================================================
// FAULTY STORE
// ============================================================================

/// [`TransientEventStore`] that rejects registrations on chosen paths.
#[derive(Debug, Default)]
pub struct FaultyStore {
    inner: TransientEventStore,
    rejected: Mutex<BTreeSet<StorePath>>,
    attempts: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every future registration on `path`.
    pub fn reject(self, path: StorePath) -> Self {
        lock(&self.rejected).insert(path);
        self
    }

    /// Registration attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &TransientEventStore {
        &self.inner
    }
}

impl EventStore for FaultyStore {
    fn register_object(&self, path: &StorePath, object: Box<dyn DataObject>) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if lock(&self.rejected).contains(path) {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.inner.register_object(path, object)
    }

    fn unregister_object(&self, path: &StorePath) -> StoreResult<Option<Box<dyn DataObject>>> {
        self.inner.unregister_object(path)
    }

    fn inspect(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&dyn DataObject),
    ) -> StoreResult<bool> {
        self.inner.inspect(path, visit)
    }

    fn inspect_mut(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&mut dyn DataObject),
    ) -> StoreResult<bool> {
        self.inner.inspect_mut(path, visit)
    }

    fn contains(&self, path: &StorePath) -> StoreResult<bool> {
        self.inner.contains(path)
    }

    fn paths(&self) -> StoreResult<Vec<StorePath>> {
        self.inner.paths()
    }

    fn clear(&self) -> StoreResult<usize> {
        self.inner.clear()
    }
}

// ============================================================================
// RECORDING RUN CONTROLLER
// ============================================================================

/// [`RunController`] that counts stop requests.
#[derive(Debug, Default)]
pub struct RecordingRunController {
    stop_calls: AtomicUsize,
    refuse: AtomicBool,
}

impl RecordingRunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that records stop requests but reports them as refused.
    pub fn refusing() -> Self {
        let controller = Self::default();
        controller.refuse.store(true, Ordering::SeqCst);
        controller
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

impl RunController for RecordingRunController {
    fn stop_run(&self) -> Result<(), StopRunError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(StopRunError {
                reason: "run already finalizing".to_string(),
            });
        }
        Ok(())
    }

    fn is_stop_requested(&self) -> bool {
        self.stop_calls() > 0
    }
}
