//! A drained reader with no run controller left must abort the process.
//!
//! The aborting case runs in a child copy of this test binary, selected by
//! name and gated on an environment variable so it never runs in-process.

use lcbridge_algo::{Algorithm, EventContext, LcioEventAlgo, ReadState};
use lcbridge_core::LcioEventConfig;
use lcbridge_test_utils::*;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Weak};

const CHILD_ENV: &str = "LCBRIDGE_MISSING_CONTROLLER_CHILD";
const CHILD_TEST: &str = "child_end_of_stream_without_controller";

fn algo_with(
    events: Vec<LcEvent>,
    controller: Weak<dyn RunController>,
) -> (LcioEventAlgo, Arc<TransientEventStore>) {
    let store = Arc::new(TransientEventStore::new());
    let mut algo = LcioEventAlgo::new(
        LcioEventConfig::new(vec![PathBuf::from("run1.dat")]),
        Box::new(ScriptedReader::new(events)),
        store.clone(),
        controller,
    );
    algo.initialize().unwrap();
    (algo, store)
}

fn dropped_controller() -> Weak<dyn RunController> {
    let controller: Arc<dyn RunController> = Arc::new(RecordingRunController::new());
    Arc::downgrade(&controller)
}

#[test]
#[ignore = "spawned by test_missing_controller_aborts"]
fn child_end_of_stream_without_controller() {
    if std::env::var_os(CHILD_ENV).is_none() {
        return;
    }
    let (mut algo, _store) = algo_with(vec![], dropped_controller());
    let _ = algo.execute(&EventContext::new(0));
    // Reaching this point means the process did not abort.
    std::process::exit(0);
}

#[test]
fn test_missing_controller_aborts() {
    let exe = std::env::current_exe().unwrap();
    let output = Command::new(exe)
        .args([CHILD_TEST, "--exact", "--ignored", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();

    assert!(
        !output.status.success(),
        "child exited cleanly: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6));
    }
}

#[test]
fn test_missing_controller_is_not_touched_while_streaming() {
    let (mut algo, store) = algo_with(make_run(1, 2), dropped_controller());
    for n in 1..=2 {
        store.clear().unwrap();
        algo.execute(&EventContext::new(n as u64)).unwrap();
        assert_eq!(wrapped_event_id(store.as_ref()), Some((1, n)));
    }
    assert_eq!(algo.state(), ReadState::Streaming);
}
