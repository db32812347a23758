//! `lcbridge` entry point: read events from JSON-lines files and run them
//! through the LCIO event algorithm.

use lcbridge_algo::telemetry::{init_logging, LoggingConfig};
use lcbridge_algo::{ApplicationManager, EventSummary, LcioEventAlgo, RunSummary};
use lcbridge_core::{BridgeConfig, BridgeResult};
use lcbridge_reader::JsonlReader;
use lcbridge_store::{EventStore, TransientEventStore};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    if let Err(e) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(summary) => {
            println!(
                "Processed {} cycles (stopped by request: {})",
                summary.cycles, summary.stopped_by_request
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> BridgeResult<RunSummary> {
    let config = BridgeConfig::load()?;

    let store: Arc<dyn EventStore> = Arc::new(TransientEventStore::new());
    let mut app = ApplicationManager::new(Arc::clone(&store)).with_max_cycles(config.max_cycles);

    let lcio_event = LcioEventAlgo::new(
        config.lcio_event,
        Box::new(JsonlReader::new()),
        Arc::clone(&store),
        app.run_controller(),
    );
    app.add_algorithm(Box::new(lcio_event));
    app.add_algorithm(Box::new(EventSummary::new(store)));

    app.run()
}
