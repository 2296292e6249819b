use anyhow::Result;
use protein_explorer::app::App;
use protein_explorer::cli;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = cli::process_cli();

    // Routes all log::info!() etc. to the debug log file in the temp dir.
    // CLI --log-level takes precedence, then DEBUG_LEVEL, then config (applied later).
    protein_explorer::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting protein-explorer {}", protein_explorer::VERSION);

    // Searches run on this runtime's blocking pool
    let runtime = Arc::new(Runtime::new()?);

    let app = App::new(Arc::clone(&runtime), runtime_options)?;
    let result = app.run();

    log::info!("Shutting down runtime");
    if let Ok(rt) = Arc::try_unwrap(runtime) {
        rt.shutdown_timeout(std::time::Duration::from_secs(2));
    }

    if let Err(ref e) = result {
        eprintln!("protein-explorer: error: {e:#}");
    }
    result
}
