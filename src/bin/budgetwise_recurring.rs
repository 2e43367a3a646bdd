use std::io;

use budgetwise_core::{
    config::Config,
    engine::SchedulerEngine,
    errors::EngineError,
    init,
    protocol::{serve, RequestHandler},
    storage::JsonStore,
    utils::build_info,
};
use chrono::Local;

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), EngineError> {
    let build = build_info::current();
    tracing::info!(
        version = build.version,
        git = build.git_hash,
        profile = build.profile,
        "budgetwise recurring service starting"
    );

    let config = Config::load()?;
    let data_dir = config.resolve_data_dir();
    let store = JsonStore::open(&data_dir)?;
    store.ping()?;
    tracing::info!(data_dir = %data_dir.display(), "connected to document store");

    let engine = SchedulerEngine::new(Box::new(store.clone()), Box::new(store));
    let handler = RequestHandler::new(engine);

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&handler, stdin.lock(), stdout.lock(), || {
        Local::now().date_naive()
    })?;
    Ok(())
}
