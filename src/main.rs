mod app;
mod catalog;
mod logging;
mod managers;
mod player;
mod runtime;
mod settings;
mod storage;
mod ui;

fn main() -> anyhow::Result<()> {
    let data_dir = storage::resolve_data_path();
    let _log_guard = logging::init(&data_dir);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");
    runtime::run()
}
