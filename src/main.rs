use reader_server::config::{AppState, Config};
use reader_server::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    // Worker count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    if !std::path::Path::new(&cfg.notes.base_dir).is_dir() {
        logger::log_warning(&format!(
            "Base directory '{}' does not exist, every request will return 404",
            cfg.notes.base_dir
        ));
    }

    let state = Arc::new(AppState::new(cfg));
    server::signal::start_signal_handler(Arc::clone(&state.shutdown));

    server::run(listener, state).await?;
    Ok(())
}
