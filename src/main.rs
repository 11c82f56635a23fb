use std::sync::Arc;

use nocache_serve::config::{self, AppState, Config};
use nocache_serve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Worker threads default to CPU cores unless configured
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.performance.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = server::resolve_bind_addr(config::HOST, config::PORT)?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::from_current_dir(cfg)?);

    logger::log_server_start(&Config::public_url());

    server::serve(listener, state).await?;
    Ok(())
}
