//! Serve command - run the HTTP server with hot reload.

use crate::config::Settings;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub bind: Option<String>,
    pub no_watch: bool,
}

/// Run the serve command until Ctrl-C.
#[cfg(feature = "http-server")]
pub async fn run(args: ServeArgs, mut config: Settings) -> anyhow::Result<()> {
    use std::sync::Arc;

    use crate::reload::{RestartCoordinator, Supervisor};
    use crate::server::{HttpServer, Server};
    use crate::store::Registries;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let registries = Arc::new(Registries::new());
    let server = Arc::new(HttpServer::new(config.server.bind.clone(), registries.clone()));
    let restart = RestartCoordinator::spawn(server.clone());
    let supervisor = Supervisor::new(registries, Some(restart), &config);

    let report = supervisor.preload(&config).await;
    for failure in &report.failed {
        tracing::warn!("[serve] failed to load {failure}");
    }

    server.start().await?;

    if args.no_watch || !config.file_watch.enabled {
        crate::log_event!("serve", "file watching disabled");
    } else {
        supervisor.watch(&config);
    }

    shutdown_signal().await;
    server.stop().await?;
    crate::log_event!("serve", "shut down");
    Ok(())
}

#[cfg(feature = "http-server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[serve] cannot listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    crate::log_event!("serve", "received shutdown signal");
}

#[cfg(not(feature = "http-server"))]
pub async fn run(_args: ServeArgs, _config: Settings) -> anyhow::Result<()> {
    eprintln!("HTTP server support is not compiled in.");
    eprintln!("Please rebuild with: cargo build --features http-server");
    std::process::exit(1);
}
