mod wiring;

use crate::{cli, context, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub storage: storage::SqliteStorage,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting digital-profile");
        log::info!("🏛️ Municipality: {} / {}", ctx.site.name_en, ctx.site.name_ne);
        log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());

        let app = Self::from_context(ctx)?;
        Ok((app, cli))
    }

    pub fn from_context(ctx: context::Context) -> Result<Self> {
        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        Ok(Self { ctx, storage })
    }
}

pub async fn run_daemon(app: App, shutdown: CancellationToken) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.ctx.api_listen);
    log::info!("🔗 Base URL: {}", app.ctx.site.base_url);
    if let Some(path) = app.ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.to_string_lossy());
    }

    let api_addr = app.ctx.api_listen;
    let rest_shutdown = shutdown.clone();
    let mut rest_handle = tokio::spawn(async move {
        rest::serve(api_addr, app.storage, app.ctx.site, rest_shutdown).await
    });

    let finished_early = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
            None
        }
        _ = shutdown.cancelled() => None,
        res = &mut rest_handle => Some(res),
    };

    shutdown.cancel();
    let rest_result = match finished_early {
        Some(res) => res,
        None => rest_handle.await,
    };

    match rest_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("REST server error: {:#}", e);
            return Err(e);
        }
        Err(e) => {
            log::error!("REST task failed: {}", e);
            return Err(e.into());
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        cmd.run(&app.ctx, &app.storage)?;
        return Ok(());
    }

    run_daemon(app, CancellationToken::new()).await
}
