use actix_cors::Cors;
use actix_server::ServerHandle;
use actix_web::{
    App, HttpServer,
    web::{self, Data},
};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use rameplayer_admin::{
    api::Api, config::AppConfig, rame_client::RameClient, services::signal::AppliedSignal,
};
use std::io::Write;
use tokio::{
    signal::unix::{SignalKind, signal},
    sync::broadcast::{self, error::RecvError},
};

type AdminApi = Api<RameClient, RameClient>;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let rame_client = RameClient::new().context("failed to create rame client")?;
    let applied = AppliedSignal::new();
    tokio::spawn(observe_applied_configurations(applied.subscribe()));

    let (server_handle, server_task) = run_server(rame_client, applied)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => debug!("ctrl-c received"),
        _ = sigterm.recv() => debug!("SIGTERM received"),
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    }

    info!("shutting down");
    server_handle.stop(true).await;
    info!("shutdown complete");

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!("module version: {}", env!("CARGO_PKG_VERSION"));
    info!("device REST API: {}", AppConfig::get().rame.base_url());
}

/// Observer of finished save attempts
///
/// The device REST API has no endpoint to reset its pending notifications and
/// the console polls `/notices` itself, so this hook only records the event in
/// the log. Further observers subscribe to the same `AppliedSignal`.
async fn observe_applied_configurations(mut applied_rx: broadcast::Receiver<()>) {
    loop {
        match applied_rx.recv().await {
            Ok(()) => info!("configuration applied"),
            Err(RecvError::Lagged(skipped)) => {
                debug!("configuration applied, {skipped} signals skipped")
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn run_server(
    rame_client: RameClient,
    applied: AppliedSignal,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)> {
    let api = Data::new(AdminApi::new(rame_client.clone(), rame_client, applied));
    let ui_port = AppConfig::get().ui.port;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allowed_methods(vec!["GET", "POST", "DELETE"])
                    .max_age(3600),
            )
            .app_data(api.clone())
            .route("/version", web::get().to(AdminApi::version))
            .route("/healthcheck", web::get().to(AdminApi::healthcheck))
            .service(
                web::resource("/settings")
                    .route(web::get().to(AdminApi::settings))
                    .route(web::post().to(AdminApi::save_settings)),
            )
            .service(
                web::resource("/notices")
                    .route(web::get().to(AdminApi::notices))
                    .route(web::delete().to(AdminApi::dismiss_notices)),
            )
    })
    .bind(format!("0.0.0.0:{ui_port}"))
    .context("failed to bind server")?
    .disable_signals()
    .run();

    Ok((server.handle(), tokio::spawn(server)))
}
