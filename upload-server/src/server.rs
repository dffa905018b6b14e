use std::sync::Arc;

use actix_easy_multipart::{tempfile::TempfileConfig, MultipartFormConfig};
use actix_web::web;
use anyhow::Context;
use colored::Colorize;
use tracing::{error, info, warn};

use crate::api;
use crate::infrastructure::config::build_config;
use crate::infrastructure::telemetry::initialize_telemetry;
use crate::infrastructure::ServiceProvider;

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => return eprintln!("{}: {}", "Cannot build runtime".red(), e),
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry(config.telemetry()) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };
    let service_provider = match ServiceProvider::build(config) {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    if let Err(e) = prepare_storage(&service_provider).await {
        return eprintln!("{}: {:#}", "Cannot prepare storage".red(), e);
    }
    tokio::select! {
        _ = initialize_web_host(service_provider) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping services (ctrl-c handling).");
        }
    }
}

/// Create the directories the store works in and clean up after an unclean shutdown.
pub async fn prepare_storage(sp: &ServiceProvider) -> anyhow::Result<()> {
    let temp_dir = sp.config().host().temp_dir();
    tokio::fs::create_dir_all(temp_dir)
        .await
        .with_context(|| format!("can't create temp dir {temp_dir}"))?;
    let root = sp.storage_root();
    if !*sp.config().storage().sweep_on_startup() {
        tokio::fs::create_dir_all(root.base())
            .await
            .with_context(|| format!("can't create storage root {:?}", root.base()))?;
        let index = sp.index_repo().load().await?;
        info!("Loaded file index with {} hashes.", index.len());
        return Ok(());
    }
    let report = service_upload::sweep(root, sp.index_repo().as_ref()).await?;
    if !report.dangling.is_empty() {
        warn!(
            "{} index entries point at missing files, remove them with /delete.",
            report.dangling.len()
        );
    }
    Ok(())
}

/// Routes and extractor configuration of the store.
pub fn configure(cfg: &mut web::ServiceConfig, sp: Arc<ServiceProvider>) {
    let host = sp.config().host();
    cfg.app_data(MultipartFormConfig::default().total_limit(*host.max_body_bytes()))
        .app_data(TempfileConfig::default().directory(host.temp_dir()))
        .app_data(api::upload::json_config())
        .app_data(web::Data::from(sp.clone()))
        .service(api::upload::check)
        .service(api::upload::merge)
        .service(api::upload::link)
        .route("/upload", web::post().to(api::upload::upload_chunk))
        .route("/upload/{tail:.*}", web::post().to(api::upload::upload_chunk))
        .route("/delete", web::post().to(api::upload::delete))
        .route("/delete/{tail:.*}", web::post().to(api::upload::delete))
        .route("/download", web::post().to(api::upload::download))
        .route("/download/{tail:.*}", web::post().to(api::upload::download))
        .route("/files", web::post().to(api::upload::list_files))
        // Older clients list files through `/test`.
        .route("/test", web::post().to(api::upload::list_files));
}

pub async fn initialize_web_host(sp: Arc<ServiceProvider>) {
    let host = sp.config().host().clone();
    let server = actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);

        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .configure(|cfg| configure(cfg, sp.clone()))
    })
    .bind((host.bind_address().to_owned(), *host.bind_port()));
    let server = match server {
        Ok(x) => x,
        Err(e) => {
            return error!("Cannot bind {}:{}: {}", host.bind_address(), host.bind_port(), e);
        }
    };
    info!("Listening on {}:{}.", host.bind_address(), host.bind_port());
    match server.disable_signals().run().await {
        Ok(_) => info!("Web server stopped successfully."),
        Err(e) => error!("Web server into error: {}", e),
    }
}
