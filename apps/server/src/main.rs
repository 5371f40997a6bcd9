//! Attachment forms server - main entry point.
//!
//! Starts the Actix-web server with the attachment pages, the download
//! route and, when configured, the wasm row controller under `/pkg`.

use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use attachment_forms_lib::api::{self, AttachmentForm};
use attachment_forms_lib::config::Config;
use attachment_forms_lib::middleware::RequestLogger;
use attachment_forms_lib::services::{DocumentStore, FileStorage, demo_fields};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, ATTACHMENTS_STORAGE_DIR and ATTACHMENTS_CLIENT_DIR must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Attachment Forms Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Storing attachments in {}", config.storage_dir.display());
    }

    // Field descriptors are checked once, before serving anything
    let fields = match demo_fields() {
        Ok(fields) => fields,
        Err(e) => {
            error!("Invalid attachment field declaration: {}", e);
            std::process::exit(1);
        }
    };

    let storage = FileStorage::new(config.storage_dir.clone());
    storage
        .ensure_root()
        .await
        .expect("Failed to create storage directory");

    let form = web::Data::new(AttachmentForm {
        fields,
        render: config.render.clone(),
        purge_deleted: config.purge_deleted,
        max_upload_size: config.max_upload_size,
        client_enabled: config.client_dir.is_some(),
    });
    let documents = web::Data::new(DocumentStore::demo());
    let storage = web::Data::new(storage);

    let bind_address = config.bind_address();
    let download_path = config.render.download_path.clone();
    let client_dir = config.client_dir.clone();
    let max_upload_size = config.max_upload_size;

    info!(
        "Upload limit: {}MB per postback, purge deleted files: {}",
        max_upload_size / 1024 / 1024,
        config.purge_deleted
    );
    if let Some(ref dir) = client_dir {
        info!("Serving row controller from {:?}", dir);
    } else {
        warn!("ATTACHMENTS_CLIENT_DIR not set - editor pages render without the row controller");
    }

    let worker_count = if config.is_development() {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let mut app = App::new()
            .wrap(RequestLogger)
            .app_data(form.clone())
            .app_data(documents.clone())
            .app_data(storage.clone())
            .app_data(web::PayloadConfig::new(max_upload_size))
            .configure(|cfg| api::configure(cfg, &download_path));

        if let Some(ref dir) = client_dir {
            app = app.service(Files::new("/pkg", dir.clone()));
        }

        app
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
