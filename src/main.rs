use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use agenthub::api::services::{api_v1_routes, health};
use agenthub::cli::{Cli, Command, create_admin};
use agenthub::config::{AppConfig, init_config};
use agenthub::services::notify::{Notifier, notifier_from_config};
use agenthub::services::{AdminService, AuthService};
use agenthub::storage::HubStorage;
use agenthub::storage::backend::{infer_backend_from_url, normalize_backend_name};
use agenthub::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = init_config();
    let _log_guard = init_logging(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::CreateAdmin { email, username } => {
            let storage = open_storage(config).await?;
            if let Err(e) = create_admin(&storage, &email, &username).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        Command::SampleConfig => {
            print!("{}", AppConfig::generate_sample_config());
            Ok(())
        }
    }
}

async fn open_storage(config: &AppConfig) -> std::io::Result<Arc<HubStorage>> {
    let database_url = &config.database.database_url;
    let backend = infer_backend_from_url(database_url)
        .map(|name| normalize_backend_name(&name))
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let storage = HubStorage::new(database_url, &backend)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    Ok(Arc::new(storage))
}

async fn run_server(config: &'static AppConfig) -> std::io::Result<()> {
    let storage = open_storage(config).await?;
    info!("Using storage backend: {}", storage.backend_name());

    let notifier: Arc<dyn Notifier> = notifier_from_config(&config.email);
    info!("Notification backend: {}", notifier.name());

    let auth_service = Arc::new(AuthService::new(storage.clone(), notifier.clone()));
    let admin_service = Arc::new(AdminService::new(storage.clone(), notifier.clone()));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in &config.cors.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(notifier.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .wrap(cors)
            .service(api_v1_routes())
            .route("/health", web::get().to(health::health_check))
    })
    .bind(bind_address)?
    .run()
    .await
}
