use actix_cors::Cors;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use anyhow::Context;
use std::sync::Arc;

use hrms::config::Config;
use hrms::db::{HrStore, init_db};
use hrms::docs::ApiDoc;
use hrms::routes;

use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let store: Arc<dyn HrStore> = Arc::new(
        init_db(&config)
            .await
            .context("Failed to prepare the database")?,
    );
    let policy = config.policy;

    HttpServer::new(move || {
        routes::build_app(store.clone(), policy)
            .wrap(Logger::default())
            // development posture: any origin, method and header, with credentials
            .wrap(Cors::permissive())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
