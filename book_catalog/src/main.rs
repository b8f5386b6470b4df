// Based on https://github.com/LukeMathWalker/tracing-actix-web/blob/main/examples/opentelemetry/src/main.rs#L15
fn init_telemetry() -> anyhow::Result<()> {
    use anyhow::Context;
    use opentelemetry::global;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use opentelemetry_sdk::runtime::TokioCurrentThread;
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{EnvFilter, Registry};

    let app_name = "book_catalog";

    // Start a new Jaeger trace pipeline.
    // Spans are exported in batch - recommended setup for a production application.
    global::set_text_map_propagator(TraceContextPropagator::new());
    #[allow(deprecated)]
    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(app_name)
        .install_batch(TokioCurrentThread)
        .context("Failed to install OpenTelemetry tracer.")?;

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(telemetry)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use actix_web::{App, HttpServer};
    use anyhow::Context;
    use paperclip::actix::{web, OpenApiExt};
    use tracing_actix_web::TracingLogger;

    use book_catalog::app_config::{config_app, json_config};
    use book_catalog::book_store::{InMemoryBookStore, JsonFileBookStore};
    use book_catalog::books_repository::{BookRepository, StoreBackedBookRepository};
    use book_catalog::settings::Settings;

    init_telemetry()?;
    let settings = Settings::load()?;
    tracing::info!("Starting with {:?}", settings);

    let books_repository: Arc<dyn BookRepository> = if settings.use_in_memory_db {
        Arc::new(StoreBackedBookRepository::new(
            InMemoryBookStore::default(),
            settings.validation_mode,
        ))
    } else {
        Arc::new(StoreBackedBookRepository::new(
            JsonFileBookStore::init(&settings.data_path)
                .await
                .context("Failed to init book store")?,
            settings.validation_mode,
        ))
    };

    tracing::info!(
        "starting HTTP server at http://{}:{}",
        settings.host,
        settings.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap_api()
            .app_data(web::Data::new(books_repository.clone()))
            .app_data(json_config())
            .wrap(TracingLogger::default())
            .configure(config_app)
            .with_json_spec_at("/apispec/v2")
            .build()
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    Ok(())
}
