pub mod about;
pub mod db;
pub mod model;
pub mod services;
pub mod utils;

use db::mongo;
use dotenv::dotenv;
use std::sync::Arc;
use utils::errors::ChronicleError;
use utils::context::ServiceContext;
use utils::config::{Configuration, self};
use opentelemetry::{global, sdk::{propagation::TraceContextPropagator,trace,trace::Sampler}};
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry, util::SubscriberInitExt};

pub use services::{authenticate::authenticate, cast_vote::cast_vote, register::register, throttle::LoginThrottle};

const APP_NAME: &str = "Chronicle";

///
/// Entry point for the binary - bring MongoDB in line with the code and exit.
///
pub async fn lib_main() -> Result<(), ChronicleError> {

    // Load any local dev settings as environment variables from a .env file.
    dotenv().ok();

    // Default log level to INFO if it's not specified.
    config::default_env("RUST_LOG", "INFO");

    let config = Configuration::from_env()?;
    let tracing = init_tracing(&config);

    tracing::info!("{}\n{}", BANNER, config.fmt_console()?);

    let _ctx = init(config).await?;
    tracing::info!("{} schema is up to date", APP_NAME);

    if tracing {
        opentelemetry::global::shutdown_tracer_provider(); // sending remaining spans
    }

    Ok(())
}

///
/// Connect to MongoDB, sync the indexes and build the context the services run with.
///
/// Integration tests use this to get the same set-up as the binary.
///
pub async fn init(config: Configuration) -> Result<Arc<ServiceContext>, ChronicleError> {
    // Create a MongoDB client and connect to it before proceeding.
    let db = mongo::get_mongo_db(APP_NAME, &config).await?;

    // Ensure the schema is in sync with the code.
    mongo::update_mongo(&db).await?;

    Ok(Arc::new(ServiceContext::new(config, db)?))
}

///
/// Initialise tracing and plug-in the Jaeger feature if enabled.
///
pub fn init_tracing(config: &Configuration) -> bool {
    global::set_text_map_propagator(TraceContextPropagator::new());

    if config.distributed_tracing {
        // Install the Jaeger pipeline.
        let tracer = opentelemetry_jaeger::new_pipeline()
            .with_service_name(APP_NAME)
            .with_trace_config(trace::config().with_sampler(Sampler::AlwaysOn))
            .with_agent_endpoint(config.jaeger_endpoint.clone().unwrap_or_default())
            .install_batch(opentelemetry::runtime::Tokio);

        match tracer {
            Ok(tracer) => {
                if let Err(err) = Registry::default()
                    .with(tracing_subscriber::EnvFilter::from_default_env()) // Set the tracing level to match RUST_LOG env variable.
                    .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .try_init() {
                        tracing::info!("Tracing already initialised: {}", err.to_string()); // Allowed error here - tests call this fn repeatedly.
                }

                return true
            },
            Err(err) => eprintln!("Unable to build Jaeger pipeline, continuing without it: {}", err),
        }
    }

    if let Err(err) = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env()) // Set the tracing level to match RUST_LOG env variable.
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
        .try_init() {
            tracing::info!("Tracing already initialised: {}", err.to_string()); // Allowed error here - tests call this fn repeatedly.
    }

    false
}

const BANNER: &str = r#"
  _____ _                     _      _
 / ____| |                   (_)    | |
| |    | |__  _ __ ___  _ __  _  ___| | ___
| |    | '_ \| '__/ _ \| '_ \| |/ __| |/ _ \
| |____| | | | | | (_) | | | | | (__| |  __/
 \_____|_| |_|_|  \___/|_| |_|_|\___|_|\___|
"#;
