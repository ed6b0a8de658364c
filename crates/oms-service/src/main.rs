//! Main entry point for the order management service.
//!
//! This binary wires the storage backends into the order engine and
//! exposes the engine over HTTP. All pricing, lifecycle, and analytics
//! logic lives in the engine; this layer only parses arguments, loads
//! configuration, and serves requests.

use clap::Parser;
use oms_config::Config;
use oms_core::{EngineBuilder, EngineError, OrderEngine};
use oms_storage::implementations::file::create_storage as create_file_storage;
use oms_storage::implementations::memory::create_storage as create_memory_storage;
use oms_storage::StorageFactory;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the order management service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order engine with the registered storage backends
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.init();

	// Load configuration
	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path)?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let api_config = match config.api.clone() {
		Some(api) if api.enabled => api,
		_ => {
			tracing::warn!("API server is disabled in configuration; nothing to serve");
			return Ok(());
		},
	};

	let engine = Arc::new(build_engine(config)?);
	server::start_server(api_config, engine).await?;

	tracing::info!("Stopped service");
	Ok(())
}

/// Builds the order engine with all registered storage backends.
fn build_engine(config: Config) -> Result<OrderEngine, EngineError> {
	let mut storage_factories: HashMap<String, StorageFactory> = HashMap::new();
	storage_factories.insert("memory".to_string(), create_memory_storage);
	storage_factories.insert("file".to_string(), create_file_storage);

	EngineBuilder::new(config).build(storage_factories)
}
