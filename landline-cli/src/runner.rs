//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the tokio runtime and
//! construction of the library clients shared by command handlers.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use landline::auth::{CachingTokenProvider, EnvCredentialsProvider};
use landline::cache::{DiskCacheProvider, FeatureCacheClient};
use landline::config::ConfigFile;
use landline::http::{AsyncReqwestClient, CachingHttpClient};
use landline::logging::{init_logging, LoggingGuard, DEFAULT_LOG_FILE};
use landline::query::FeatureServiceClient;

use crate::error::CliError;

/// Token provider used by the CLI: environment credentials, cached per run.
pub type CliTokenProvider = CachingTokenProvider<EnvCredentialsProvider<AsyncReqwestClient>>;

/// Feature service client used by the CLI.
pub type CliServiceClient =
    FeatureServiceClient<CachingHttpClient<AsyncReqwestClient>, CliTokenProvider>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, initialize logging and start the runtime.
    ///
    /// Log lines go to the configured file; with `debug` they are mirrored
    /// to stderr as well.
    pub fn with_debug(debug: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        let logging_guard = init_logging(log_dir, &log_file, debug, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Landline v{}", landline::VERSION);
        info!("Landline CLI: {} command", command);
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// A token cancelled on Ctrl-C.
    pub fn interrupt_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let on_signal = token.clone();
        self.runtime.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupt received, cancelling");
                on_signal.cancel();
            }
        });
        token
    }

    /// Open the on-disk geometry cache named in the config.
    pub fn open_cache(&self) -> Result<FeatureCacheClient, CliError> {
        let directory = self.config.cache.directory.clone();
        let provider = self.block_on(DiskCacheProvider::open(directory))?;
        Ok(FeatureCacheClient::new(Arc::new(provider)))
    }

    /// Token provider reading `AGOL_CLIENT_ID` / `AGOL_CLIENT_SECRET`.
    pub fn token_provider(&self) -> Result<CliTokenProvider, CliError> {
        let arcgis = &self.config.arcgis;
        let provider = EnvCredentialsProvider::new(AsyncReqwestClient::new()?, &arcgis.token_url)
            .with_expiration(arcgis.token_expiration);
        Ok(CachingTokenProvider::new(provider))
    }

    /// Feature service client over the disk cache.
    pub fn service_client(&self) -> Result<CliServiceClient, CliError> {
        let http = CachingHttpClient::new(
            AsyncReqwestClient::new()?,
            self.config.cache.response_cache_size,
        );
        Ok(FeatureServiceClient::new(
            http,
            self.token_provider()?,
            self.open_cache()?,
            self.config.query_config(),
        ))
    }
}
