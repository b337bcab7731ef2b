//! `landline fetch`: query a feature service layer and print GeoJSON.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use landline::query::QueryRequest;

use super::common::{spinner, write_json};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments of the fetch command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Feature service name (e.g. greenway_segments)
    pub service: String,

    /// Layer id to query; discovered from the service when omitted
    #[arg(long)]
    pub layer_id: Option<u32>,

    /// Layer name; also becomes part of the cache key
    #[arg(long)]
    pub layer_name: Option<String>,

    /// Known record count, skipping the object-id count request
    #[arg(long)]
    pub count: Option<u64>,

    /// Ignore the cached copy and query the service again
    #[arg(long)]
    pub force: bool,

    /// Write GeoJSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,
}

impl FetchArgs {
    pub fn request(&self) -> QueryRequest {
        let mut request = QueryRequest::new(&self.service).with_force(self.force);
        if let Some(layer_id) = self.layer_id {
            request = request.with_layer_id(layer_id);
        }
        if let Some(layer_name) = &self.layer_name {
            request = request.with_layer_name(layer_name);
        }
        if let Some(count) = self.count {
            request = request.with_count(count);
        }
        request
    }
}

pub fn run(args: FetchArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("fetch");
    let client = runner.service_client()?;
    let request = args.request();
    let cancel = runner.interrupt_token();

    let progress = spinner(format!("Fetching {}", request.cache_key()));
    let result = runner.block_on(client.query_feature_service_with_cancel(&request, &cancel));
    progress.finish_and_clear();
    let collection = result?;

    write_json(&collection, args.output.as_deref(), !args.compact)?;

    info!(key = %collection.name, features = collection.len(), "Fetch complete");
    eprintln!(
        "{} {} features ({})",
        style("✓").green(),
        collection.len(),
        collection.name
    );
    if let Some(path) = &args.output {
        eprintln!("  Written to {}", path.display());
    }
    Ok(())
}
