//! `landline summary`: tally greenway facilities per service.

use clap::Args;

use landline::facility::FacilitySummary;
use landline::query::QueryRequest;

use super::common::{spinner, write_json};
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Feature service names
    #[arg(required = true, num_args = 1..)]
    pub services: Vec<String>,

    /// Layer id used for every service
    #[arg(long)]
    pub layer_id: Option<u32>,

    /// Ignore cached copies
    #[arg(long)]
    pub force: bool,

    /// Print the summaries as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SummaryArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("summary");
    let client = runner.service_client()?;
    let cancel = runner.interrupt_token();

    let mut summaries = Vec::with_capacity(args.services.len());
    for service in &args.services {
        let mut request = QueryRequest::new(service).with_force(args.force);
        if let Some(layer_id) = args.layer_id {
            request = request.with_layer_id(layer_id);
        }

        let progress = spinner(format!("Fetching {}", request.cache_key()));
        let result = runner.block_on(client.query_feature_service_with_cancel(&request, &cancel));
        progress.finish_and_clear();

        summaries.push(FacilitySummary::from_collection(&result?));
    }

    if args.json {
        write_json(&summaries, None, true)
    } else {
        for summary in &summaries {
            print!("{}", format_summary(summary));
        }
        Ok(())
    }
}

fn format_summary(summary: &FacilitySummary) -> String {
    let mut out = format!(
        "{}: {} features, {} vertices\n",
        summary.name, summary.total.features, summary.total.vertices
    );
    for (label, tally) in &summary.facilities {
        out.push_str(&format!(
            "  {:<48} {:>7} {:>9}\n",
            label, tally.features, tally.vertices
        ));
    }
    if summary.unclassified.features > 0 {
        out.push_str(&format!(
            "  {:<48} {:>7} {:>9}\n",
            "(unclassified)", summary.unclassified.features, summary.unclassified.vertices
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use landline::facility::FacilityTally;

    #[test]
    fn test_format_summary_lists_labels_and_unclassified() {
        let mut summary = FacilitySummary {
            name: "greenway_segments-null".to_string(),
            total: FacilityTally {
                features: 3,
                vertices: 12,
            },
            ..FacilitySummary::default()
        };
        summary.facilities.insert(
            "Bike Lane and Sidewalk".to_string(),
            FacilityTally {
                features: 2,
                vertices: 8,
            },
        );
        summary.unclassified = FacilityTally {
            features: 1,
            vertices: 4,
        };

        let text = format_summary(&summary);

        assert!(text.starts_with("greenway_segments-null: 3 features, 12 vertices"));
        assert!(text.contains("Bike Lane and Sidewalk"));
        assert!(text.contains("(unclassified)"));
    }
}
