//! `landline layers`: list the layers of a feature service.

use clap::Args;

use landline::arcgis::LayerInfo;

use super::common::spinner;
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct LayersArgs {
    /// Feature service name
    pub service: String,
}

pub fn run(args: LayersArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("layers");
    let client = runner.service_client()?;

    let progress = spinner(format!("Listing layers of {}", args.service));
    let result = runner.block_on(client.list_layers(&args.service));
    progress.finish_and_clear();

    print!("{}", format_layers(&result?));
    Ok(())
}

fn format_layers(layers: &[LayerInfo]) -> String {
    let mut out = format!("{:>4}  {:<40}  {}\n", "ID", "NAME", "GEOMETRY");
    for layer in layers {
        out.push_str(&format!(
            "{:>4}  {:<40}  {}\n",
            layer.id,
            layer.name,
            layer.geometry_type.as_deref().unwrap_or("-")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_layers_lists_each_layer() {
        let layers = vec![
            LayerInfo {
                id: 0,
                name: "greenway_segments".to_string(),
                geometry_type: Some("esriGeometryPolyline".to_string()),
            },
            LayerInfo {
                id: 4,
                name: "labels".to_string(),
                geometry_type: None,
            },
        ];

        let table = format_layers(&layers);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("greenway_segments"));
        assert!(lines[1].ends_with("esriGeometryPolyline"));
        assert!(lines[2].trim_start().starts_with('4'));
        assert!(lines[2].ends_with('-'));
    }
}
