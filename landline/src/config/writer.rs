//! Serialization of `ConfigFile` to the commented INI written on disk.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[arcgis]
; Host serving the organization's hosted feature services
services_host = {}
; ArcGIS Online organization id
org_id = {}
; OAuth2 token endpoint (client credentials grant)
; Credentials come from AGOL_CLIENT_ID and AGOL_CLIENT_SECRET, never this file
token_url = {}
; Requested token lifetime in minutes
token_expiration = {}

[query]
; Records are fetched in about this many concurrent chunks
chunk_divisor = {}
; Upper bound on records per chunk request
max_chunk_size = {}
; Seconds allowed for token, layer discovery and chunk fetches (0 = no limit)
timeout = {}
; Comma separated attribute fields, or * for all
out_fields = {}
; Output spatial reference WKID
out_sr = {}

[cache]
; Directory holding cached feature collections
directory = {}
; In-memory HTTP response cache size (KB, MB, GB suffixes)
response_cache_size = {}

[logging]
; Log file path
file = {}
"#,
        config.arcgis.services_host,
        config.arcgis.org_id,
        config.arcgis.token_url,
        config.arcgis.token_expiration,
        config.query.chunk_divisor,
        config.query.max_chunk_size,
        config.query.timeout_secs,
        config.query.out_fields.join(", "),
        config.query.out_sr,
        path_to_string(&config.cache.directory),
        format_size(config.cache.response_cache_size),
        path_to_string(&config.logging.file),
    )
}

/// Largest unit that represents `bytes` exactly.
fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1024 * 1024 * 1024, "GB"), (1024 * 1024, "MB"), (1024, "KB")];
    for (size, suffix) in UNITS {
        if bytes >= size && bytes % size == 0 {
            return format!("{}{}", bytes / size, suffix);
        }
    }
    bytes.to_string()
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_picks_exact_unit() {
        assert_eq!(format_size(256 * 1024 * 1024), "256MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2GB");
        assert_eq!(format_size(1536), "1536");
        assert_eq!(format_size(3 * 1024), "3KB");
    }

    #[test]
    fn test_output_has_every_section() {
        let content = to_config_string(&ConfigFile::default());
        for section in ["[arcgis]", "[query]", "[cache]", "[logging]"] {
            assert!(content.contains(section), "missing {section}");
        }
        assert!(content.contains("out_fields = *"));
    }
}
