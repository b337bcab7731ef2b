//! INI parsing: the single place where key names map to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` into a `ConfigFile`, overlaying defaults.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [arcgis] section
    if let Some(section) = ini.section(Some("arcgis")) {
        if let Some(v) = non_empty(section, "services_host") {
            if !(v.starts_with("https://") || v.starts_with("http://")) {
                return Err(invalid("arcgis", "services_host", v, "must be an http(s) URL"));
            }
            config.arcgis.services_host = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty(section, "org_id") {
            config.arcgis.org_id = v.to_string();
        }
        if let Some(v) = non_empty(section, "token_url") {
            if !(v.starts_with("https://") || v.starts_with("http://")) {
                return Err(invalid("arcgis", "token_url", v, "must be an http(s) URL"));
            }
            config.arcgis.token_url = v.to_string();
        }
        if let Some(v) = non_empty(section, "token_expiration") {
            config.arcgis.token_expiration = parse_positive(
                "arcgis",
                "token_expiration",
                v,
                "expected token lifetime in minutes, at least 1",
            )?;
        }
    }

    // [query] section
    if let Some(section) = ini.section(Some("query")) {
        if let Some(v) = non_empty(section, "chunk_divisor") {
            config.query.chunk_divisor =
                parse_positive("query", "chunk_divisor", v, "expected an integer >= 1")?;
        }
        if let Some(v) = non_empty(section, "max_chunk_size") {
            config.query.max_chunk_size =
                parse_positive("query", "max_chunk_size", v, "expected an integer >= 1")?;
        }
        if let Some(v) = non_empty(section, "timeout") {
            config.query.timeout_secs = v.parse().map_err(|_| {
                invalid("query", "timeout", v, "expected seconds (0 disables the timeout)")
            })?;
        }
        if let Some(v) = section.get("out_fields") {
            config.query.out_fields = parse_field_list(v);
        }
        if let Some(v) = non_empty(section, "out_sr") {
            config.query.out_sr =
                parse_positive("query", "out_sr", v, "expected a spatial reference WKID")?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section, "directory") {
            config.cache.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "response_cache_size") {
            config.cache.response_cache_size = parse_size(v).ok_or_else(|| {
                invalid(
                    "cache",
                    "response_cache_size",
                    v,
                    "expected format like '256MB', '1GB', or '512KB'",
                )
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive<T>(section: &str, key: &str, value: &str, reason: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + From<u8>,
{
    match value.parse::<T>() {
        Ok(n) if n >= T::from(1) => Ok(n),
        _ => Err(invalid(section, key, value, reason)),
    }
}

/// Comma separated field names; blank means all fields.
pub(super) fn parse_field_list(value: &str) -> Vec<String> {
    let fields: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        vec!["*".to_string()]
    } else {
        fields
    }
}

/// Parse a byte size such as `256MB`, `1gb` or `4096`.
pub(super) fn parse_size(value: &str) -> Option<u64> {
    let upper = value.trim().to_ascii_uppercase();
    let (digits, multiplier) = if let Some(n) = upper.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = upper.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        (upper.as_str(), 1)
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_query_section() {
        let config = parse(
            "[query]\nchunk_divisor = 5\nmax_chunk_size = 2000\ntimeout = 30\nout_fields = ObjectId, SegType ,FacStat\nout_sr = 3857\n",
        )
        .unwrap();
        assert_eq!(config.query.chunk_divisor, 5);
        assert_eq!(config.query.max_chunk_size, 2000);
        assert_eq!(config.query.out_sr, 3857);
        assert_eq!(
            config.query.out_fields,
            vec!["ObjectId", "SegType", "FacStat"]
        );
        assert_eq!(
            config.query_config().timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_blank_out_fields_means_all() {
        let config = parse("[query]\nout_fields =\n").unwrap();
        assert_eq!(config.query.out_fields, vec!["*"]);
    }

    #[test]
    fn test_zero_chunk_divisor_rejected() {
        let err = parse("[query]\nchunk_divisor = 0\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "query");
                assert_eq!(key, "chunk_divisor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        assert!(matches!(
            parse("[query]\ntimeout = soon\n"),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_arcgis_section() {
        let config = parse(
            "[arcgis]\nservices_host = https://services9.arcgis.com/\norg_id = Org9\ntoken_expiration = 120\n",
        )
        .unwrap();
        assert_eq!(config.arcgis.services_host, "https://services9.arcgis.com");
        assert_eq!(config.arcgis.org_id, "Org9");
        assert_eq!(config.arcgis.token_expiration, 120);
    }

    #[test]
    fn test_services_host_must_be_url() {
        assert!(parse("[arcgis]\nservices_host = services.arcgis.com\n").is_err());
    }

    #[test]
    fn test_cache_size_units() {
        assert_eq!(parse_size("256MB"), Some(256 * 1024 * 1024));
        assert_eq!(parse_size("1gb"), Some(1024 * 1024 * 1024));
        assert_eq!(parse_size("512 KB"), Some(512 * 1024));
        assert_eq!(parse_size("4096"), Some(4096));
        assert_eq!(parse_size("lots"), None);
    }

    #[test]
    fn test_invalid_cache_size_rejected() {
        assert!(parse("[cache]\nresponse_cache_size = huge\n").is_err());
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/cache/x"), PathBuf::from("/var/cache/x"));
    }
}
