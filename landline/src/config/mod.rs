//! User configuration from `~/.landline/config.ini`.
//!
//! ```ini
//! [arcgis]
//! services_host = https://services.arcgis.com
//! org_id = c5WwApDsDjRhIVkH
//! token_url = https://www.arcgis.com/sharing/rest/oauth2/token
//! token_expiration = 3600
//!
//! [query]
//! chunk_divisor = 3
//! max_chunk_size = 10000
//! timeout = 120
//! out_fields = *
//! out_sr = 4326
//!
//! [cache]
//! directory = ~/.cache/landline
//! response_cache_size = 256MB
//!
//! [logging]
//! file = ~/.landline/landline.log
//! ```
//!
//! Missing files and missing keys fall back to defaults. Credentials are
//! never read from the file; see [`crate::auth::Credentials::from_env`].

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError, CONFIG_FILE_NAME};
pub use settings::{ArcgisSettings, CacheSettings, ConfigFile, LoggingSettings, QuerySettings};
