//! Configuration management CLI commands.

use clap::Subcommand;

use landline::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    let path = config_file_path();
    match command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Show => {
            let config = ConfigFile::load_from(&path)?;
            if !path.exists() {
                println!("; {} not found, showing defaults", path.display());
            }
            print!("{}", config.to_ini_string());
        }
        ConfigCommands::Init { force } => {
            if force {
                ConfigFile::default().save_to(&path)?;
                println!("Wrote default configuration to {}", path.display());
            } else if ConfigFile::ensure_exists_at(&path)? {
                println!("Created {}", path.display());
            } else {
                println!("{} already exists (use --force to replace it)", path.display());
            }
        }
    }
    Ok(())
}
