//! `landline token`: exchange the environment credentials for a token.

use clap::Args;
use console::style;

use landline::auth::TokenProvider;

use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Print the access token itself
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: TokenArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("token");
    let provider = runner.token_provider()?;
    let token = runner.block_on(provider.token())?;

    if args.show {
        println!("{}", token.as_str());
    } else {
        println!(
            "{} Token issued by {}",
            style("✓").green(),
            runner.config().arcgis.token_url
        );
        println!("  Expires: {}", token.expires_at().to_rfc3339());
        println!("  Valid for: {} minutes", token.remaining_secs() / 60);
    }
    Ok(())
}
