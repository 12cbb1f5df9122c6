use anyhow::Result;
use clap::Parser;
use vaultnotes::VaultConfig;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = VaultConfig::from_env()?;
    log::debug!("Vault root: {}", config.vault_root().display());

    match cli.command {
        Commands::Search(args) => search_command(config, args),
        Commands::Modify(args) => modify_command(config, args),
        Commands::Delete(args) => delete_command(config, args),
        Commands::Create(args) => create_command(config, args),
        Commands::CreateFromTemplate(args) => create_from_template_command(config, args),
    }
}

/// `-v` logs debug, `-q` errors only, otherwise warnings; `RUST_LOG` wins.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
