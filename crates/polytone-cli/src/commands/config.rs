//! Settings file command.

use clap::{Args, Subcommand};
use polytone_config::{Settings, load_or_default};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective settings as TOML
    Show,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the settings file path
    Path,
}

pub fn run(args: ConfigArgs, path: &Path) -> anyhow::Result<()> {
    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => {
            let settings = load_or_default(path)?;
            settings.validate()?;
            print!("{}", settings.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Settings::default().save(path)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommand::Path => println!("{}", path.display()),
    }
    Ok(())
}
