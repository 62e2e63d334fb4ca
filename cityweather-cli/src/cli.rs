use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use cityweather_core::{
    Config, OrderingPolicy, Transition, WeatherSession, fetch_weather, provider::provider_from_config,
    render,
};
use inquire::{Password, PasswordDisplayMode, Select};
use std::path::PathBuf;
use tracing::info;

use crate::{logging, notice::Notice, tui};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity; repeat for more.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and session preferences.
    Configure,

    /// Look up one city and print the result.
    Show {
        /// City name, sent exactly as given.
        city: String,
    },

    /// Live view: every keystroke starts a lookup.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.clone().unwrap_or(Command::Interactive) {
            Command::Configure => {
                logging::init_stderr(self.verbose)?;
                self.configure()
            }
            Command::Show { city } => {
                logging::init_stderr(self.verbose)?;
                let config = self.load_config()?;
                show(&config, city).await
            }
            Command::Interactive => {
                let config = self.load_config()?;
                let log_path = logging::init_file(self.verbose)?;
                info!(path = %log_path.display(), "starting interactive session");
                tui::run(&config).await
            }
        }
    }

    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    /// Config file merged with environment overrides.
    fn load_config(&self) -> anyhow::Result<Config> {
        let path = self.config_path()?;
        Ok(Config::load_from(&path)?.with_env_overrides())
    }

    fn configure(&self) -> anyhow::Result<()> {
        let path = self.config_path()?;
        // The file alone: an env override must not end up saved to disk.
        let mut config = Config::load_from(&path)?;

        let mut prompt = Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked);
        if config.api_key().is_some() {
            prompt = prompt.with_help_message("Leave empty to keep the current key");
        }
        let api_key = prompt.prompt().context("Failed to read API key")?;
        if !api_key.trim().is_empty() {
            config.set_api_key(api_key.trim().to_string());
        } else if config.api_key().is_none() {
            anyhow::bail!("An API key is required.\nHint: get one at https://openweathermap.org/api");
        }

        let current = config.ordering();
        let options = OrderingPolicy::all().to_vec();
        let start = options.iter().position(|p| *p == current).unwrap_or(0);
        config.session.ordering = Select::new("When responses arrive out of order:", options)
            .with_starting_cursor(start)
            .with_help_message("latest-request ignores answers to superseded lookups")
            .prompt()
            .context("Failed to read ordering policy")?;

        config.save_to(&path)?;
        println!("Saved configuration to {}", path.display());

        Ok(())
    }
}

async fn show(config: &Config, city: String) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let mut session = WeatherSession::new(config.ordering());

    let ticket = session.set_city(city);
    let response = fetch_weather(provider.as_ref(), ticket).await;
    let transition = session.apply(response);

    println!("{}", render(session.city(), session.view()));

    match transition {
        Transition::Retained(err) => {
            Err(anyhow::Error::new(err).context(format!("Weather lookup for '{}' failed", session.city())))
        }
        other => {
            if let Some(notice) = Notice::from_transition(&other, session.city()) {
                eprintln!("{}", notice.text);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["cityweather"]).expect("parses");
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn show_keeps_city_verbatim() {
        let cli = Cli::try_parse_from(["cityweather", "-vv", "show", " New York "]).expect("parses");

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, " New York "),
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["cityweather", "configure", "--config", "/tmp/cw.toml"])
            .expect("parses");

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cw.toml")));
        assert_eq!(cli.config_path().expect("path"), PathBuf::from("/tmp/cw.toml"));
    }
}
