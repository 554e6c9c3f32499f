//! Routes parsed commands to their handlers.
//!
//! Configuration is loaded once per invocation from the command's
//! `--config` path (defaults when the file is absent), logging is started
//! from it, and the composition root is built only for commands that need
//! the generator or the credential store.

use std::path::Path;

use tracing::debug;

use super::command::{CheckCommand, Cli, Commands, ConfigCommand, KeyCommand, StylesCommand};
use super::output::{self, OutputConfig};
use super::{check, config, key, session, share, styles, transform};
use crate::application::validate::InputValidator;
use crate::error::Result;
use crate::infrastructure::bootstrap::App;
use crate::infrastructure::config::logging::LoggingConfig;
use crate::infrastructure::config::settings::Config;

/// Run the CLI to completion.
///
/// # Errors
///
/// Returns the first error raised by the selected handler.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(
        cli.json,
        cli.quiet,
        cli.verbose,
        cli.color.enabled(),
    ));

    // These must work even when the config file is broken.
    match &cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            LoggingConfig::default().with_verbosity(cli.verbose).init();
            return config::execute_init(&args.path, args.force);
        }
        Commands::Config(ConfigCommand::Validate(args)) => {
            LoggingConfig::default().with_verbosity(cli.verbose).init();
            return config::execute_validate(&args.config);
        }
        Commands::Styles(StylesCommand::List) => {
            LoggingConfig::default().with_verbosity(cli.verbose).init();
            return styles::list();
        }
        _ => {}
    }

    let config_path = config_path(&cli.command);
    let settings = match config_path {
        Some(path) => Config::load_or_default(path)?,
        None => Config::default(),
    };
    settings.logging.with_verbosity(cli.verbose).init();
    debug!(config = ?config_path, "configuration loaded");

    match cli.command {
        Commands::Transform(args) => {
            let app = App::build(settings);
            transform::execute(&app, &args.image, &args.style, &args.instructions, args.output)
                .await
        }
        Commands::Session(_) => session::execute(&App::build(settings)).await,
        Commands::Key(command) => {
            let app = App::build(settings);
            match command {
                KeyCommand::Set(args) => key::execute_set(&app, args.key.as_deref(), args.session_only),
                KeyCommand::Status(_) => key::execute_status(&app),
                KeyCommand::Clear(_) => key::execute_clear(&app),
                KeyCommand::Test(args) => key::execute_test(&app, args.key.as_deref()).await,
            }
        }
        Commands::Share(args) => share::execute(&settings.share, args.target.as_deref(), !args.no_copy),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config, &settings),
        Commands::Check(CheckCommand::Image(args)) => check::image::execute(
            &args.image,
            args.instructions.as_deref(),
            &InputValidator::from_limits(&settings.limits),
        ),
        Commands::Check(CheckCommand::Connection(_)) => {
            check::connection::execute(&App::build(settings)).await
        }
        Commands::Config(ConfigCommand::Init(_) | ConfigCommand::Validate(_))
        | Commands::Styles(StylesCommand::List) => Ok(()),
    }
}

/// The `--config` path carried by a command, if any.
fn config_path(command: &Commands) -> Option<&Path> {
    let path = match command {
        Commands::Transform(args) => &args.config.config,
        Commands::Session(arg) => &arg.config,
        Commands::Key(KeyCommand::Set(args)) => &args.config.config,
        Commands::Key(KeyCommand::Test(args)) => &args.config.config,
        Commands::Key(KeyCommand::Status(arg) | KeyCommand::Clear(arg)) => &arg.config,
        Commands::Share(args) => &args.config.config,
        Commands::Config(ConfigCommand::Show(arg) | ConfigCommand::Validate(arg)) => &arg.config,
        Commands::Check(CheckCommand::Image(args)) => &args.config.config,
        Commands::Check(CheckCommand::Connection(arg)) => &arg.config,
        Commands::Config(ConfigCommand::Init(_)) | Commands::Styles(_) => return None,
    };
    Some(path.as_path())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::adapter::inbound::cli::paths;

    #[test]
    fn config_path_follows_the_flag() {
        let cli = Cli::try_parse_from(["roomstyle", "key", "status", "-c", "/tmp/x.toml"]).unwrap();
        assert_eq!(config_path(&cli.command), Some(Path::new("/tmp/x.toml")));

        let cli = Cli::try_parse_from(["roomstyle", "config", "init"]).unwrap();
        assert_eq!(config_path(&cli.command), None);
    }

    #[test]
    fn check_image_defaults_to_home_config() {
        let cli = Cli::try_parse_from(["roomstyle", "check", "image", "a.png"]).unwrap();
        assert_eq!(
            config_path(&cli.command).map(Path::to_path_buf),
            Some(paths::default_config())
        );
    }
}
