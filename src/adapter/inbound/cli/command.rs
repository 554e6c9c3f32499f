//! Command-line interface definitions.
//!
//! Defines the CLI structure for the roomstyle application using `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::paths;
use crate::domain::DEFAULT_STYLE;

/// Redesign room photos in a chosen decor style
#[derive(Parser, Debug)]
#[command(name = "roomstyle")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Resolve against the terminal and `NO_COLOR`.
    #[must_use]
    pub fn enabled(&self) -> bool {
        use std::io::IsTerminal;
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transform one image and save the result
    Transform(TransformArgs),

    /// Interactive redesign session
    Session(ConfigPathArg),

    /// Manage the Gemini API key
    #[command(subcommand)]
    Key(KeyCommand),

    /// Browse style presets
    #[command(subcommand)]
    Styles(StylesCommand),

    /// Print share links and copy the share message
    Share(ShareArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `roomstyle key`.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Set the API key (prompts when no value is given).
    Set(KeySetArgs),
    /// Show whether a key is available and where it lives.
    Status(ConfigPathArg),
    /// Forget the key in this session and in storage.
    Clear(ConfigPathArg),
    /// Verify the key with a minimal request and save it on success.
    Test(KeyTestArgs),
}

/// Subcommands for `roomstyle styles`.
#[derive(Subcommand, Debug)]
pub enum StylesCommand {
    /// List every style preset.
    List,
}

/// Subcommands for `roomstyle config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Subcommands for `roomstyle check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Check that an image would be accepted, without calling the API.
    Image(CheckImageArgs),
    /// Check that the API accepts the current key.
    Connection(ConfigPathArg),
}

/// Shared argument for commands that need only a configuration path.
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Arguments for `transform`.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Room photo (JPG, PNG or WebP).
    pub image: PathBuf,

    /// Style preset id (see `roomstyle styles list`).
    #[arg(short, long, default_value = DEFAULT_STYLE)]
    pub style: String,

    /// Extra instructions appended to the prompt.
    #[arg(short, long, default_value = "")]
    pub instructions: String,

    /// Directory for the result (overrides `transform.output_dir`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Arguments for `key set`.
#[derive(Args, Debug)]
pub struct KeySetArgs {
    /// The key. Prompted for (hidden input) when omitted.
    pub key: Option<String>,

    /// Keep the key in memory only; removes any saved copy.
    #[arg(long)]
    pub session_only: bool,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Arguments for `key test`.
#[derive(Args, Debug)]
pub struct KeyTestArgs {
    /// Key to test instead of the current one.
    pub key: Option<String>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Arguments for `share`.
#[derive(Args, Debug)]
pub struct ShareArgs {
    /// Only print the link for this target (x, facebook, linkedin, whatsapp, reddit).
    #[arg(short, long)]
    pub target: Option<String>,

    /// Do not copy the message to the clipboard.
    #[arg(long)]
    pub no_copy: bool,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Arguments for `config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value_os_t = paths::default_config())]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `check image`.
#[derive(Args, Debug)]
pub struct CheckImageArgs {
    /// Image to check.
    pub image: PathBuf,

    /// Instructions to check against the length limit.
    #[arg(short, long)]
    pub instructions: Option<String>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_defaults_style_and_instructions() {
        let cli = Cli::try_parse_from(["roomstyle", "transform", "room.jpg"]).unwrap();
        let Commands::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.image, PathBuf::from("room.jpg"));
        assert_eq!(args.style, "minimalist");
        assert!(args.instructions.is_empty());
        assert!(args.output.is_none());
        assert_eq!(args.config.config, paths::default_config());
    }

    #[test]
    fn transform_accepts_all_options() {
        let cli = Cli::try_parse_from([
            "roomstyle",
            "transform",
            "room.png",
            "--style",
            "industrial",
            "-i",
            "Add a fireplace",
            "-o",
            "/tmp/out",
            "-c",
            "/tmp/c.toml",
        ])
        .unwrap();
        let Commands::Transform(args) = cli.command else {
            panic!("expected transform");
        };
        assert_eq!(args.style, "industrial");
        assert_eq!(args.instructions, "Add a fireplace");
        assert_eq!(args.output, Some(PathBuf::from("/tmp/out")));
        assert_eq!(args.config.config, PathBuf::from("/tmp/c.toml"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["roomstyle", "styles", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Styles(StylesCommand::List)));
    }

    #[test]
    fn key_set_session_only() {
        let cli =
            Cli::try_parse_from(["roomstyle", "key", "set", "AIzaXYZ", "--session-only"]).unwrap();
        let Commands::Key(KeyCommand::Set(args)) = cli.command else {
            panic!("expected key set");
        };
        assert_eq!(args.key.as_deref(), Some("AIzaXYZ"));
        assert!(args.session_only);
    }

    #[test]
    fn color_choice_resolves_explicit_modes() {
        assert!(ColorChoice::Always.enabled());
        assert!(!ColorChoice::Never.enabled());
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["roomstyle"]).is_err());
    }
}
