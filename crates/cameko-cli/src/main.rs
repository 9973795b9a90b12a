#![forbid(unsafe_code)]

mod analytics;
mod cmd;
mod context;
mod output;
mod system;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cameko: post template generator for live-photo posts",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory holding the saved form (overrides config and env).
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "Show the form and the generated post",
        long_about = "Show every form field and the post text generated from them.",
        after_help = "EXAMPLES:\n    # Show the current form\n    cameko show\n\n    # Only the post text, for piping\n    cameko show --format text | pbcopy"
    )]
    Show,

    #[command(
        next_help_heading = "Edit",
        about = "Set a text field",
        long_about = "Set one text field of the form and print the refreshed post.\n\nFields: date, date-format, title, venue, venue-prefix, honorific, hashtags.",
        after_help = "EXAMPLES:\n    # Set the live date\n    cameko set date 2025-07-10\n\n    # Use a Japanese date pattern\n    cameko set date-format \"YYYY年MM月DD日\"\n\n    # Extra hashtags, comma or space separated\n    cameko set hashtags \"かわいい, 超絶イケメン\""
    )]
    Set(cmd::set::SetArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Switch a formatting option",
        long_about = "Turn a formatting option on, off, or toggle it.\n\nFlags: member-hashtag, reverse, parentheses.",
        after_help = "EXAMPLES:\n    # Put the member name in a hashtag\n    cameko flag member-hashtag on\n\n    # Toggle honorific/account order\n    cameko flag reverse"
    )]
    Flag(cmd::flag::FlagArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Select the group",
        long_about = "Select the group whose members are listed. Clears the member selection.",
        after_help = "EXAMPLES:\n    # Switch to ノイミー\n    cameko group ノイミー"
    )]
    Group(cmd::group::GroupArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Select or deselect members",
        long_about = "Toggle members of the selected group. Use --on or --off to force a state.",
        after_help = "EXAMPLES:\n    # Toggle two members\n    cameko member \"大谷 映美里\" \"佐々木 舞香\"\n\n    # Deselect one\n    cameko member --off \"大谷 映美里\"\n\n    # Clear the selection\n    cameko member --clear"
    )]
    Member(cmd::member::MemberArgs),

    #[command(
        next_help_heading = "Read",
        about = "List groups",
        long_about = "List the groups in the roster, in display order."
    )]
    Groups,

    #[command(
        next_help_heading = "Read",
        about = "List members of a group",
        long_about = "List members and accounts of a group (default: the selected group).",
        after_help = "EXAMPLES:\n    # Members of the selected group\n    cameko members\n\n    # Members of another group\n    cameko members ニアジョイ"
    )]
    Members(cmd::directory::MembersArgs),

    #[command(
        next_help_heading = "Export",
        about = "Copy the post to the clipboard"
    )]
    Copy,

    #[command(
        next_help_heading = "Export",
        about = "Open the compose page with the post filled in",
        after_help = "EXAMPLES:\n    # Open the browser\n    cameko post\n\n    # Only print the compose URL\n    cameko post --print-url"
    )]
    Post(cmd::export::PostArgs),

    #[command(
        next_help_heading = "Edit",
        about = "Clear the saved form",
        long_about = "Delete the saved form and return every field to its default."
    )]
    Reset,

    #[command(
        next_help_heading = "Edit",
        about = "Edit the form interactively",
        long_about = "Open a full-screen terminal form with a live preview."
    )]
    Tui,

    #[command(next_help_heading = "Configuration", about = "Inspect configuration")]
    Config {
        #[command(subcommand)]
        command: cmd::config::ConfigCommand,
    },

    #[command(
        next_help_heading = "Configuration",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    cameko completions bash\n\n    # Generate zsh completions\n    cameko completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),

    /// Keep copied text on the clipboard after `cameko copy` exits.
    #[command(name = "clipboard-hold", hide = true)]
    ClipboardHold,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CAMEKO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "cameko=debug,info"
        } else {
            "cameko=info,warn"
        })
    });

    let format = env::var("CAMEKO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the post text; logs always go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The terminal form owns the screen; only log there when asked to.
    if !matches!(cli.command, Commands::Tui) || env::var("CAMEKO_LOG").is_ok() {
        init_tracing(cli.verbose);
    }

    let output = cli.output_mode();
    let state_dir = cli.state_dir.as_deref();
    debug!(?output, "starting");

    match cli.command {
        Commands::Show => cmd::show::run_show(output, state_dir),
        Commands::Set(ref args) => cmd::set::run_set(args, output, state_dir),
        Commands::Flag(ref args) => cmd::flag::run_flag(args, output, state_dir),
        Commands::Group(ref args) => cmd::group::run_group(args, output, state_dir),
        Commands::Member(ref args) => cmd::member::run_member(args, output, state_dir),
        Commands::Groups => cmd::directory::run_groups(output, state_dir),
        Commands::Members(ref args) => cmd::directory::run_members(args, output, state_dir),
        Commands::Copy => cmd::export::run_copy(output, cli.quiet, state_dir),
        Commands::Post(ref args) => cmd::export::run_post(args, output, cli.quiet, state_dir),
        Commands::Reset => cmd::reset::run_reset(output, state_dir),
        Commands::Tui => tui::run_form(state_dir),
        Commands::Config { ref command } => cmd::config::run_config(command, output, state_dir),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
        Commands::ClipboardHold => Ok(system::hold_clipboard_from_stdin()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cameko_core::{Flag, TextField};

    #[test]
    fn verify_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["cameko", "--json", "show"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["cameko", "show", "--json"]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["cameko", "--format", "text", "show"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn clipboard_holder_command_matches_spawned_name() {
        let cli = Cli::parse_from(["cameko", system::HOLD_COMMAND]);
        assert!(matches!(cli.command, Commands::ClipboardHold));
    }

    #[test]
    fn state_dir_is_global() {
        let cli = Cli::parse_from(["cameko", "groups", "--state-dir", "/tmp/x"]);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn set_parses_field_and_value() {
        let cli = Cli::parse_from(["cameko", "set", "venue-prefix", "at"]);
        let Commands::Set(args) = cli.command else {
            panic!("expected set");
        };
        assert_eq!(args.field, TextField::VenuePrefix);
        assert_eq!(args.value, "at");
    }

    #[test]
    fn set_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["cameko", "set", "colour", "red"]).is_err());
    }

    #[test]
    fn flag_defaults_to_toggle() {
        let cli = Cli::parse_from(["cameko", "flag", "reverse"]);
        let Commands::Flag(args) = cli.command else {
            panic!("expected flag");
        };
        assert_eq!(args.flag, Flag::ReverseOrder);
        assert_eq!(args.mode, cmd::flag::FlagMode::Toggle);
    }

    #[test]
    fn member_on_and_off_conflict() {
        assert!(Cli::try_parse_from(["cameko", "member", "--on", "--off", "x"]).is_err());
    }

    #[test]
    fn member_requires_names_unless_clear() {
        assert!(Cli::try_parse_from(["cameko", "member"]).is_err());
        assert!(Cli::try_parse_from(["cameko", "member", "--clear"]).is_ok());
    }

    #[test]
    fn post_print_url_parses() {
        let cli = Cli::parse_from(["cameko", "post", "--print-url"]);
        assert!(matches!(cli.command, Commands::Post(args) if args.print_url));
    }

    #[test]
    fn config_show_parses() {
        let cli = Cli::parse_from(["cameko", "config", "show"]);
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: cmd::config::ConfigCommand::Show
            }
        ));
    }
}
