#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use docket_core::config::load_user_config;
use docket_core::model::demand::Status;
use docket_core::timing;
use output::OutputMode;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "docket: demand triage board for back-office work",
    long_about = None
)]
struct Cli {
    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, and user config.
    fn output_mode(&self) -> OutputMode {
        let user_pref = load_user_config()
            .ok()
            .and_then(|config| config.output);
        output::resolve_output_mode(self.format, self.json, user_pref.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a docket project",
        long_about = "Initialize a docket project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    dkt init\n\n    # Emit machine-readable output\n    dkt init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a new demand",
        long_about = "Create a new demand in the pending column.",
        after_help = "EXAMPLES:\n    # Create a demand\n    dkt create --title \"Serve garnishment notice\"\n\n    # Set priority and assignee\n    dkt create --title \"Call debtor\" --priority high --assignee imani\n\n    # Emit machine-readable output\n    dkt create --title \"Call debtor\" --json"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Read",
        about = "List demands",
        long_about = "List demands with optional filters and sort order.",
        after_help = "EXAMPLES:\n    # List everything\n    dkt list\n\n    # Filter and sort\n    dkt list --status pending --priority high --sort created --order desc\n\n    # Emit machine-readable output\n    dkt list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one demand",
        long_about = "Show full details for a single demand by ID.",
        after_help = "EXAMPLES:\n    # Show a demand\n    dkt show dm-1a2b3c4d\n\n    # Use a short prefix when unique\n    dkt show dm-1a\n\n    # Emit machine-readable output\n    dkt show dm-1a2b3c4d --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the status board",
        long_about = "Group demands into per-status columns with counts and offered actions.",
        after_help = "EXAMPLES:\n    # Print the board\n    dkt board\n\n    # Open the interactive board\n    dkt board --interactive\n\n    # Emit machine-readable output\n    dkt board --json"
    )]
    Board(cmd::board::BoardArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Start processing a demand",
        long_about = "Transition demands to in-progress, capturing the processing start time.",
        after_help = "EXAMPLES:\n    # Start work on a demand\n    dkt start dm-1a2b3c4d\n\n    # Start several at once\n    dkt start dm-1a dm-2b dm-3c"
    )]
    Start(cmd::transition::TransitionArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Forward a demand",
        long_about = "Transition demands to forwarded, capturing the processing start time.",
        after_help = "EXAMPLES:\n    # Forward a demand to the responsible desk\n    dkt forward dm-1a2b3c4d"
    )]
    Forward(cmd::transition::TransitionArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Confirm a demand",
        long_about = "Transition demands to confirmed.",
        after_help = "EXAMPLES:\n    # Confirm a processed demand\n    dkt confirm dm-1a2b3c4d"
    )]
    Confirm(cmd::transition::TransitionArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Finalize a demand",
        long_about = "Transition demands to the terminal finalized status, recording the processing duration.",
        after_help = "EXAMPLES:\n    # Finalize a confirmed demand\n    dkt finalize dm-1a2b3c4d"
    )]
    Finalize(cmd::transition::TransitionArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Move a demand to any status",
        long_about = "Set a demand's status directly. Unlike the named transitions, any target is accepted; timestamp capture rules still apply.",
        after_help = "EXAMPLES:\n    # Jump a demand straight to confirmed\n    dkt move dm-1a2b3c4d --status confirmed"
    )]
    Move(cmd::transition::MoveArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Edit a demand's fields",
        long_about = "Update title, description, priority, category, or assignee.",
        after_help = "EXAMPLES:\n    # Reword and reprioritize\n    dkt edit dm-1a2b3c4d --title \"Escalate to counsel\" --priority high"
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete demands",
        long_about = "Remove demands from the collection. Allowed at any status; no archive is kept.",
        after_help = "EXAMPLES:\n    # Delete a demand\n    dkt delete dm-1a2b3c4d"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    dkt completions bash\n\n    # Generate zsh completions\n    dkt completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "docket=debug,info"
        } else {
            "docket=info,warn"
        })
    });

    let format = env::var("DOCKET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    if cli.quiet {
        tracing::debug!("quiet mode enabled");
    }

    let command_result = match cli.command {
        Commands::Init(ref args) => {
            timing::timed("cmd.init", || cmd::init::run_init(args, output, &project_root))
        }
        Commands::Create(ref args) => timing::timed("cmd.create", || {
            cmd::create::run_create(args, output, &project_root)
        }),
        Commands::List(ref args) => {
            timing::timed("cmd.list", || cmd::list::run_list(args, output, &project_root))
        }
        Commands::Show(ref args) => {
            timing::timed("cmd.show", || cmd::show::run_show(args, output, &project_root))
        }
        Commands::Board(ref args) => timing::timed("cmd.board", || {
            cmd::board::run_board(args, output, &project_root)
        }),
        Commands::Start(ref args) => timing::timed("cmd.start", || {
            cmd::transition::run_transition(args, Status::InProgress, output, &project_root)
        }),
        Commands::Forward(ref args) => timing::timed("cmd.forward", || {
            cmd::transition::run_transition(args, Status::Forwarded, output, &project_root)
        }),
        Commands::Confirm(ref args) => timing::timed("cmd.confirm", || {
            cmd::transition::run_transition(args, Status::Confirmed, output, &project_root)
        }),
        Commands::Finalize(ref args) => timing::timed("cmd.finalize", || {
            cmd::transition::run_transition(args, Status::Finalized, output, &project_root)
        }),
        Commands::Move(ref args) => timing::timed("cmd.move", || {
            cmd::transition::run_move(args, output, &project_root)
        }),
        Commands::Edit(ref args) => {
            timing::timed("cmd.edit", || cmd::edit::run_edit(args, output, &project_root))
        }
        Commands::Delete(ref args) => timing::timed("cmd.delete", || {
            cmd::delete::run_delete(args, output, &project_root)
        }),
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}
