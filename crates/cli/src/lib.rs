pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "shelfwise",
    about = "Shelfwise operator CLI",
    long_about = "Inspect configuration and the field schema, replay model replies through the \
                  response parser, and run readiness checks.",
    after_help = "Examples:\n  shelfwise doctor --json\n  shelfwise config\n  \
                  shelfwise parse --file reply.txt"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "List the shelving fields the intake agent collects")]
    Schema {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run a raw model reply through the response parser and evaluators")]
    Parse {
        #[arg(help = "Reply text; reads stdin when omitted and --file is not given")]
        text: Option<String>,
        #[arg(long, conflicts_with = "text", help = "Read the reply from a file")]
        file: Option<PathBuf>,
    },
    #[command(about = "Validate config, the system prompt, and an offline intake round trip")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Schema { json } => {
            commands::CommandResult { exit_code: 0, output: commands::schema::run(json) }
        }
        Command::Parse { text, file } => {
            let input = match (text, file) {
                (Some(text), _) => commands::parse::ParseInput::Text(text),
                (None, Some(path)) => commands::parse::ParseInput::File(path),
                (None, None) => commands::parse::ParseInput::Stdin,
            };
            commands::parse::run(input)
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
