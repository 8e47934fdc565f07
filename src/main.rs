use std::path::Path;

use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use deadlines::language::{Settings, Severity};
use deadlines::parsing;
use tracing::{debug, error, Level};

mod editor;
mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("deadlines")
        .version(VERSION)
        .propagate_version(true)
        .about("Deadline diagnostics for checklists in markdown documents.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what the parser is doing to standard error."),
        )
        .subcommand(
            Command::new("check")
                .about("Report overdue and upcoming deadlines in the given document")
                .arg(
                    Arg::new("critical")
                        .long("critical")
                        .value_parser(value_parser!(u32))
                        .help("Deadlines closer than this many days are warnings. [default: 2]"),
                )
                .arg(
                    Arg::new("approaching")
                        .long("approaching")
                        .value_parser(value_parser!(u32))
                        .help("Deadlines closer than this many days are informational. [default: 4]"),
                )
                .arg(
                    Arg::new("today")
                        .long("today")
                        .value_name("YYYY-MM-DD")
                        .help("Measure deadlines from midnight on this date instead of from now."),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(["full", "concise", "json"])
                        .default_value("full")
                        .help("How to present the diagnostics."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The markdown file containing the checklists you want to check."),
                ),
        )
        .subcommand(
            Command::new("language-server")
                .about("Run a Language Server Protocol server on standard input and output"),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // standard output carries results and protocol traffic, so logs go to
    // standard error
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let code = run_check(submatches);
            std::process::exit(code);
        }
        Some(("language-server", _)) => {
            if let Err(error) = editor::run_language_server() {
                error!("Language server failed: {}", error);
                std::process::exit(1);
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: deadlines [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn run_check(submatches: &ArgMatches) -> i32 {
    let mut settings = Settings::default();
    if let Some(critical) = submatches.get_one::<u32>("critical") {
        settings.critical = *critical;
    }
    if let Some(approaching) = submatches.get_one::<u32>("approaching") {
        settings.deadline_approaching = *approaching;
    }

    let today = match submatches.get_one::<String>("today") {
        Some(text) => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => date.and_hms_opt(0, 0, 0),
            Err(error) => {
                eprintln!("Invalid date for --today: {} ({})", text, error);
                return 2;
            }
        },
        None => None,
    };

    let filename = match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => return 2,
    };
    let output = submatches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("full");

    debug!(?filename, ?settings, ?today, output);

    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    let diagnostics = parsing::check(&content, settings, today);

    match output {
        "json" => match problem::json_diagnostics(&diagnostics) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                error!("Unable to serialize diagnostics: {}", error);
                return 1;
            }
        },
        "concise" => {
            for diagnostic in &diagnostics {
                println!("{}", problem::concise_diagnostic(diagnostic, filename));
            }
        }
        _ => {
            for diagnostic in &diagnostics {
                println!("{}\n", problem::full_diagnostic(diagnostic, filename, &content));
            }
        }
    }

    if diagnostics
        .iter()
        .any(|diagnostic| diagnostic.severity == Severity::Error)
    {
        1
    } else {
        0
    }
}
