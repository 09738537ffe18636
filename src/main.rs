use ccl_lang::{
    EvalOptions,
    cli::{self, CheckOptions, CheckResult, CliError},
};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "ccl")]
#[command(about = "CCL - derive dataset columns from formulas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate formula syntax without running it
    Check {
        /// The formula (or script with --script)
        formula: String,

        /// Treat the formula as a multi-statement script
        #[arg(long)]
        script: bool,
    },

    /// Run a formula against a JSON dataset
    Eval {
        /// The formula (or script with --script)
        formula: String,

        /// JSON dataset (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Name of the derived column
        #[arg(short, long, default_value = "result")]
        name: String,

        /// Treat the formula as a multi-statement script
        #[arg(long)]
        script: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// What to do with rows that fail: abort or nil
        #[arg(long, default_value = "abort", value_parser = cli::parse_error_policy)]
        on_error: ccl_lang::ErrorPolicy,

        /// Evaluate rows on the current thread only
        #[arg(long)]
        sequential: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'ccl docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CCL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { formula, script } => {
            let options = CheckOptions {
                formula,
                script,
                syntax_only: true,
                ..Default::default()
            };
            run_check(&options, false)
        }
        Commands::Eval {
            formula,
            input,
            name,
            script,
            pretty,
            on_error,
            sequential,
        } => read_input(input).and_then(|input| {
            let options = CheckOptions {
                formula,
                input,
                name,
                script,
                syntax_only: false,
                eval: EvalOptions {
                    parallel: !sequential,
                    on_error,
                    ..EvalOptions::default()
                },
            };
            run_check(&options, pretty)
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_check(options: &CheckOptions, pretty: bool) -> Result<(), CliError> {
    match cli::execute_check(options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
