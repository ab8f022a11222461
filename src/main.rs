use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wio::{interpreter::session::RunOptions, run_file};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "WIO_LOG";

/// wio runs programs written in the wio scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The program to run; must have the `.wio` extension.
    file: PathBuf,

    /// Print the token stream before parsing.
    #[arg(long)]
    show_tokens: bool,

    /// Print the parsed program before running it.
    #[arg(long)]
    show_ast: bool,

    /// Stop after parsing.
    #[arg(long)]
    no_run: bool,

    /// Skip imports of other files.
    #[arg(long)]
    single_file: bool,

    /// Do not preload the builtin modules.
    #[arg(long)]
    no_builtin: bool,

    /// Arguments passed to the program as `argv`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    arguments: Vec<String>,
}

fn main() -> ExitCode {
    // clap exits with status 2 on usage errors; wio reports them with 1.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            error.print().ok();
            return if error.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        },
    };

    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
                             .with_writer(std::io::stderr)
                             .init();

    if args.file.extension().is_none_or(|extension| extension != "wio") {
        eprintln!("'{}' is not a wio program; expected a file ending in '.wio'.",
                  args.file.display());
        return ExitCode::FAILURE;
    }

    let options = RunOptions { show_tokens: args.show_tokens,
                               show_ast:    args.show_ast,
                               no_run:      args.no_run,
                               single_file: args.single_file,
                               no_builtin:  args.no_builtin,
                               arguments:   args.arguments, };

    match run_file(&args.file, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        },
    }
}
