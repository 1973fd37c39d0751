//! sqltidy CLI - An opinionated SQL formatter

use clap::Parser;
use sqltidy::cli::{discover_sql_files, Cli, Commands};
use sqltidy::request::{self, Status};
use sqltidy::{Error, Options};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SQLTIDY_LOG";

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            write,
            aliases,
            files,
        } => run_fmt(&files, write, &Options { add_aliases: aliases }),
        Commands::Check { aliases, files } => run_check(&files, &Options { add_aliases: aliases }),
        Commands::Request { file } => run_request(file.as_deref()),
    }
}

/// Log to stderr so formatted SQL on stdout stays clean
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run the fmt command
fn run_fmt(files: &[PathBuf], write_mode: bool, options: &Options) -> ExitCode {
    let mut had_errors = false;

    for file_path in files {
        // Handle stdin
        if file_path == Path::new("-") {
            match read_stdin().and_then(|sql| format_source(&sql, options)) {
                Ok(formatted) => println!("{}", formatted),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        let entries = discover_sql_files(file_path);
        if entries.is_empty() {
            eprintln!("{}: no SQL files found", file_path.display());
            had_errors = true;
        }

        for entry in entries {
            if let Err(e) = format_file(&entry, write_mode, options) {
                eprintln!("{}: {}", entry.display(), e);
                had_errors = true;
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the check command
fn run_check(files: &[PathBuf], options: &Options) -> ExitCode {
    let mut needs_formatting = false;
    let mut had_errors = false;

    for file_path in files {
        // Handle stdin
        if file_path == Path::new("-") {
            match read_stdin().and_then(|sql| check_source(&sql, options)) {
                Ok(true) => {}
                Ok(false) => {
                    eprintln!("<stdin>: needs formatting");
                    needs_formatting = true;
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    had_errors = true;
                }
            }
            continue;
        }

        let entries = discover_sql_files(file_path);
        if entries.is_empty() {
            eprintln!("{}: no SQL files found", file_path.display());
            had_errors = true;
        }

        for entry in entries {
            match check_file(&entry, options) {
                Ok(true) => {}
                Ok(false) => {
                    eprintln!("{}: needs formatting", entry.display());
                    needs_formatting = true;
                }
                Err(e) => {
                    eprintln!("{}: {}", entry.display(), e);
                    had_errors = true;
                }
            }
        }
    }

    if had_errors {
        ExitCode::from(2)
    } else if needs_formatting {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Run the request command
fn run_request(file: Option<&Path>) -> ExitCode {
    let body = match file {
        Some(path) => fs::read_to_string(path).map_err(Error::from),
        None => read_stdin(),
    };
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let (status, response) = request::handle_json(&body);
    println!("{}", response);

    match status {
        Status::Ok => ExitCode::SUCCESS,
        Status::ClientError => ExitCode::from(1),
        Status::ServerError => ExitCode::from(2),
    }
}

/// Format source text, rendering parse errors against it
fn format_source(sql: &str, options: &Options) -> Result<String, Error> {
    sqltidy::format_with_options(sql, options).map_err(|e| with_context(sql, e))
}

fn check_source(sql: &str, options: &Options) -> Result<bool, Error> {
    sqltidy::check_with_options(sql, options).map_err(|e| with_context(sql, e))
}

/// Turn a parse error with a known offset into a message showing the line
fn with_context(sql: &str, error: Error) -> Error {
    match error {
        Error::ParseError {
            message,
            span: Some((offset, len)),
        } => Error::ParseError {
            message: sqltidy::error::format_parse_error(sql, offset, &message),
            span: Some((offset, len)),
        },
        other => other,
    }
}

/// Format a single file
fn format_file(path: &Path, write_mode: bool, options: &Options) -> Result<(), Error> {
    let contents = fs::read_to_string(path).map_err(|e| Error::FormatError {
        message: format!("Failed to read file: {}", e),
    })?;

    let formatted = format_source(&contents, options)?;
    if write_mode {
        if formatted != contents.trim_end() {
            fs::write(path, format!("{}\n", formatted)).map_err(|e| Error::FormatError {
                message: format!("Failed to write file: {}", e),
            })?;
            tracing::info!(path = %path.display(), "formatted file");
        }
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

/// Check a single file
fn check_file(path: &Path, options: &Options) -> Result<bool, Error> {
    let contents = fs::read_to_string(path).map_err(|e| Error::FormatError {
        message: format!("Failed to read file: {}", e),
    })?;

    check_source(&contents, options)
}

/// Read all of stdin
fn read_stdin() -> Result<String, Error> {
    let mut contents = String::new();
    io::stdin()
        .read_to_string(&mut contents)
        .map_err(|e| Error::FormatError {
            message: format!("Failed to read stdin: {}", e),
        })?;
    Ok(contents)
}
