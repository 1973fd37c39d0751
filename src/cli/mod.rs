//! CLI argument parsing and file discovery

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// sqltidy - An opinionated SQL formatter that can alias qualified SELECT columns
#[derive(Parser, Debug)]
#[command(name = "sqltidy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format SQL files
    Fmt {
        /// Write formatted output back to files
        #[arg(short, long)]
        write: bool,

        /// Alias qualified columns of the outermost SELECT
        #[arg(short, long)]
        aliases: bool,

        /// Files, directories or glob patterns to format (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check if files are formatted (exit code 1 if not)
    Check {
        /// Check against the aliased form
        #[arg(short, long)]
        aliases: bool,

        /// Files, directories or glob patterns to check (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Answer a JSON formatting request ({"sql": ..., "add_aliases": ...})
    Request {
        /// File holding the request body (stdin if omitted)
        file: Option<PathBuf>,
    },
}

/// Discover SQL files from a path (file, directory or glob pattern)
pub fn discover_sql_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    if path.is_dir() {
        return WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_sql_file(p))
            .collect();
    }

    // Handle glob patterns
    match path.to_str().map(glob::glob) {
        Some(Ok(paths)) => paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file() && is_sql_file(p))
            .collect(),
        _ => vec![],
    }
}

fn is_sql_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sql")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn directory_walk_keeps_only_sql() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("a.sql"), "select 1").unwrap();
        fs::write(temp.path().join("nested").join("b.sql"), "select 2").unwrap();
        fs::write(temp.path().join("notes.txt"), "hi").unwrap();

        let mut files = discover_sql_files(temp.path());
        files.sort();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_sql_file(f)));
    }

    #[test]
    fn missing_path_finds_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(discover_sql_files(&temp.path().join("missing.sql")).is_empty());
    }
}
