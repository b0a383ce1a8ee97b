//! MiniDB - CLI Client

use std::env;
use std::path::Path;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use minidb::config::DEFAULT_LOG_FILTER;
use minidb::storage::{snapshot, Table};
use minidb::{Config, Engine, ErrorKind, Executor};

const PROMPT: &str = "minidb> ";

/// Print welcome banner
fn print_banner() {
    println!(
        r#"
 MiniDB - a minimal relational engine in Rust
 Type '.help' for help, 'EXIT' or '.quit' to exit
"#
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"
Commands:
  .help              Show this help message
  .quit, EXIT        Exit MiniDB
  .tables            List all tables
  .schema [table]    Show table schema
  .save              Write the snapshot now

Statements (one per line, no terminator):
  CREATE TABLE <t> (<col> INT|STR, ...) [PRIMARY KEY <col>] [UNIQUE <col>, ...]
  CREATE INDEX ON <t> (<col>)
  DROP TABLE <t>
  INSERT INTO <t> VALUES (<v>, ...)
  SELECT * FROM <t> [WHERE <col> = <v>]
  UPDATE <t> SET <col> = <v> [WHERE <col> = <v>]
  DELETE FROM <t> [WHERE <col> = <v>]

Examples:
  CREATE TABLE users (id INT, name STR) PRIMARY KEY id
  INSERT INTO users VALUES (1, 'Alice')
  SELECT * FROM users WHERE id = 1
"#
    );
}

/// Render a table definition as the statement that would recreate it
fn describe_table(table: &Table) -> String {
    let columns: Vec<String> = table
        .schema()
        .columns()
        .iter()
        .map(|c| format!("{} {}", c.name, c.data_type.sql_name()))
        .collect();

    let mut ddl = format!("CREATE TABLE {} ({})", table.name(), columns.join(", "));
    if let Some(pk) = table.primary_key() {
        ddl.push_str(&format!(" PRIMARY KEY {}", pk));
    }
    if !table.unique_keys().is_empty() {
        ddl.push_str(&format!(" UNIQUE {}", table.unique_keys().join(", ")));
    }

    let indexed = table.indexed_columns();
    if !indexed.is_empty() {
        ddl.push_str(&format!("\n  -- indexed: {}", indexed.join(", ")));
    }
    ddl.push_str(&format!("\n  -- {} record(s)", table.len()));
    ddl
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configured snapshot, falling back to an empty engine
fn load_engine(config: &Config) -> Engine {
    let Some(path) = &config.snapshot_path else {
        return Engine::new();
    };

    match snapshot::load_from_path(path) {
        Ok(engine) => engine,
        Err(e) if e.kind() == ErrorKind::SnapshotNotFound => {
            info!(path = %path.display(), "no snapshot yet, starting empty");
            Engine::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not load snapshot, starting empty");
            Engine::new()
        }
    }
}

/// Interactive shell state
struct Shell {
    executor: Executor,
    config: Config,
}

/// Write a snapshot, returning the line to show on success
fn save_snapshot(engine: &Engine, path: &Path) -> minidb::Result<String> {
    snapshot::save_to_path(engine, path)?;
    Ok(format!("Saved to {}", path.display()))
}

impl Shell {
    fn save(&self, path: &Path) -> Option<String> {
        match save_snapshot(self.executor.engine(), path) {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot save failed");
                eprintln!("Error: {}", e);
                None
            }
        }
    }

    /// Execute one statement line and print the outcome
    fn execute_sql(&mut self, sql: &str) {
        match self.executor.execute(sql) {
            Ok(result) => {
                let output = result.to_string();
                if !output.is_empty() {
                    println!("{}", output);
                }
                if result.is_modification() && self.config.autosave {
                    if let Some(path) = &self.config.snapshot_path {
                        self.save(path);
                    }
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    /// Handle special dot commands; returns false when the shell should exit
    fn handle_special_command(&mut self, cmd: &str) -> bool {
        let parts: Vec<&str> = cmd.split_whitespace().collect();

        match parts.first().copied() {
            Some(".help") => print_help(),
            Some(".quit") | Some(".exit") => return false,
            Some(".tables") => {
                let tables = self.executor.engine().table_names();
                if tables.is_empty() {
                    println!("No tables found.");
                } else {
                    println!("Tables:");
                    for table in tables {
                        println!("  {}", table);
                    }
                }
            }
            Some(".schema") => {
                let engine = self.executor.engine();
                match parts.get(1) {
                    Some(name) => match engine.get_table(name) {
                        Ok(table) => println!("{}", describe_table(table)),
                        Err(e) => println!("Error: {}", e),
                    },
                    None => {
                        for table in engine.tables() {
                            println!("{}", describe_table(table));
                        }
                    }
                }
            }
            Some(".save") => match &self.config.snapshot_path {
                Some(path) => {
                    if let Some(message) = self.save(path) {
                        println!("{}", message);
                    }
                }
                None => println!("Error: no snapshot path configured (use --snapshot <path>)"),
            },
            Some(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type '.help' for available commands.");
            }
            None => {}
        }

        true
    }

    /// Main REPL loop
    fn run(&mut self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;

        print_banner();

        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e).context("failed to read input"),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            // Duplicate or rejected entries are not worth failing over
            let _ = editor.add_history_entry(trimmed);

            if trimmed.eq_ignore_ascii_case("exit") {
                break;
            }

            if trimmed.starts_with('.') {
                if !self.handle_special_command(trimmed) {
                    break;
                }
                continue;
            }

            self.execute_sql(trimmed);
        }

        println!("Goodbye!");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(env::args().skip(1)).context("invalid arguments")?;
    init_tracing(&config);

    let engine = load_engine(&config);
    let mut shell = Shell {
        executor: Executor::with_engine(engine),
        config,
    };

    shell.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_snapshot_reports_failure() {
        let dir = TempDir::new().unwrap();
        let engine = Engine::new();

        let path = dir.path().join("minidb.json");
        let message = save_snapshot(&engine, &path).unwrap();
        assert!(message.starts_with("Saved to "));
        assert!(path.exists());

        let missing = dir.path().join("no_such_dir").join("minidb.json");
        let err = save_snapshot(&engine, &missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!missing.exists());
    }
}
