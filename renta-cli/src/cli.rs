use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use renta_core::{KeyValueStore, RecordId};

use crate::app::RentaApp;
use crate::config::ConfigOverrides;
use crate::shell::run_shell;
use crate::view::{render_records, render_result};

/// Flat-rate renta calculator with a saved-results list.
///
/// Settings come from `renta.toml` (or `--config` / `$RENTA_CONFIG`);
/// the flags below override the file.
#[derive(Debug, Parser)]
#[command(name = "renta", version)]
pub struct Cli {
    /// Config file to read instead of `./renta.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Storage connection string.
    /// For SQLite this is a file path (e.g. `renta.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log filter, e.g. `debug` or `renta_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.clone(),
            connection_string: self.db.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct FormArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Gross salary; `,` thousands separators are accepted.
    #[arg(long, allow_hyphen_values = true)]
    pub salary: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate the renta and print the result without saving it.
    Calculate(FormArgs),
    /// Calculate the renta and save the result.
    Save(FormArgs),
    /// List saved results.
    List,
    /// Delete a saved result by id or unique id prefix.
    Delete { id: String },
    /// Write saved results as CSV.
    Export {
        /// Destination file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Interactive session.
    Shell,
}

/// Runs one subcommand against an app whose saved list is already loaded.
///
/// Returns `false` when the command ended with an error notice, so the
/// caller can pick the exit status.
pub async fn run<S: KeyValueStore, W: Write>(
    app: &mut RentaApp<S>,
    command: Command,
    out: &mut W,
) -> Result<bool> {
    match command {
        Command::Calculate(form) => {
            app.calculate(&form.first_name, &form.last_name, &form.salary);
            if let Some(panel) = render_result(app.state()) {
                writeln!(out, "{panel}")?;
            }
        }
        Command::Save(form) => {
            app.calculate(&form.first_name, &form.last_name, &form.salary);
            // A failed calculation already left its notice.
            let saved = if app.state().result.is_some() {
                app.save().await
            } else {
                None
            };
            if let Some(id) = saved {
                writeln!(out, "saved as {id}")?;
            }
        }
        Command::List => writeln!(out, "{}", render_records(&app.state().records))?,
        Command::Delete { id } => {
            let id = app
                .find_record(&id)
                .map(|r| r.id.clone())
                .unwrap_or_else(|| RecordId::new(id));
            app.delete(&id).await;
        }
        Command::Export { output } => {
            let count = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let count = app.export(BufWriter::new(file))?;
                    writeln!(out, "exported {count} result(s) to {}", path.display())?;
                    count
                }
                None => app.export(&mut *out)?,
            };
            tracing::info!(count, "export finished");
        }
        Command::Shell => {
            let stdin = io::stdin();
            run_shell(app, stdin.lock(), &mut *out).await?;
        }
    }

    let ok = match app.state().notice.as_ref() {
        Some(notice) => {
            writeln!(out, "{}", notice.message())?;
            !notice.is_error()
        }
        None => true,
    };
    Ok(ok)
}
