//! Line-oriented interactive session over the renta form.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use renta_core::{KeyValueStore, RecordId};

use crate::app::RentaApp;
use crate::logging;
use crate::state::Action;
use crate::view::{render_records, render_result};

pub const HELP: &str = "\
Commands:
  first <text>     set the first name
  last <text>      set the last name
  salary <amount>  set the gross salary
  calc             calculate the renta for the form
  show             show the form and current result
  save             save the current result
  list             list saved results
  reload           reload saved results from storage
  delete <id>      delete a saved result (id or unique prefix)
  log <level>      change the log level
  help             show this text
  quit             leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    FirstName(String),
    LastName(String),
    Salary(String),
    Calculate,
    Show,
    Save,
    List,
    Reload,
    Delete(String),
    LogLevel(String),
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let needs_arg = |name: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{name}' needs a value"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            // Field edits accept an empty value so a field can be cleared.
            "first" => Ok(Self::FirstName(rest.to_string())),
            "last" => Ok(Self::LastName(rest.to_string())),
            "salary" => Ok(Self::Salary(rest.to_string())),
            "calc" | "calculate" => Ok(Self::Calculate),
            "show" => Ok(Self::Show),
            "save" => Ok(Self::Save),
            "list" | "ls" => Ok(Self::List),
            "reload" => Ok(Self::Reload),
            "delete" | "rm" => needs_arg("delete").map(Self::Delete),
            "log" => needs_arg("log").map(Self::LogLevel),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}'; type 'help'")),
        }
    }
}

/// Runs the shell until `quit` or end of input.
pub async fn run_shell<S, R, W>(
    app: &mut RentaApp<S>,
    input: R,
    mut out: W,
) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "renta shell. Type 'help' for commands.")?;
    for line in input.lines() {
        let line = line.context("reading shell input")?;
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(app, command, &mut out).await?;
    }
    Ok(())
}

async fn execute<S: KeyValueStore, W: Write>(
    app: &mut RentaApp<S>,
    command: ShellCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        ShellCommand::FirstName(text) => app.dispatch(Action::EditFirstName(text)),
        ShellCommand::LastName(text) => app.dispatch(Action::EditLastName(text)),
        ShellCommand::Salary(text) => app.dispatch(Action::EditSalary(text)),
        ShellCommand::Calculate => {
            app.dispatch(Action::Calculate);
            if let Some(panel) = render_result(app.state()) {
                writeln!(out, "{panel}")?;
            }
        }
        ShellCommand::Show => {
            let form = &app.state().form;
            writeln!(out, "first:  {}", form.first_name)?;
            writeln!(out, "last:   {}", form.last_name)?;
            writeln!(out, "salary: {}", form.salary)?;
            match render_result(app.state()) {
                Some(panel) => writeln!(out, "{panel}")?,
                None => writeln!(out, "(not calculated)")?,
            }
        }
        ShellCommand::Save => {
            if let Some(id) = app.save().await {
                writeln!(out, "saved as {id}")?;
            }
        }
        ShellCommand::List => writeln!(out, "{}", render_records(&app.state().records))?,
        ShellCommand::Reload => {
            app.load().await;
            writeln!(out, "{}", render_records(&app.state().records))?;
        }
        ShellCommand::Delete(id) => {
            let id = app
                .find_record(&id)
                .map(|r| r.id.clone())
                .unwrap_or_else(|| RecordId::new(id));
            app.delete(&id).await;
        }
        ShellCommand::LogLevel(level) => {
            if let Err(err) = logging::set_log_level(&level) {
                writeln!(out, "{err}")?;
            }
        }
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit | ShellCommand::Empty => {}
    }

    // Notices are modal: show, then acknowledge.
    if let Some(notice) = app.state().notice.clone() {
        writeln!(out, "{}", notice.message())?;
        app.dispatch(Action::Dismiss);
    }
    Ok(())
}
