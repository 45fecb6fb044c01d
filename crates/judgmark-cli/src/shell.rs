//! Interactive form: paste or load a judgment, submit it, edit and export the table.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use judgmark_ai::{ChatCompletion, Extractor};
use judgmark_intake::intake_text;
use judgmark_store::Session;
use tracing::warn;

use crate::display::{describe, render_table};

const PROMPT: &str = "judgmark> ";
const TEXT_TERMINATOR: &str = ".";

const HELP: &str = "\
commands:
  load <path>           read a .txt/.doc/.docx judgment into the input box
  text                  type or paste judgment text; end with a line containing only '.'
  input                 show the current input text
  submit                extract fields from the input text
  show                  show the current table
  set <field> <value>   edit one table cell
  clear                 empty the input box and the table
  export                write the table to a CSV file
  exports               list files exported in this session
  help                  show this message
  quit                  leave the shell";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Text,
    Input,
    Submit,
    Show,
    Set { field: String, value: String },
    Clear,
    Export,
    Exports,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" => Command::Empty,
        "load" if !rest.is_empty() => Command::Load(PathBuf::from(rest)),
        "load" => Command::Invalid("usage: load <path>".into()),
        "text" => Command::Text,
        "input" => Command::Input,
        "submit" => Command::Submit,
        "show" => Command::Show,
        "set" => match rest.split_once(char::is_whitespace) {
            Some((field, value)) => Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            },
            None => Command::Invalid("usage: set <field> <value>".into()),
        },
        "clear" => Command::Clear,
        "export" => Command::Export,
        "exports" => Command::Exports,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command: {other} (try 'help')")),
    }
}

/// One user's form state plus the extractor it submits to.
pub struct Shell<C> {
    extractor: Extractor<C>,
    session: Session,
    out_dir: Option<PathBuf>,
}

impl<C: ChatCompletion> Shell<C> {
    pub fn new(extractor: Extractor<C>, out_dir: Option<PathBuf>) -> Self {
        Self {
            extractor,
            session: Session::new(),
            out_dir,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands from `input` until `quit` or end of input.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "Enter judgment text, then submit. Type 'help' for commands.")?;
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            if !self.handle(parse_command(&line), input, out).await? {
                return Ok(());
            }
        }
    }

    /// Execute one command. Returns `false` when the shell should exit.
    pub async fn handle<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> anyhow::Result<bool> {
        match command {
            Command::Empty => {}
            Command::Load(path) => {
                let text = intake_text(Some(&path));
                writeln!(out, "loaded {} characters from {}", text.chars().count(), path.display())?;
                self.session.set_input(text);
            }
            Command::Text => {
                writeln!(out, "paste judgment text; finish with a line containing only '{TEXT_TERMINATOR}'")?;
                out.flush()?;
                let text = read_block(input)?;
                writeln!(out, "read {} characters", text.chars().count())?;
                self.session.set_input(text);
            }
            Command::Input => {
                if self.session.input().is_empty() {
                    writeln!(out, "(input is empty)")?;
                } else {
                    writeln!(out, "{}", self.session.input())?;
                }
            }
            Command::Submit => {
                let outcome = self.extractor.extract(self.session.input()).await;
                writeln!(out, "{}", describe(&outcome))?;
                self.session.replace(outcome.into_result());
                write!(out, "{}", render_table(self.session.current()))?;
            }
            Command::Show => write!(out, "{}", render_table(self.session.current()))?,
            Command::Set { field, value } => match self.session.edit(&field, value) {
                Ok(_) => write!(out, "{}", render_table(self.session.current()))?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Clear => {
                self.session.clear();
                writeln!(out, "cleared")?;
            }
            Command::Export => {
                let exported = match &self.out_dir {
                    Some(dir) => self.session.export_to(dir),
                    None => self.session.export(),
                };
                match exported {
                    Ok(path) => writeln!(out, "exported {}", path.display())?,
                    Err(e) => {
                        warn!(error = %e, "export failed");
                        writeln!(out, "export failed: {e}")?;
                    }
                }
            }
            Command::Exports => {
                if self.session.exports().is_empty() {
                    writeln!(out, "(nothing exported yet)")?;
                }
                for path in self.session.exports() {
                    writeln!(out, "{}", path.display())?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Invalid(msg) => writeln!(out, "{msg}")?,
        }
        Ok(true)
    }
}

/// Lines up to (not including) a line holding only the terminator, or EOF.
fn read_block<R: BufRead>(input: &mut R) -> std::io::Result<String> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim_end() == TEXT_TERMINATOR {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
