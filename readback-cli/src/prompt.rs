//! Interactive folder prompt
//!
//! Reads folder paths until the user quits. Bad input never ends the loop; it
//! is reported and the prompt is shown again.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const PROMPT: &str = "Enter folder path containing .txt files (or 'quit' to exit): ";

/// What one line of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptInput {
    Quit,
    Empty,
    Folder(PathBuf),
}

impl PromptInput {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return PromptInput::Empty;
        }
        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => PromptInput::Quit,
            _ => PromptInput::Folder(PathBuf::from(input)),
        }
    }
}

/// Run the prompt loop, calling `process` for every valid folder
///
/// End of input counts as the user cancelling. Errors from `process` are
/// printed and the loop continues.
pub fn run_prompt_loop<R, W, F>(mut input: R, mut out: W, mut process: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Path) -> Result<()>,
{
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out, "\nOperation cancelled by user.")?;
            writeln!(out, "Goodbye!")?;
            return Ok(());
        }

        match PromptInput::parse(&line) {
            PromptInput::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            PromptInput::Empty => {
                writeln!(out, "Please enter a folder path, or 'quit' to exit.\n")?;
            }
            PromptInput::Folder(folder) if !folder.is_dir() => {
                writeln!(
                    out,
                    "Error: Path is not a directory or does not exist: {}\n",
                    folder.display()
                )?;
            }
            PromptInput::Folder(folder) => {
                log::debug!("Processing folder {:?}", folder);
                if let Err(e) = process(&folder) {
                    log::error!("{:#}", e);
                    writeln!(out, "\nError: {:#}\n", e)?;
                }
            }
        }
    }
}
