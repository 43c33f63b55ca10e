//! Where the CLI gets its text from.

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Resolve input text: the positional argument, else `--file`, else piped
/// stdin. An interactive stdin is not read; the text is empty and the
/// gateway rejects it.
pub fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    let stdin = std::io::stdin();
    if text.is_none() && file.is_none() && stdin.is_terminal() {
        return Ok(String::new());
    }
    read_input_from(text, file, stdin.lock())
}

/// [`read_input`] with an explicit fallback reader.
pub fn read_input_from(
    text: Option<String>,
    file: Option<&Path>,
    mut reader: impl Read,
) -> Result<String> {
    match (text, file) {
        (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
        (Some(text), None) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => {
            let mut buf = String::new();
            reader
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}
