//! Machine translation through an external program.
//!
//! The program is configured as an argv list (`translateCommand`). Each
//! argument may contain `{from}`, `{to}` and `{text}`; when no argument
//! mentions `{text}` the text is written to the program's stdin instead.
//! Whatever the program prints on stdout, minus trailing line breaks, is the
//! translation.

use std::{
    io::{self, Write},
    process::{Command, Output, Stdio},
    thread,
};

use anyhow::{Context, Result, bail};

use crate::core::Translator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTranslator {
    argv: Vec<String>,
}

impl CommandTranslator {
    pub fn new(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() {
            bail!("'translateCommand' must name a program");
        }
        Ok(Self { argv })
    }

    fn text_via_stdin(&self) -> bool {
        !self.argv.iter().any(|arg| arg.contains("{text}"))
    }

    fn render_args(&self, from: &str, to: &str, text: &str) -> Vec<String> {
        self.argv[1..]
            .iter()
            .map(|arg| {
                arg.replace("{from}", from)
                    .replace("{to}", to)
                    .replace("{text}", text)
            })
            .collect()
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, from: &str, to: &str, text: &str) -> Result<String> {
        let program = &self.argv[0];
        let via_stdin = self.text_via_stdin();

        let mut child = Command::new(program)
            .args(self.render_args(from, to, text))
            .stdin(if via_stdin {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start translator '{}'", program))?;

        let output = thread::scope(|scope| -> Result<Output> {
            // Feed stdin from its own thread: a program that answers while still
            // reading would otherwise stall on a full stdout pipe.
            let writer = child
                .stdin
                .take()
                .map(|mut stdin| scope.spawn(move || stdin.write_all(text.as_bytes())));

            let output = child
                .wait_with_output()
                .with_context(|| format!("Failed to wait for translator '{}'", program))?;

            // A program that exits without reading is judged by its exit status.
            match writer.map(|handle| handle.join()) {
                Some(Ok(Err(e))) if e.kind() != io::ErrorKind::BrokenPipe => {
                    Err(e).context("Failed to write text to translator stdin")
                }
                Some(Err(_)) => bail!("Translator stdin writer panicked"),
                _ => Ok(output),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Translator '{}' exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("Translator output is not UTF-8")?;
        let translated = stdout.trim_end_matches(['\r', '\n']);
        if translated.is_empty() {
            bail!("Translator '{}' returned no output", program);
        }

        Ok(translated.to_string())
    }
}
