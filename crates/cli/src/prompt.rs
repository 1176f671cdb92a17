use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};
use engine::Confirm;

use crate::error::Result;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Asks a yes/no question on the terminal, defaulting to no.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl TerminalConfirm {
    fn ask(prompt: &str) -> Result<bool> {
        let _raw = RawModeGuard::enter()?;

        let mut out = std::io::stderr();
        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print(format!("{prompt} [y/N] "))
        )?;
        out.flush()?;

        let answer = loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }

            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break false,
                KeyCode::Char(ch) => break answer_for(ch),
                KeyCode::Enter | KeyCode::Esc => break false,
                _ => {}
            }
        };

        execute!(out, Print(if answer { "yes\r\n" } else { "no\r\n" }))?;
        out.flush()?;
        Ok(answer)
    }
}

fn answer_for(key: char) -> bool {
    matches!(key, 'y' | 'Y')
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match Self::ask(prompt) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!("confirmation prompt failed: {err}");
                false
            }
        }
    }
}

/// Answers yes to everything (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!("assuming yes: {prompt}");
        true
    }
}

/// The confirmation source picked from the command line.
#[derive(Debug, Clone, Copy)]
pub enum Prompter {
    Terminal(TerminalConfirm),
    Yes(AssumeYes),
}

impl Prompter {
    pub fn new(assume_yes: bool) -> Self {
        if assume_yes {
            Self::Yes(AssumeYes)
        } else {
            Self::Terminal(TerminalConfirm)
        }
    }
}

impl Confirm for Prompter {
    fn confirm(&self, prompt: &str) -> bool {
        match self {
            Self::Terminal(terminal) => terminal.confirm(prompt),
            Self::Yes(yes) => yes.confirm(prompt),
        }
    }
}
