use crate::error::{PlaygateError, Result};
use colored::*;
use dialoguer::Confirm;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Operator confirmation capability used by the safety gate.
pub trait Confirmer: Send + Sync {
    /// Shows `warnings` and asks a yes/no `question`. Defaults to no.
    fn confirm(&self, warnings: &[String], question: &str) -> Result<bool>;

    /// Shows `warning` and asks the operator to type `token`.
    /// Returns the raw answer without the line terminator.
    fn challenge(&self, warning: &str, token: &str) -> Result<String>;
}

/// Interactive prompts on the operator's terminal.
pub struct TerminalConfirmer;

impl TerminalConfirmer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalConfirmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, warnings: &[String], question: &str) -> Result<bool> {
        // Output to stderr so stdout stays with the automation engine
        eprintln!(
            "\n{}",
            "[WARNING] Could not connect to the following hosts:".yellow().bold()
        );
        for line in warnings {
            eprintln!("  - {}", line.red());
        }
        eprintln!();

        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| PlaygateError::Prompt(e.to_string()))
    }

    fn challenge(&self, warning: &str, token: &str) -> Result<String> {
        eprintln!("\n{} {}", "[WARNING]".red().bold(), warning);
        eprint!("Type '{}' to continue: ", token.bold());
        io::stderr().flush()?;

        // read_line keeps surrounding spaces, so "PROD " is not "PROD"
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;

        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays canned answers in order. Used by tests and scripted automation.
///
/// An exhausted script behaves like a closed terminal: the prompt fails,
/// which the gate treats as "do not proceed".
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt shown so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn next_answer(&self, shown: String) -> Result<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(shown);
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut a| a.pop_front())
            .ok_or_else(|| PlaygateError::Prompt("no scripted answer left".to_string()))
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, warnings: &[String], question: &str) -> Result<bool> {
        let shown = format!("{}\n{}", warnings.join("\n"), question);
        let answer = self.next_answer(shown)?;
        Ok(is_affirmative(&answer))
    }

    fn challenge(&self, warning: &str, token: &str) -> Result<String> {
        self.next_answer(format!("{}\nType '{}' to continue", warning, token))
    }
}

/// "y" or "yes", ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
