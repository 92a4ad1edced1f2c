use colored::Colorize;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source of answers for the questions a refactoring asks.
pub trait Prompter {
    /// Index of the chosen option, `None` if dismissed.
    fn choose(&mut self, options: &[String]) -> Option<usize>;

    /// Free text answer, `None` if dismissed.
    fn input(&mut self, default: Option<&str>) -> Option<String>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn choose(&mut self, options: &[String]) -> Option<usize> {
        (**self).choose(options)
    }

    fn input(&mut self, default: Option<&str>) -> Option<String> {
        (**self).input(default)
    }
}

/// Answers from a queue prepared in advance.
///
/// With no queued choice the prompt counts as dismissed. With no queued input
/// the default is accepted.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    choices: VecDeque<Option<usize>>,
    inputs: VecDeque<Option<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_choice(mut self, choice: usize) -> Self {
        self.choices.push_back(Some(choice));
        self
    }

    pub fn dismiss_choice(mut self) -> Self {
        self.choices.push_back(None);
        self
    }

    pub fn answer_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push_back(Some(input.into()));
        self
    }

    pub fn dismiss_input(mut self) -> Self {
        self.inputs.push_back(None);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, options: &[String]) -> Option<usize> {
        self.choices
            .pop_front()
            .flatten()
            .filter(|&choice| choice < options.len())
    }

    fn input(&mut self, default: Option<&str>) -> Option<String> {
        match self.inputs.pop_front() {
            Some(answer) => answer,
            None => default.map(str::to_string),
        }
    }
}

/// Interactive prompts on stderr, answers read from stdin.
///
/// An empty line or end of input dismisses a choice; for text input an empty
/// line accepts the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn choose(&mut self, options: &[String]) -> Option<usize> {
        let mut stderr = io::stderr();
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(stderr, "  {} {}", format!("[{}]", i + 1).cyan(), option);
        }
        let _ = write!(stderr, "{} ", "Choose an option:".bold());
        let _ = stderr.flush();

        let answer = Self::read_line()?;
        let choice: usize = answer.parse().ok()?;
        (1..=options.len()).contains(&choice).then(|| choice - 1)
    }

    fn input(&mut self, default: Option<&str>) -> Option<String> {
        let mut stderr = io::stderr();
        match default {
            Some(default) => {
                let _ = write!(stderr, "{} [{}] ", "Input:".bold(), default.dimmed());
            }
            None => {
                let _ = write!(stderr, "{} ", "Input:".bold());
            }
        }
        let _ = stderr.flush();

        let answer = Self::read_line()?;
        if answer.is_empty() {
            default.map(str::to_string)
        } else {
            Some(answer)
        }
    }
}
