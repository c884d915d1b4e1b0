//! Line prompts for the interactive front-end.

use std::collections::VecDeque;

use crate::error::{ProvisionError, Result};

/// Source of interactive answers.
pub trait Prompt {
    /// Ask for one line; an empty answer yields `default` when given.
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String>;
}

/// Terminal prompts via `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl Prompt for InquirePrompt {
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        let mut text = inquire::Text::new(message);
        if let Some(default) = default {
            text = text.with_default(default);
        }
        Ok(text.prompt()?.trim().to_string())
    }
}

/// Pre-recorded answers, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        self.asked.push(message.to_string());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| ProvisionError::Prompt(format!("no answer scripted for '{message}'")))?;
        let answer = answer.trim();
        match (answer.is_empty(), default) {
            (true, Some(default)) => Ok(default.to_string()),
            _ => Ok(answer.to_string()),
        }
    }
}
