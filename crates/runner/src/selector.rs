//! Model selection from operator input
//!
//! Accepts a zero-based index (`"2"`), a letter (`"c"` == 2) or a model
//! name/alias (`"Chameleon"`, case-insensitive).

use crate::error::RunnerError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelector {
    Index(usize),
    Name(String),
}

impl FromStr for ModelSelector {
    type Err = RunnerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RunnerError::InvalidSelector(input.to_string()));
        }

        if input.chars().all(|c| c.is_ascii_digit()) {
            return input
                .parse()
                .map(ModelSelector::Index)
                .map_err(|_| RunnerError::InvalidSelector(input.to_string()));
        }

        let mut chars = input.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Ok(ModelSelector::Index((c as u8 - b'a') as usize));
            }
        }

        Ok(ModelSelector::Name(input.to_string()))
    }
}

impl From<usize> for ModelSelector {
    fn from(index: usize) -> Self {
        ModelSelector::Index(index)
    }
}
