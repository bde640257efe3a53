//! Increase/decrease counter. Held in memory only; it starts at zero on
//! every launch.

use crate::errors::AppError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increase,
    Decrease,
}

impl FromStr for CounterAction {
    type Err = AppError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action.trim() {
            "increase" | "add" => Ok(CounterAction::Increase),
            "decrease" | "sub" => Ok(CounterAction::Decrease),
            _ => Err(AppError::bad_request(
                "action must be 'increase' or 'decrease'",
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Saturates at the `i64` bounds. Negative values are allowed.
    pub fn apply(&mut self, action: CounterAction) -> i64 {
        self.value = match action {
            CounterAction::Increase => self.value.saturating_add(1),
            CounterAction::Decrease => self.value.saturating_sub(1),
        };
        self.value
    }
}
