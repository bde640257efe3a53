//! The small arithmetic demos: sum, calculator, parity, voting age, grade
//! and library access.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const VOTING_AGE: i32 = 18;
const MAX_MARKS: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    NotANumber(String),
    DivideByZero,
    InvalidOperation(String),
    YearOutOfRange(i32),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::NotANumber(input) => write!(f, "'{input}' is not a number"),
            CalcError::DivideByZero => f.write_str("Cannot divide by zero"),
            CalcError::InvalidOperation(op) => write!(f, "Invalid Operation: '{op}'"),
            CalcError::YearOutOfRange(year) => write!(f, "Birth year {year} is out of range"),
        }
    }
}

impl std::error::Error for CalcError {}

/// Blank or non-numeric text is rejected.
pub fn parse_number(input: &str) -> Result<f64, CalcError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::NotANumber(trimmed.to_string())),
    }
}

pub fn add_numbers(a: f64, b: f64) -> f64 {
    a + b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Remainder,
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op.trim() {
            "+" | "add" => Ok(Operator::Add),
            "-" | "sub" => Ok(Operator::Subtract),
            "*" | "mul" => Ok(Operator::Multiply),
            "/" | "div" => Ok(Operator::Divide),
            "%" | "mod" => Ok(Operator::Remainder),
            other => Err(CalcError::InvalidOperation(other.to_string())),
        }
    }
}

pub fn calculate(a: f64, b: f64, op: Operator) -> Result<f64, CalcError> {
    match op {
        Operator::Add => Ok(a + b),
        Operator::Subtract => Ok(a - b),
        Operator::Multiply => Ok(a * b),
        Operator::Divide if b == 0.0 => Err(CalcError::DivideByZero),
        Operator::Divide => Ok(a / b),
        Operator::Remainder if b == 0.0 => Err(CalcError::DivideByZero),
        Operator::Remainder => Ok(a % b),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    Even,
    Odd,
}

pub fn parity(n: i64) -> Parity {
    if n % 2 == 0 { Parity::Even } else { Parity::Odd }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VotingStatus {
    pub age: i32,
    pub eligible: bool,
    pub message: String,
}

pub fn voting_status(birth_year: i32, current_year: i32) -> Result<VotingStatus, CalcError> {
    let age = current_year
        .checked_sub(birth_year)
        .ok_or(CalcError::YearOutOfRange(birth_year))?;
    let eligible = age >= VOTING_AGE;
    Ok(VotingStatus {
        age,
        eligible,
        message: format!("You are {age} years old. Eligible to vote: {eligible}"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub total: f64,
    pub percentage: f64,
    pub grade: Grade,
}

/// Three subjects, each out of 100.
pub fn grade(m1: f64, m2: f64, m3: f64) -> GradeReport {
    let total = m1 + m2 + m3;
    let percentage = total / MAX_MARKS * 100.0;
    let grade = if percentage >= 90.0 {
        Grade::A
    } else if percentage >= 75.0 {
        Grade::B
    } else if percentage >= 50.0 {
        Grade::C
    } else {
        Grade::Fail
    };
    GradeReport {
        total,
        percentage,
        grade,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryAccess {
    Granted,
    NotAStudent,
    NoCard,
}

impl LibraryAccess {
    pub fn message(self) -> &'static str {
        match self {
            LibraryAccess::Granted => "Access Granted: You can borrow books.",
            LibraryAccess::NotAStudent => "Access Denied: Only Students with cards can borrow.",
            LibraryAccess::NoCard => "Access Denied: You need a library card and student status.",
        }
    }
}

/// Borrowing needs a card and student status.
pub fn library_access(has_card: bool, is_student: bool) -> LibraryAccess {
    match (has_card, is_student) {
        (true, true) => LibraryAccess::Granted,
        (true, false) => LibraryAccess::NotAStudent,
        (false, _) => LibraryAccess::NoCard,
    }
}
