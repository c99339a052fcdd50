//! Toy library under test
//!
//! Inputs are JSON values so callers can pass the wrong type and observe the error.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibError {
    #[error("Lib - add_to_one - non-numeric input was given")]
    NotANumber,

    #[error("Lib - add_to_hello_string - non-string input was given")]
    NotAString,
}

pub fn return_one() -> i64 {
    1
}

/// Add one to a numeric input
pub fn add_to_one(input: &Value) -> Result<f64, LibError> {
    let number = input.as_f64().ok_or(LibError::NotANumber)?;
    Ok(return_one() as f64 + number)
}

pub fn return_hello_string() -> &'static str {
    "hello"
}

/// Prefix a string input with the greeting
pub fn add_to_hello_string(input: &Value) -> Result<String, LibError> {
    let suffix = input.as_str().ok_or(LibError::NotAString)?;
    Ok(format!("{} {}", return_hello_string(), suffix))
}
