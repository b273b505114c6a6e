use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, ApiResult};

pub mod demo;

pub const MAX_INGREDIENT_CHARS: usize = 2000;

/// Checks pasted ingredient text and returns it trimmed, ready to send.
pub fn validate_ingredient_text(text: &str) -> ApiResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(
            "Please enter some ingredients to analyze".into(),
        ));
    }
    if text.chars().count() > MAX_INGREDIENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Ingredient list should be at most {} characters",
            MAX_INGREDIENT_CHARS
        )));
    }
    Ok(trimmed)
}

pub fn split_ingredients(text: &str) -> Vec<&str> {
    lazy_static! {
        static ref SEPARATOR_RE: Regex = Regex::new(r"[,;]").unwrap();
    }
    SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
