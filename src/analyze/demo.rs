//! Offline stand-in for `POST /analyze`.
//!
//! Fills every field from a handful of keyword rules so the CLI can show a
//! complete result without a server. It is not a classifier: anything it does
//! not recognise becomes a generic "Food Additive".

use time::OffsetDateTime;

use super::split_ingredients;
use crate::api::{AnalysisResult, IngredientInfo};

pub const SAMPLES: [&str; 3] = [
    "Sodium Benzoate, Citric Acid, Aspartame",
    "Palm Oil, Lecithin, Vanilla Extract",
    "Monosodium Glutamate, Hydrolyzed Protein",
];

pub fn mock_result(text: &str, now: OffsetDateTime) -> AnalysisResult {
    let ingredients: Vec<IngredientInfo> = split_ingredients(text)
        .into_iter()
        .map(mock_ingredient)
        .collect();
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    AnalysisResult {
        scan_id: format!("analyze-{}", millis),
        summary: format!(
            "Analysis of {} ingredients. Some ingredients may require attention based on your dietary preferences.",
            ingredients.len()
        ),
        ingredients,
    }
}

pub fn mock_ingredient(name: &str) -> IngredientInfo {
    let lower = name.to_lowercase();
    IngredientInfo {
        name: name.to_string(),
        e_number: e_number(&lower).map(str::to_string),
        category: category(&lower).to_string(),
        purpose: purpose(&lower).to_string(),
        description: format!(
            "{} is commonly used in food products. Further research recommended for detailed safety information.",
            name
        ),
        alternative_names: None,
        origin: origin(&lower).to_string(),
        safety_note: safety_note(&lower).map(str::to_string),
    }
}

fn any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lower.contains(w))
}

fn e_number(lower: &str) -> Option<&'static str> {
    match lower {
        "aspartame" => Some("E951"),
        "sodium benzoate" => Some("E211"),
        "citric acid" => Some("E330"),
        "monosodium glutamate" => Some("E621"),
        "lecithin" => Some("E322"),
        "ascorbic acid" => Some("E300"),
        _ => None,
    }
}

fn category(lower: &str) -> &'static str {
    if any(lower, &["sodium", "benzoate", "nitrite"]) {
        "Preservative"
    } else if any(lower, &["aspartame", "sucralose", "sweetener"]) {
        "Artificial Sweetener"
    } else if any(lower, &["color", "yellow", "red", "blue"]) {
        "Color Additive"
    } else if any(lower, &["acid", "citric"]) {
        "Acidity Regulator"
    } else if any(lower, &["oil", "fat"]) {
        "Fat/Oil"
    } else if any(lower, &["lecithin", "emulsifier"]) {
        "Emulsifier"
    } else if any(lower, &["glutamate", "msg"]) {
        "Flavor Enhancer"
    } else if any(lower, &["protein", "hydrolyzed"]) {
        "Protein"
    } else if any(lower, &["vitamin", "ascorbic"]) {
        "Vitamin"
    } else if any(lower, &["extract", "vanilla"]) {
        "Natural Flavoring"
    } else {
        "Food Additive"
    }
}

fn purpose(lower: &str) -> &'static str {
    if any(lower, &["benzoate", "nitrite"]) {
        "Extends shelf life and prevents bacterial growth"
    } else if any(lower, &["aspartame", "sucralose"]) {
        "Provides sweetness without calories"
    } else if lower.contains("citric") {
        "Adds tartness and regulates acidity"
    } else if lower.contains("lecithin") {
        "Helps blend ingredients that don't normally mix"
    } else if lower.contains("glutamate") {
        "Enhances savory flavor (umami)"
    } else if lower.contains("oil") {
        "Adds texture, flavor, and calories"
    } else if any(lower, &["extract", "vanilla"]) {
        "Adds natural flavor"
    } else {
        "Various food processing purposes"
    }
}

fn origin(lower: &str) -> &'static str {
    if any(lower, &["aspartame", "sucralose", "benzoate"]) {
        "Synthetic"
    } else if any(lower, &["citric", "lecithin", "extract"]) {
        "Natural/Derived"
    } else if any(lower, &["vitamin", "ascorbic"]) {
        "Can be natural or synthetic"
    } else if any(lower, &["palm", "oil"]) {
        "Plant-based"
    } else {
        "Various sources"
    }
}

fn safety_note(lower: &str) -> Option<&'static str> {
    if lower.contains("aspartame") {
        Some("Some individuals report sensitivity. Avoid if you have phenylketonuria (PKU).")
    } else if any(lower, &["glutamate", "msg"]) {
        Some("Generally recognized as safe, but some people report sensitivity.")
    } else if lower.contains("nitrite") {
        Some("Linked to health concerns when consumed in large amounts. Common in processed meats.")
    } else if lower.contains("palm") {
        Some("Environmental concerns regarding palm oil production.")
    } else if lower.contains("benzoate") {
        Some("May cause reactions in sensitive individuals when combined with certain food colorings.")
    } else {
        None
    }
}
