use crate::api::IngredientInfo;

/// Distinct category labels in first-seen order.
pub fn categories(ingredients: &[IngredientInfo]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for ing in ingredients {
        if !out.contains(&ing.category.as_str()) {
            out.push(&ing.category);
        }
    }
    out
}

/// Category label with the number of ingredients carrying it, first-seen order.
pub fn category_counts(ingredients: &[IngredientInfo]) -> Vec<(&str, usize)> {
    categories(ingredients)
        .into_iter()
        .map(|cat| {
            let n = ingredients.iter().filter(|i| i.category == cat).count();
            (cat, n)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OriginCounts {
    pub natural: usize,
    pub synthetic: usize,
    pub other: usize,
}

impl OriginCounts {
    pub fn total(&self) -> usize {
        self.natural + self.synthetic + self.other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Natural,
    Synthetic,
    Other,
}

/// "natural" wins over "synthetic"/"artificial" so every origin lands in exactly one bucket.
pub fn classify_origin(origin: &str) -> Origin {
    let lower = origin.to_lowercase();
    if lower.contains("natural") {
        Origin::Natural
    } else if lower.contains("synthetic") || lower.contains("artificial") {
        Origin::Synthetic
    } else {
        Origin::Other
    }
}

pub fn origin_counts(ingredients: &[IngredientInfo]) -> OriginCounts {
    ingredients
        .iter()
        .fold(OriginCounts::default(), |mut acc, ing| {
            match classify_origin(&ing.origin) {
                Origin::Natural => acc.natural += 1,
                Origin::Synthetic => acc.synthetic += 1,
                Origin::Other => acc.other += 1,
            }
            acc
        })
}

/// Live search text plus an optional selected category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    pub query: String,
    pub category: Option<String>,
}

impl IngredientFilter {
    pub fn new(query: impl Into<String>, category: Option<String>) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    /// Selecting the active category again clears the selection.
    pub fn toggle_category(&mut self, category: &str) {
        if self.category.as_deref() == Some(category) {
            self.category = None;
        } else {
            self.category = Some(category.to_string());
        }
    }

    pub fn is_identity(&self) -> bool {
        self.query.is_empty() && self.category.is_none()
    }

    pub fn matches(&self, ing: &IngredientInfo) -> bool {
        let matches_search = self.query.is_empty() || {
            let q = self.query.to_lowercase();
            ing.name.to_lowercase().contains(&q) || ing.category.to_lowercase().contains(&q)
        };
        let matches_category = match &self.category {
            None => true,
            Some(cat) => ing.category == *cat,
        };
        matches_search && matches_category
    }

    pub fn apply<'a>(&self, ingredients: &'a [IngredientInfo]) -> Vec<&'a IngredientInfo> {
        ingredients.iter().filter(|i| self.matches(i)).collect()
    }
}

pub fn filter_ingredients<'a>(
    ingredients: &'a [IngredientInfo],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a IngredientInfo> {
    IngredientFilter::new(query, category.map(str::to_string)).apply(ingredients)
}
