use super::filter::{classify_origin, Origin};

/// Display grouping for a category label; drives the badge shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Preservative,
    Color,
    Sweetener,
    Emulsifier,
    Allergen,
    Nutrient,
    Flavor,
    Texture,
    Other,
}

impl CategoryKind {
    pub fn of(category: &str) -> Self {
        let c = category.to_lowercase();
        let has = |needle: &str| c.contains(needle);
        if has("preservative") {
            CategoryKind::Preservative
        } else if has("color") || has("colour") || has("dye") {
            CategoryKind::Color
        } else if has("sweetener") {
            CategoryKind::Sweetener
        } else if has("emulsifier") {
            CategoryKind::Emulsifier
        } else if has("allergen") {
            CategoryKind::Allergen
        } else if has("vitamin") || has("mineral") {
            CategoryKind::Nutrient
        } else if has("flavor") || has("flavour") {
            CategoryKind::Flavor
        } else if has("thickener") || has("stabilizer") || has("stabiliser") {
            CategoryKind::Texture
        } else {
            CategoryKind::Other
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            CategoryKind::Preservative => "[P]",
            CategoryKind::Color => "[C]",
            CategoryKind::Sweetener => "[S]",
            CategoryKind::Emulsifier => "[E]",
            CategoryKind::Allergen => "[!]",
            CategoryKind::Nutrient => "[N]",
            CategoryKind::Flavor => "[F]",
            CategoryKind::Texture => "[T]",
            CategoryKind::Other => "[ ]",
        }
    }
}

/// Origin label as shown to the user: the two known buckets get a fixed name,
/// anything else is shown as the server wrote it.
pub fn origin_badge(origin: &str) -> &str {
    match classify_origin(origin) {
        Origin::Natural => "Natural",
        Origin::Synthetic => "Synthetic",
        Origin::Other => origin,
    }
}

#[cfg(test)]
mod badge_tests {
    use super::*;

    #[test]
    fn category_kinds() {
        assert_eq!(CategoryKind::of("Preservative"), CategoryKind::Preservative);
        assert_eq!(CategoryKind::of("Color Additive"), CategoryKind::Color);
        assert_eq!(CategoryKind::of("Artificial Sweetener"), CategoryKind::Sweetener);
        assert_eq!(CategoryKind::of("emulsifier"), CategoryKind::Emulsifier);
        assert_eq!(CategoryKind::of("Allergen"), CategoryKind::Allergen);
        assert_eq!(CategoryKind::of("Vitamin"), CategoryKind::Nutrient);
        assert_eq!(CategoryKind::of("Natural Flavoring"), CategoryKind::Flavor);
        assert_eq!(CategoryKind::of("Thickener"), CategoryKind::Texture);
        assert_eq!(CategoryKind::of("Food Additive"), CategoryKind::Other);
    }

    #[test]
    fn preservative_checked_before_color() {
        assert_eq!(
            CategoryKind::of("Preservative / Color"),
            CategoryKind::Preservative
        );
    }

    #[test]
    fn origin_badges() {
        assert_eq!(origin_badge("Natural/Derived"), "Natural");
        assert_eq!(origin_badge("artificial"), "Synthetic");
        assert_eq!(origin_badge("Plant-based"), "Plant-based");
    }
}
