pub mod badges;
pub mod filter;
pub mod share;

pub use badges::{origin_badge, CategoryKind};
pub use filter::{
    categories, category_counts, classify_origin, filter_ingredients, origin_counts,
    IngredientFilter, Origin, OriginCounts,
};
pub use share::{copy_text, share, ShareOutcome, ShareTarget, SHARE_TITLE};
