use std::io::{self, Write};

use time::OffsetDateTime;

use crate::api::{AnalysisResult, IngredientInfo, ScanSummary};
use crate::history::{preview, relative_label};
use crate::results::{category_counts, origin_badge, origin_counts, CategoryKind, IngredientFilter};

pub fn result(out: &mut dyn Write, res: &AnalysisResult, filter: &IngredientFilter) -> io::Result<()> {
    writeln!(out, "Scan {}", res.scan_id)?;
    writeln!(out, "{}", res.summary)?;
    writeln!(out)?;

    let origins = origin_counts(&res.ingredients);
    writeln!(
        out,
        "{} ingredients: {} natural, {} synthetic, {} other",
        res.ingredients.len(),
        origins.natural,
        origins.synthetic,
        origins.other
    )?;
    let cats = category_counts(&res.ingredients)
        .into_iter()
        .map(|(cat, n)| format!("{} ({})", cat, n))
        .collect::<Vec<_>>()
        .join(", ");
    if !cats.is_empty() {
        writeln!(out, "Categories: {}", cats)?;
    }

    let shown = filter.apply(&res.ingredients);
    if !filter.is_identity() {
        writeln!(out, "Showing {} of {}", shown.len(), res.ingredients.len())?;
    }
    if shown.is_empty() && !res.ingredients.is_empty() {
        writeln!(out, "No ingredients match your search")?;
    }
    for ing in shown {
        writeln!(out)?;
        ingredient(out, ing)?;
    }
    Ok(())
}

fn ingredient(out: &mut dyn Write, ing: &IngredientInfo) -> io::Result<()> {
    let kind = CategoryKind::of(&ing.category);
    match &ing.e_number {
        Some(e) => writeln!(out, "{} {} ({})", kind.marker(), ing.name, e)?,
        None => writeln!(out, "{} {}", kind.marker(), ing.name)?,
    }
    writeln!(out, "    {} | {}", ing.category, origin_badge(&ing.origin))?;
    if !ing.purpose.is_empty() {
        writeln!(out, "    Purpose: {}", ing.purpose)?;
    }
    if !ing.description.is_empty() {
        writeln!(out, "    {}", ing.description)?;
    }
    if let Some(names) = ing.alternative_names.as_ref().filter(|n| !n.is_empty()) {
        writeln!(out, "    Also known as: {}", names.join(", "))?;
    }
    if let Some(note) = &ing.safety_note {
        writeln!(out, "    Note: {}", note)?;
    }
    Ok(())
}

pub fn scan_row(out: &mut dyn Write, scan: &ScanSummary, now: OffsetDateTime) -> io::Result<()> {
    writeln!(
        out,
        "{:<12} {:>3} ingredients  {}",
        relative_label(scan.timestamp, now),
        scan.ingredient_names.len(),
        preview(scan)
    )
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::analyze::demo;
    use time::macros::datetime;

    fn text(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn full_result() {
        let res = demo::mock_result(demo::SAMPLES[0], datetime!(2024-03-04 12:00 UTC));
        let s = text(|o| result(o, &res, &IngredientFilter::default()));
        assert!(s.contains("3 ingredients: 1 natural, 2 synthetic, 0 other"));
        assert!(s.contains("Categories: Preservative (1), Acidity Regulator (1), Artificial Sweetener (1)"));
        assert!(s.contains("[P] Sodium Benzoate (E211)"));
        assert!(s.contains("Artificial Sweetener | Synthetic"));
        assert!(!s.contains("Showing"));
    }

    #[test]
    fn filtered_result() {
        let res = demo::mock_result(demo::SAMPLES[0], datetime!(2024-03-04 12:00 UTC));
        let filter = IngredientFilter::new("citric", None);
        let s = text(|o| result(o, &res, &filter));
        assert!(s.contains("Showing 1 of 3"));
        assert!(s.contains("Citric Acid"));
        assert!(!s.contains("Aspartame (E951)"));

        let none = IngredientFilter::new("zzz", None);
        assert!(text(|o| result(o, &res, &none)).contains("No ingredients match your search"));
    }

    #[test]
    fn history_row() {
        let scan = ScanSummary {
            scan_id: "s".into(),
            timestamp: datetime!(2024-03-19 08:00 UTC),
            ingredient_names: vec!["Sugar".into(), "Salt".into()],
        };
        let s = text(|o| scan_row(o, &scan, datetime!(2024-03-20 12:00 UTC)));
        assert!(s.starts_with("Yesterday"));
        assert!(s.contains("2 ingredients  Sugar, Salt"));
    }
}
