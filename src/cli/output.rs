//! Output formatting for CLI

use winenote::{PhotoKind, WineRecord};

/// Format grape varieties as `Cabernet 60%, Merlot 40%`
fn format_grapes(record: &WineRecord) -> String {
    record
        .grape_varieties
        .iter()
        .map(|g| {
            if g.percentage > 0.0 {
                format!("{} {}%", g.variety, g.percentage)
            } else {
                g.variety.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One block of text per record
pub fn format_record(index: usize, record: &WineRecord) -> String {
    let mut lines = vec![format!(
        "{}. {} - {}",
        index + 1,
        record.winery_name,
        record.wine_name
    )];

    let location = [record.region.as_str(), record.country.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if !location.is_empty() {
        lines.push(format!("   Origin:   {}", location));
    }
    if !record.harvest_year.is_empty() {
        lines.push(format!("   Vintage:  {}", record.harvest_year));
    }
    if !record.grape_varieties.is_empty() {
        lines.push(format!("   Grapes:   {}", format_grapes(record)));
    }
    if record.alcohol_content > 0.0 {
        lines.push(format!("   Alcohol:  {}%", record.alcohol_content));
    }
    if record.price > 0.0 {
        lines.push(format!("   Price:    {}", record.price));
    }
    if !record.personal_verdict.is_empty() {
        lines.push(format!("   Verdict:  {}", record.personal_verdict));
    }

    let photos: Vec<&str> = record
        .photos()
        .map(|(kind, _)| match kind {
            PhotoKind::Bottle => "bottle",
            PhotoKind::Label => "label",
            PhotoKind::BackLabel => "back label",
            PhotoKind::Plaque => "plaque",
        })
        .collect();
    if !photos.is_empty() {
        lines.push(format!("   Photos:   {}", photos.join(", ")));
    }

    lines.join("\n")
}
