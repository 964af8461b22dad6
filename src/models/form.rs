//! Raw form input for a new record
//!
//! Every field arrives as text, the way the entry screen collects it. Conversion into a
//! [`WineRecord`] applies the default-0 rule to numeric fields and parses the grape list.

use serde::{Deserialize, Serialize};

use super::wine_record::{GrapeVariety, WineRecord, parse_amount};

/// Unvalidated record input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordForm {
    pub winery_name: String,
    pub wine_name: String,
    pub harvest_year: String,
    pub bottling_year: String,
    /// Free text such as `"Cabernet:60, Merlot:40"`
    pub grape_varieties: String,
    pub winemaker: String,
    pub owner: String,
    pub country: String,
    pub region: String,
    pub sugar_content: String,
    pub alcohol_content: String,
    pub wine_type: String,
    pub wine_style: String,
    pub color: String,
    pub price: String,
    pub appearance_notes: String,
    pub density: String,
    pub initial_nose: String,
    pub aroma_after_aeration: String,
    pub taste: String,
    pub tannins: String,
    pub acidity: String,
    pub sweetness: String,
    pub balance: String,
    pub associations: String,
    pub consumption_date: String,
    pub personal_verdict: String,
    pub additional_notes: String,
    pub bottle_photo: String,
    pub label_photo: String,
    pub back_label_photo: String,
    pub plaque_photo: String,
}

impl RecordForm {
    /// Convert the form into a record.
    ///
    /// Required fields are not checked here; the record store rejects records without a
    /// winery or wine name.
    pub fn into_record(self) -> WineRecord {
        WineRecord {
            grape_varieties: parse_grape_varieties(&self.grape_varieties),
            sugar_content: parse_amount(&self.sugar_content),
            alcohol_content: parse_amount(&self.alcohol_content),
            price: parse_amount(&self.price),
            winery_name: self.winery_name,
            wine_name: self.wine_name,
            harvest_year: self.harvest_year,
            bottling_year: self.bottling_year,
            winemaker: self.winemaker,
            owner: self.owner,
            country: self.country,
            region: self.region,
            wine_type: self.wine_type,
            wine_style: self.wine_style,
            color: self.color,
            appearance_notes: self.appearance_notes,
            density: self.density,
            initial_nose: self.initial_nose,
            aroma_after_aeration: self.aroma_after_aeration,
            taste: self.taste,
            tannins: self.tannins,
            acidity: self.acidity,
            sweetness: self.sweetness,
            balance: self.balance,
            associations: self.associations,
            consumption_date: self.consumption_date,
            personal_verdict: self.personal_verdict,
            additional_notes: self.additional_notes,
            bottle_photo: self.bottle_photo,
            label_photo: self.label_photo,
            back_label_photo: self.back_label_photo,
            plaque_photo: self.plaque_photo,
        }
    }
}

/// Parse `"variety:percentage, variety:percentage"` into grape varieties.
///
/// Segments are split on `,`, then on `:`; both parts are trimmed. A missing or
/// unparsable percentage becomes 0 and segments with an empty variety are dropped.
pub fn parse_grape_varieties(input: &str) -> Vec<GrapeVariety> {
    input
        .split(',')
        .filter_map(|segment| {
            let mut parts = segment.split(':').map(str::trim);
            let variety = parts.next().unwrap_or_default();
            if variety.is_empty() {
                return None;
            }
            let percentage = parts.next().map(parse_amount).unwrap_or(0.0);
            Some(GrapeVariety::new(variety, percentage))
        })
        .collect()
}
