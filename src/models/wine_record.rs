//! Wine-tasting record model

use serde::{Deserialize, Deserializer, Serialize};

/// One grape variety and its share of the blend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrapeVariety {
    pub variety: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub percentage: f64,
}

impl GrapeVariety {
    pub fn new(variety: impl Into<String>, percentage: f64) -> Self {
        Self {
            variety: variety.into(),
            percentage,
        }
    }
}

/// One wine-tasting note
///
/// Field names serialize in camelCase, which is both the persisted store format and
/// the JSON payload inside an export archive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WineRecord {
    // Identity
    pub winery_name: String,
    pub wine_name: String,

    // Description
    pub harvest_year: String,
    pub bottling_year: String,
    pub grape_varieties: Vec<GrapeVariety>,
    pub winemaker: String,
    pub owner: String,
    pub country: String,
    pub region: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub sugar_content: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub alcohol_content: f64,
    pub wine_type: String,
    pub wine_style: String,
    pub color: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub price: f64,

    // Tasting notes
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

    // Photos: empty or a reference to a local file
    pub bottle_photo: String,
    pub label_photo: String,
    pub back_label_photo: String,
    pub plaque_photo: String,
}

/// The four photo slots of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoKind {
    Bottle,
    Label,
    BackLabel,
    Plaque,
}

impl PhotoKind {
    /// All kinds, in field order
    pub const ALL: [PhotoKind; 4] = [
        PhotoKind::Bottle,
        PhotoKind::Label,
        PhotoKind::BackLabel,
        PhotoKind::Plaque,
    ];

    /// Prefix used in exported file names
    pub fn export_prefix(self) -> &'static str {
        match self {
            PhotoKind::Bottle => "bottle",
            PhotoKind::Label => "label",
            PhotoKind::BackLabel => "backlabel",
            PhotoKind::Plaque => "plaque",
        }
    }

    /// JSON key of the field holding this photo
    pub fn field_name(self) -> &'static str {
        match self {
            PhotoKind::Bottle => "bottlePhoto",
            PhotoKind::Label => "labelPhoto",
            PhotoKind::BackLabel => "backLabelPhoto",
            PhotoKind::Plaque => "plaquePhoto",
        }
    }
}

impl std::fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

impl WineRecord {
    /// Create a record with just the two required fields set
    pub fn new(winery_name: impl Into<String>, wine_name: impl Into<String>) -> Self {
        Self {
            winery_name: winery_name.into(),
            wine_name: wine_name.into(),
            ..Default::default()
        }
    }

    /// JSON key of the first empty required field, if any
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.winery_name.is_empty() {
            Some("wineryName")
        } else if self.wine_name.is_empty() {
            Some("wineName")
        } else {
            None
        }
    }

    pub fn photo(&self, kind: PhotoKind) -> &str {
        match kind {
            PhotoKind::Bottle => &self.bottle_photo,
            PhotoKind::Label => &self.label_photo,
            PhotoKind::BackLabel => &self.back_label_photo,
            PhotoKind::Plaque => &self.plaque_photo,
        }
    }

    pub fn photo_mut(&mut self, kind: PhotoKind) -> &mut String {
        match kind {
            PhotoKind::Bottle => &mut self.bottle_photo,
            PhotoKind::Label => &mut self.label_photo,
            PhotoKind::BackLabel => &mut self.back_label_photo,
            PhotoKind::Plaque => &mut self.plaque_photo,
        }
    }

    pub fn set_photo(&mut self, kind: PhotoKind, value: impl Into<String>) {
        *self.photo_mut(kind) = value.into();
    }

    /// Non-empty photo fields, in field order
    pub fn photos(&self) -> impl Iterator<Item = (PhotoKind, &str)> + '_ {
        PhotoKind::ALL
            .into_iter()
            .map(|kind| (kind, self.photo(kind)))
            .filter(|(_, value)| !value.is_empty())
    }

    /// Copy of this record with every photo field cleared
    pub fn without_photos(&self) -> Self {
        let mut record = self.clone();
        for kind in PhotoKind::ALL {
            record.photo_mut(kind).clear();
        }
        record
    }
}

/// Parse a user-entered amount; anything that is not a finite, non-negative number is 0.
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Accepts a number, a numeric string, null or anything else (which becomes 0).
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0),
        serde_json::Value::String(s) => parse_amount(&s),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_keys() {
        let mut record = WineRecord::new("Château Test", "Grand Vin");
        record.back_label_photo = "exported_images/backlabel_0_1.jpg".to_string();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["wineryName"], "Château Test");
        assert_eq!(json["wineName"], "Grand Vin");
        assert_eq!(json["backLabelPhoto"], "exported_images/backlabel_0_1.jpg");
        assert!(json.get("grapeVarieties").unwrap().is_array());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let record: WineRecord =
            serde_json::from_str(r#"{"wineryName": "A", "wineName": "B"}"#).unwrap();
        assert_eq!(record.winery_name, "A");
        assert_eq!(record.price, 0.0);
        assert!(record.grape_varieties.is_empty());
        assert!(record.plaque_photo.is_empty());
    }

    #[test]
    fn test_lenient_numbers() {
        let record: WineRecord = serde_json::from_str(
            r#"{"wineryName": "A", "wineName": "B", "price": "12.5", "sugarContent": null,
                "alcoholContent": "abc", "grapeVarieties": [{"variety": "Merlot", "percentage": -3}]}"#,
        )
        .unwrap();
        assert_eq!(record.price, 12.5);
        assert_eq!(record.sugar_content, 0.0);
        assert_eq!(record.alcohol_content, 0.0);
        assert_eq!(record.grape_varieties[0].percentage, 0.0);
    }

    #[test]
    fn test_photo_accessors() {
        let mut record = WineRecord::new("A", "B");
        record.set_photo(PhotoKind::Label, "/data/label.png");
        record.set_photo(PhotoKind::Plaque, "/data/plaque.jpg");

        let photos: Vec<_> = record.photos().collect();
        assert_eq!(
            photos,
            vec![
                (PhotoKind::Label, "/data/label.png"),
                (PhotoKind::Plaque, "/data/plaque.jpg")
            ]
        );
        assert_eq!(record.without_photos().photos().count(), 0);
    }

    #[test]
    fn test_missing_required_field() {
        assert_eq!(WineRecord::new("A", "B").missing_required_field(), None);
        assert_eq!(
            WineRecord::new("", "").missing_required_field(),
            Some("wineryName")
        );
        assert_eq!(
            WineRecord::new("A", "").missing_required_field(),
            Some("wineName")
        );
        // Whitespace counts as a value
        assert_eq!(WineRecord::new(" ", " ").missing_required_field(), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 13.5 "), 13.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-4"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }
}
