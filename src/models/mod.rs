//! Models for wine-tasting records

pub mod form;
pub mod wine_record;

pub use form::{RecordForm, parse_grape_varieties};
pub use wine_record::{GrapeVariety, PhotoKind, WineRecord, parse_amount};
