//! `add` command: record a new tasting note

use std::path::{Path, PathBuf};

use clap::Args;
use winenote::{PhotoAlbum, PhotoKind, RecordForm, RecordStore, StorageBackend};

use crate::error::CliError;

/// Arguments for the `add` command
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Winery name (required)
    #[arg(long = "winery", default_value = "")]
    pub winery_name: String,
    /// Wine name (required)
    #[arg(long = "wine", default_value = "")]
    pub wine_name: String,
    #[arg(long, default_value = "")]
    pub harvest_year: String,
    #[arg(long, default_value = "")]
    pub bottling_year: String,
    /// Grape varieties, e.g. "Cabernet:60, Merlot:40"
    #[arg(long = "grapes", default_value = "")]
    pub grape_varieties: String,
    #[arg(long, default_value = "")]
    pub winemaker: String,
    #[arg(long, default_value = "")]
    pub owner: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, default_value = "")]
    pub region: String,
    /// Sugar content in g/l
    #[arg(long = "sugar", default_value = "")]
    pub sugar_content: String,
    /// Alcohol content in % vol
    #[arg(long = "alcohol", default_value = "")]
    pub alcohol_content: String,
    #[arg(long, default_value = "")]
    pub wine_type: String,
    #[arg(long, default_value = "")]
    pub wine_style: String,
    #[arg(long, default_value = "")]
    pub color: String,
    #[arg(long, default_value = "")]
    pub price: String,
    #[arg(long = "appearance", default_value = "")]
    pub appearance_notes: String,
    #[arg(long, default_value = "")]
    pub density: String,
    #[arg(long, default_value = "")]
    pub initial_nose: String,
    #[arg(long = "aroma-after-aeration", default_value = "")]
    pub aroma_after_aeration: String,
    #[arg(long, default_value = "")]
    pub taste: String,
    #[arg(long, default_value = "")]
    pub tannins: String,
    #[arg(long, default_value = "")]
    pub acidity: String,
    #[arg(long, default_value = "")]
    pub sweetness: String,
    #[arg(long, default_value = "")]
    pub balance: String,
    #[arg(long, default_value = "")]
    pub associations: String,
    #[arg(long, default_value = "")]
    pub consumption_date: String,
    #[arg(long = "verdict", default_value = "")]
    pub personal_verdict: String,
    #[arg(long = "notes", default_value = "")]
    pub additional_notes: String,
    /// Photo of the bottle
    #[arg(long)]
    pub bottle_photo: Option<PathBuf>,
    /// Photo of the front label
    #[arg(long)]
    pub label_photo: Option<PathBuf>,
    /// Photo of the back label
    #[arg(long)]
    pub back_label_photo: Option<PathBuf>,
    /// Photo of the plaque
    #[arg(long)]
    pub plaque_photo: Option<PathBuf>,
}

impl AddArgs {
    fn photo_files(&self) -> [(PhotoKind, Option<&PathBuf>); 4] {
        [
            (PhotoKind::Bottle, self.bottle_photo.as_ref()),
            (PhotoKind::Label, self.label_photo.as_ref()),
            (PhotoKind::BackLabel, self.back_label_photo.as_ref()),
            (PhotoKind::Plaque, self.plaque_photo.as_ref()),
        ]
    }

    fn into_form(self) -> RecordForm {
        RecordForm {
            winery_name: self.winery_name,
            wine_name: self.wine_name,
            harvest_year: self.harvest_year,
            bottling_year: self.bottling_year,
            grape_varieties: self.grape_varieties,
            winemaker: self.winemaker,
            owner: self.owner,
            country: self.country,
            region: self.region,
            sugar_content: self.sugar_content,
            alcohol_content: self.alcohol_content,
            wine_type: self.wine_type,
            wine_style: self.wine_style,
            color: self.color,
            price: self.price,
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
            ..Default::default()
        }
    }
}

async fn save_photo<B: StorageBackend>(
    storage: &B,
    album: &PhotoAlbum,
    file: &Path,
) -> Result<String, CliError> {
    let content = tokio::fs::read(file)
        .await
        .map_err(|e| CliError::FileReadError(file.to_path_buf(), e.to_string()))?;
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    Ok(album.save_photo(storage, name, &content).await?)
}

/// Handle the `add` command
pub async fn handle_add<B: StorageBackend>(
    store: &mut RecordStore<B>,
    config: &winenote::AppConfig,
    args: AddArgs,
) -> Result<(), CliError> {
    let album = PhotoAlbum::new(config.album_name.clone());

    let mut photos = Vec::new();
    for (kind, file) in args.photo_files() {
        if let Some(file) = file {
            photos.push((kind, save_photo(store.storage(), &album, file).await?));
        }
    }

    let mut record = args.into_form().into_record();
    for (kind, path) in &photos {
        record.set_photo(*kind, path.clone());
    }
    let wine_name = record.wine_name.clone();

    if let Err(e) = store.add_record(record).await {
        for (_, path) in &photos {
            album.delete_photo(store.storage(), path).await;
        }
        return Err(e.into());
    }

    println!(
        "Saved \"{}\" ({} records in total)",
        wine_name,
        store.len()
    );
    Ok(())
}
