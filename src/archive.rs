//! ZIP archive codec
//!
//! Entries are exchanged as text or base64 strings: binary content is handed to
//! [`pack`] base64-encoded and every entry returned by [`unpack`] is base64-encoded.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Error type for archive encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid base64 content in {name}: {reason}")]
    Base64 { name: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Entry {0} is not valid UTF-8")]
    Utf8(String),
}

/// Content of an archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryData {
    Text(String),
    Base64(String),
}

/// One entry read back from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub is_dir: bool,
    /// Entry content, base64-encoded
    pub data: String,
}

impl ArchiveEntry {
    /// Decoded binary content
    pub fn bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| ArchiveError::Base64 {
                name: self.name.clone(),
                reason: e.to_string(),
            })
    }

    /// Decoded UTF-8 content
    pub fn text(&self) -> Result<String, ArchiveError> {
        String::from_utf8(self.bytes()?).map_err(|_| ArchiveError::Utf8(self.name.clone()))
    }
}

/// Build a deflate-compressed ZIP from ordered entries.
///
/// Names ending in `/` become directory entries and their content is ignored.
pub fn pack(entries: &[(String, EntryData)]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.as_str(), options)?;
            continue;
        }

        let bytes = match data {
            EntryData::Text(text) => text.as_bytes().to_vec(),
            EntryData::Base64(encoded) => {
                STANDARD
                    .decode(encoded)
                    .map_err(|e| ArchiveError::Base64 {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?
            }
        };

        writer.start_file(name.as_str(), options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Read every entry of a ZIP, in archive order
pub fn unpack(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        let is_dir = file.is_dir();

        let mut content = Vec::new();
        if !is_dir {
            file.read_to_end(&mut content)?;
        }

        entries.push(ArchiveEntry {
            name,
            is_dir,
            data: STANDARD.encode(&content),
        });
    }

    Ok(entries)
}

/// Base64-encode binary content for [`EntryData::Base64`]
pub fn encode_binary(content: &[u8]) -> EntryData {
    EntryData::Base64(STANDARD.encode(content))
}
