//! Instructions document written next to an export archive

use super::{ARCHIVE_FILE_NAME, DATA_FILE_NAME};
use crate::photos::EXPORTED_IMAGES_DIR;

/// Render the README.html content for an export
pub fn render(total_images: usize, failed_images: usize) -> String {
    let copied = total_images.saturating_sub(failed_images);
    let missing = if failed_images > 0 {
        format!(
            "\n        <p class=\"warn\">{failed_images} of {total_images} photos could not be copied and are not included.</p>"
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Exported wine-tasting notes</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }}
    h1 {{ color: #722F37; }}
    .info {{ background: #f9f9f9; padding: 15px; border-left: 4px solid #722F37; }}
    .warn {{ color: #A94442; }}
  </style>
</head>
<body>
  <h1>Wine-tasting notes</h1>
  <div class="info">
    <p>The files were exported successfully.</p>
    <p><strong>{DATA_FILE_NAME}</strong> - all records in JSON format</p>
    <p><strong>/{EXPORTED_IMAGES_DIR}/</strong> - the {copied} photos referenced by the records</p>
    <p><strong>{ARCHIVE_FILE_NAME}</strong> - archive containing the JSON and the photos</p>
    <p>Use the import function of the application to load the data back.</p>{missing}
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_bundle_contents() {
        let html = render(3, 0);
        assert!(html.contains("WineTastingData.json"));
        assert!(html.contains("WineTastingExport.zip"));
        assert!(html.contains("the 3 photos"));
        assert!(!html.contains("could not be copied"));
    }

    #[test]
    fn test_reports_missing_photos() {
        let html = render(3, 1);
        assert!(html.contains("1 of 3 photos could not be copied"));
    }
}
