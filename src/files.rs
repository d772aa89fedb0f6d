//! Local file selection for the `upload` subcommand.

use std::path::Path;

use courier::SelectedFile;
use courier::media::guess_media_type;

/// Read `path` into a [`SelectedFile`], naming it by its final path component
/// and guessing the media type from the extension.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub async fn read_selected_file(path: &Path) -> std::io::Result<SelectedFile> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned());
    let media_type = guess_media_type(&name);
    tracing::debug!(file = %name, media_type, bytes = bytes.len(), "file selected");
    Ok(SelectedFile::new(name, media_type, bytes))
}
