//! Media-type guessing and file-picker `accept` matching.

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess a media type from the file extension.
#[must_use]
pub fn guess_media_type(file_name: &str) -> &'static str {
    mime_guess::from_path(file_name).first_raw().unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// Whether a file satisfies an HTML `accept` list such as
/// `".json"` or `"image/*,application/pdf"`.
///
/// Tokens are matched the way browsers do: `.ext` against the file name
/// (case-insensitive), `type/*` against the media-type prefix, anything else
/// as an exact media type. An empty list accepts everything.
#[must_use]
pub fn accepts(accept: &str, file_name: &str, media_type: &str) -> bool {
    let tokens: Vec<&str> = accept.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return true;
    }
    let file_name = file_name.to_ascii_lowercase();
    let media_type = media_type.to_ascii_lowercase();
    tokens.iter().any(|token| {
        let token = token.to_ascii_lowercase();
        if token.starts_with('.') {
            file_name.ends_with(&token)
        } else if let Some(prefix) = token.strip_suffix("/*") {
            media_type.split_once('/').is_some_and(|(top, _)| top == prefix)
        } else {
            media_type == token
        }
    })
}
