//! Reading the file chosen in an `<input type="file">`.

use courier::SelectedFile;
use courier::media::guess_media_type;

/// Media type reported by the browser, or a guess from the name when the
/// browser reports none.
#[must_use]
pub fn effective_media_type(name: &str, reported: &str) -> String {
    if reported.trim().is_empty() { guess_media_type(name).to_owned() } else { reported.to_owned() }
}

/// Read the first file of the input that fired `ev`.
///
/// Resolves to `Ok(None)` when the selection was cleared.
///
/// # Errors
///
/// Returns a message if the file contents cannot be read.
pub async fn read_from_event(ev: &leptos::ev::Event) -> Result<Option<SelectedFile>, String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return Ok(None);
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return Ok(None);
        };
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
        let name = file.name();
        let media_type = effective_media_type(&name, &file.type_());
        Ok(Some(SelectedFile::new(name, media_type, bytes)))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        Ok(None)
    }
}
