use super::*;

#[test]
fn section_titles() {
    assert_eq!(section_title(UploadCategory::File), "Upload a JSON File");
    assert_eq!(section_title(UploadCategory::Image), "Upload Image/PDF");
}

#[test]
fn button_labels() {
    assert_eq!(button_label(UploadCategory::File), "Upload File");
    assert_eq!(button_label(UploadCategory::Image), "Upload Image");
}

#[test]
fn summary_describes_selection() {
    let file = SelectedFile::new("data.json", "application/json", b"{\"k\":1}".to_vec());
    assert_eq!(selection_summary(Some(&file)), "data.json (7 bytes)");
    assert_eq!(selection_summary(None), "No file chosen");
}

#[tokio::test]
async fn upload_without_selection_sends_nothing() {
    let selections = FileSelections::default();
    let outcome = submit(&BrowserTransport, selections.get(UploadCategory::Image), None, "http://x/upload").await;
    assert_eq!(Notice::for_upload(UploadCategory::Image, &outcome).message, "Choose an image first.");
}
