//! Notices as blocking `window.alert` dialogs.

use courier::notice::{Notice, Notifier};
#[cfg(not(feature = "csr"))]
use courier::notice::TracingNotifier;

#[derive(Clone, Copy, Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: &Notice) {
        #[cfg(feature = "csr")]
        {
            if notice.is_error() {
                log::warn!("{}", notice.message);
            } else {
                log::info!("{}", notice.message);
            }
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&notice.message);
            }
        }
        #[cfg(not(feature = "csr"))]
        TracingNotifier.notify(notice);
    }
}

/// Show `notice` if there is one.
pub fn show(notice: Option<Notice>) {
    if let Some(notice) = notice {
        AlertNotifier.notify(&notice);
    }
}
