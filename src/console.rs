//! Terminal notifier: info notices to stdout, errors to stderr.

use std::io::Write;

use courier::notice::{Notice, NoticeLevel, Notifier};

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Write `notice` to `out`/`err` according to its level.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the stream cannot be written.
    pub fn write_to(notice: &Notice, out: &mut impl Write, err: &mut impl Write) -> std::io::Result<()> {
        match notice.level {
            NoticeLevel::Info => writeln!(out, "{}", notice.message),
            NoticeLevel::Error => writeln!(err, "{}", notice.message),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let result = Self::write_to(notice, &mut std::io::stdout().lock(), &mut std::io::stderr().lock());
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not print notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_level() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        ConsoleNotifier::write_to(&Notice::info("Upload successful! URL:\nhttps://x"), &mut out, &mut err).unwrap();
        ConsoleNotifier::write_to(&Notice::error("You must be logged in."), &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Upload successful! URL:\nhttps://x\n");
        assert_eq!(String::from_utf8(err).unwrap(), "You must be logged in.\n");
    }
}
