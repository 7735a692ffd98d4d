//! Attachment extraction to disk.

use std::fs;
use std::path::{Path, PathBuf};

use mailroom_mime::Message;

use crate::error::Result;

/// Writes every named attachment of a raw message into `dir`.
///
/// Payloads are written after transfer decoding, overwriting files of the
/// same name. Only the final component of each filename is used, so a
/// name cannot point outside `dir`; attachments without a usable name are
/// skipped. Returns the paths written, in document order.
///
/// # Errors
///
/// Returns the first I/O error; later attachments are not written. `dir`
/// must already exist.
pub fn extract_attachments(raw: &[u8], dir: &Path) -> Result<Vec<PathBuf>> {
    let message = Message::parse(raw);
    let mut written = Vec::new();

    for (filename, part) in message.attachments() {
        let Some(name) = filename.as_deref().and_then(|name| Path::new(name).file_name()) else {
            tracing::debug!(?filename, "Skipping attachment without a usable filename");
            continue;
        };

        let path = dir.join(name);
        fs::write(&path, part.decode_body())?;
        tracing::debug!(path = %path.display(), "Attachment saved");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut raw = String::from("Content-Type: multipart/mixed; boundary=sep\r\n\r\n");
        for (headers, body) in parts {
            raw.push_str("--sep\r\n");
            raw.push_str(headers);
            raw.push_str("\r\n\r\n");
            raw.push_str(body);
            raw.push_str("\r\n");
        }
        raw.push_str("--sep--\r\n");
        raw.into_bytes()
    }

    #[test]
    fn test_writes_decoded_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let raw = message(&[
            ("Content-Type: text/plain", "body"),
            (
                "Content-Type: application/pdf\r\nContent-Disposition: attachment; filename=\"a.pdf\"\r\nContent-Transfer-Encoding: base64",
                "JVBERi0=",
            ),
            (
                "Content-Type: text/plain\r\nContent-Disposition: attachment; filename*=utf-8''%D0%BE%D1%82%D1%87%D0%B5%D1%82.txt",
                "report",
            ),
        ]);

        let written = extract_attachments(&raw, dir.path()).unwrap();

        assert_eq!(written, [dir.path().join("a.pdf"), dir.path().join("отчет.txt")]);
        assert_eq!(fs::read(dir.path().join("a.pdf")).unwrap(), b"%PDF-");
        assert_eq!(fs::read_to_string(dir.path().join("отчет.txt")).unwrap(), "report");
    }

    #[test]
    fn test_skips_unnamed_and_inline() {
        let dir = tempfile::tempdir().unwrap();
        let raw = message(&[
            ("Content-Type: image/png\r\nContent-Disposition: attachment", "png"),
            ("Content-Type: image/png\r\nContent-Disposition: inline; filename=inline.png", "png"),
            ("Content-Type: image/png\r\nContent-Disposition: attachment; filename=\"..\"", "png"),
        ]);

        assert!(extract_attachments(&raw, dir.path()).unwrap().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_strips_directories_from_names() {
        let dir = tempfile::tempdir().unwrap();
        let raw = message(&[(
            "Content-Type: text/plain\r\nContent-Disposition: attachment; filename=\"../../etc/passwd\"",
            "nope",
        )]);

        let written = extract_attachments(&raw, dir.path()).unwrap();
        assert_eq!(written, [dir.path().join("passwd")]);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "old").unwrap();
        let raw = message(&[(
            "Content-Type: text/plain\r\nContent-Disposition: attachment; filename=a.txt",
            "new",
        )]);

        extract_attachments(&raw, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let raw = message(&[(
            "Content-Type: text/plain\r\nContent-Disposition: attachment; filename=a.txt",
            "x",
        )]);

        let err = extract_attachments(&raw, &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
