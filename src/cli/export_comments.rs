//! Writes exports to the configured destination.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use camino::Utf8Path;
use mrscribe::{ExportFormat, IntakeError, ReviewComment, write_export};
use tracing::info;

/// Writes `comments` in `format` to `output`, or to stdout when absent.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] when the file cannot be created or written.
pub fn write_output(
    output: Option<&Utf8Path>,
    comments: &[ReviewComment],
    format: ExportFormat,
) -> Result<(), IntakeError> {
    if let Some(path) = output {
        let file = File::create(path).map_err(|e| IntakeError::Io {
            message: format!("failed to create output file '{path}': {e}"),
        })?;
        let mut writer = BufWriter::new(file);
        write_export(&mut writer, format, comments)?;
        writer.flush().map_err(|e| IntakeError::Io {
            message: format!("failed to flush output file: {e}"),
        })?;
        info!(%path, %format, comments = comments.len(), "export written");
        Ok(())
    } else {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        write_export(&mut writer, format, comments)?;
        writer.flush().map_err(|e| IntakeError::Io {
            message: format!("failed to flush stdout: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use mrscribe::export::test_helpers::CommentBuilder;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn writes_export_to_file() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.csv"))
            .expect("temp path should be UTF-8");
        let comments = vec![CommentBuilder::new("MR", 1).text("hello").build()];

        write_output(Some(&path), &comments, ExportFormat::Csv).expect("export should succeed");

        let written = std::fs::read_to_string(&path).expect("file should exist");
        assert!(written.starts_with("MR Title,MR ID,"));
        assert!(written.contains("hello"));
    }

    #[rstest]
    fn reports_unwritable_destination() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("missing").join("out.md"))
            .expect("temp path should be UTF-8");

        let result = write_output(Some(&path), &[], ExportFormat::Markdown);

        assert!(
            matches!(result, Err(IntakeError::Io { ref message }) if message.contains("failed to create output file")),
            "unexpected result: {result:?}"
        );
    }
}
