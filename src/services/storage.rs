use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UploadKind {
    Exam,
    Olympiad,
}

impl UploadKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Exam => "EXAM",
            Self::Olympiad => "OLYMPIAD",
        }
    }

    pub(crate) fn url_prefix(self) -> &'static str {
        match self {
            Self::Exam => "/exam_uploads",
            Self::Olympiad => "/olympiad_uploads",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredFile {
    pub(crate) url: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

/// Local-disk PDF store. Uploaded files live under the data directory and are
/// served back via their public URL prefix.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    exam_dir: PathBuf,
    olympiad_dir: PathBuf,
}

impl FileStore {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(&settings.storage().data_dir);
        let exam_dir = data_dir.join(&settings.storage().exam_upload_dir);
        let olympiad_dir = data_dir.join(&settings.storage().olympiad_upload_dir);

        tokio::fs::create_dir_all(&exam_dir)
            .await
            .with_context(|| format!("Failed to create {}", exam_dir.display()))?;
        tokio::fs::create_dir_all(&olympiad_dir)
            .await
            .with_context(|| format!("Failed to create {}", olympiad_dir.display()))?;

        Ok(Self { exam_dir, olympiad_dir })
    }

    pub(crate) fn dir(&self, kind: UploadKind) -> &Path {
        match kind {
            UploadKind::Exam => &self.exam_dir,
            UploadKind::Olympiad => &self.olympiad_dir,
        }
    }

    pub(crate) async fn save_pdf(
        &self,
        kind: UploadKind,
        original_name: &str,
        bytes: &[u8],
    ) -> anyhow::Result<StoredFile> {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let file_name = format!("{millis}_{}_{}", kind.tag(), sanitized_filename(original_name));
        let path = self.dir(kind).join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(StoredFile {
            url: format!("{}/{file_name}", kind.url_prefix()),
            size: bytes.len() as i64,
            sha256: hex::encode(Sha256::digest(bytes)),
        })
    }

    /// Best-effort removal by public URL. URLs outside the known prefixes
    /// (e.g. legacy external links) are left alone, and only the final path
    /// component is ever touched on disk.
    pub(crate) async fn remove_by_url(&self, url: &str) -> anyhow::Result<()> {
        let kind = if url.starts_with(UploadKind::Exam.url_prefix()) {
            UploadKind::Exam
        } else if url.starts_with(UploadKind::Olympiad.url_prefix()) {
            UploadKind::Olympiad
        } else {
            return Ok(());
        };

        let Some(file_name) = Path::new(url).file_name() else {
            return Ok(());
        };
        let path = self.dir(kind).join(file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(anyhow::anyhow!("failed to remove {}: {err}", path.display())),
        }
    }
}

pub(crate) fn sanitized_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitized_filename, FileStore, UploadKind};
    use std::path::PathBuf;

    fn store(root: &std::path::Path) -> FileStore {
        FileStore {
            exam_dir: root.join("exam_uploads"),
            olympiad_dir: root.join("olympiad_uploads"),
        }
    }

    #[test]
    fn sanitized_filename_drops_unsafe_characters() {
        assert_eq!(sanitized_filename("maths test (1).pdf"), "mathstest1.pdf");
        assert_eq!(sanitized_filename("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitized_filename("???"), "upload");
    }

    #[tokio::test]
    async fn save_pdf_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path());
        tokio::fs::create_dir_all(store.dir(UploadKind::Exam)).await.expect("mkdir");

        let stored = store
            .save_pdf(UploadKind::Exam, "mid term.pdf", b"%PDF-1.4 test")
            .await
            .expect("save");

        assert!(stored.url.starts_with("/exam_uploads/"));
        assert!(stored.url.ends_with("_EXAM_midterm.pdf"));
        assert_eq!(stored.size, 13);
        assert_eq!(stored.sha256.len(), 64);

        let on_disk = store
            .dir(UploadKind::Exam)
            .join(stored.url.rsplit('/').next().expect("file name"));
        let bytes = tokio::fs::read(on_disk).await.expect("read back");
        assert_eq!(bytes, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn remove_by_url_deletes_only_known_prefixes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path());
        tokio::fs::create_dir_all(store.dir(UploadKind::Olympiad)).await.expect("mkdir");

        let stored = store
            .save_pdf(UploadKind::Olympiad, "finals.pdf", b"%PDF-1.4")
            .await
            .expect("save");
        let path: PathBuf = store
            .dir(UploadKind::Olympiad)
            .join(stored.url.rsplit('/').next().expect("file name"));
        assert!(path.exists());

        store.remove_by_url(&stored.url).await.expect("remove");
        assert!(!path.exists());

        // Unknown prefixes and repeated removals are no-ops.
        store.remove_by_url("https://cdn.example.com/file.pdf").await.expect("external");
        store.remove_by_url(&stored.url).await.expect("idempotent");
    }
}
