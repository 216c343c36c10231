//! A saved HTML file standing in for a live page.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use job_tracker::{DocumentSource, PageSnapshot, TrackerError};

pub struct FilePage {
    path: PathBuf,
    url: String,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last modification time, `None` if the file is unreadable.
    pub fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

impl DocumentSource for FilePage {
    fn is_loaded(&self) -> bool {
        self.path.exists()
    }

    fn snapshot(&self) -> job_tracker::Result<PageSnapshot> {
        let html = std::fs::read_to_string(&self.path).map_err(TrackerError::storage)?;
        Ok(PageSnapshot::new(self.url.clone(), html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reads_current_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<h1>first</h1>").unwrap();

        let page = FilePage::new(&path, "https://acme.com/jobs/1");
        assert!(page.is_loaded());
        assert_eq!(page.snapshot().unwrap().html, "<h1>first</h1>");

        std::fs::write(&path, "<h1>second</h1>").unwrap();
        let snapshot = page.snapshot().unwrap();
        assert_eq!(snapshot.html, "<h1>second</h1>");
        assert_eq!(snapshot.url, "https://acme.com/jobs/1");
    }

    #[test]
    fn test_missing_file() {
        let page = FilePage::new("/nonexistent/page.html", "https://acme.com");
        assert!(!page.is_loaded());
        assert!(page.modified().is_none());
        assert!(page.snapshot().is_err());
    }
}
