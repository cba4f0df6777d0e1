use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, SignageError};
use crate::models::SpeakerId;
use crate::transport::Fetcher;

/// On-disk cache of speaker photos, one file per speaker id
///
/// A cached file is never refreshed: once `<id>.jpg` exists it is served
/// as-is without touching the network.
#[derive(Clone)]
pub struct PhotoCache {
    dir: PathBuf,
    fetcher: Arc<dyn Fetcher>,
}

impl PhotoCache {
    pub fn new(dir: impl Into<PathBuf>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
        }
    }

    /// Where the photo for `speaker_id` lives, whether or not it is cached yet
    ///
    /// Fails for ids that do not form a single plain file name.
    pub fn path_for(&self, speaker_id: &SpeakerId) -> Result<PathBuf> {
        let file_name = format!("{}.jpg", speaker_id.as_str());
        let mut components = Path::new(&file_name).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.dir.join(file_name)),
            _ => Err(SignageError::InvalidSpeakerId(speaker_id.to_string())),
        }
    }

    /// The cached photo for `speaker_id`, if one has been downloaded
    pub fn cached_path(&self, speaker_id: &SpeakerId) -> Option<PathBuf> {
        self.path_for(speaker_id).ok().filter(|path| path.is_file())
    }

    /// Return the local photo for a speaker, downloading it on first use
    pub fn ensure_cached(&self, speaker_id: &SpeakerId, remote_url: &str) -> Result<PathBuf> {
        let path = self.path_for(speaker_id)?;

        if path.is_file() {
            log::trace!("Photo found in cache: {}", path.display());
            return Ok(path);
        }

        let url = normalize_url(remote_url)?;
        log::debug!("Downloading photo for {} from {}", speaker_id, url);

        fs::create_dir_all(&self.dir)?;
        let bytes = self.fetcher.fetch(&url)?;

        // Written beside the target and renamed so a failed write never looks like a hit
        let mut staging = tempfile::NamedTempFile::new_in(&self.dir)?;
        staging.write_all(&bytes)?;
        staging.persist(&path).map_err(|e| SignageError::Io(e.error))?;

        log::debug!("Cached photo for {} at {}", speaker_id, path.display());
        Ok(path)
    }
}

/// Repair backslashes some feed entries use in place of `/`, then validate
pub fn normalize_url(raw: &str) -> Result<String> {
    let repaired = if raw.contains('\\') {
        log::warn!("Image URL badly formed, repairing: {}", raw);
        raw.replace('\\', "/")
    } else {
        raw.to_string()
    };

    url::Url::parse(repaired.trim())
        .map(String::from)
        .map_err(|e| SignageError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockFetcher;

    #[test]
    fn test_normalize_url_repairs_backslashes() {
        let url = normalize_url(r"http://images.example.org\speakers\ada.jpg").unwrap();
        assert_eq!(url, "http://images.example.org/speakers/ada.jpg");
    }

    #[test]
    fn test_normalize_url_rejects_garbage() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(SignageError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_second_lookup_is_served_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url: &str| url == "http://images.example.org/ada.jpg")
            .times(1)
            .returning(|_| Ok(vec![0xFF, 0xD8, 0xFF]));

        let cache = PhotoCache::new(dir.path().join("photos"), Arc::new(fetcher));
        let id = SpeakerId::new("s1");

        let first = cache.ensure_cached(&id, "http://images.example.org/ada.jpg").unwrap();
        let second = cache.ensure_cached(&id, "http://images.example.org/ada.jpg").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("photos").join("s1.jpg"));
        assert_eq!(fs::read(&first).unwrap(), vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(cache.cached_path(&id), Some(first));
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|url| {
            Err(SignageError::Download {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
        });

        let cache = PhotoCache::new(dir.path(), Arc::new(fetcher));
        let id = SpeakerId::new("s2");

        assert!(cache.ensure_cached(&id, "http://images.example.org/missing.jpg").is_err());
        assert_eq!(cache.cached_path(&id), None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_file_is_a_hit_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);

        let cache = PhotoCache::new(dir.path(), Arc::new(fetcher));
        let id = SpeakerId::new("s3");
        fs::write(cache.path_for(&id).unwrap(), b"old photo").unwrap();

        let path = cache.ensure_cached(&id, "http://images.example.org/new.jpg").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"old photo");
    }

    #[test]
    fn test_ids_that_are_not_plain_file_names_are_refused() {
        let root = tempfile::tempdir().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);

        let cache = PhotoCache::new(root.path().join("cache"), Arc::new(fetcher));

        for raw in ["../escaped", "/tmp/abs", "nested/id"] {
            let id = SpeakerId::new(raw);
            assert!(matches!(
                cache.ensure_cached(&id, "http://images.example.org/x.jpg"),
                Err(SignageError::InvalidSpeakerId(_))
            ));
            assert_eq!(cache.cached_path(&id), None);
        }

        assert!(!root.path().join("escaped.jpg").exists());
        assert!(!root.path().join("cache").exists());
    }

    #[test]
    fn test_path_for_stays_inside_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PhotoCache::new(dir.path(), Arc::new(MockFetcher::new()));

        let path = cache.path_for(&SpeakerId::new("a1b2-c3d4")).unwrap();
        assert_eq!(path, dir.path().join("a1b2-c3d4.jpg"));
    }
}
