//! Snapshot - JSON dump/restore of every listing
//!
//! The in-memory store does not survive restarts on its own. Before
//! shutdown the whole market is dumped to a versioned JSON document and
//! the service is cleared; on startup the document is read back and every
//! listing is restored at the store index it had, so indices handed out
//! in one run still address the same listings in the next.
//!
//! # Design Notes
//! - The document is written to a sibling `.tmp` file, flushed, synced and
//!   renamed over the old snapshot; a failed dump leaves both the previous
//!   file and the in-memory market intact
//! - A malformed file is rejected as a whole before any listing reaches
//!   the service

use crate::query::AuctionService;
use crate::settings::PageSizeSource;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Current on-disk format version
pub const SNAPSHOT_VERSION: u32 = 2;

/// A listing together with its store index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredListing {
    pub index: usize,
    pub listing: Listing,
}

/// Serialization format for JSON persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Version for future compatibility
    pub version: u32,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
    /// Listings in store order
    pub listings: Vec<StoredListing>,
}

/// Leading part of any snapshot version, read before the full document
#[derive(Deserialize)]
struct Header {
    version: u32,
}

impl Snapshot {
    /// Capture every listing currently in the service, leaving it untouched
    pub fn capture<S: PageSizeSource>(service: &AuctionService<S>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            listings: service
                .listings()
                .map(|(index, listing)| StoredListing {
                    index,
                    listing: listing.clone(),
                })
                .collect(),
        }
    }

    /// Read a snapshot file
    pub fn read(path: &Path) -> StorageResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let header: Header = serde_json::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("Failed to load snapshot: {}", e))
        })?;
        if header.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion(header.version));
        }

        serde_json::from_str(&content).map_err(|e| {
            StorageError::Serialization(format!("Failed to load snapshot: {}", e))
        })
    }

    /// Write this snapshot, creating parent directories as needed.
    ///
    /// The previous file at `path` is only replaced once the new one is
    /// fully on disk.
    pub fn write(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp = temp_path(path);
        let result = self
            .write_file(&tmp)
            .and_then(|()| std::fs::rename(&tmp, path).map_err(StorageError::from));

        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn write_file(&self, path: &Path) -> StorageResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }

    /// Serialize into any writer and flush it
    pub fn write_to<W: Write>(&self, mut writer: W) -> StorageResult<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| {
            StorageError::Serialization(format!("Failed to persist snapshot: {}", e))
        })?;
        writer.flush()?;
        Ok(())
    }

    /// Write every listing to `path`, then clear the service.
    ///
    /// The service is only cleared once the file has been written.
    /// Returns the number of listings dumped.
    pub fn dump<S: PageSizeSource>(
        service: &mut AuctionService<S>,
        path: &Path,
    ) -> StorageResult<usize> {
        let snapshot = Self::capture(service);
        snapshot.write(path)?;

        service.clear();

        tracing::info!(
            listings = snapshot.listings.len(),
            path = %path.display(),
            "Dumped market snapshot"
        );
        Ok(snapshot.listings.len())
    }

    /// Replace the service contents with the listings stored at `path`.
    ///
    /// A missing file is treated as an empty market. Returns the number
    /// of listings restored.
    pub fn load<S: PageSizeSource>(
        path: &Path,
        service: &mut AuctionService<S>,
    ) -> StorageResult<usize> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(0);
        }

        let snapshot = Self::read(path)?;
        let count = snapshot.listings.len();

        service.restore(
            snapshot
                .listings
                .into_iter()
                .map(|stored| (stored.index, stored.listing))
                .collect(),
        )?;

        tracing::info!(listings = count, path = %path.display(), "Loaded market snapshot");
        Ok(count)
    }
}

/// `snapshot.json` → `snapshot.json.tmp`, in the same directory
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryOptions;
    use crate::settings::Settings;
    use crate::storage::types::{Category, ItemHandle, Trader};
    use std::io;
    use tempfile::tempdir;

    fn listing(price: u64, seller: &str, category: Category) -> Listing {
        Listing::new(
            ItemHandle::new("minecraft:iron_ingot", 16),
            price,
            Utc::now(),
            Trader::new(seller, "id"),
            category,
        )
    }

    /// Accepts nothing, like a full disk
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_dump_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("market").join("snapshot.json");

        let mut service = AuctionService::new(Settings::new());
        let a = listing(10, "bob", Category::Armor);
        let b = listing(20, "jeff", Category::Blocks);
        service.insert_listing(a.clone());
        service.insert_listing(b.clone());

        assert_eq!(Snapshot::dump(&mut service, &path).unwrap(), 2);
        assert!(service.is_empty());
        assert!(!temp_path(&path).exists());

        let mut restored = AuctionService::new(Settings::new());
        assert_eq!(Snapshot::load(&path, &mut restored).unwrap(), 2);

        let by_seller = restored.query_listing(Some(&QueryOptions::new().seller("jeff")));
        assert_eq!(by_seller, vec![&b]);

        let armor = restored.query_listing(Some(&QueryOptions::new().category(Category::Armor)));
        assert_eq!(armor, vec![&a]);
    }

    #[test]
    fn test_reload_keeps_store_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut service = AuctionService::new(Settings::new());
        let a = listing(1, "bob", Category::Tools);
        let b = listing(2, "bob", Category::Tools);
        service.insert_listing(a.clone());
        let b_index = service.insert_listing(b.clone());
        service.remove_listing(&a);

        Snapshot::dump(&mut service, &path).unwrap();
        Snapshot::load(&path, &mut service).unwrap();

        assert_eq!(b_index, 1);
        assert_eq!(service.get_listing(1), Some(&b));
        assert_eq!(service.get_listing(0), None);
        assert_eq!(service.seller_listings("bob", None), vec![1]);

        // The hole left by the removal is handed out again
        assert_eq!(service.insert_listing(listing(3, "eve", Category::Items)), 0);
    }

    #[test]
    fn test_flush_failure_is_reported() {
        let snapshot = Snapshot::capture(&{
            let mut service = AuctionService::new(Settings::new());
            service.insert_listing(listing(1, "bob", Category::Tools));
            service
        });

        let err = snapshot.write_to(BufWriter::new(FullDisk)).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_failed_dump_keeps_market() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by the snapshot file
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();

        let mut service = AuctionService::new(Settings::new());
        service.insert_listing(listing(1, "bob", Category::Tools));

        assert!(Snapshot::dump(&mut service, &path).is_err());
        assert_eq!(service.len(), 1);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut service = AuctionService::new(Settings::new());
        service.insert_listing(listing(1, "bob", Category::Tools));
        Snapshot::capture(&service).write(&path).unwrap();

        service.insert_listing(listing(2, "bob", Category::Tools));
        Snapshot::capture(&service).write(&path).unwrap();

        assert_eq!(Snapshot::read(&path).unwrap().listings.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let mut service = AuctionService::new(Settings::new());

        let count = Snapshot::load(&dir.path().join("absent.json"), &mut service).unwrap();
        assert_eq!(count, 0);
        assert!(service.is_empty());
    }

    #[test]
    fn test_malformed_file_is_rejected_whole() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let content = format!(
            r#"{{"version":{},"saved_at":"nope","listings":[]}}"#,
            SNAPSHOT_VERSION
        );
        std::fs::write(&path, content).unwrap();

        let mut service = AuctionService::new(Settings::new());
        let err = Snapshot::load(&path, &mut service).unwrap_err();

        assert!(matches!(err, StorageError::Serialization(_)));
        assert!(service.is_empty());
    }

    #[test]
    fn test_duplicate_index_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            listings: vec![
                StoredListing { index: 0, listing: listing(1, "bob", Category::Tools) },
                StoredListing { index: 0, listing: listing(2, "eve", Category::Tools) },
            ],
        };
        snapshot.write(&path).unwrap();

        let mut service = AuctionService::new(Settings::new());
        let err = Snapshot::load(&path, &mut service).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateIndex(0)));
        assert!(service.is_empty());
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, r#"{"version":1,"saved_at":"2024-05-01T12:00:00Z","listings":[]}"#)
            .unwrap();

        let mut service = AuctionService::new(Settings::new());
        let err = Snapshot::load(&path, &mut service).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion(1)));
        assert!(service.is_empty());
    }

    #[test]
    fn test_capture_leaves_service_untouched() {
        let mut service = AuctionService::new(Settings::new());
        service.insert_listing(listing(5, "bob", Category::Items));

        let snapshot = Snapshot::capture(&service);
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.listings.len(), 1);
        assert_eq!(snapshot.listings[0].index, 0);
        assert_eq!(service.len(), 1);
    }
}
