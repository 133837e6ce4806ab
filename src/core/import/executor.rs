//! Import execution implementation.

use super::{CancellationToken, ImportReport, ImportWarning};
use crate::core::classifier::{classify, PictureKind};
use crate::core::hasher::{
    FastDecoder, Fingerprint, HashAlgorithm, HashAlgorithmKind, HasherConfig, ImageDecoder,
};
use crate::core::hierarchy::{CurationStatus, HierarchyNode, NewPicture};
use crate::core::quality::SharpnessScorer;
use crate::core::scanner::{group_captures, DirectoryLister, FsLister, SourceFile};
use crate::core::store::PictureStore;
use crate::error::{ImportError, ProcessingError};
use crate::events::{
    null_sender, Event, EventSender, ImportEvent, ImportProgress, ImportSummary,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Builder for the import orchestrator
pub struct ImportOrchestratorBuilder {
    store: Arc<dyn PictureStore>,
    lister: Option<Box<dyn DirectoryLister>>,
    decoder: Option<Box<dyn ImageDecoder>>,
    hasher: Option<Box<dyn HashAlgorithm>>,
    algorithm: HashAlgorithmKind,
    scorer: SharpnessScorer,
}

impl ImportOrchestratorBuilder {
    /// Start a builder that stores pictures in `store`
    pub fn new(store: Arc<dyn PictureStore>) -> Self {
        Self {
            store,
            lister: None,
            decoder: None,
            hasher: None,
            algorithm: HashAlgorithmKind::default(),
            scorer: SharpnessScorer::default(),
        }
    }

    /// Set the directory lister (defaults to the filesystem)
    pub fn lister(mut self, lister: Box<dyn DirectoryLister>) -> Self {
        self.lister = Some(lister);
        self
    }

    /// Set the image decoder (defaults to [`FastDecoder`])
    pub fn decoder(mut self, decoder: Box<dyn ImageDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Set the hash algorithm used when no hasher is given
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Use a specific hasher, overriding `algorithm`
    pub fn hasher(mut self, hasher: Box<dyn HashAlgorithm>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn scorer(mut self, scorer: SharpnessScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn build(self) -> ImportOrchestrator {
        ImportOrchestrator {
            store: self.store,
            lister: self
                .lister
                .unwrap_or_else(|| Box::new(FsLister::default())),
            decoder: self.decoder.unwrap_or_else(|| Box::new(FastDecoder)),
            hasher: self
                .hasher
                .unwrap_or_else(|| HasherConfig::new().algorithm(self.algorithm).build()),
            scorer: self.scorer,
        }
    }
}

/// Imports capture batches into albums
///
/// Holds no per-import state, so one orchestrator can serve many albums.
pub struct ImportOrchestrator {
    store: Arc<dyn PictureStore>,
    lister: Box<dyn DirectoryLister>,
    decoder: Box<dyn ImageDecoder>,
    hasher: Box<dyn HashAlgorithm>,
    scorer: SharpnessScorer,
}

impl ImportOrchestrator {
    pub fn builder(store: Arc<dyn PictureStore>) -> ImportOrchestratorBuilder {
        ImportOrchestratorBuilder::new(store)
    }

    /// Run an import without events or cancellation
    pub fn run(&self, source: &Path, album: &HierarchyNode) -> Result<ImportReport, ImportError> {
        self.run_with_events(source, album, &null_sender(), &CancellationToken::new())
    }

    /// Run an import, reporting progress and checking `cancel` before each file.
    ///
    /// A missing source directory imports nothing and is not an error.
    /// Copy and store failures return immediately; pictures stored
    /// before the failure remain.
    pub fn run_with_events(
        &self,
        source: &Path,
        album: &HierarchyNode,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<ImportReport, ImportError> {
        let start = Instant::now();

        if !source.is_dir() {
            tracing::warn!(
                source = %source.display(),
                album = album.id,
                "Import source does not exist; nothing imported"
            );
            return Ok(ImportReport::source_missing());
        }

        tracing::info!(source = %source.display(), album = album.id, "Starting import");
        events.send(Event::Import(ImportEvent::Started {
            source: source.to_path_buf(),
            album_id: album.id,
        }));

        let files = self.lister.list(source)?;
        let total = files.len();
        let groups = group_captures(files);

        tracing::debug!(groups = groups.len(), files = total, "Grouped captures");
        events.send(Event::Import(ImportEvent::GroupsFound {
            groups: groups.len(),
            files: total,
        }));

        let mut report = ImportReport::default();
        let mut completed = 0;

        'captures: for group in &groups {
            for file in &group.files {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'captures;
                }

                completed += 1;
                events.send(Event::Import(ImportEvent::Progress(ImportProgress {
                    completed,
                    total,
                    current_path: file.path.clone(),
                })));

                self.import_file(&group.sequence, file, album, events, &mut report)?;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        if report.cancelled {
            tracing::info!(imported = report.imported, "Import cancelled");
            events.send(Event::Import(ImportEvent::Cancelled {
                imported: report.imported,
            }));
        } else {
            tracing::info!(
                imported = report.imported,
                skipped = report.skipped,
                warnings = report.warnings.len(),
                duration_ms = report.duration_ms,
                "Import complete"
            );
            events.send(Event::Import(ImportEvent::Completed(ImportSummary {
                imported: report.imported,
                skipped: report.skipped,
                warnings: report.warnings.len(),
                duration_ms: report.duration_ms,
            })));
        }

        Ok(report)
    }

    fn import_file(
        &self,
        sequence: &str,
        file: &SourceFile,
        album: &HierarchyNode,
        events: &EventSender,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let classification = classify(&file.extension);

        let Some(sub_folder) = classification
            .destination
            .and_then(|name| album.sub_folder(name))
        else {
            tracing::debug!(path = %file.path.display(), "No destination, skipping");
            report.skipped += 1;
            events.send(Event::Import(ImportEvent::FileSkipped {
                path: file.path.clone(),
            }));
            return Ok(());
        };

        let file_name = format!("{}{}", sequence, file.extension);
        let destination = sub_folder.location.join(&file_name);

        // Overwrites whatever is already at the destination.
        fs::copy(&file.path, &destination).map_err(|source| ImportError::Copy {
            from: file.path.clone(),
            to: destination.clone(),
            source,
        })?;

        let (fingerprint, sharpness) = if classification.kind == PictureKind::Display {
            match self.analyze(&destination) {
                Ok(measured) => measured,
                Err(e) => {
                    tracing::warn!(path = %destination.display(), error = %e, "Could not analyze picture");
                    self.warn(&destination, e.to_string(), events, report);
                    (Fingerprint::NONE, 0)
                }
            }
        } else {
            (Fingerprint::NONE, 0)
        };

        let picture = NewPicture {
            index: sequence.to_string(),
            file_name,
            extension: file.extension.clone(),
            kind: classification.kind,
            location: destination.clone(),
            curation_status: CurationStatus::default(),
            sharpness,
            fingerprint,
            sub_folder_id: sub_folder.id,
        };

        self.store
            .create_picture(picture)
            .map_err(|source| ImportError::Persist {
                file: file.path.clone(),
                source,
            })?;

        report.imported += 1;
        tracing::debug!(
            sequence,
            destination = %destination.display(),
            fingerprint = %fingerprint,
            sharpness,
            "Imported picture"
        );
        events.send(Event::Import(ImportEvent::PictureImported {
            sequence: sequence.to_string(),
            destination,
        }));

        Ok(())
    }

    /// Decode once, then fingerprint the color image and score its luma
    fn analyze(&self, path: &Path) -> Result<(Fingerprint, u32), ProcessingError> {
        let image = self.decoder.decode(path)?;
        let fingerprint = self.hasher.hash_image(&image)?;
        let sharpness = self.scorer.score_image(&image)?;
        Ok((fingerprint, sharpness))
    }

    fn warn(&self, file: &Path, message: String, events: &EventSender, report: &mut ImportReport) {
        events.send(Event::Import(ImportEvent::Warning {
            path: file.to_path_buf(),
            message: message.clone(),
        }));
        report.warnings.push(ImportWarning {
            file: file.to_path_buf(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::{NewNode, NewSubFolder, NodeKind, Picture};
    use crate::core::store::{HierarchyStore, InMemoryStore};
    use crate::error::StoreError;
    use crate::events::EventChannel;
    use image::{ImageFormat, RgbImage};
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        source: PathBuf,
        store: Arc<InMemoryStore>,
        album: HierarchyNode,
    }

    fn fixture(folders: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("card");
        fs::create_dir_all(&source).unwrap();

        let album_root = dir.path().join("library").join("album");
        let sub_folders = folders
            .iter()
            .map(|name| {
                let location = album_root.join(name);
                fs::create_dir_all(&location).unwrap();
                NewSubFolder {
                    name: name.to_string(),
                    location,
                }
            })
            .collect();

        let store = Arc::new(InMemoryStore::new());
        let album = store
            .create_node(NewNode {
                parent_id: None,
                name: "Alps".to_string(),
                kind: NodeKind::Album,
                uuid: Some("album-uuid".to_string()),
                sub_folders,
            })
            .unwrap();

        Fixture {
            _dir: dir,
            source,
            store,
            album,
        }
    }

    fn write_jpeg(path: &Path) {
        let image = RgbImage::from_fn(96, 64, |x, y| {
            image::Rgb([(x * 2) as u8, (y * 3) as u8, ((x + y) % 256) as u8])
        });
        image.save_with_format(path, ImageFormat::Jpeg).unwrap();
    }

    fn set_modified(path: &Path, secs: u64) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn orchestrator(store: Arc<dyn PictureStore>) -> ImportOrchestrator {
        ImportOrchestrator::builder(store).build()
    }

    fn picture_named(pictures: &[Picture], name: &str) -> Picture {
        pictures
            .iter()
            .find(|p| p.file_name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no picture named {}", name))
    }

    #[test]
    fn raw_and_jpeg_siblings_share_a_sequence() {
        let fx = fixture(&["RAWs", "JPGs"]);
        fs::write(fx.source.join("IMG001.ARW"), b"raw sensor data").unwrap();
        write_jpeg(&fx.source.join("IMG001.JPG"));

        let report = orchestrator(fx.store.clone())
            .run(&fx.source, &fx.album)
            .unwrap();

        assert_eq!(report.imported, 2);
        assert!(report.warnings.is_empty());

        let pictures = fx.store.find_all_pictures().unwrap();
        let jpeg = picture_named(&pictures, "000001.JPG");
        let raw = picture_named(&pictures, "000001.ARW");

        assert_eq!(jpeg.index, "000001");
        assert_eq!(jpeg.kind, PictureKind::Display);
        assert_eq!(jpeg.sub_folder_id, fx.album.sub_folder("JPGs").unwrap().id);
        assert!(jpeg.sharpness > 0);
        assert!(jpeg.location.exists());

        assert_eq!(raw.index, "000001");
        assert_eq!(raw.kind, PictureKind::Raw);
        assert_eq!(raw.fingerprint, Fingerprint::NONE);
        assert_eq!(raw.sharpness, 0);
        assert_eq!(fs::read(&raw.location).unwrap(), b"raw sensor data");
    }

    #[test]
    fn captures_are_numbered_by_modification_time() {
        let fx = fixture(&["RAWs"]);
        for (name, secs) in [("B.ARW", 100), ("A.ARW", 300), ("C.ARW", 200)] {
            let path = fx.source.join(name);
            fs::write(&path, name).unwrap();
            set_modified(&path, secs);
        }

        orchestrator(fx.store.clone())
            .run(&fx.source, &fx.album)
            .unwrap();

        let raws = fx.album.sub_folder("RAWs").unwrap().location.clone();
        assert_eq!(fs::read_to_string(raws.join("000001.ARW")).unwrap(), "B.ARW");
        assert_eq!(fs::read_to_string(raws.join("000002.ARW")).unwrap(), "C.ARW");
        assert_eq!(fs::read_to_string(raws.join("000003.ARW")).unwrap(), "A.ARW");
    }

    #[test]
    fn missing_source_imports_nothing() {
        let fx = fixture(&["RAWs", "JPGs"]);
        let report = orchestrator(fx.store.clone())
            .run(&fx.source.join("nope"), &fx.album)
            .unwrap();

        assert!(report.source_missing);
        assert_eq!(report.imported, 0);
        assert!(fx.store.find_all_pictures().unwrap().is_empty());
    }

    #[test]
    fn unmapped_files_are_skipped() {
        let fx = fixture(&["JPGs"]);
        fs::write(fx.source.join("notes.txt"), "hello").unwrap();
        fs::write(fx.source.join("IMG002.CR2"), "raw").unwrap();

        let report = orchestrator(fx.store.clone())
            .run(&fx.source, &fx.album)
            .unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 2);
        assert!(fx.store.find_all_pictures().unwrap().is_empty());
    }

    #[test]
    fn undecodable_jpeg_is_stored_with_a_warning() {
        let fx = fixture(&["JPGs"]);
        fs::write(fx.source.join("BROKEN.JPG"), b"not really a jpeg").unwrap();

        let report = orchestrator(fx.store.clone())
            .run(&fx.source, &fx.album)
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].file.ends_with("000001.JPG"));

        let stored = &fx.store.find_all_pictures().unwrap()[0];
        assert_eq!(stored.fingerprint, Fingerprint::NONE);
        assert_eq!(stored.sharpness, 0);
    }

    /// Accepts a fixed number of pictures, then fails every write
    struct FlakyStore {
        inner: InMemoryStore,
        accept: usize,
    }

    impl PictureStore for FlakyStore {
        fn create_picture(&self, picture: NewPicture) -> Result<Picture, StoreError> {
            if self.inner.find_all_pictures()?.len() >= self.accept {
                return Err(StoreError::QueryFailed("disk full".to_string()));
            }
            self.inner.create_picture(picture)
        }

        fn find_all_pictures(&self) -> Result<Vec<Picture>, StoreError> {
            self.inner.find_all_pictures()
        }

        fn find_picture(&self, id: i64) -> Result<Option<Picture>, StoreError> {
            self.inner.find_picture(id)
        }

        fn find_pictures_by_hierarchy(&self, id: i64) -> Result<Vec<Picture>, StoreError> {
            self.inner.find_pictures_by_hierarchy(id)
        }

        fn update_picture(&self, picture: &Picture) -> Result<(), StoreError> {
            self.inner.update_picture(picture)
        }
    }

    #[test]
    fn store_failure_halts_remaining_files() {
        let inner = InMemoryStore::new();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("card");
        let raws = dir.path().join("RAWs");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&raws).unwrap();

        let album = inner
            .create_node(NewNode {
                parent_id: None,
                name: "Alps".to_string(),
                kind: NodeKind::Album,
                uuid: None,
                sub_folders: vec![NewSubFolder {
                    name: "RAWs".to_string(),
                    location: raws.clone(),
                }],
            })
            .unwrap();

        for (name, secs) in [("A.ARW", 1), ("B.ARW", 2), ("C.ARW", 3)] {
            let path = source.join(name);
            fs::write(&path, name).unwrap();
            set_modified(&path, secs);
        }

        let store = Arc::new(FlakyStore { inner, accept: 1 });
        let result = orchestrator(store.clone()).run(&source, &album);

        match result {
            Err(ImportError::Persist { file, .. }) => assert!(file.ends_with("B.ARW")),
            other => panic!("expected persist failure, got {:?}", other),
        }
        assert_eq!(store.find_all_pictures().unwrap().len(), 1);
        assert!(raws.join("000002.ARW").exists());
        assert!(!raws.join("000003.ARW").exists());
    }

    #[test]
    fn cancelled_before_start_imports_nothing() {
        let fx = fixture(&["RAWs"]);
        fs::write(fx.source.join("A.ARW"), "a").unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = orchestrator(fx.store.clone())
            .run_with_events(&fx.source, &fx.album, &null_sender(), &cancel)
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.imported, 0);
    }

    /// Requests cancellation as soon as the first picture is stored
    struct CancelAfterFirstWrite {
        inner: Arc<InMemoryStore>,
        cancel: CancellationToken,
    }

    impl PictureStore for CancelAfterFirstWrite {
        fn create_picture(&self, picture: NewPicture) -> Result<Picture, StoreError> {
            let stored = self.inner.create_picture(picture)?;
            self.cancel.cancel();
            Ok(stored)
        }

        fn find_all_pictures(&self) -> Result<Vec<Picture>, StoreError> {
            self.inner.find_all_pictures()
        }

        fn find_picture(&self, id: i64) -> Result<Option<Picture>, StoreError> {
            self.inner.find_picture(id)
        }

        fn find_pictures_by_hierarchy(&self, id: i64) -> Result<Vec<Picture>, StoreError> {
            self.inner.find_pictures_by_hierarchy(id)
        }

        fn update_picture(&self, picture: &Picture) -> Result<(), StoreError> {
            self.inner.update_picture(picture)
        }
    }

    #[test]
    fn cancelling_mid_batch_keeps_earlier_pictures() {
        let fx = fixture(&["RAWs"]);
        for (name, secs) in [("A.ARW", 1), ("B.ARW", 2), ("C.ARW", 3)] {
            let path = fx.source.join(name);
            fs::write(&path, name).unwrap();
            set_modified(&path, secs);
        }

        let cancel = CancellationToken::new();
        let store = Arc::new(CancelAfterFirstWrite {
            inner: fx.store.clone(),
            cancel: cancel.clone(),
        });

        let (sender, receiver) = EventChannel::new();
        let report = orchestrator(store)
            .run_with_events(&fx.source, &fx.album, &sender, &cancel)
            .unwrap();
        drop(sender);

        assert!(report.cancelled);
        assert_eq!(report.imported, 1);

        let raws = fx.album.sub_folder("RAWs").unwrap().location.clone();
        assert_eq!(fs::read_to_string(raws.join("000001.ARW")).unwrap(), "A.ARW");
        assert!(!raws.join("000002.ARW").exists());
        assert!(!raws.join("000003.ARW").exists());

        let stored = fx.store.find_all_pictures().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].file_name, "000001.ARW");

        match receiver.iter().last() {
            Some(Event::Import(ImportEvent::Cancelled { imported })) => assert_eq!(imported, 1),
            other => panic!("expected Cancelled, got {:?}", other),
        }
    }

    #[test]
    fn events_bracket_the_import() {
        let fx = fixture(&["RAWs", "JPGs"]);
        fs::write(fx.source.join("IMG001.ARW"), "raw").unwrap();

        let (sender, receiver) = EventChannel::new();
        orchestrator(fx.store.clone())
            .run_with_events(&fx.source, &fx.album, &sender, &CancellationToken::new())
            .unwrap();
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Import(ImportEvent::Started { .. }))
        ));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Import(ImportEvent::PictureImported { .. }))));
        match events.last() {
            Some(Event::Import(ImportEvent::Completed(summary))) => assert_eq!(summary.imported, 1),
            other => panic!("expected Completed, got {:?}", other),
        }
    }
}
