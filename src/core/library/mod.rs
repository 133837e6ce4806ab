//! # Library Module
//!
//! The operations a front end calls: create folders and albums (with an
//! optional import), read the whole hierarchy, group similar pictures,
//! plus picture and settings pass-throughs.

mod config;

pub use config::{default_database_path, LibraryConfig};

use crate::core::classifier::STANDARD_SUBFOLDERS;
use crate::core::comparator::group_similar;
use crate::core::hierarchy::{
    assemble, CurationStatus, HierarchyNode, NewNode, NewSubFolder, NodeKind, Picture, TreeNode,
};
use crate::core::import::{CancellationToken, ImportOrchestrator, ImportReport};
use crate::core::quality::SharpnessScorer;
use crate::core::store::{LibraryStore, PictureStore, Settings};
use crate::error::{HierarchyError, LibraryError, StoreError};
use crate::events::{null_sender, Event, EventSender, LibraryEvent};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Input to [`LibraryService::create_node`]
#[derive(Debug, Clone, Default)]
pub struct CreateNodeRequest {
    pub parent_id: Option<i64>,
    pub name: String,
    /// `"folder"` or `"album"`, any case
    pub kind: String,
    /// Extra subfolders, stored as given
    pub sub_folders: Vec<NewSubFolder>,
    /// Capture directory to import into a new album
    pub source_path: Option<PathBuf>,
}

impl CreateNodeRequest {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Folder.as_str())
    }

    pub fn album(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Album.as_str())
    }

    pub fn parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn sub_folder(mut self, name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        self.sub_folders.push(NewSubFolder {
            name: name.into(),
            location: location.into(),
        });
        self
    }
}

/// A created node and, for albums with a source, the import result
#[derive(Debug, Clone)]
pub struct CreateNodeOutcome {
    pub node: HierarchyNode,
    pub import: Option<ImportReport>,
}

/// Facade over a store, the importer and the pure algorithms
pub struct LibraryService {
    config: LibraryConfig,
    store: Arc<dyn LibraryStore>,
    importer: ImportOrchestrator,
}

impl LibraryService {
    pub fn new<S: LibraryStore + 'static>(store: Arc<S>, config: LibraryConfig) -> Self {
        let pictures: Arc<dyn PictureStore> = store.clone();
        let importer = ImportOrchestrator::builder(pictures)
            .algorithm(config.hash_algorithm)
            .scorer(SharpnessScorer::new(config.sharpness_max_width))
            .build();

        Self {
            config,
            store,
            importer,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Create a folder or album, importing `source_path` into a new album.
    pub fn create_node(&self, request: CreateNodeRequest) -> Result<HierarchyNode, LibraryError> {
        self.create_node_with_events(request, &null_sender(), &CancellationToken::new())
            .map(|outcome| outcome.node)
    }

    /// Create a node, reporting import progress through `events`.
    ///
    /// Invalid kinds and duplicate folder names are rejected before
    /// anything touches the disk or the store. Albums get a fresh UUID;
    /// with a non-empty source path they also get `RAWs` and `JPGs` under
    /// `<library_root>/<uuid>/` and the source is imported into them.
    /// Directories are created for album subfolders only.
    pub fn create_node_with_events(
        &self,
        request: CreateNodeRequest,
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> Result<CreateNodeOutcome, LibraryError> {
        let kind: NodeKind = request.kind.parse()?;

        if kind == NodeKind::Folder
            && self
                .store
                .find_duplicate(request.parent_id, &request.name, kind)?
        {
            return Err(HierarchyError::DuplicateName {
                name: request.name,
                parent_id: request.parent_id,
            }
            .into());
        }

        let uuid = (kind == NodeKind::Album).then(|| Uuid::now_v7().to_string());
        let source_path = request
            .source_path
            .filter(|path| !path.as_os_str().is_empty());
        let mut sub_folders = request.sub_folders;

        if let (Some(uuid), Some(_)) = (&uuid, &source_path) {
            let album_dir = self.config.album_dir(uuid);
            for name in STANDARD_SUBFOLDERS {
                if !sub_folders.iter().any(|sf| sf.name == name) {
                    sub_folders.push(NewSubFolder {
                        name: name.to_string(),
                        location: album_dir.join(name),
                    });
                }
            }
        }

        // Folder subfolders are catalogued only; albums own their directories
        for sub_folder in sub_folders.iter().filter(|_| kind == NodeKind::Album) {
            fs::create_dir_all(&sub_folder.location).map_err(|source| {
                HierarchyError::CreateDirectory {
                    path: sub_folder.location.clone(),
                    source,
                }
            })?;
        }

        let node = self.store.create_node(NewNode {
            parent_id: request.parent_id,
            name: request.name,
            kind,
            uuid,
            sub_folders,
        })?;

        tracing::info!(id = node.id, name = %node.name, kind = %node.kind, "Created node");
        events.send(Event::Library(match &node.uuid {
            Some(uuid) => LibraryEvent::AlbumCreated {
                id: node.id,
                name: node.name.clone(),
                uuid: uuid.clone(),
            },
            None => LibraryEvent::FolderCreated {
                id: node.id,
                name: node.name.clone(),
            },
        }));

        let import = match (&source_path, node.is_album()) {
            (Some(source), true) => {
                Some(self.importer.run_with_events(source, &node, events, cancel)?)
            }
            _ => None,
        };

        Ok(CreateNodeOutcome { node, import })
    }

    /// Every node assembled into a forest, siblings ordered by name
    pub fn get_full_hierarchy(&self) -> Result<Vec<TreeNode>, LibraryError> {
        let nodes = self.store.find_all_nodes()?;
        Ok(assemble(&nodes))
    }

    /// Greedy similarity groups over the pictures of one node, in picture id order
    pub fn group_similar_pictures(
        &self,
        hierarchy_id: i64,
        threshold: u32,
    ) -> Result<Vec<Vec<Picture>>, LibraryError> {
        let pictures = self.store.find_pictures_by_hierarchy(hierarchy_id)?;
        let groups = group_similar(&pictures, threshold);

        tracing::debug!(
            hierarchy_id,
            threshold,
            pictures = pictures.len(),
            groups = groups.len(),
            "Grouped similar pictures"
        );
        Ok(groups)
    }

    pub fn list_pictures(&self) -> Result<Vec<Picture>, LibraryError> {
        Ok(self.store.find_all_pictures()?)
    }

    pub fn find_picture(&self, id: i64) -> Result<Option<Picture>, LibraryError> {
        Ok(self.store.find_picture(id)?)
    }

    pub fn pictures_for_node(&self, hierarchy_id: i64) -> Result<Vec<Picture>, LibraryError> {
        Ok(self.store.find_pictures_by_hierarchy(hierarchy_id)?)
    }

    pub fn update_picture(&self, picture: &Picture) -> Result<(), LibraryError> {
        Ok(self.store.update_picture(picture)?)
    }

    /// Set a picture's curation status, returning the updated picture
    pub fn set_curation_status(
        &self,
        picture_id: i64,
        status: CurationStatus,
    ) -> Result<Picture, LibraryError> {
        let mut picture = self
            .store
            .find_picture(picture_id)?
            .ok_or(StoreError::NotFound {
                entity: "picture",
                id: picture_id,
            })?;

        picture.curation_status = status;
        self.store.update_picture(&picture)?;
        Ok(picture)
    }

    pub fn settings(&self) -> Result<Settings, LibraryError> {
        Ok(self.store.settings()?)
    }

    pub fn update_settings(&self, settings: &Settings) -> Result<(), LibraryError> {
        Ok(self.store.update_settings(settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::Fingerprint;
    use crate::core::store::{HierarchyStore, InMemoryStore};
    use crate::events::{EventChannel, ImportEvent};
    use tempfile::TempDir;

    fn service(root: &std::path::Path) -> (Arc<InMemoryStore>, LibraryService) {
        let store = Arc::new(InMemoryStore::new());
        let service = LibraryService::new(store.clone(), LibraryConfig::new(root));
        (store, service)
    }

    #[test]
    fn duplicate_folder_under_same_parent_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let p = service.create_node(CreateNodeRequest::folder("P")).unwrap();
        let q = service.create_node(CreateNodeRequest::folder("Q")).unwrap();

        service
            .create_node(CreateNodeRequest::folder("Trip").parent(p.id))
            .unwrap();

        let err = service
            .create_node(CreateNodeRequest::folder("Trip").parent(p.id))
            .unwrap_err();
        assert!(matches!(
            err,
            LibraryError::Hierarchy(HierarchyError::DuplicateName { ref name, parent_id: Some(id) })
                if name == "Trip" && id == p.id
        ));

        assert!(service
            .create_node(CreateNodeRequest::folder("Trip").parent(q.id))
            .is_ok());
    }

    #[test]
    fn root_folders_are_checked_against_each_other() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        service.create_node(CreateNodeRequest::folder("2024")).unwrap();
        assert!(service.create_node(CreateNodeRequest::folder("2024")).is_err());
    }

    #[test]
    fn albums_skip_the_duplicate_check() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let first = service.create_node(CreateNodeRequest::album("Alps")).unwrap();
        let second = service.create_node(CreateNodeRequest::album("Alps")).unwrap();

        assert_ne!(first.uuid, second.uuid);
        assert!(first.uuid.is_some());
    }

    #[test]
    fn invalid_kind_has_no_side_effects() {
        let dir = TempDir::new().unwrap();
        let (store, service) = service(dir.path());
        let extra = dir.path().join("extra");

        let err = service
            .create_node(CreateNodeRequest::new("Trip", "gallery").sub_folder("Extra", &extra))
            .unwrap_err();

        assert!(matches!(
            err,
            LibraryError::Hierarchy(HierarchyError::InvalidType { .. })
        ));
        assert!(!extra.exists());
        assert!(store.find_all_nodes().unwrap().is_empty());
    }

    #[test]
    fn kind_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let node = service.create_node(CreateNodeRequest::new("Alps", "ALBUM")).unwrap();
        assert_eq!(node.kind, NodeKind::Album);
    }

    #[test]
    fn folders_have_no_uuid() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let node = service.create_node(CreateNodeRequest::folder("Trips")).unwrap();
        assert!(node.uuid.is_none());
        assert!(node.sub_folders.is_empty());
    }

    #[test]
    fn album_with_source_gets_standard_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("library");
        let (_, service) = service(&root);
        let source = dir.path().join("missing-card");

        let (sender, receiver) = EventChannel::new();
        let outcome = service
            .create_node_with_events(
                CreateNodeRequest::album("Alps").source(&source),
                &sender,
                &CancellationToken::new(),
            )
            .unwrap();
        drop(sender);

        let uuid = outcome.node.uuid.clone().unwrap();
        let names: Vec<_> = outcome.node.sub_folders.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["RAWs", "JPGs"]);
        assert!(root.join(&uuid).join("RAWs").is_dir());
        assert!(root.join(&uuid).join("JPGs").is_dir());

        let report = outcome.import.unwrap();
        assert!(report.source_missing);
        assert_eq!(report.imported, 0);

        let events: Vec<_> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Library(LibraryEvent::AlbumCreated { .. }))
        ));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::Import(ImportEvent::Started { .. }))));
    }

    #[test]
    fn album_without_source_creates_no_standard_folders() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let outcome = service
            .create_node_with_events(
                CreateNodeRequest::album("Empty"),
                &null_sender(),
                &CancellationToken::new(),
            )
            .unwrap();

        assert!(outcome.node.sub_folders.is_empty());
        assert!(outcome.import.is_none());
    }

    #[test]
    fn empty_source_path_is_treated_as_absent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("library");
        let (_, service) = service(&root);

        let outcome = service
            .create_node_with_events(
                CreateNodeRequest::album("Alps").source(""),
                &null_sender(),
                &CancellationToken::new(),
            )
            .unwrap();

        let uuid = outcome.node.uuid.clone().unwrap();
        assert!(outcome.node.sub_folders.is_empty());
        assert!(outcome.import.is_none());
        assert!(!root.join(uuid).exists());
    }

    #[test]
    fn folder_sub_folders_are_stored_without_directories() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());
        let scans = dir.path().join("scans");

        let node = service
            .create_node(CreateNodeRequest::folder("Archive").sub_folder("Scans", &scans))
            .unwrap();

        assert_eq!(node.sub_folders.len(), 1);
        assert_eq!(node.sub_folders[0].location, scans);
        assert!(!scans.exists());
    }

    #[test]
    fn caller_sub_folders_are_kept_and_created() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());
        let edits = dir.path().join("edits");

        let node = service
            .create_node(CreateNodeRequest::album("Alps").sub_folder("Edits", &edits))
            .unwrap();

        assert_eq!(node.sub_folders.len(), 1);
        assert_eq!(node.sub_folders[0].location, edits);
        assert!(edits.is_dir());
    }

    #[test]
    fn full_hierarchy_nests_children() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let root = service.create_node(CreateNodeRequest::folder("Root")).unwrap();
        let year = service
            .create_node(CreateNodeRequest::folder("2024").parent(root.id))
            .unwrap();
        service
            .create_node(CreateNodeRequest::album("Alps").parent(year.id))
            .unwrap();

        let forest = service.get_full_hierarchy().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].count(), 3);
        assert_eq!(forest[0].children[0].children[0].node.name, "Alps");
    }

    #[test]
    fn grouping_uses_the_node_pictures() {
        use crate::core::classifier::PictureKind;
        use crate::core::hierarchy::NewPicture;
        use crate::core::store::PictureStore;

        let dir = TempDir::new().unwrap();
        let (store, service) = service(dir.path());
        let album = service
            .create_node(CreateNodeRequest::album("Alps").sub_folder("JPGs", dir.path().join("j")))
            .unwrap();
        let jpgs = album.sub_folders[0].id;

        for (i, fp) in [0u64, 1, 0xFFFFF].into_iter().enumerate() {
            store
                .create_picture(NewPicture {
                    index: format!("{:06}", i + 1),
                    file_name: format!("{:06}.JPG", i + 1),
                    extension: ".JPG".to_string(),
                    kind: PictureKind::Display,
                    location: dir.path().join("j").join(format!("{:06}.JPG", i + 1)),
                    curation_status: CurationStatus::default(),
                    sharpness: 1,
                    fingerprint: Fingerprint::new(fp),
                    sub_folder_id: jpgs,
                })
                .unwrap();
        }

        let groups = service.group_similar_pictures(album.id, 8).unwrap();
        let sizes: Vec<_> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(groups[1][0].fingerprint.value(), 0xFFFFF);

        assert!(service.group_similar_pictures(album.id + 99, 8).unwrap().is_empty());
    }

    #[test]
    fn curation_status_round_trips() {
        use crate::core::classifier::PictureKind;
        use crate::core::hierarchy::NewPicture;
        use crate::core::store::PictureStore;

        let dir = TempDir::new().unwrap();
        let (store, service) = service(dir.path());
        let album = service
            .create_node(CreateNodeRequest::album("Alps").sub_folder("RAWs", dir.path().join("r")))
            .unwrap();
        let stored = store
            .create_picture(NewPicture {
                index: "000001".to_string(),
                file_name: "000001.ARW".to_string(),
                extension: ".ARW".to_string(),
                kind: PictureKind::Raw,
                location: dir.path().join("r").join("000001.ARW"),
                curation_status: CurationStatus::default(),
                sharpness: 0,
                fingerprint: Fingerprint::NONE,
                sub_folder_id: album.sub_folders[0].id,
            })
            .unwrap();

        let picked = service
            .set_curation_status(stored.id, CurationStatus::Picked)
            .unwrap();
        assert_eq!(picked.curation_status, CurationStatus::Picked);
        assert_eq!(
            service.find_picture(stored.id).unwrap().unwrap().curation_status,
            CurationStatus::Picked
        );

        assert!(service.set_curation_status(9999, CurationStatus::Rejected).is_err());
    }

    #[test]
    fn settings_pass_through() {
        let dir = TempDir::new().unwrap();
        let (_, service) = service(dir.path());

        let mut settings = service.settings().unwrap();
        assert_eq!(settings.theme_mode, "system");

        settings.theme_mode = "dark".to_string();
        service.update_settings(&settings).unwrap();
        assert_eq!(service.settings().unwrap().theme_mode, "dark");
    }
}
