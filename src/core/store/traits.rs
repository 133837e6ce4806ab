//! Store trait definitions.

use super::Settings;
use crate::core::hierarchy::{HierarchyNode, NewNode, NewPicture, NodeKind, Picture};
use crate::error::StoreError;

/// Persistence for hierarchy nodes and their subfolders
pub trait HierarchyStore: Send + Sync {
    /// Store a node and its subfolders, returning them with assigned ids
    fn create_node(&self, node: NewNode) -> Result<HierarchyNode, StoreError>;

    /// Every node with subfolders and pictures attached, ordered by name then id
    fn find_all_nodes(&self) -> Result<Vec<HierarchyNode>, StoreError>;

    /// Whether a node with this parent, name and kind already exists.
    ///
    /// `None` matches only other root nodes.
    fn find_duplicate(
        &self,
        parent_id: Option<i64>,
        name: &str,
        kind: NodeKind,
    ) -> Result<bool, StoreError>;
}

/// Persistence for imported pictures
pub trait PictureStore: Send + Sync {
    /// Store a picture, returning it with its assigned id
    fn create_picture(&self, picture: NewPicture) -> Result<Picture, StoreError>;

    /// Every picture, ordered by id
    fn find_all_pictures(&self) -> Result<Vec<Picture>, StoreError>;

    fn find_picture(&self, id: i64) -> Result<Option<Picture>, StoreError>;

    /// Pictures in any subfolder of the given node, ordered by id
    fn find_pictures_by_hierarchy(&self, hierarchy_id: i64) -> Result<Vec<Picture>, StoreError>;

    /// Overwrite a stored picture. Fails with `NotFound` for unknown ids.
    fn update_picture(&self, picture: &Picture) -> Result<(), StoreError>;
}

/// Persistence for the singleton settings record
pub trait SettingsStore: Send + Sync {
    /// Current settings; defaults are created on first access
    fn settings(&self) -> Result<Settings, StoreError>;

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// Everything the library service needs from one backend
pub trait LibraryStore: HierarchyStore + PictureStore + SettingsStore {}

impl<T: HierarchyStore + PictureStore + SettingsStore> LibraryStore for T {}
