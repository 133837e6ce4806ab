//! In-memory store backend for testing.

use super::{HierarchyStore, PictureStore, Settings, SettingsStore};
use crate::core::hierarchy::{HierarchyNode, NewNode, NewPicture, NodeKind, Picture, SubFolder};
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct MemoryState {
    // Nodes and subfolders are kept without their children attached.
    nodes: BTreeMap<i64, HierarchyNode>,
    sub_folders: BTreeMap<i64, SubFolder>,
    pictures: BTreeMap<i64, Picture>,
    settings: Option<Settings>,
    last_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn sub_folder_with_pictures(&self, sub_folder: &SubFolder) -> SubFolder {
        SubFolder {
            pictures: self
                .pictures
                .values()
                .filter(|p| p.sub_folder_id == sub_folder.id)
                .cloned()
                .collect(),
            ..sub_folder.clone()
        }
    }

    fn materialize(&self, node: &HierarchyNode) -> HierarchyNode {
        HierarchyNode {
            sub_folders: self
                .sub_folders
                .values()
                .filter(|sf| sf.hierarchy_id == node.id)
                .map(|sf| self.sub_folder_with_pictures(sf))
                .collect(),
            ..node.clone()
        }
    }
}

/// In-memory store backend
///
/// Ids come from a single counter shared by every record type.
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned {
            path: PathBuf::from("memory"),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state.write().map_err(|_| StoreError::Poisoned {
            path: PathBuf::from("memory"),
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyStore for InMemoryStore {
    fn create_node(&self, node: NewNode) -> Result<HierarchyNode, StoreError> {
        let mut state = self.write()?;

        let id = state.next_id();
        let stored = HierarchyNode {
            id,
            parent_id: node.parent_id,
            name: node.name,
            kind: node.kind,
            uuid: node.uuid,
            sub_folders: Vec::new(),
        };
        state.nodes.insert(id, stored);

        for sub_folder in node.sub_folders {
            let sub_folder_id = state.next_id();
            state.sub_folders.insert(
                sub_folder_id,
                SubFolder {
                    id: sub_folder_id,
                    name: sub_folder.name,
                    location: sub_folder.location,
                    hierarchy_id: id,
                    pictures: Vec::new(),
                },
            );
        }

        let created = state.materialize(&state.nodes[&id]);
        Ok(created)
    }

    fn find_all_nodes(&self) -> Result<Vec<HierarchyNode>, StoreError> {
        let state = self.read()?;

        let mut nodes: Vec<HierarchyNode> =
            state.nodes.values().map(|n| state.materialize(n)).collect();
        nodes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(nodes)
    }

    fn find_duplicate(
        &self,
        parent_id: Option<i64>,
        name: &str,
        kind: NodeKind,
    ) -> Result<bool, StoreError> {
        let state = self.read()?;

        Ok(state
            .nodes
            .values()
            .any(|n| n.parent_id == parent_id && n.name == name && n.kind == kind))
    }
}

impl PictureStore for InMemoryStore {
    fn create_picture(&self, picture: NewPicture) -> Result<Picture, StoreError> {
        let mut state = self.write()?;

        if !state.sub_folders.contains_key(&picture.sub_folder_id) {
            return Err(StoreError::NotFound {
                entity: "sub folder",
                id: picture.sub_folder_id,
            });
        }

        let id = state.next_id();
        let stored = picture.with_id(id);
        state.pictures.insert(id, stored.clone());

        Ok(stored)
    }

    fn find_all_pictures(&self) -> Result<Vec<Picture>, StoreError> {
        let state = self.read()?;
        Ok(state.pictures.values().cloned().collect())
    }

    fn find_picture(&self, id: i64) -> Result<Option<Picture>, StoreError> {
        let state = self.read()?;
        Ok(state.pictures.get(&id).cloned())
    }

    fn find_pictures_by_hierarchy(&self, hierarchy_id: i64) -> Result<Vec<Picture>, StoreError> {
        let state = self.read()?;

        Ok(state
            .pictures
            .values()
            .filter(|p| {
                state
                    .sub_folders
                    .get(&p.sub_folder_id)
                    .is_some_and(|sf| sf.hierarchy_id == hierarchy_id)
            })
            .cloned()
            .collect())
    }

    fn update_picture(&self, picture: &Picture) -> Result<(), StoreError> {
        let mut state = self.write()?;

        match state.pictures.get_mut(&picture.id) {
            Some(stored) => {
                *stored = picture.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "picture",
                id: picture.id,
            }),
        }
    }
}

impl SettingsStore for InMemoryStore {
    fn settings(&self) -> Result<Settings, StoreError> {
        let mut state = self.write()?;
        Ok(state.settings.get_or_insert_with(Settings::default).clone())
    }

    fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.settings = Some(settings.clone());
        Ok(())
    }
}
