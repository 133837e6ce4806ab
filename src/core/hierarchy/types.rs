//! Library data model: hierarchy nodes, subfolders and pictures.
//!
//! Records are flat and fully materialized. Parents are referenced by
//! id only; children exist solely in the assembled [`TreeNode`] view.

use crate::core::classifier::PictureKind;
use crate::core::hasher::Fingerprint;
use crate::error::HierarchyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of hierarchy node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Organizational grouping, name-unique among siblings
    Folder,
    /// Import destination identified by a generated UUID
    Album,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Album => "album",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = HierarchyError;

    /// Case-insensitive: `"Album"`, `"album"` and `"ALBUM"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "album" => Ok(Self::Album),
            _ => Err(HierarchyError::InvalidType {
                value: s.to_string(),
            }),
        }
    }
}

/// Culling decision for a picture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CurationStatus {
    #[default]
    Unflagged,
    Picked,
    Rejected,
}

impl CurationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unflagged => "unflagged",
            Self::Picked => "picked",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for CurationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unflagged" => Ok(Self::Unflagged),
            "picked" => Ok(Self::Picked),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown curation status: {}", other)),
        }
    }
}

/// A stored picture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
    /// Sequence string shared by the sibling files of one capture
    pub index: String,
    pub file_name: String,
    /// Original extension including the dot
    pub extension: String,
    pub kind: PictureKind,
    pub location: PathBuf,
    pub curation_status: CurationStatus,
    /// Sobel focus score; 0 for RAW/unknown files and failed decodes
    pub sharpness: u32,
    /// Perceptual fingerprint; 0 when not computed
    pub fingerprint: Fingerprint,
    pub sub_folder_id: i64,
}

/// A picture that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPicture {
    pub index: String,
    pub file_name: String,
    pub extension: String,
    pub kind: PictureKind,
    pub location: PathBuf,
    pub curation_status: CurationStatus,
    pub sharpness: u32,
    pub fingerprint: Fingerprint,
    pub sub_folder_id: i64,
}

impl NewPicture {
    /// Attach the id assigned by a store
    pub fn with_id(self, id: i64) -> Picture {
        Picture {
            id,
            index: self.index,
            file_name: self.file_name,
            extension: self.extension,
            kind: self.kind,
            location: self.location,
            curation_status: self.curation_status,
            sharpness: self.sharpness,
            fingerprint: self.fingerprint,
            sub_folder_id: self.sub_folder_id,
        }
    }
}

/// A directory owned by an album (e.g. `RAWs`, `JPGs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFolder {
    pub id: i64,
    pub name: String,
    pub location: PathBuf,
    pub hierarchy_id: i64,
    pub pictures: Vec<Picture>,
}

/// A subfolder that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubFolder {
    pub name: String,
    pub location: PathBuf,
}

/// A flat hierarchy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: NodeKind,
    /// Albums only
    pub uuid: Option<String>,
    pub sub_folders: Vec<SubFolder>,
}

impl HierarchyNode {
    pub fn is_album(&self) -> bool {
        self.kind == NodeKind::Album
    }

    /// Look up an owned subfolder by name
    pub fn sub_folder(&self, name: &str) -> Option<&SubFolder> {
        self.sub_folders.iter().find(|sf| sf.name == name)
    }
}

/// A hierarchy node that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: NodeKind,
    pub uuid: Option<String>,
    pub sub_folders: Vec<NewSubFolder>,
}

/// A node together with its assembled children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: HierarchyNode,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Depth-first search by node id
    pub fn find(&self, id: i64) -> Option<&TreeNode> {
        if self.node.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_parses_case_insensitively() {
        assert_eq!("Album".parse::<NodeKind>().unwrap(), NodeKind::Album);
        assert_eq!("FOLDER".parse::<NodeKind>().unwrap(), NodeKind::Folder);
        assert_eq!(" folder ".parse::<NodeKind>().unwrap(), NodeKind::Folder);
    }

    #[test]
    fn unknown_node_kind_is_invalid_type() {
        let err = "gallery".parse::<NodeKind>().unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidType { ref value } if value == "gallery"));
    }

    #[test]
    fn curation_status_defaults_to_unflagged() {
        assert_eq!(CurationStatus::default(), CurationStatus::Unflagged);
        assert_eq!("Picked".parse::<CurationStatus>().unwrap(), CurationStatus::Picked);
    }

    #[test]
    fn tree_serializes_parent_as_id_only() {
        let tree = TreeNode {
            node: HierarchyNode {
                id: 2,
                parent_id: Some(1),
                name: "Trip".to_string(),
                kind: NodeKind::Folder,
                uuid: None,
                sub_folders: Vec::new(),
            },
            children: Vec::new(),
        };

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["parent_id"], 1);
        assert_eq!(json["kind"], "folder");
        assert!(json["children"].as_array().unwrap().is_empty());
    }
}
