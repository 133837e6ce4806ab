//! # Hierarchy Module
//!
//! The folder/album tree of the library and the records hanging off it.
//!
//! - `types` - Nodes, subfolders and pictures as stored
//! - `assembler` - Turns the flat node list into a forest

mod assembler;
mod types;

pub use assembler::assemble;
pub use types::{
    CurationStatus, HierarchyNode, NewNode, NewPicture, NewSubFolder, NodeKind, Picture,
    SubFolder, TreeNode,
};
