//! Four-level product taxonomy: Segment > Family > Class > Brick.
//!
//! The taxonomy is imported offline and read-only at runtime. Bricks are
//! addressed externally by their `code` and internally by `id`; this module
//! holds the path/tree shapes returned to filtering UIs and the pure logic
//! that assembles them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Separator used when rendering a brick's full path.
pub const PATH_SEPARATOR: &str = " > ";

/// Tree level numbers as exposed to clients.
pub const LEVEL_SEGMENT: u8 = 1;
pub const LEVEL_FAMILY: u8 = 2;
pub const LEVEL_CLASS: u8 = 3;

/// Maximum accepted length of a category code in lookups.
const MAX_CODE_LEN: usize = 32;

/// One node of the taxonomy at any level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

/// The full ancestor chain of a brick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPath {
    pub segment: CategoryNode,
    pub family: CategoryNode,
    pub class: CategoryNode,
    pub brick: CategoryNode,
}

impl CategoryPath {
    /// Render the names root to leaf, e.g. `Food > Dairy > Milk > Fresh Milk`.
    pub fn full_path(&self) -> String {
        [
            self.segment.name.as_str(),
            self.family.name.as_str(),
            self.class.name.as_str(),
            self.brick.name.as_str(),
        ]
        .join(PATH_SEPARATOR)
    }
}

/// A node of the nested filter tree (segments, families and classes).
///
/// Children are keyed by id so that inserting the same path twice, or in any
/// order, produces an identical tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DbId>,
    pub children: BTreeMap<DbId, TreeNode>,
}

impl TreeNode {
    fn new(node: &CategoryNode, level: u8, parent_id: Option<DbId>) -> Self {
        Self {
            id: node.id,
            code: node.code.clone(),
            name: node.name.clone(),
            level,
            parent_id,
            children: BTreeMap::new(),
        }
    }
}

/// Segment-keyed filter tree.
pub type CategoryTree = BTreeMap<DbId, TreeNode>;

/// Build the segment > family > class tree from brick paths.
pub fn build_tree<'a>(paths: impl IntoIterator<Item = &'a CategoryPath>) -> CategoryTree {
    let mut tree = CategoryTree::new();

    for path in paths {
        let segment = tree
            .entry(path.segment.id)
            .or_insert_with(|| TreeNode::new(&path.segment, LEVEL_SEGMENT, None));

        let family = segment
            .children
            .entry(path.family.id)
            .or_insert_with(|| TreeNode::new(&path.family, LEVEL_FAMILY, Some(path.segment.id)));

        family
            .children
            .entry(path.class.id)
            .or_insert_with(|| TreeNode::new(&path.class, LEVEL_CLASS, Some(path.family.id)));
    }

    tree
}

/// Normalise and validate a brick code supplied by a client.
pub fn normalize_code(code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("code is required".into()));
    }
    if trimmed.len() > MAX_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "code must be at most {MAX_CODE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: DbId, code: &str, name: &str) -> CategoryNode {
        CategoryNode {
            id,
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn path(seg: DbId, fam: DbId, cls: DbId, brick: DbId) -> CategoryPath {
        CategoryPath {
            segment: node(seg, &format!("S{seg}"), &format!("Segment {seg}")),
            family: node(fam, &format!("F{fam}"), &format!("Family {fam}")),
            class: node(cls, &format!("C{cls}"), &format!("Class {cls}")),
            brick: node(brick, &format!("B{brick}"), &format!("Brick {brick}")),
        }
    }

    #[test]
    fn full_path_joins_names_root_to_leaf() {
        let p = path(1, 2, 3, 4);
        assert_eq!(p.full_path(), "Segment 1 > Family 2 > Class 3 > Brick 4");
    }

    #[test]
    fn tree_groups_shared_ancestors() {
        let paths = vec![path(1, 10, 100, 1000), path(1, 10, 100, 1001), path(1, 11, 110, 1100)];
        let tree = build_tree(&paths);

        assert_eq!(tree.len(), 1);
        let segment = &tree[&1];
        assert_eq!(segment.level, LEVEL_SEGMENT);
        assert_eq!(segment.parent_id, None);
        assert_eq!(segment.children.len(), 2);

        let family = &segment.children[&10];
        assert_eq!(family.parent_id, Some(1));
        assert_eq!(family.children.len(), 1);

        let class = &family.children[&100];
        assert_eq!(class.level, LEVEL_CLASS);
        assert_eq!(class.parent_id, Some(10));
        assert!(class.children.is_empty());
    }

    #[test]
    fn tree_is_order_independent_and_idempotent() {
        let a = vec![path(1, 10, 100, 1000), path(2, 20, 200, 2000), path(1, 11, 110, 1100)];
        let mut b = a.clone();
        b.reverse();
        b.extend(a.clone());

        assert_eq!(build_tree(&a), build_tree(&b));
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = build_tree(std::iter::empty::<&CategoryPath>());
        assert!(tree.is_empty());
    }

    #[test]
    fn tree_serializes_with_string_keys() {
        let tree = build_tree(&[path(7, 70, 700, 7000)]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["7"]["children"]["70"]["children"]["700"]["level"], 3);
        assert!(json["7"].get("parent_id").is_none());
    }

    #[test]
    fn normalize_code_trims_and_rejects_blank() {
        assert_eq!(normalize_code(" 10000025 ").unwrap(), "10000025");
        assert!(normalize_code("   ").is_err());
        assert!(normalize_code(&"9".repeat(40)).is_err());
    }
}
