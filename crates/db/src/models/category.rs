//! Taxonomy rows: segments, families, classes and bricks.

use serde::Serialize;
use sqlx::FromRow;
use stockroom_core::category::{CategoryNode, CategoryPath};
use stockroom_core::types::DbId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Segment {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Family {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub segment_id: DbId,
}

/// A row from the `classes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Class {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub family_id: DbId,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brick {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub definition: Option<String>,
    pub class_id: DbId,
}

/// One brick joined with its full ancestor chain.
#[derive(Debug, Clone, FromRow)]
pub struct BrickPathRow {
    pub brick_id: DbId,
    pub brick_code: String,
    pub brick_name: String,
    pub brick_definition: Option<String>,
    pub class_id: DbId,
    pub class_code: String,
    pub class_name: String,
    pub family_id: DbId,
    pub family_code: String,
    pub family_name: String,
    pub segment_id: DbId,
    pub segment_code: String,
    pub segment_name: String,
}

impl BrickPathRow {
    pub fn brick(&self) -> Brick {
        Brick {
            id: self.brick_id,
            code: self.brick_code.clone(),
            name: self.brick_name.clone(),
            definition: self.brick_definition.clone(),
            class_id: self.class_id,
        }
    }

    pub fn path(&self) -> CategoryPath {
        CategoryPath {
            segment: node(self.segment_id, &self.segment_code, &self.segment_name),
            family: node(self.family_id, &self.family_code, &self.family_name),
            class: node(self.class_id, &self.class_code, &self.class_name),
            brick: node(self.brick_id, &self.brick_code, &self.brick_name),
        }
    }
}

fn node(id: DbId, code: &str, name: &str) -> CategoryNode {
    CategoryNode {
        id,
        code: code.to_string(),
        name: name.to_string(),
    }
}
