//! Category entity - one-level topic tree for gatherings and questions

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Category entity
///
/// The tree is one level deep: a child's parent must itself be a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(id: Snowflake, parent_id: Option<Snowflake>, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            parent_id,
            name,
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_child() {
        let root = Category::new(Snowflake::new(1), None, "개발".to_string());
        assert!(root.is_root());

        let child = Category::new(Snowflake::new(2), Some(root.id), "백엔드".to_string());
        assert!(!child.is_root());
        assert_eq!(child.parent_id, Some(Snowflake::new(1)));
    }
}
