use std::str::FromStr;

use crate::{Error, Result};

/// The kinds of objects the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub const BLOB_STRING: &'static str = "blob";
    pub const TREE_STRING: &'static str = "tree";
    pub const COMMIT_STRING: &'static str = "commit";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => ObjectType::BLOB_STRING,
            Self::Tree => ObjectType::TREE_STRING,
            Self::Commit => ObjectType::COMMIT_STRING,
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            ObjectType::BLOB_STRING => Ok(ObjectType::Blob),
            ObjectType::TREE_STRING => Ok(ObjectType::Tree),
            ObjectType::COMMIT_STRING => Ok(ObjectType::Commit),
            _ => Err(Error::MalformedEnvelope(format!(
                "unknown object type {:?}",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_display() {
        assert_eq!(ObjectType::Blob.to_string(), "blob");
        assert_eq!(ObjectType::Tree.to_string(), "tree");
        assert_eq!(ObjectType::Commit.to_string(), "commit");
    }

    #[test]
    fn test_object_type_from_str() {
        assert_eq!(ObjectType::from_str("blob").unwrap(), ObjectType::Blob);
        assert_eq!(ObjectType::from_str("tree").unwrap(), ObjectType::Tree);
        assert_eq!(ObjectType::from_str("commit").unwrap(), ObjectType::Commit);
        assert!(matches!(
            ObjectType::from_str("Blob"),
            Err(Error::MalformedEnvelope(_))
        ));
        assert!(ObjectType::from_str("tag").is_err());
    }
}
