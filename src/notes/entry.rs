use serde::{Deserialize, Serialize};

/// Kind of a listing node, serialized as `"directory"` or `"file"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One node of the `/api/files` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Entry>>,
    /// Path relative to the base directory, usable with `/api/files/{path}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Entry {
    pub fn directory(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            children: Some(children),
            path: None,
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            children: None,
            path: Some(path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let tree = Entry::directory(
            "Notes on Shuori",
            vec![Entry::file("a.json", "side_story/Notes on Shuori/a.json")],
        );
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Notes on Shuori",
                "type": "directory",
                "children": [{
                    "name": "a.json",
                    "type": "file",
                    "path": "side_story/Notes on Shuori/a.json"
                }]
            })
        );
    }
}
