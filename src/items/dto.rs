use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `"description": null` clears the description; omitting it keeps it.
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    pub description: Option<Option<String>>,
}
