use super::Resource;

use serde::Serialize;

/// One schema (namespace) of the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datapackage {
    #[serde(rename = "datapackage")]
    pub name: String,

    pub resources: Vec<Resource>,
}

impl Datapackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: vec![],
        }
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }
}
