use super::Datapackage;

use serde::Serialize;

/// Root of the document: one introspected database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Database {
    #[serde(rename = "database_name")]
    pub name: String,

    #[serde(rename = "database_description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of the source engine, e.g. `PostgreSQL`
    pub source: String,

    pub source_version: String,

    /// Engine-native timestamp text taken before the first catalog query
    pub generation_begin_time: String,

    /// Engine-native timestamp text taken after the last catalog query
    pub generation_end_time: String,

    pub datapackages: Vec<Datapackage>,
}

impl Database {
    pub fn datapackage(&self, name: &str) -> Option<&Datapackage> {
        self.datapackages.iter().find(|dp| dp.name == name)
    }

    /// Renders the document as JSON.
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
