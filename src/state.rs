use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Connection identifier mapped to whatever metadata the page stored with
/// it. Only the keys matter; the metadata is carried along untyped and never
/// inspected.
pub type ConnectionMap = HashMap<String, Value>;

/// The page-state object captured from the authenticated Contacts page.
///
/// Both `entities` and `entities.connections` can legitimately be missing
/// (the page had no contacts loaded, or the dump was taken elsewhere), so
/// absence deserializes cleanly instead of failing.
#[derive(Deserialize, Debug, Default)]
pub struct PageState {
    #[serde(default)]
    entities: Entities,
}

#[derive(Deserialize, Debug, Default)]
struct Entities {
    connections: Option<ConnectionMap>,
}

impl PageState {
    pub fn connections(&self) -> Option<&ConnectionMap> {
        self.entities.connections.as_ref()
    }
}
