use serde::{Deserialize, Serialize};

/// A single coaster entry as stored and exchanged over the wire.
///
/// Absent fields decode to their zero value; `id` is always assigned by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coaster {
    pub name: String,
    pub manufacturer: String,
    pub id: String,
    pub in_park: String,
    pub height: i64,
}

impl Coaster {
    /// Same record under a different id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
