//! Territory polygons, looked up by culture id

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::LatLng;

/// Culture id -> outline. Cultures without an entry simply draw no polygon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryTable {
    outlines: AHashMap<String, Vec<LatLng>>,
}

impl TerritoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, culture_id: impl Into<String>, outline: Vec<LatLng>) {
        self.outlines.insert(culture_id.into(), outline);
    }

    pub fn get(&self, culture_id: &str) -> Option<&[LatLng]> {
        self.outlines.get(culture_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.outlines.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_as_plain_map() {
        let table: TerritoryTable =
            serde_json::from_str(r#"{"a": [[1, 2], [3, 4], [5, 6]]}"#).unwrap();
        assert_eq!(table.get("a").unwrap()[1], LatLng::new(3.0, 4.0));
    }
}
