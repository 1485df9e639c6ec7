// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Externally supplied name -> sensor id lookup table

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::SensorId;

/// Human-readable names for sensors, in deployment order
///
/// The catalog is configuration, not state: sensors missing from it are
/// still tracked, and catalogued sensors may never report. Serialized as a
/// `name = id` table that keeps file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub sensor_id: SensorId,
}

impl SensorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or rename an entry. A name maps to exactly one id.
    pub fn insert(&mut self, name: impl Into<String>, sensor_id: impl Into<SensorId>) {
        let name = name.into();
        let sensor_id = sensor_id.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.sensor_id = sensor_id,
            None => self.entries.push(CatalogEntry { name, sensor_id }),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&SensorId> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.sensor_id)
    }

    pub fn name_of(&self, sensor_id: &SensorId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.sensor_id == sensor_id)
            .map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl Serialize for SensorCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.sensor_id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SensorCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = SensorCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of sensor name = id, or a list of {name, sensor_id} entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = SensorCatalog::new();
                while let Some((name, sensor_id)) = access.next_entry::<String, SensorId>()? {
                    catalog.insert(name, sensor_id);
                }
                Ok(catalog)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = SensorCatalog::new();
                while let Some(entry) = access.next_element::<CatalogEntry>()? {
                    catalog.insert(entry.name, entry.sensor_id);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_any(CatalogVisitor)
    }
}

impl<N: Into<String>, I: Into<SensorId>> FromIterator<(N, I)> for SensorCatalog {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut catalog = SensorCatalog::new();
        for (name, id) in iter {
            catalog.insert(name, id);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_both_ways() {
        let catalog: SensorCatalog = [("roof", "12"), ("tower", "13")].into_iter().collect();
        assert_eq!(catalog.lookup("tower"), Some(&SensorId::from("13")));
        assert_eq!(catalog.name_of(&SensorId::from("12")), Some("roof"));
        assert_eq!(catalog.lookup("cellar"), None);
    }

    #[test]
    fn test_table_form_keeps_file_order() {
        let catalog: SensorCatalog =
            serde_json::from_str(r#"{"tower": "tower-a", "roof": 12}"#).unwrap();
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["tower", "roof"]);
        assert_eq!(catalog.lookup("roof"), Some(&SensorId::from(12u64)));

        let written = serde_json::to_string(&catalog).unwrap();
        assert_eq!(written, r#"{"tower":"tower-a","roof":"12"}"#);
    }

    #[test]
    fn test_list_form_still_accepted() {
        let catalog: SensorCatalog =
            serde_json::from_str(r#"[{"name": "roof", "sensor_id": 12}]"#).unwrap();
        assert_eq!(catalog.lookup("roof"), Some(&SensorId::from("12")));
    }

    #[test]
    fn test_insert_renames_in_place() {
        let mut catalog = SensorCatalog::new();
        catalog.insert("roof", 12u64);
        catalog.insert("tower", 13u64);
        catalog.insert("roof", 14u64);

        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.entries()[0].sensor_id, SensorId::from(14u64));
    }
}
