use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

const MANGAS: &str = "mangas";
const NAME: &str = "name";
const COVER_URL: &str = "coverUrl";

/// A manga list document (`{"mangas": [...], ...}`)
///
/// Every field is carried through untouched and written back in its input
/// position; only `mangas` is typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MangaDocument {
    pub mangas: Vec<MangaEntry>,

    /// All top-level fields in input order; `mangas` holds a null placeholder
    fields: Map<String, Value>,
}

impl MangaDocument {
    /// A top-level field other than `mangas`
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key == MANGAS {
            return None;
        }
        self.fields.get(key)
    }

    /// Returns the document with its manga list replaced
    pub fn with_mangas(self, mangas: Vec<MangaEntry>) -> Self {
        Self { mangas, ..self }
    }
}

impl Serialize for MangaDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let has_slot = self.fields.contains_key(MANGAS);
        let len = self.fields.len() + usize::from(!has_slot);

        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.fields {
            if key == MANGAS {
                map.serialize_entry(key, &self.mangas)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        if !has_slot {
            map.serialize_entry(MANGAS, &self.mangas)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MangaDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;

        let mangas = match fields.get_mut(MANGAS) {
            Some(slot) if !slot.is_null() => {
                Vec::<MangaEntry>::deserialize(slot.take()).map_err(D::Error::custom)?
            }
            _ => Vec::new(),
        };

        Ok(Self { mangas, fields })
    }
}

/// One manga of the list, kept as its original JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MangaEntry {
    fields: Map<String, Value>,
}

impl MangaEntry {
    pub fn name(&self) -> &str {
        self.fields.get(NAME).and_then(Value::as_str).unwrap_or("")
    }

    /// The `coverUrl` field, empty when missing
    pub fn cover_url(&self) -> &str {
        self.fields.get(COVER_URL).and_then(Value::as_str).unwrap_or("")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_cover(&self) -> bool {
        !self.cover_url().trim().is_empty()
    }

    /// Returns a copy of this entry with the cover URL set in place
    pub fn with_cover(&self, cover_url: impl Into<String>) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(COVER_URL.to_string(), Value::String(cover_url.into()));
        Self { fields }
    }
}
