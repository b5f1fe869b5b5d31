//! Saving and restoring the zone collection to a durable key-value slot.
//!
//! The stored document is `{ "savedAt": <epoch millis>, "zones": [...] }`.
//! Each excavation site gets its own key, see [`storage_key`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::ZoneStore;
use crate::zone::{Rect, Zone, ZoneId};

// ── Stored format ───────────────────────────────────────────────────────────

/// Ids were historically written both as numbers and as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredId {
    Number(u64),
    Text(String),
}

impl StoredId {
    fn as_zone_id(&self) -> Option<ZoneId> {
        match self {
            StoredId::Number(n) => ZoneId::try_from(*n).ok(),
            StoredId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredZone {
    pub id: StoredId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub label: String,
}

impl From<&Zone> for StoredZone {
    fn from(zone: &Zone) -> Self {
        Self {
            id: StoredId::Number(zone.id as u64),
            x: zone.rect.x,
            y: zone.rect.y,
            width: zone.rect.width,
            height: zone.rect.height,
            class: zone.class.clone(),
            label: zone.label.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFile {
    pub saved_at: i64,
    pub zones: Vec<StoredZone>,
}

impl ZoneFile {
    pub fn snapshot(store: &ZoneStore) -> Self {
        Self {
            saved_at: chrono::Utc::now().timestamp_millis(),
            zones: store.iter().map(StoredZone::from).collect(),
        }
    }
}

/// Parses a stored document into a fresh store.
///
/// Malformed JSON, or a document whose `zones` is not an array, yields an
/// empty store. Individual bad entries are skipped; ids that are
/// non-numeric or duplicated are replaced with fresh ones.
pub fn decode(raw: &str) -> ZoneStore {
    let mut store = ZoneStore::new();

    let doc: serde_json::Value = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Stored zones are not valid JSON, starting empty: {}", e);
            return store;
        }
    };
    let Some(entries) = doc.get("zones").and_then(|z| z.as_array()) else {
        tracing::warn!("Stored zones document has no zones array, starting empty");
        return store;
    };

    let mut orphans = Vec::new();
    for entry in entries {
        let stored: StoredZone = match serde_json::from_value(entry.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Skipping malformed stored zone: {}", e);
                continue;
            }
        };
        let rect = Rect::new(stored.x, stored.y, stored.width, stored.height);
        let zone = Zone {
            id: 0,
            label: stored.label.clone(),
            rect,
            class: stored.class.clone(),
        };
        match stored.id.as_zone_id() {
            Some(id) if store.get(id).is_none() => {
                store.restore(Zone { id, ..zone });
            }
            _ => orphans.push((stored.id, zone)),
        }
    }

    // assigned after all valid ids are in, so fresh ids never collide
    for (old, zone) in orphans {
        let id = store.next_id();
        tracing::warn!("Stored zone id {:?} unusable, reassigned to {}", old, id);
        store.restore(Zone { id, ..zone });
    }
    store
}

pub fn encode(store: &ZoneStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ZoneFile::snapshot(store))?)
}

/// Storage key for one excavation site's zones.
pub fn storage_key(site: &str) -> String {
    let clean: String = site
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if clean.is_empty() {
        "zones.default".to_string()
    } else {
        format!("zones.{clean}")
    }
}

// ── Slots ───────────────────────────────────────────────────────────────────

/// A durable key-value slot holding one string per key.
pub trait SlotStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FsSlotStore {
    dir: PathBuf,
}

impl FsSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SlotStore for FsSlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory slots. Clones share the same map, which lets tests simulate
/// a reload by building a second editor over the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySlotStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ── Adapter ─────────────────────────────────────────────────────────────────

pub struct ZonePersistence {
    slots: Box<dyn SlotStore>,
    key: String,
}

impl ZonePersistence {
    pub fn new(slots: Box<dyn SlotStore>, site: &str) -> Self {
        Self {
            slots,
            key: storage_key(site),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&mut self, store: &ZoneStore) -> Result<()> {
        let data = encode(store)?;
        self.slots.write(&self.key, &data)?;
        tracing::debug!("Saved {} zones to {}", store.len(), self.key);
        Ok(())
    }

    /// An absent slot is an empty collection; zones are never seeded.
    pub fn load(&self) -> Result<ZoneStore> {
        let store = match self.slots.read(&self.key)? {
            Some(raw) => decode(&raw),
            None => ZoneStore::new(),
        };
        tracing::info!("Loaded {} zones from {}", store.len(), self.key);
        Ok(store)
    }
}
