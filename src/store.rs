//! The authoritative zone collection.
//!
//! Rendering, hit-testing and persistence all read from [`ZoneStore`]; nothing
//! is ever read back from what was drawn on screen.

use std::collections::{BTreeMap, BTreeSet};

use crate::zone::{Rect, Zone, ZoneId};

#[derive(Clone, Debug, Default)]
pub struct ZoneStore {
    zones: BTreeMap<ZoneId, Zone>,
    selected: BTreeSet<ZoneId>,
}

impl ZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max(existing) + 1`, or 1 for an empty collection.
    pub fn next_id(&self) -> ZoneId {
        self.zones.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Adds a zone under a fresh id. A missing label becomes `"Zone {id}"`.
    pub fn create(&mut self, rect: Rect, label: Option<String>) -> ZoneId {
        let id = self.next_id();
        let label = label.unwrap_or_else(|| Zone::default_label(id));
        self.zones.insert(id, Zone::new(id, label, rect));
        id
    }

    /// Inserts a zone keeping its id. Returns `false` if the id is taken.
    pub fn restore(&mut self, zone: Zone) -> bool {
        if self.zones.contains_key(&zone.id) {
            return false;
        }
        self.zones.insert(zone.id, zone);
        true
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn update(&mut self, id: ZoneId, rect: Rect, label: String) -> bool {
        match self.zones.get_mut(&id) {
            Some(zone) => {
                zone.rect = rect;
                zone.label = label;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ZoneId) -> Option<Zone> {
        self.selected.remove(&id);
        self.zones.remove(&id)
    }

    pub fn clear(&mut self) {
        self.zones.clear();
        self.selected.clear();
    }

    /// Ids in ascending order, which is also paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Topmost zone under the point; the last painted wins.
    pub fn hit_test(&self, p: (f64, f64)) -> Option<ZoneId> {
        self.zones
            .values()
            .rev()
            .find(|z| z.rect.contains(p))
            .map(|z| z.id)
    }

    // ── Selection ───────────────────────────────────────────────────────────

    pub fn is_selected(&self, id: ZoneId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.selected.iter().copied()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Flips one zone's selection, leaving every other zone alone.
    pub fn toggle_selected(&mut self, id: ZoneId) {
        if !self.zones.contains_key(&id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replaces the selection with every zone overlapping `marquee`.
    pub fn select_in(&mut self, marquee: &Rect) -> usize {
        self.selected = self
            .zones
            .values()
            .filter(|z| z.rect.intersects(marquee))
            .map(|z| z.id)
            .collect();
        self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn remove_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selected);
        for id in &ids {
            self.zones.remove(id);
        }
        ids.len()
    }
}
