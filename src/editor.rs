//! Interaction controller for the zone overlay.
//!
//! All pointer positions are in image-pixel coordinates; the caller converts
//! from screen space before calling in.

use std::time::{Duration, Instant};

use crate::command::{Command, Shortcut};
use crate::debounce::Debouncer;
use crate::grid::{self, GridSpec};
use crate::persist::ZonePersistence;
use crate::store::ZoneStore;
use crate::zone::{Rect, Size, Zone, ZoneId};

// ── State ───────────────────────────────────────────────────────────────────

/// The active tool. Only one can be on at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Select,
    Draw,
    Edit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditDraft {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl From<&Zone> for EditDraft {
    fn from(zone: &Zone) -> Self {
        Self {
            x: zone.rect.x,
            y: zone.rect.y,
            width: zone.rect.width,
            height: zone.rect.height,
            label: zone.label.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoneEdit {
    pub zone_id: ZoneId,
    pub draft: EditDraft,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    Selecting {
        anchor: (f64, f64),
        current: (f64, f64),
    },
    Drawing {
        anchor: (f64, f64),
        current: (f64, f64),
    },
    Editing(ZoneEdit),
}

impl Interaction {
    /// Rubber-band or new-zone rectangle while a drag is in progress.
    pub fn preview_rect(&self) -> Option<Rect> {
        match self {
            Interaction::Selecting { anchor, current }
            | Interaction::Drawing { anchor, current } => {
                Some(Rect::from_corners(*anchor, *current))
            }
            _ => None,
        }
    }
}

/// Destructive actions waiting for the user to confirm.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingAction {
    ClearAll,
    ReplaceGrid(GridSpec),
    DeleteZone(ZoneId),
}

impl PendingAction {
    pub fn prompt(&self, zone_count: usize) -> String {
        match self {
            PendingAction::ClearAll => format!("Delete all {zone_count} zones?"),
            PendingAction::ReplaceGrid(spec) => format!(
                "Replace {zone_count} existing zones with a {}×{} grid?",
                spec.cols, spec.rows
            ),
            PendingAction::DeleteZone(id) => format!("Delete zone {id}?"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridOutcome {
    Generated(usize),
    AwaitingConfirmation,
    Refused,
    NoImage,
}

// ── Controller ──────────────────────────────────────────────────────────────

pub struct ZoneEditor {
    store: ZoneStore,
    bounds: Option<Size>,
    mode: Mode,
    interaction: Interaction,
    pending: Option<PendingAction>,
    notice: Option<Notice>,
    zones_open: bool,
    save: Debouncer,
    persistence: ZonePersistence,
}

impl ZoneEditor {
    /// Restores the saved zones for the persistence key.
    pub fn new(persistence: ZonePersistence, save_delay: Duration) -> Self {
        let mut notice = None;
        let store = match persistence.load() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", persistence.key(), e);
                notice = Some(Notice::Warning(format!("Could not load zones: {e}")));
                ZoneStore::new()
            }
        };
        Self {
            store,
            bounds: None,
            mode: Mode::Select,
            interaction: Interaction::Idle,
            pending: None,
            notice,
            zones_open: true,
            save: Debouncer::new(save_delay),
            persistence,
        }
    }

    pub fn store(&self) -> &ZoneStore {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn zones_open(&self) -> bool {
        self.zones_open
    }

    pub fn set_zones_open(&mut self, open: bool) {
        self.zones_open = open;
    }

    pub fn bounds(&self) -> Option<Size> {
        self.bounds
    }

    /// Sets the overlay coordinate space to the image's natural size.
    pub fn set_image_size(&mut self, size: Size) {
        tracing::info!("Overlay coordinate space {}×{}", size.width, size.height);
        self.bounds = Some(size);
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    fn mark_dirty(&mut self) {
        self.save.schedule(Instant::now());
    }

    pub fn save_pending(&self) -> bool {
        self.save.is_pending()
    }

    pub fn save_remaining(&self, now: Instant) -> Option<Duration> {
        self.save.remaining(now)
    }

    /// Writes the collection if the debounce window has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.save.take_due(now) {
            self.save_now();
            true
        } else {
            false
        }
    }

    /// Unconditional synchronous save, used on shutdown.
    pub fn flush(&mut self) {
        if self.save.flush() {
            tracing::debug!("Flushing pending save for {}", self.persistence.key());
        }
        self.save_now();
    }

    fn save_now(&mut self) {
        if let Err(e) = self.persistence.save(&self.store) {
            tracing::warn!("Saving zones to {} failed: {}", self.persistence.key(), e);
            self.notice = Some(Notice::Warning(format!("Could not save zones: {e}")));
        }
    }

    pub fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.notice = Some(Notice::Warning(message));
    }

    pub fn inform(&mut self, message: String) {
        tracing::info!("{}", message);
        self.notice = Some(Notice::Info(message));
    }

    // ── Modes ───────────────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        tracing::debug!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        // in-flight gestures and an open editor never survive a mode change
        self.interaction = Interaction::Idle;
    }

    pub fn toggle_draw(&mut self) {
        let next = if self.mode == Mode::Draw {
            Mode::Select
        } else {
            Mode::Draw
        };
        self.set_mode(next);
    }

    pub fn toggle_grid_edit(&mut self) {
        let next = if self.mode == Mode::Edit {
            Mode::Select
        } else {
            Mode::Edit
        };
        self.set_mode(next);
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::OpenZones => self.zones_open = true,
            Command::ToggleZoneDraw => self.toggle_draw(),
            Command::GenerateGrid(spec) => {
                self.generate_grid(spec);
            }
            Command::ToggleGridEdit => self.toggle_grid_edit(),
            Command::ClearAll => {
                if !self.store.is_empty() {
                    self.pending = Some(PendingAction::ClearAll);
                }
            }
            Command::DeleteSelected => {
                let removed = self.store.remove_selected();
                if removed > 0 {
                    self.close_editor_if_gone();
                    self.inform(format!("Deleted {removed} zones"));
                    self.mark_dirty();
                }
            }
            Command::ClearSelection => self.store.clear_selection(),
        }
    }

    pub fn key(&mut self, shortcut: Shortcut) {
        self.dispatch(shortcut.command());
    }

    // ── Pointer ─────────────────────────────────────────────────────────────

    /// A press and release without movement.
    pub fn click(&mut self, p: (f64, f64)) {
        if self.pending.is_some() {
            return;
        }
        match (self.store.hit_test(p), self.mode) {
            (Some(id), Mode::Edit) => self.open_editor(id),
            (Some(id), _) => self.store.toggle_selected(id),
            (None, Mode::Draw) => {}
            // an empty marquee selects nothing
            (None, _) => self.store.clear_selection(),
        }
    }

    pub fn drag_start(&mut self, p: (f64, f64)) {
        if self.pending.is_some() || matches!(self.interaction, Interaction::Editing(_)) {
            return;
        }
        self.interaction = match self.mode {
            Mode::Draw => Interaction::Drawing {
                anchor: p,
                current: p,
            },
            _ if self.store.hit_test(p).is_none() => Interaction::Selecting {
                anchor: p,
                current: p,
            },
            _ => Interaction::Idle,
        };
    }

    pub fn drag_move(&mut self, p: (f64, f64)) {
        if let Interaction::Selecting { current, .. } | Interaction::Drawing { current, .. } =
            &mut self.interaction
        {
            *current = p;
        }
    }

    /// Finishes a marquee or draw gesture. Returns the new zone, if any.
    pub fn drag_end(&mut self, p: (f64, f64)) -> Option<ZoneId> {
        self.drag_move(p);
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Selecting { anchor, current } => {
                let n = self.store.select_in(&Rect::from_corners(anchor, current));
                tracing::debug!("Marquee selected {} zones", n);
                None
            }
            Interaction::Drawing { anchor, current } => {
                let rect = Rect::from_corners(anchor, current);
                if !rect.is_drawable() {
                    tracing::debug!("Discarding {}×{} draw gesture", rect.width, rect.height);
                    return None;
                }
                let id = self.store.create(rect, None);
                tracing::debug!("Drew zone {} at {:?}", id, rect);
                self.mark_dirty();
                Some(id)
            }
            other => {
                self.interaction = other;
                None
            }
        }
    }

    // ── Editor panel ────────────────────────────────────────────────────────

    /// Opens the editor for one zone, replacing any editor already open.
    pub fn open_editor(&mut self, id: ZoneId) {
        if let Some(zone) = self.store.get(id) {
            self.interaction = Interaction::Editing(ZoneEdit {
                zone_id: id,
                draft: EditDraft::from(zone),
            });
        }
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut EditDraft> {
        match &mut self.interaction {
            Interaction::Editing(edit) => Some(&mut edit.draft),
            _ => None,
        }
    }

    pub fn commit_edit(&mut self) -> bool {
        let Interaction::Editing(edit) = std::mem::replace(&mut self.interaction, Interaction::Idle)
        else {
            return false;
        };
        let d = edit.draft;
        let rect = Rect::new(d.x, d.y, d.width, d.height);
        if !self.store.update(edit.zone_id, rect, d.label) {
            return false;
        }
        self.mark_dirty();
        true
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.interaction, Interaction::Editing(_)) {
            self.interaction = Interaction::Idle;
        }
    }

    /// Asks for confirmation before deleting the zone being edited.
    pub fn request_delete_edited(&mut self) {
        if let Interaction::Editing(edit) = &self.interaction {
            self.pending = Some(PendingAction::DeleteZone(edit.zone_id));
        }
    }

    fn close_editor_if_gone(&mut self) {
        if let Interaction::Editing(edit) = &self.interaction {
            if self.store.get(edit.zone_id).is_none() {
                self.interaction = Interaction::Idle;
            }
        }
    }

    // ── Grid ────────────────────────────────────────────────────────────────

    pub fn generate_grid(&mut self, spec: GridSpec) -> GridOutcome {
        let Some(bounds) = self.bounds else {
            self.warn("Load a reference image before generating a grid".to_string());
            return GridOutcome::NoImage;
        };
        if !self.store.is_empty() {
            if !spec.clear {
                self.warn(format!(
                    "{} zones already exist; tick \"clear existing\" to replace them",
                    self.store.len()
                ));
                return GridOutcome::Refused;
            }
            self.pending = Some(PendingAction::ReplaceGrid(spec));
            return GridOutcome::AwaitingConfirmation;
        }
        GridOutcome::Generated(self.apply_grid(&spec, bounds))
    }

    fn apply_grid(&mut self, spec: &GridSpec, bounds: Size) -> usize {
        self.store.clear();
        let cells = grid::generate(spec, bounds);
        for cell in &cells {
            self.store.create(cell.rect, Some(cell.label.clone()));
        }
        self.close_editor_if_gone();
        self.inform(format!("Generated {}×{} grid", spec.cols, spec.rows));
        self.mark_dirty();
        cells.len()
    }

    // ── Confirmation ────────────────────────────────────────────────────────

    pub fn confirm(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::ClearAll => {
                let n = self.store.len();
                self.store.clear();
                self.close_editor_if_gone();
                self.inform(format!("Deleted {n} zones"));
                self.mark_dirty();
            }
            PendingAction::ReplaceGrid(spec) => match self.bounds {
                Some(bounds) => {
                    self.apply_grid(&spec, bounds);
                }
                None => self.warn("Reference image went away; grid not generated".to_string()),
            },
            PendingAction::DeleteZone(id) => {
                if self.store.remove(id).is_some() {
                    self.close_editor_if_gone();
                    self.mark_dirty();
                }
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    pub fn toggle_selected(&mut self, id: ZoneId) {
        self.store.toggle_selected(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemorySlotStore;

    fn editor_with(slots: &MemorySlotStore) -> ZoneEditor {
        let persistence = ZonePersistence::new(Box::new(slots.clone()), "test");
        let mut editor = ZoneEditor::new(persistence, Duration::from_millis(200));
        editor.set_image_size(Size::new(800.0, 600.0));
        editor
    }

    fn editor() -> ZoneEditor {
        editor_with(&MemorySlotStore::new())
    }

    fn draw(editor: &mut ZoneEditor, from: (f64, f64), to: (f64, f64)) -> Option<ZoneId> {
        editor.drag_start(from);
        editor.drag_move(((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
        editor.drag_end(to)
    }

    #[test]
    fn drawing_commits_normalized_zone() {
        let mut e = editor();
        e.toggle_draw();
        let id = draw(&mut e, (100.0, 80.0), (20.0, 10.0)).unwrap();
        let zone = e.store().get(id).unwrap();
        assert_eq!(zone.rect, Rect::new(20.0, 10.0, 80.0, 70.0));
        assert_eq!(zone.label, "Zone 1");
        assert!(e.save_pending());
        assert_eq!(e.interaction(), &Interaction::Idle);
    }

    #[test]
    fn tiny_draw_gestures_are_dropped() {
        let mut e = editor();
        e.toggle_draw();
        assert_eq!(draw(&mut e, (10.0, 10.0), (13.0, 50.0)), None);
        assert_eq!(draw(&mut e, (10.0, 10.0), (50.0, 12.0)), None);
        assert!(e.store().is_empty());
        assert!(!e.save_pending());
    }

    #[test]
    fn preview_follows_pointer() {
        let mut e = editor();
        e.toggle_draw();
        e.drag_start((50.0, 50.0));
        e.drag_move((10.0, 70.0));
        assert_eq!(
            e.interaction().preview_rect(),
            Some(Rect::new(10.0, 50.0, 40.0, 20.0))
        );
    }

    #[test]
    fn marquee_on_empty_canvas_replaces_selection() {
        let mut e = editor();
        e.toggle_draw();
        let a = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        let b = draw(&mut e, (100.0, 100.0), (120.0, 120.0)).unwrap();
        e.toggle_draw();
        assert_eq!(e.mode(), Mode::Select);

        e.click((5.0, 5.0));
        assert!(e.store().is_selected(a));

        e.drag_start((90.0, 90.0));
        assert!(matches!(e.interaction(), Interaction::Selecting { .. }));
        e.drag_end((130.0, 130.0));
        assert!(!e.store().is_selected(a));
        assert!(e.store().is_selected(b));
    }

    #[test]
    fn drag_starting_on_zone_does_not_marquee() {
        let mut e = editor();
        e.toggle_draw();
        draw(&mut e, (0.0, 0.0), (10.0, 10.0));
        e.toggle_draw();
        e.drag_start((5.0, 5.0));
        assert_eq!(e.interaction(), &Interaction::Idle);
    }

    #[test]
    fn click_toggles_only_that_zone() {
        let mut e = editor();
        e.toggle_draw();
        let a = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        let b = draw(&mut e, (20.0, 0.0), (30.0, 10.0)).unwrap();
        e.toggle_draw();
        e.click((5.0, 5.0));
        e.click((25.0, 5.0));
        e.click((5.0, 5.0));
        assert!(!e.store().is_selected(a));
        assert!(e.store().is_selected(b));

        e.click((500.0, 500.0));
        assert_eq!(e.store().selected_count(), 0);
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let mut e = editor();
        e.toggle_grid_edit();
        assert_eq!(e.mode(), Mode::Edit);
        e.toggle_draw();
        assert_eq!(e.mode(), Mode::Draw);
        e.toggle_grid_edit();
        assert_eq!(e.mode(), Mode::Edit);
        e.toggle_grid_edit();
        assert_eq!(e.mode(), Mode::Select);
    }


    #[test]
    fn dispatch_routes_panel_and_mode_commands() {
        let mut e = editor();
        e.set_zones_open(false);
        e.dispatch(Command::OpenZones);
        assert!(e.zones_open());
        e.dispatch(Command::OpenZones);
        assert!(e.zones_open());

        e.dispatch(Command::ToggleGridEdit);
        assert_eq!(e.mode(), Mode::Edit);
        e.dispatch(Command::ToggleZoneDraw);
        assert_eq!(e.mode(), Mode::Draw);
        e.dispatch(Command::ToggleGridEdit);
        assert_eq!(e.mode(), Mode::Edit);
        e.dispatch(Command::ToggleGridEdit);
        assert_eq!(e.mode(), Mode::Select);
    }

    #[test]
    fn edit_mode_click_opens_editor_and_save_commits() {
        let mut e = editor();
        e.toggle_draw();
        let id = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        e.toggle_grid_edit();
        e.flush();

        e.click((5.0, 5.0));
        let draft = e.edit_draft_mut().unwrap();
        assert_eq!(draft.width, 10.0);
        draft.x = 40.0;
        draft.width = 25.0;
        draft.label = "Hearth".into();
        assert!(e.commit_edit());

        let zone = e.store().get(id).unwrap();
        assert_eq!(zone.rect, Rect::new(40.0, 0.0, 25.0, 10.0));
        assert_eq!(zone.label, "Hearth");
        assert!(e.save_pending());
        assert_eq!(e.interaction(), &Interaction::Idle);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut e = editor();
        e.toggle_draw();
        let id = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        e.toggle_grid_edit();
        e.open_editor(id);
        e.edit_draft_mut().unwrap().label = "changed".into();
        e.cancel_edit();
        assert_eq!(e.store().get(id).unwrap().label, "Zone 1");
        assert!(!e.commit_edit());
    }

    #[test]
    fn opening_second_editor_replaces_first() {
        let mut e = editor();
        e.toggle_draw();
        let a = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        let b = draw(&mut e, (20.0, 0.0), (30.0, 10.0)).unwrap();
        e.toggle_grid_edit();
        e.open_editor(a);
        e.edit_draft_mut().unwrap().label = "unsaved".into();
        e.open_editor(b);
        match e.interaction() {
            Interaction::Editing(edit) => assert_eq!(edit.zone_id, b),
            other => panic!("expected editor, got {other:?}"),
        }
        assert_eq!(e.store().get(a).unwrap().label, "Zone 1");
    }

    #[test]
    fn entering_draw_mode_closes_editor() {
        let mut e = editor();
        e.toggle_draw();
        let id = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        e.toggle_grid_edit();
        e.open_editor(id);
        e.toggle_draw();
        assert_eq!(e.interaction(), &Interaction::Idle);
        assert!(e.edit_draft_mut().is_none());
    }

    #[test]
    fn delete_from_editor_needs_confirmation() {
        let mut e = editor();
        e.toggle_draw();
        let id = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        e.toggle_grid_edit();
        e.open_editor(id);
        e.request_delete_edited();
        assert_eq!(e.pending(), Some(&PendingAction::DeleteZone(id)));

        e.dismiss();
        assert!(e.store().get(id).is_some());

        e.request_delete_edited();
        e.confirm();
        assert!(e.store().get(id).is_none());
        assert_eq!(e.interaction(), &Interaction::Idle);
    }

    #[test]
    fn shortcuts() {
        let mut e = editor();
        e.key(Shortcut::ToggleDraw);
        assert_eq!(e.mode(), Mode::Draw);
        let a = draw(&mut e, (0.0, 0.0), (10.0, 10.0)).unwrap();
        let b = draw(&mut e, (20.0, 0.0), (30.0, 10.0)).unwrap();
        e.key(Shortcut::ToggleDraw);
        assert_eq!(e.mode(), Mode::Select);

        e.drag_start((-5.0, -5.0));
        e.drag_end((50.0, 50.0));
        assert_eq!(e.store().selected_count(), 2);
        e.key(Shortcut::ClearSelection);
        assert_eq!(e.store().selected_count(), 0);

        e.click((5.0, 5.0));
        e.key(Shortcut::DeleteSelected);
        assert!(e.store().get(a).is_none());
        assert!(e.store().get(b).is_some());

        // nothing selected: no-op
        e.flush();
        e.key(Shortcut::DeleteSelected);
        assert_eq!(e.store().len(), 1);
        assert!(!e.save_pending());
    }

    #[test]
    fn grid_on_empty_store_generates_immediately() {
        let mut e = editor();
        let outcome = e.generate_grid(GridSpec::new(4, 3, false));
        assert_eq!(outcome, GridOutcome::Generated(12));
        let first = e.store().get(1).unwrap();
        assert_eq!(first.label, "Zone 1-1");
        assert_eq!(first.rect, Rect::new(0.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn grid_refused_without_clear() {
        let mut e = editor();
        e.generate_grid(GridSpec::new(2, 2, false));
        let outcome = e.generate_grid(GridSpec::new(3, 3, false));
        assert_eq!(outcome, GridOutcome::Refused);
        assert_eq!(e.store().len(), 4);
        assert!(matches!(e.notice(), Some(Notice::Warning(_))));
    }

    #[test]
    fn grid_with_clear_waits_for_confirmation() {
        let mut e = editor();
        e.generate_grid(GridSpec::new(2, 2, false));
        let outcome = e.generate_grid(GridSpec::new(3, 1, true));
        assert_eq!(outcome, GridOutcome::AwaitingConfirmation);
        assert_eq!(e.store().len(), 4);

        e.dismiss();
        assert_eq!(e.store().len(), 4);

        e.dispatch(Command::GenerateGrid(GridSpec::new(3, 1, true)));
        e.confirm();
        let labels: Vec<_> = e.store().iter().map(|z| z.label.clone()).collect();
        assert_eq!(labels, vec!["Zone 1-1", "Zone 1-2", "Zone 1-3"]);
    }

    #[test]
    fn grid_needs_image_bounds() {
        let persistence = ZonePersistence::new(Box::new(MemorySlotStore::new()), "x");
        let mut e = ZoneEditor::new(persistence, Duration::from_millis(200));
        assert_eq!(e.generate_grid(GridSpec::default()), GridOutcome::NoImage);
        assert!(e.store().is_empty());
    }


    #[test]
    fn marquee_from_grid_edge_selects_only_cells_past_it() {
        let mut e = editor();
        e.set_image_size(Size::new(1000.0, 750.0));
        assert_eq!(e.generate_grid(GridSpec::new(6, 1, false)), GridOutcome::Generated(6));
        let last = e.store().iter().last().unwrap().clone();
        assert_eq!(last.label, "Zone 1-6");

        // the grid covers the image, so the gesture starts just above it
        e.drag_start((last.rect.x, -10.0));
        assert!(matches!(e.interaction(), Interaction::Selecting { .. }));
        e.drag_end((1000.0, 750.0));
        assert_eq!(e.store().selected().collect::<Vec<_>>(), vec![last.id]);

        let mut e = editor();
        e.set_image_size(Size::new(997.0, 613.0));
        e.generate_grid(GridSpec::new(7, 1, false));
        let cells: Vec<Zone> = e.store().iter().cloned().collect();
        e.drag_start((1010.0, 620.0));
        e.drag_end((cells[4].rect.x, 0.0));
        let expected: Vec<ZoneId> = cells[4..].iter().map(|z| z.id).collect();
        assert_eq!(e.store().selected().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn clear_all_is_confirmed() {
        let mut e = editor();
        e.dispatch(Command::ClearAll);
        assert_eq!(e.pending(), None);

        e.generate_grid(GridSpec::new(2, 2, false));
        e.dispatch(Command::ClearAll);
        assert_eq!(e.pending(), Some(&PendingAction::ClearAll));
        e.confirm();
        assert!(e.store().is_empty());
        assert_eq!(e.pending(), None);
    }

    #[test]
    fn pointer_ignored_while_confirming() {
        let mut e = editor();
        e.generate_grid(GridSpec::new(2, 2, false));
        e.dispatch(Command::ClearAll);
        e.click((10.0, 10.0));
        assert_eq!(e.store().selected_count(), 0);
        e.drag_start((10.0, 10.0));
        assert_eq!(e.interaction(), &Interaction::Idle);
    }

    #[test]
    fn debounced_save_reaches_storage() {
        let slots = MemorySlotStore::new();
        let mut e = editor_with(&slots);
        e.toggle_draw();
        draw(&mut e, (0.0, 0.0), (10.0, 10.0));
        let now = Instant::now();
        assert!(!e.tick(now));
        assert!(editor_with(&slots).store().is_empty());

        assert!(e.tick(now + Duration::from_secs(1)));
        assert_eq!(editor_with(&slots).store().len(), 1);
    }


    #[test]
    fn flush_writes_through_and_clears_pending_save() {
        let slots = MemorySlotStore::new();
        let mut e = editor_with(&slots);
        e.toggle_draw();
        draw(&mut e, (0.0, 0.0), (10.0, 10.0));
        assert!(e.save_pending());

        e.flush();
        assert!(!e.save_pending());
        assert_eq!(editor_with(&slots).store().len(), 1);
        assert!(!e.tick(Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn reload_restores_same_zones() {
        let slots = MemorySlotStore::new();
        let mut e = editor_with(&slots);
        e.toggle_draw();
        draw(&mut e, (0.0, 0.0), (10.0, 10.0));
        draw(&mut e, (20.0, 20.0), (60.0, 45.0));
        draw(&mut e, (100.0, 5.0), (150.0, 90.0));
        e.flush();

        let reloaded = editor_with(&slots);
        let before: Vec<_> = e.store().iter().cloned().collect();
        let after: Vec<_> = reloaded.store().iter().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(reloaded.store().next_id(), 4);
    }
}
