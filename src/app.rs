use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui;
use image::DynamicImage;

use crate::command::{Command, Shortcut};
use crate::config::Settings;
use crate::editor::{Interaction, Mode, Notice, ZoneEditor};
use crate::error::Result;
use crate::grid::GridSpec;
use crate::persist::{FsSlotStore, ZonePersistence};
use crate::render;
use crate::view::ViewTransform;
use crate::zone::Size;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

enum EditorAction {
    Save,
    Delete,
    Cancel,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct ZoneApp {
    site: String,
    editor: ZoneEditor,

    image_path: Option<PathBuf>,
    raw_image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    view: Option<ViewTransform>,

    // grid form
    grid_cols: String,
    grid_rows: String,
    grid_clear: bool,

    panning: bool,
}

impl ZoneApp {
    pub fn new(settings: Settings) -> Self {
        let slots = FsSlotStore::new(&settings.data_dir);
        tracing::info!("Zone storage in {}", slots.dir().display());
        let persistence = ZonePersistence::new(Box::new(slots), &settings.site);
        let editor = ZoneEditor::new(persistence, settings.save_delay);
        let defaults = GridSpec::default();

        let mut app = Self {
            site: settings.site,
            editor,
            image_path: None,
            raw_image: None,
            texture: None,
            view: None,
            grid_cols: defaults.cols.to_string(),
            grid_rows: defaults.rows.to_string(),
            grid_clear: false,
            panning: false,
        };
        if let Some(path) = settings.image {
            app.open_image(&path);
        }
        app
    }

    fn open_image(&mut self, path: &Path) {
        if let Err(e) = self.load_image(path) {
            self.editor
                .warn(format!("Could not open {}: {}", path.display(), e));
        }
    }

    /// The image's natural pixel size becomes the overlay coordinate space.
    fn load_image(&mut self, path: &Path) -> Result<()> {
        let img = image::open(path)?;
        let size = Size::new(img.width() as f64, img.height() as f64);
        self.editor.set_image_size(size);
        self.view = Some(ViewTransform::new(size));
        self.raw_image = Some(img);
        self.texture = None;
        self.image_path = Some(path.to_path_buf());
        tracing::info!("Opened {}", path.display());
        Ok(())
    }

    fn pick_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open_image(&path);
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture(
                "reference-image",
                color_image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // typing into a field or answering a dialog must not trigger shortcuts
        if ctx.wants_keyboard_input()
            || self.editor.pending().is_some()
            || matches!(self.editor.interaction(), Interaction::Editing(_))
        {
            return;
        }
        let mut shortcuts = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                shortcuts.push(Shortcut::ClearSelection);
            }
            if i.key_pressed(egui::Key::D) && !i.modifiers.any() {
                shortcuts.push(Shortcut::ToggleDraw);
            }
            if i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace) {
                shortcuts.push(Shortcut::DeleteSelected);
            }
        });
        for shortcut in shortcuts {
            self.editor.key(shortcut);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open image…").clicked() {
                self.pick_image();
            }
            ui.separator();

            let mode = self.editor.mode();
            if ui.selectable_label(mode == Mode::Select, "Select").clicked() {
                self.editor.set_mode(Mode::Select);
            }
            if ui.selectable_label(mode == Mode::Draw, "Draw (d)").clicked() {
                self.editor.dispatch(Command::ToggleZoneDraw);
            }
            if ui.selectable_label(mode == Mode::Edit, "Edit").clicked() {
                self.editor.dispatch(Command::ToggleGridEdit);
            }
            ui.separator();

            ui.label("Cols:");
            ui.add(egui::TextEdit::singleline(&mut self.grid_cols).desired_width(32.0));
            ui.label("Rows:");
            ui.add(egui::TextEdit::singleline(&mut self.grid_rows).desired_width(32.0));
            ui.checkbox(&mut self.grid_clear, "Clear existing");
            if ui.button("Generate grid").clicked() {
                let spec = GridSpec::from_input(&self.grid_cols, &self.grid_rows, self.grid_clear);
                self.grid_cols = spec.cols.to_string();
                self.grid_rows = spec.rows.to_string();
                self.editor.dispatch(Command::GenerateGrid(spec));
            }
            ui.separator();

            let has_selection = self.editor.store().selected_count() > 0;
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete selected"))
                .clicked()
            {
                self.editor.dispatch(Command::DeleteSelected);
            }
            if ui
                .add_enabled(!self.editor.store().is_empty(), egui::Button::new("Clear all"))
                .clicked()
            {
                self.editor.dispatch(Command::ClearAll);
            }
            ui.separator();
            if !self.editor.zones_open() && ui.button("Zones").clicked() {
                self.editor.dispatch(Command::OpenZones);
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let store = self.editor.store();
            ui.label(format!("Site: {}", self.site));
            ui.separator();
            if let Some(name) = self.image_path.as_deref().and_then(Path::file_name) {
                ui.label(name.to_string_lossy().into_owned());
                ui.separator();
            }
            ui.label(format!("{} zones, {} selected", store.len(), store.selected_count()));
            ui.separator();
            ui.label(format!("Mode: {:?}", self.editor.mode()));
            if let Some(view) = &self.view {
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", view.zoom * 100.0));
            }
            if self.editor.save_pending() {
                ui.separator();
                ui.label("unsaved");
            }
            match self.editor.notice() {
                Some(Notice::Info(msg)) => {
                    ui.separator();
                    ui.label(msg);
                }
                Some(Notice::Warning(msg)) => {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(255, 160, 60), msg);
                }
                None => {}
            }
        });
    }

    fn zone_panel(&mut self, ctx: &egui::Context) {
        if !self.editor.zones_open() {
            return;
        }
        egui::SidePanel::right("zones")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Zones");
                    if ui.small_button("✕").clicked() {
                        self.editor.set_zones_open(false);
                    }
                });
                ui.separator();
                if let Some(id) = render::zone_list(ui, &self.editor) {
                    if self.editor.mode() == Mode::Edit {
                        self.editor.open_editor(id);
                    } else {
                        self.editor.toggle_selected(id);
                    }
                }
            });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

        let Some(view) = self.view.as_mut() else {
            painter.text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open a site plan image to start",
                egui::FontId::proportional(18.0),
                egui::Color32::from_gray(160),
            );
            return;
        };
        view.refit_if_resized(canvas_rect);

        // pan (middle mouse button)
        let ctx = ui.ctx().clone();
        if ctx.input(|i| i.pointer.middle_down()) {
            view.pan += ctx.input(|i| i.pointer.delta());
            self.panning = true;
        } else {
            self.panning = false;
        }

        // zoom (scroll wheel)
        let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            if let Some(cursor) = response.hover_pos() {
                view.zoom_around(canvas_rect, cursor, 1.0 + scroll * 0.002);
            }
        }

        let view = *view;
        if let Some(tex) = &self.texture {
            painter.image(
                tex.id(),
                view.image_rect(canvas_rect),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        let editing = match self.editor.interaction() {
            Interaction::Editing(edit) => Some(edit.zone_id),
            _ => None,
        };
        render::paint_zones(&painter, canvas_rect, &view, self.editor.store(), editing);
        render::paint_preview(&painter, canvas_rect, &view, self.editor.interaction());

        if self.editor.mode() == Mode::Draw && response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        if self.panning {
            return;
        }
        let to_image = |p: egui::Pos2| view.screen_to_image(canvas_rect, p);

        if response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.editor.click(to_image(pos));
            }
        }
        if response.drag_started_by(egui::PointerButton::Primary) {
            // anchor at the press, not where the drag threshold was crossed
            let origin = ctx
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(pos) = origin {
                self.editor.drag_start(to_image(pos));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.editor.drag_move(to_image(pos));
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            let end = response
                .interact_pointer_pos()
                .or(ctx.input(|i| i.pointer.latest_pos()));
            if let Some(pos) = end {
                self.editor.drag_end(to_image(pos));
            }
        }
    }

    fn editor_dialog(&mut self, ctx: &egui::Context) {
        let Some(draft) = self.editor.edit_draft_mut() else {
            return;
        };
        let mut action = None;
        let modal = egui::Modal::new(egui::Id::new("zone-editor")).show(ctx, |ui| {
            ui.heading("Edit zone");
            egui::Grid::new("zone-editor-fields")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Label");
                    ui.text_edit_singleline(&mut draft.label);
                    ui.end_row();
                    ui.label("X");
                    ui.add(egui::DragValue::new(&mut draft.x).speed(1.0));
                    ui.end_row();
                    ui.label("Y");
                    ui.add(egui::DragValue::new(&mut draft.y).speed(1.0));
                    ui.end_row();
                    ui.label("Width");
                    ui.add(egui::DragValue::new(&mut draft.width).speed(1.0).range(0.0..=f64::MAX));
                    ui.end_row();
                    ui.label("Height");
                    ui.add(egui::DragValue::new(&mut draft.height).speed(1.0).range(0.0..=f64::MAX));
                    ui.end_row();
                });
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    action = Some(EditorAction::Save);
                }
                if ui.button("Delete").clicked() {
                    action = Some(EditorAction::Delete);
                }
                if ui.button("Cancel").clicked() {
                    action = Some(EditorAction::Cancel);
                }
            });
        });
        // backdrop click or Escape, unless the delete confirmation is on top
        if action.is_none() && self.editor.pending().is_none() && modal.should_close() {
            action = Some(EditorAction::Cancel);
        }

        match action {
            Some(EditorAction::Save) => {
                self.editor.commit_edit();
            }
            Some(EditorAction::Delete) => self.editor.request_delete_edited(),
            Some(EditorAction::Cancel) => self.editor.cancel_edit(),
            None => {}
        }
    }

    fn confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.editor.pending() else {
            return;
        };
        let prompt = pending.prompt(self.editor.store().len());
        let mut answer = None;
        let modal = egui::Modal::new(egui::Id::new("confirm")).show(ctx, |ui| {
            ui.label(prompt);
            ui.label("This cannot be undone.");
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Confirm").clicked() {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });
        if answer.is_none() && modal.should_close() {
            answer = Some(false);
        }
        match answer {
            Some(true) => self.editor.confirm(),
            Some(false) => self.editor.dismiss(),
            None => {}
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for ZoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        self.zone_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        self.editor_dialog(ctx);
        self.confirm_dialog(ctx);

        let now = Instant::now();
        self.editor.tick(now);
        if let Some(wait) = self.editor.save_remaining(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.editor.flush();
        tracing::info!("Saved {} zones on exit", self.editor.store().len());
    }
}
