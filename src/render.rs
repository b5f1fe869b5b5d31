//! Painting the zone overlay and the paired zone list.
//!
//! Both views read the same [`ZoneStore`], so a zone's selected state can
//! never differ between the rectangle and its list row.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::editor::{Interaction, ZoneEditor};
use crate::store::ZoneStore;
use crate::view::ViewTransform;
use crate::zone::ZoneId;

const ZONE_STROKE: egui::Color32 = egui::Color32::from_rgb(255, 200, 100);
const CLASSED_STROKE: egui::Color32 = egui::Color32::from_rgb(100, 255, 150);
const SELECTED_STROKE: egui::Color32 = egui::Color32::from_rgb(0, 120, 255);
const MARQUEE_STROKE: egui::Color32 = egui::Color32::from_rgb(200, 200, 200);

fn selected_fill() -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(0, 120, 255, 50)
}

pub fn paint_zones(
    painter: &egui::Painter,
    canvas: egui::Rect,
    view: &ViewTransform,
    store: &ZoneStore,
    editing: Option<ZoneId>,
) {
    for zone in store.iter() {
        let rect = view.rect_to_screen(canvas, &zone.rect);
        let selected = store.is_selected(zone.id);
        let color = if selected {
            SELECTED_STROKE
        } else if zone.class.is_some() {
            CLASSED_STROKE
        } else {
            ZONE_STROKE
        };
        if selected {
            painter.rect_filled(rect, 0.0, selected_fill());
        }
        let width = if editing == Some(zone.id) { 3.0 } else { 1.5 };
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(width, color),
            egui::StrokeKind::Middle,
        );

        // labels only once the zone is big enough on screen to hold one
        if rect.width() > 30.0 && rect.height() > 14.0 {
            let font = egui::FontId::proportional((rect.height() * 0.25).clamp(10.0, 16.0));
            let galley = painter.layout_no_wrap(zone.label.clone(), font, color);
            let pos = rect.left_top() + egui::vec2(3.0, 2.0);
            let text_rect = egui::Rect::from_min_size(pos, galley.size()).intersect(rect);
            painter.with_clip_rect(text_rect).galley(pos, galley, color);
        }
    }
}

pub fn paint_preview(
    painter: &egui::Painter,
    canvas: egui::Rect,
    view: &ViewTransform,
    interaction: &Interaction,
) {
    let Some(preview) = interaction.preview_rect() else {
        return;
    };
    let rect = view.rect_to_screen(canvas, &preview);
    match interaction {
        Interaction::Drawing { .. } => {
            let color = if preview.is_drawable() {
                ZONE_STROKE
            } else {
                egui::Color32::from_rgb(255, 80, 80)
            };
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(2.0, color),
                egui::StrokeKind::Middle,
            );
        }
        _ => {
            painter.rect_filled(
                rect,
                0.0,
                egui::Color32::from_rgba_unmultiplied(200, 200, 200, 30),
            );
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, MARQUEE_STROKE),
                egui::StrokeKind::Middle,
            );
        }
    }
}

/// Zone table. Returns the id of a row the user clicked.
pub fn zone_list(ui: &mut egui::Ui, editor: &ZoneEditor) -> Option<ZoneId> {
    let store = editor.store();
    let rows: Vec<_> = store.iter().collect();
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(28.0))
        .column(Column::remainder().at_least(80.0))
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Label");
            });
            header.col(|ui| {
                ui.strong("Position");
            });
            header.col(|ui| {
                ui.strong("Size");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let zone = rows[row.index()];
                row.set_selected(store.is_selected(zone.id));
                row.col(|ui| {
                    ui.label(zone.id.to_string());
                });
                row.col(|ui| {
                    match &zone.class {
                        Some(class) => ui.label(format!("{} [{}]", zone.label, class)),
                        None => ui.label(&zone.label),
                    };
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}, {:.0}", zone.rect.x, zone.rect.y));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0} × {:.0}", zone.rect.width, zone.rect.height));
                });
                if row.response().clicked() {
                    clicked = Some(zone.id);
                }
            });
        });

    clicked
}
