use eframe::egui;

use crate::zone::{Rect, Size};

/// Maps image-pixel coordinates onto the canvas and back.
///
/// Zones are always stored in image pixels; only this transform knows about
/// window size, pan and zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub image_size: Size,
    pub pan: egui::Vec2,
    pub zoom: f32,
    fitted_to: Option<egui::Vec2>,
}

impl ViewTransform {
    pub const MIN_ZOOM: f32 = 0.05;
    pub const MAX_ZOOM: f32 = 20.0;

    pub fn new(image_size: Size) -> Self {
        Self {
            image_size,
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            fitted_to: None,
        }
    }

    /// Resets pan and picks the zoom that shows the whole image.
    pub fn fit(&mut self, canvas: egui::Rect) {
        let sx = canvas.width() / self.image_size.width.max(1.0) as f32;
        let sy = canvas.height() / self.image_size.height.max(1.0) as f32;
        self.zoom = sx.min(sy).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        self.pan = egui::Vec2::ZERO;
        self.fitted_to = Some(canvas.size());
    }

    /// Re-fits when the canvas size changed since the last fit (window resize).
    pub fn refit_if_resized(&mut self, canvas: egui::Rect) -> bool {
        if self.fitted_to == Some(canvas.size()) {
            return false;
        }
        self.fit(canvas);
        true
    }

    /// Image pixels are `f64`; screen space is egui's `f32`.
    pub fn image_to_screen(&self, canvas: egui::Rect, p: (f64, f64)) -> egui::Pos2 {
        let rel_x = (p.0 - self.image_size.width * 0.5) as f32;
        let rel_y = (p.1 - self.image_size.height * 0.5) as f32;
        canvas.center() + self.pan + egui::vec2(rel_x, rel_y) * self.zoom
    }

    pub fn screen_to_image(&self, canvas: egui::Rect, p: egui::Pos2) -> (f64, f64) {
        let rel = (p - canvas.center() - self.pan) / self.zoom;
        (
            rel.x as f64 + self.image_size.width * 0.5,
            rel.y as f64 + self.image_size.height * 0.5,
        )
    }

    pub fn rect_to_screen(&self, canvas: egui::Rect, r: &Rect) -> egui::Rect {
        egui::Rect::from_two_pos(
            self.image_to_screen(canvas, (r.x, r.y)),
            self.image_to_screen(canvas, (r.right(), r.bottom())),
        )
    }

    pub fn image_rect(&self, canvas: egui::Rect) -> egui::Rect {
        let full = Rect::new(0.0, 0.0, self.image_size.width, self.image_size.height);
        self.rect_to_screen(canvas, &full)
    }

    /// Zooms by `factor` keeping the image point under `cursor` fixed.
    pub fn zoom_around(&mut self, canvas: egui::Rect, cursor: egui::Pos2, factor: f32) {
        let new_zoom = (self.zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        let cursor_rel = cursor - canvas.center() - self.pan;
        self.pan -= cursor_rel * (new_zoom / self.zoom - 1.0);
        self.zoom = new_zoom;
    }
}
