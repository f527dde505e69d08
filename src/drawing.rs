use egui::{Color32, Painter, Pos2, Shape, Stroke};

use crate::geometry::BoundingBox;
use crate::renderer::ViewState;

pub fn draw_crosshair(painter: &Painter, position: Pos2, color: Color32) {
    // extend the lines across the entire view
    let viewport = painter.clip_rect();

    painter.line_segment(
        [
            Pos2::new(viewport.min.x, position.y),
            Pos2::new(viewport.max.x, position.y),
        ],
        Stroke::new(1.0, color),
    );

    painter.line_segment(
        [
            Pos2::new(position.x, viewport.min.y),
            Pos2::new(position.x, viewport.max.y),
        ],
        Stroke::new(1.0, color),
    );
}

pub fn draw_outline(painter: &Painter, vertices: Vec<Pos2>, color: Color32) {
    painter.add(Shape::closed_line(vertices, Stroke::new(1.0, color)));
}

/// Outlines the extents of a layer, e.g. the result of `GerberLayer::find_extents`.
pub fn draw_extents(painter: &Painter, view: &ViewState, extents: &BoundingBox, color: Color32) {
    let vertices = extents
        .vertices()
        .into_iter()
        .map(|vertex| view.layer_to_screen_coords(vertex))
        .collect::<Vec<_>>();

    draw_outline(painter, vertices, color);
}
