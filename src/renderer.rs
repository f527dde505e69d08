use egui::epaint::{Color32, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};
use egui::Painter;
use log::{debug, trace};
use nalgebra::Point2;

use crate::geometry::{BoundingBox, EllipseShape, LineShape, RectangleShape, Shape as LayerShape};
use crate::layer::GerberLayer;
use crate::spacial::{Invert, ToPos2};

/// Points used to approximate an ellipse.
const ELLIPSE_SEGMENTS: usize = 32;

#[derive(Debug, Clone)]
pub struct RenderConfiguration {
    /// Fill rectangles and ellipses instead of drawing their outline.
    pub fill_pads: bool,
    /// Width, in screen points, of the outline of rectangles and ellipses.
    pub outline_width: f32,
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            fill_pads: false,
            outline_width: 1.0,
        }
    }
}

/// Maps layer coordinates, in millimeters, to screen coordinates.
///
/// The Y axis is flipped, layer Y grows upwards, screen Y grows downwards.
#[derive(Debug, Copy, Clone)]
pub struct ViewState {
    pub translation: Vec2,
    pub scale: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewState {
    /// Convert to layer coordinates using view transformation
    pub fn screen_to_layer_coords(&self, screen_pos: Pos2) -> Point2<f64> {
        let layer_pos = (screen_pos - self.translation) / self.scale;
        Point2::new(layer_pos.x as f64, layer_pos.y as f64).invert_y()
    }

    /// Convert from layer coordinates using view transformation
    pub fn layer_to_screen_coords(&self, layer_pos: Point2<f64>) -> Pos2 {
        let layer_pos = layer_pos.invert_y();
        (layer_pos * self.scale as f64).to_pos2() + self.translation
    }

    /// Scales and centers the view so that `bbox` fits in `viewport`, with a small margin.
    pub fn fit_view(&mut self, viewport: Rect, bbox: &BoundingBox) {
        let content_width = bbox.width().max(f64::EPSILON);
        let content_height = bbox.height().max(f64::EPSILON);

        self.scale = f32::min(
            viewport.width() / (content_width as f32),
            viewport.height() / (content_height as f32),
        ) * 0.95; // 0.95 to add margin

        debug!(
            "Fit view. scale: {:.2}, content_width: {:.2}, content_height: {:.2}",
            self.scale, content_width, content_height
        );

        self.center_view(viewport, bbox);
    }

    pub fn center_view(&mut self, viewport: Rect, bbox: &BoundingBox) {
        let center = bbox.center();

        self.translation = Vec2::new(
            viewport.center().x - (center.x as f32 * self.scale),
            viewport.center().y + (center.y as f32 * self.scale),
        );
    }
}

#[derive(Default)]
pub struct LayerRenderer {}

impl LayerRenderer {
    #[profiling::function]
    pub fn paint_layer(
        &self,
        painter: &Painter,
        view: ViewState,
        layer: &GerberLayer,
        color: Color32,
        configuration: &RenderConfiguration,
    ) {
        trace!("Painting layer. shapes: {}", layer.len());

        for shape in layer.shapes() {
            match shape {
                LayerShape::Line(line) => line.render(painter, &view, color, configuration),
                LayerShape::Rectangle(rectangle) => rectangle.render(painter, &view, color, configuration),
                LayerShape::Ellipse(ellipse) => ellipse.render(painter, &view, color, configuration),
            }
        }
    }
}

trait Renderable {
    fn render(&self, painter: &Painter, view: &ViewState, color: Color32, configuration: &RenderConfiguration);
}

impl Renderable for LineShape {
    fn render(&self, painter: &Painter, view: &ViewState, color: Color32, _configuration: &RenderConfiguration) {
        let start = view.layer_to_screen_coords(self.start());
        let end = view.layer_to_screen_coords(self.end());

        let width = self.stroke_width as f32 * view.scale;
        painter.line_segment([start, end], Stroke::new(width, color));
        // Round the ends, like a circular aperture would.
        painter.circle(start, width / 2.0, color, Stroke::NONE);
        painter.circle(end, width / 2.0, color, Stroke::NONE);
    }
}

impl Renderable for RectangleShape {
    fn render(&self, painter: &Painter, view: &ViewState, color: Color32, configuration: &RenderConfiguration) {
        let corner = view.layer_to_screen_coords(self.origin);
        let opposite_corner = view.layer_to_screen_coords(self.origin + self.size);
        let rect = Rect::from_two_pos(corner, opposite_corner);

        let (fill, stroke) = fill_and_stroke(color, configuration);
        painter.rect(rect, 0.0, fill, stroke, StrokeKind::Middle);
    }
}

impl Renderable for EllipseShape {
    fn render(&self, painter: &Painter, view: &ViewState, color: Color32, configuration: &RenderConfiguration) {
        let screen_points = self
            .outline_points(ELLIPSE_SEGMENTS)
            .into_iter()
            .map(|point| view.layer_to_screen_coords(point))
            .collect::<Vec<_>>();

        let (fill, stroke) = fill_and_stroke(color, configuration);
        painter.add(Shape::convex_polygon(screen_points, fill, stroke));
    }
}

fn fill_and_stroke(color: Color32, configuration: &RenderConfiguration) -> (Color32, Stroke) {
    match configuration.fill_pads {
        true => (color, Stroke::NONE),
        false => (Color32::TRANSPARENT, Stroke::new(configuration.outline_width, color)),
    }
}
