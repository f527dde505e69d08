use log::trace;

use crate::aperture::{ApertureDefinition, ApertureTable};
use crate::command::{classify, Command, CoordinateCommand, DrawMode};
use crate::config::ParserConfiguration;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::LayerError;
use crate::geometry::{EllipseShape, LineShape, RectangleShape, Shape};
use crate::layer::{GerberLayer, ParsedLayer};
use crate::spacial::{Position, Size};

/// Applies gerber commands, one line at a time, building up the shapes of a single layer.
///
/// The state only lives for the duration of one parse, see [`GerberLayer::parse_str`].
pub struct Interpreter<'a, D: Diagnostics> {
    config: &'a ParserConfiguration,
    diagnostics: D,
    apertures: ApertureTable,
    shapes: Vec<Shape>,
    position: Position,
    aperture_code: String,
}

impl<'a, D: Diagnostics> Interpreter<'a, D> {
    pub fn new(config: &'a ParserConfiguration, diagnostics: D) -> Self {
        Self {
            config,
            diagnostics,
            apertures: ApertureTable::new(config.default_aperture_diameter),
            shapes: Vec::new(),
            position: Position::origin(),
            aperture_code: ApertureTable::DEFAULT_CODE.to_string(),
        }
    }

    /// Current plotting position, in millimeters.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Identifier of the selected aperture, empty for the default aperture.
    pub fn aperture_code(&self) -> &str {
        &self.aperture_code
    }

    pub fn apertures(&self) -> &ApertureTable {
        &self.apertures
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Unsupported lines are reported to the diagnostics and otherwise ignored.
    pub fn interpret_line(&mut self, line_number: usize, line: &str) -> Result<(), LayerError> {
        match classify(line, line_number)? {
            Some(command) => self.apply(line_number, command),
            None => self
                .diagnostics
                .report(Diagnostic::UnrecognizedLine {
                    line_number,
                    line: line.to_string(),
                }),
        }
        Ok(())
    }

    pub fn apply(&mut self, line_number: usize, command: Command) {
        match command {
            Command::Ignore => {}
            Command::Flash => self.flash(),
            Command::DefineAperture {
                code,
                definition,
            } => {
                self.apertures.define(code, definition);
            }
            Command::SelectAperture {
                code,
            } => self.select_aperture(line_number, code),
            Command::Coordinate(coordinate) => self.apply_coordinate(line_number, coordinate),
        }
    }

    pub fn finish(self) -> ParsedLayer {
        trace!(
            "Finished layer. shapes: {}, apertures: {}",
            self.shapes.len(),
            self.apertures.len()
        );
        ParsedLayer {
            layer: GerberLayer::new(self.shapes),
            apertures: self.apertures,
        }
    }

    fn select_aperture(&mut self, line_number: usize, code: String) {
        if self.apertures.contains(&code) {
            self.aperture_code = code;
        } else {
            self.diagnostics
                .report(Diagnostic::UnknownAperture {
                    line_number,
                    code,
                });
            self.aperture_code = ApertureTable::DEFAULT_CODE.to_string();
        }
    }

    fn apply_coordinate(&mut self, line_number: usize, coordinate: CoordinateCommand) {
        let CoordinateCommand {
            x,
            y,
            arc_offset,
            mode,
        } = coordinate;

        let divisor = self.config.coordinate_divisor;
        let target = Position::new(
            x.map(|x| x / divisor).unwrap_or(self.position.x),
            y.map(|y| y / divisor).unwrap_or(self.position.y),
        );

        match (mode, arc_offset) {
            (DrawMode::Draw, Some(_)) => self.arc(line_number, target),
            (DrawMode::Draw, None) => self.line(line_number, target),
            (DrawMode::Move, _) => {}
            (DrawMode::Flash, _) => {
                self.position = target;
                self.flash();
            }
        }

        self.position = target;
    }

    fn line(&mut self, line_number: usize, target: Position) {
        let aperture = self.current_aperture();
        let stroke_width = match aperture.stroke_width() {
            Some(stroke_width) => stroke_width,
            None => {
                let fallback_width = self.config.fallback_stroke_width;
                self.diagnostics
                    .report(Diagnostic::StrokeWidthFallback {
                        line_number,
                        aperture,
                        fallback_width,
                    });
                fallback_width
            }
        };

        self.shapes
            .push(Shape::Line(LineShape::new(self.position, target, stroke_width)));
    }

    /// Arcs are not interpolated, an arc that ends where it started is a full circle and gets a placeholder.
    fn arc(&mut self, line_number: usize, target: Position) {
        let displacement = target - self.position;
        let epsilon = self.config.arc_epsilon;

        if displacement.x.abs() < epsilon && displacement.y.abs() < epsilon {
            let diameter = self.config.arc_placeholder_diameter;
            self.shapes
                .push(Shape::Ellipse(EllipseShape::centered(
                    self.position,
                    Size::new(diameter, diameter),
                )));
        } else {
            self.diagnostics
                .report(Diagnostic::ArcDropped {
                    line_number,
                });
        }
    }

    fn flash(&mut self) {
        let center = self.position;
        let shape = match self.current_aperture() {
            ApertureDefinition::Circle {
                diameter,
            } => Shape::Ellipse(EllipseShape::centered(center, Size::new(diameter, diameter))),
            ApertureDefinition::Rectangle {
                width,
                height,
            } => Shape::Rectangle(RectangleShape::centered(center, Size::new(width, height))),
            ApertureDefinition::Oval {
                width,
                height,
            } => Shape::Ellipse(EllipseShape::centered(center, Size::new(width, height))),
        };

        self.shapes.push(shape);
    }

    fn current_aperture(&self) -> ApertureDefinition {
        self.apertures.resolve(&self.aperture_code)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::geometry::WithExtent;

    fn interpret(lines: &[&str]) -> (ParsedLayer, Vec<Diagnostic>) {
        let config = ParserConfiguration::default();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut interpreter = Interpreter::new(&config, &mut diagnostics);
        for (index, line) in lines.iter().enumerate() {
            interpreter
                .interpret_line(index + 1, line)
                .unwrap();
        }
        let parsed = interpreter.finish();
        (parsed, diagnostics)
    }

    #[test]
    fn test_initial_state() {
        // given
        let config = ParserConfiguration::default();

        // when
        let interpreter = Interpreter::new(&config, Vec::<Diagnostic>::new());

        // then
        assert_eq!(interpreter.position(), Position::origin());
        assert_eq!(interpreter.aperture_code(), "");
        assert_eq!(interpreter.apertures().default_aperture(), ApertureDefinition::Circle {
            diameter: 0.1
        });
        assert!(interpreter.shapes().is_empty());
    }

    #[test]
    fn test_flash_circle() {
        // when
        let (parsed, _) = interpret(&["%ADD10C,0.50*%", "D10*", "X1000Y1000D03*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Ellipse(EllipseShape {
            origin: Position::new(0.75, 0.75),
            size: Size::new(0.5, 0.5),
        })]);
    }

    #[test]
    fn test_flash_rectangle() {
        // when
        let (parsed, _) = interpret(&["%ADD11R,1.0X2.0*%", "D11*", "X0Y0D03*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Rectangle(RectangleShape {
            origin: Position::new(-0.5, -1.0),
            size: Size::new(1.0, 2.0),
        })]);
    }

    #[test]
    fn test_flash_oval_is_an_ellipse() {
        // when
        let (parsed, _) = interpret(&["%ADD12O,2.0X1.0*%", "G54D12*", "X2000Y0D02*", "D03*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Ellipse(EllipseShape {
            origin: Position::new(1.0, -0.5),
            size: Size::new(2.0, 1.0),
        })]);
    }

    #[rstest]
    #[case("%ADD10C,0.5*%", "X1234Y-5678D03*", (1.234, -5.678))]
    #[case("%ADD10R,0.3X0.7*%", "X-1000Y2500D03*", (-1.0, 2.5))]
    #[case("%ADD10O,1.1X0.2*%", "Y750D03*", (0.0, 0.75))]
    fn test_flash_is_centered_on_position(
        #[case] definition: &str,
        #[case] flash: &str,
        #[case] expected_center: (f64, f64),
    ) {
        // when
        let (parsed, _) = interpret(&[definition, "D10*", flash]);

        // then
        let center = parsed.layer.shapes()[0]
            .extent()
            .center();
        assert!((center.x - expected_center.0).abs() < 1e-9, "center: {:?}", center);
        assert!((center.y - expected_center.1).abs() < 1e-9, "center: {:?}", center);
    }

    #[test]
    fn test_draw_with_default_aperture() {
        // when
        let (parsed, diagnostics) = interpret(&["D01*", "X1000Y0D01*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Line(LineShape {
            origin: Position::new(0.0, 0.0),
            size: Size::new(1.0, 0.0),
            stroke_width: 0.1,
        })]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_draw_modes() {
        // when
        let (parsed, _) = interpret(&[
            "%ADD10C,0.2*%",
            "D10*",
            "X1000Y1000D02*", // move
            "X2000*",         // draw, implicit
            "Y3000D01*",      // draw, explicit
            "X0Y0D02*",       // move
        ]);

        // then
        assert_eq!(parsed.layer.shapes(), &[
            Shape::Line(LineShape::new(Position::new(1.0, 1.0), Position::new(2.0, 1.0), 0.2)),
            Shape::Line(LineShape::new(Position::new(2.0, 1.0), Position::new(2.0, 3.0), 0.2)),
        ]);
    }

    #[test]
    fn test_unknown_aperture_selection_reverts_to_default() {
        // when
        let (parsed, diagnostics) = interpret(&["%ADD10C,0.5*%", "D10*", "D42*", "X1000Y0D01*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Line(LineShape::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            0.1
        ))]);
        assert_eq!(diagnostics, vec![Diagnostic::UnknownAperture {
            line_number: 3,
            code: "42".to_string()
        }]);
    }

    #[test]
    fn test_line_with_rectangular_aperture_uses_fallback_width() {
        // when
        let (parsed, diagnostics) = interpret(&["%ADD10R,1.0X1.0*%", "D10*", "X1000Y0D01*"]);

        // then
        match &parsed.layer.shapes()[0] {
            Shape::Line(line) => assert_eq!(line.stroke_width, 0.1),
            shape => panic!("expected a line, got {:?}", shape),
        }
        assert_eq!(diagnostics, vec![Diagnostic::StrokeWidthFallback {
            line_number: 3,
            aperture: ApertureDefinition::Rectangle {
                width: 1.0,
                height: 1.0
            },
            fallback_width: 0.1,
        }]);
    }

    #[test]
    fn test_full_circle_arc_emits_placeholder_at_old_position() {
        // when
        let (parsed, diagnostics) = interpret(&["X1000Y1000D02*", "X1000Y1000I500J0D01*"]);

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Ellipse(EllipseShape {
            origin: Position::new(0.8, 0.8),
            size: Size::new(0.4, 0.4),
        })]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_arc_with_displacement_is_dropped() {
        // when
        let (parsed, diagnostics) = interpret(&["X1000Y1000D02*", "X2000Y1000I500J0D01*", "X2000Y2000D01*"]);

        // then
        // only the line after the arc remains, starting where the arc ended
        assert_eq!(parsed.layer.shapes(), &[Shape::Line(LineShape::new(
            Position::new(2.0, 1.0),
            Position::new(2.0, 2.0),
            0.1
        ))]);
        assert_eq!(diagnostics, vec![Diagnostic::ArcDropped {
            line_number: 2
        }]);
    }

    #[test]
    fn test_arc_going_backwards_is_dropped() {
        // the displacement is negative on both axes, it's still not a full circle
        let (parsed, _) = interpret(&["X5000Y5000D02*", "X1000Y1000I500J0D01*"]);

        assert!(parsed.layer.shapes().is_empty());
    }

    #[test]
    fn test_unrecognized_line_changes_nothing() {
        // given
        let config = ParserConfiguration::default();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut interpreter = Interpreter::new(&config, &mut diagnostics);
        interpreter
            .interpret_line(1, "%ADD10C,0.5*%")
            .unwrap();
        interpreter
            .interpret_line(2, "D10*")
            .unwrap();
        interpreter
            .interpret_line(3, "X1000Y2000D02*")
            .unwrap();

        // when
        let result = interpreter.interpret_line(4, "G04 just a comment*");

        // then
        assert!(result.is_ok());
        assert_eq!(interpreter.position(), Position::new(1.0, 2.0));
        assert_eq!(interpreter.aperture_code(), "10");
        assert!(interpreter.shapes().is_empty());

        // and
        drop(interpreter);
        assert_eq!(diagnostics, vec![Diagnostic::UnrecognizedLine {
            line_number: 4,
            line: "G04 just a comment*".to_string()
        }]);
    }

    #[test]
    fn test_redefined_aperture_is_used() {
        // when
        let (parsed, _) = interpret(&["%ADD10C,0.5*%", "%ADD10C,1.0*%", "D10*", "D03*"]);

        // then
        assert_eq!(
            parsed.apertures.resolve("10"),
            ApertureDefinition::Circle {
                diameter: 1.0
            }
        );
        assert_eq!(parsed.layer.shapes()[0].size(), Size::new(1.0, 1.0));
    }
}
