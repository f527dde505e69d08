use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, info, trace};

use crate::aperture::ApertureTable;
use crate::config::ParserConfiguration;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::error::LayerError;
use crate::geometry::{BoundingBox, Shape, WithExtent};
use crate::interpreter::Interpreter;
use crate::spacial::Vector;

/// The shapes decoded from one gerber file, in the order they were drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GerberLayer {
    shapes: Vec<Shape>,
}

/// The result of decoding a gerber file, the aperture table is only for inspection.
#[derive(Clone, Debug)]
pub struct ParsedLayer {
    pub layer: GerberLayer,
    pub apertures: ApertureTable,
}

impl GerberLayer {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            shapes,
        }
    }

    /// It's possible to have a gerber file with no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The union of the normalized extents of all the shapes.
    ///
    /// A layer without shapes yields the zero-size rectangle at the origin.
    #[profiling::function]
    pub fn find_extents(&self) -> BoundingBox {
        if self.shapes.is_empty() {
            return BoundingBox::zero();
        }

        let mut bbox = BoundingBox::default();
        for shape in &self.shapes {
            bbox.expand(&shape.extent());
        }

        trace!("layer extents: {:?}", bbox);

        bbox
    }

    /// Moves every shape by subtracting `offset`, sizes are unchanged.
    pub fn relocate(&mut self, offset: Vector) {
        debug!("Relocating layer. offset: {:?}, shapes: {}", offset, self.shapes.len());
        for shape in self.shapes.iter_mut() {
            shape.relocate(offset);
        }
    }
}

impl GerberLayer {
    /// Decodes gerber source, line by line.
    ///
    /// Unsupported lines are reported to `diagnostics` and skipped, only a number that cannot be decoded fails the
    /// parse.
    #[profiling::function]
    pub fn parse_str(
        source: &str,
        config: &ParserConfiguration,
        diagnostics: impl Diagnostics,
    ) -> Result<ParsedLayer, LayerError> {
        let mut interpreter = Interpreter::new(config, diagnostics);

        for (index, line) in source.lines().enumerate() {
            interpreter.interpret_line(index + 1, line)?;
        }

        Ok(interpreter.finish())
    }

    /// Reads everything from `reader` before decoding.
    pub fn from_reader<R: Read>(
        mut reader: R,
        config: &ParserConfiguration,
        diagnostics: impl Diagnostics,
    ) -> Result<ParsedLayer, LayerError> {
        let mut source = String::new();
        reader
            .read_to_string(&mut source)
            .map_err(|source| LayerError::Read {
                source,
            })?;

        Self::parse_str(&source, config, diagnostics)
    }

    pub fn load_file(
        path: impl AsRef<Path>,
        config: &ParserConfiguration,
        diagnostics: impl Diagnostics,
    ) -> Result<ParsedLayer, LayerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LayerError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = Self::parse_str(&source, config, diagnostics)?;
        info!("Loaded gerber layer. path: {:?}, shapes: {}", path, parsed.layer.len());

        Ok(parsed)
    }

    /// Loads a file using the default configuration, diagnostics go to the log.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayerError> {
        Self::load_file(path, &ParserConfiguration::default(), LogDiagnostics).map(|parsed| parsed.layer)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::aperture::ApertureDefinition;
    use crate::diagnostics::Diagnostic;
    use crate::geometry::{EllipseShape, LineShape, RectangleShape};
    use crate::spacial::{Position, Size};
    use crate::testing::{assert_bbox_eq, gerber_source};

    fn parse(lines: &[&str]) -> GerberLayer {
        GerberLayer::parse_str(&gerber_source(lines), &ParserConfiguration::default(), LogDiagnostics)
            .unwrap()
            .layer
    }

    fn layer_with_extents(left: f64, top: f64, right: f64, bottom: f64) -> GerberLayer {
        GerberLayer::new(vec![Shape::Rectangle(RectangleShape {
            origin: Position::new(right, bottom),
            size: Size::new(left - right, top - bottom),
        })])
    }

    #[test]
    fn test_empty_layer_extents() {
        // given
        let layer = GerberLayer::default();

        // when
        let first = layer.find_extents();
        let second = layer.find_extents();

        // then
        assert_eq!(first, BoundingBox::zero());
        assert_eq!(first, second);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_extents_are_the_union_of_normalized_shapes() {
        // given
        let layer = GerberLayer::new(vec![
            Shape::Line(LineShape::new(Position::new(5.0, 5.0), Position::new(1.0, 2.0), 0.5)),
            Shape::Ellipse(EllipseShape::centered(Position::new(10.0, 0.0), Size::new(2.0, 2.0))),
            Shape::Rectangle(RectangleShape {
                origin: Position::new(0.0, 8.0),
                size: Size::new(3.0, -1.0),
            }),
        ]);

        // when
        let extents = layer.find_extents();

        // then
        // stroke widths are not part of the extents
        assert_bbox_eq(&extents, (0.0, -1.0, 11.0, 8.0));
    }

    #[rstest]
    #[case((1.0, 2.0))]
    #[case((-3.5, 0.25))]
    #[case((0.0, 0.0))]
    fn test_relocate_moves_extents(#[case] offset: (f64, f64)) {
        // given
        let mut layer = parse(&[
            "%ADD10C,0.5*%",
            "%ADD11R,1.0X2.0*%",
            "D10*",
            "X1000Y1000D02*",
            "X-2000Y3000D01*",
            "D11*",
            "X4000Y-1000D03*",
        ]);
        let before = layer.find_extents();

        // when
        layer.relocate(Vector::new(offset.0, offset.1));

        // then
        let after = layer.find_extents();
        assert!((after.left() - (before.left() - offset.0)).abs() < 1e-9);
        assert!((after.top() - (before.top() - offset.1)).abs() < 1e-9);
        assert!((after.width() - before.width()).abs() < 1e-9);
        assert!((after.height() - before.height()).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_aligning_two_layers() {
        // given
        let mut first = layer_with_extents(0.0, 0.0, 10.0, 10.0);
        let mut second = layer_with_extents(-5.0, -5.0, 5.0, 5.0);

        // and
        let extents = [first.find_extents(), second.find_extents()];
        let min_left = extents
            .iter()
            .map(BoundingBox::left)
            .fold(f64::MAX, f64::min);
        let min_top = extents
            .iter()
            .map(BoundingBox::top)
            .fold(f64::MAX, f64::min);
        assert_eq!((min_left, min_top), (-5.0, -5.0));

        // when
        first.relocate(Vector::new(min_left, min_top));
        second.relocate(Vector::new(min_left, min_top));

        // then
        assert_bbox_eq(&first.find_extents(), (5.0, 5.0, 15.0, 15.0));
        assert_bbox_eq(&second.find_extents(), (0.0, 0.0, 10.0, 10.0));

        // and nothing is left of, or above, the common origin
        let mut combined = first.find_extents();
        combined.expand(&second.find_extents());
        assert!(combined.left().abs() < 1e-9);
        assert!(combined.top().abs() < 1e-9);
    }

    #[test]
    fn test_parse_preserves_draw_order() {
        // when
        let layer = parse(&[
            "G04 generated by some EDA tool*",
            "%FSLAX24Y24*%",
            "%MOMM*%",
            "%ADD10C,0.50*%",
            "%ADD11R,1.0X2.0*%",
            "D10*",
            "X1000Y1000D03*",
            "D11*",
            "X0Y0D03*",
            "D10*",
            "X1000Y0D01*",
            "M02*",
        ]);

        // then
        assert!(matches!(layer.shapes(), [Shape::Ellipse(_), Shape::Rectangle(_), Shape::Line(_)]));
    }

    #[test]
    fn test_parse_with_windows_line_endings() {
        // when
        let layer = GerberLayer::parse_str(
            "%ADD10C,0.50*%\r\nD10*\r\nX1000Y1000D03*\r\n",
            &ParserConfiguration::default(),
            LogDiagnostics,
        )
        .unwrap()
        .layer;

        // then
        assert_eq!(layer.shapes(), &[Shape::Ellipse(EllipseShape {
            origin: Position::new(0.75, 0.75),
            size: Size::new(0.5, 0.5),
        })]);
    }

    #[test]
    fn test_parse_reports_diagnostics() {
        // given
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        // when
        let parsed = GerberLayer::parse_str(
            &gerber_source(&["G04 comment*", "D01*", "X1000Y0D01*"]),
            &ParserConfiguration::default(),
            &mut diagnostics,
        )
        .unwrap();

        // then
        assert_eq!(parsed.layer.len(), 1);
        assert_eq!(parsed.apertures.len(), 1);
        assert_eq!(diagnostics, vec![Diagnostic::UnrecognizedLine {
            line_number: 1,
            line: "G04 comment*".to_string()
        }]);
    }

    #[test]
    fn test_definition_without_code_keeps_default_aperture() {
        // given
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        // when
        let parsed = GerberLayer::parse_str(
            &gerber_source(&["%ADDR,1.0X1.0*%", "D42*", "X1000Y0D01*"]),
            &ParserConfiguration::default(),
            &mut diagnostics,
        )
        .unwrap();

        // then
        assert_eq!(parsed.apertures.default_aperture(), ApertureDefinition::Circle {
            diameter: 0.1
        });
        assert_eq!(parsed.layer.shapes(), &[Shape::Line(LineShape::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            0.1
        ))]);
        assert_eq!(diagnostics, vec![
            Diagnostic::UnrecognizedLine {
                line_number: 1,
                line: "%ADDR,1.0X1.0*%".to_string()
            },
            Diagnostic::UnknownAperture {
                line_number: 2,
                code: "42".to_string()
            },
        ]);
    }

    #[rstest]
    #[case(&["%ADD10C,1.2.3*%", "D10*", "X1000Y0D01*"], 1, "1.2.3")]
    #[case(&["%ADD10C,0.5*%", "D10*", "X1000Y0.5.0D01*"], 3, "0.5.0")]
    fn test_malformed_number_fails_the_parse(
        #[case] lines: &[&str],
        #[case] expected_line: usize,
        #[case] expected_literal: &str,
    ) {
        // when
        let result = GerberLayer::parse_str(&gerber_source(lines), &ParserConfiguration::default(), LogDiagnostics);

        // then
        match result {
            Err(LayerError::InvalidNumber {
                line_number,
                literal,
                ..
            }) => {
                assert_eq!(line_number, expected_line);
                assert_eq!(literal, expected_literal);
            }
            _ => panic!("expected an invalid number error, got {:?}", result),
        }
    }

    #[test]
    fn test_custom_coordinate_divisor() {
        // given
        let config = ParserConfiguration {
            coordinate_divisor: 10000.0,
            ..ParserConfiguration::default()
        };

        // when
        let layer = GerberLayer::parse_str("X10000Y0D01*", &config, LogDiagnostics)
            .unwrap()
            .layer;

        // then
        assert_eq!(layer.shapes(), &[Shape::Line(LineShape::new(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            0.1
        ))]);
    }

    #[test]
    fn test_from_reader() {
        // given
        let source = gerber_source(&["%ADD11R,1.0X2.0*%", "D11*", "X0Y0D03*"]);

        // when
        let parsed = GerberLayer::from_reader(source.as_bytes(), &ParserConfiguration::default(), LogDiagnostics).unwrap();

        // then
        assert_eq!(parsed.layer.shapes(), &[Shape::Rectangle(RectangleShape {
            origin: Position::new(-0.5, -1.0),
            size: Size::new(1.0, 2.0),
        })]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        // when
        let result = GerberLayer::from_file("this/file/does/not/exist.gbr");

        // then
        match result {
            Err(LayerError::Io {
                path,
                ..
            }) => assert_eq!(path, Path::new("this/file/does/not/exist.gbr")),
            _ => panic!("expected an io error, got {:?}", result),
        }
    }
}
