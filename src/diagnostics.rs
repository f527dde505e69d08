use std::fmt::{Display, Formatter};

use log::Level;

use crate::aperture::ApertureDefinition;

/// Something noteworthy, but not fatal, that happened while decoding a gerber file.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The line did not match any supported directive and was skipped.
    UnrecognizedLine { line_number: usize, line: String },
    /// A line was drawn with an aperture that cannot define a stroke width.
    StrokeWidthFallback {
        line_number: usize,
        aperture: ApertureDefinition,
        fallback_width: f64,
    },
    /// An undefined aperture was selected, the default aperture is used instead.
    ///
    /// The fallback itself is silent, this is only reported at debug level so that it can be traced.
    UnknownAperture { line_number: usize, code: String },
    /// Arcs are not interpolated, only full circles get a placeholder.
    ArcDropped { line_number: usize },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::StrokeWidthFallback {
                ..
            } => Level::Warn,
            Diagnostic::UnrecognizedLine {
                ..
            }
            | Diagnostic::UnknownAperture {
                ..
            }
            | Diagnostic::ArcDropped {
                ..
            } => Level::Debug,
        }
    }

    pub fn line_number(&self) -> usize {
        match self {
            Diagnostic::UnrecognizedLine {
                line_number, ..
            }
            | Diagnostic::StrokeWidthFallback {
                line_number, ..
            }
            | Diagnostic::UnknownAperture {
                line_number, ..
            }
            | Diagnostic::ArcDropped {
                line_number,
            } => *line_number,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnrecognizedLine {
                line_number,
                line,
            } => write!(f, "Ignoring line. line: {}, content: '{}'", line_number, line),
            Diagnostic::StrokeWidthFallback {
                line_number,
                aperture,
                fallback_width,
            } => write!(
                f,
                "Invalid aperture for line stroke, defaulting thickness of line stroke to {}. line: {}, aperture: {:?}",
                fallback_width, line_number, aperture
            ),
            Diagnostic::UnknownAperture {
                line_number,
                code,
            } => write!(
                f,
                "Unknown aperture selected, reverting to default. line: {}, code: '{}'",
                line_number, code
            ),
            Diagnostic::ArcDropped {
                line_number,
            } => write!(f, "Arc with non-zero displacement not supported, skipped. line: {}", line_number),
        }
    }
}

/// Receives diagnostics from the interpreter, so that callers decide where they go.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to the `log` facade, at the level of the diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.level(), "{}", diagnostic);
    }
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
