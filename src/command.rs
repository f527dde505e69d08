//! Classifies a single line of a gerber file into a [`Command`].
//!
//! The matchers are tried in order and the first match wins, the order matters since some directives are prefixes of
//! others, e.g. a bare `D03*` would also be accepted by the aperture selection matcher.

use lazy_regex::*;
use log::trace;
use regex::{Captures, Regex};

use crate::aperture::ApertureDefinition;
use crate::error::LayerError;
use crate::spacial::Vector;

static RE_IGNORABLE: Lazy<Regex> = lazy_regex!(r"^(?:D89.*|M02.*|D0?[12]\*?)$");
static RE_FLASH: Lazy<Regex> = lazy_regex!(r"^D0?3\*?$");
// a number is any run of signs, digits and decimal points, e.g. `-1000`, `0.50` or `.5`. A malformed run such as
// `1.2.3` still classifies the line, and is rejected when decoded.
// aperture codes are never empty, the empty code is the default aperture.
static RE_APERTURE_CIRCLE: Lazy<Regex> = lazy_regex!(r"^%ADD(?P<code>[0-9]+)C,(?P<diameter>[-+0-9.]+)\*");
static RE_APERTURE_RECTANGLE: Lazy<Regex> =
    lazy_regex!(r"^%ADD(?P<code>[0-9]+)R,(?P<width>[-+0-9.]+)X(?P<height>[-+0-9.]+)\*");
static RE_APERTURE_OVAL: Lazy<Regex> =
    lazy_regex!(r"^%ADD(?P<code>[0-9]+)O,(?P<width>[-+0-9.]+)X(?P<height>[-+0-9.]+)\*");
static RE_APERTURE_SELECTION: Lazy<Regex> = lazy_regex!(r"^(?:G54)?D(?P<code>[0-9]*)\*");
static RE_COORDINATE: Lazy<Regex> = lazy_regex!(
    r"^(?:X(?P<x>[-+0-9.]+))?(?:Y(?P<y>[-+0-9.]+))?(?:I(?P<i>[-+0-9.]+)J(?P<j>[-+0-9.]+))?(?:D0?(?P<mode>[123]))?\*"
);

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Block terminators, end-of-program and other markers that need no action.
    Ignore,
    /// Flash the current aperture at the current position.
    Flash,
    DefineAperture {
        code: String,
        definition: ApertureDefinition,
    },
    SelectAperture {
        code: String,
    },
    Coordinate(CoordinateCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// `D01`, or no operation code
    Draw,
    /// `D02`
    Move,
    /// `D03`
    Flash,
}

/// Coordinates are raw file values, i.e. not yet scaled to millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateCommand {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// The `I`/`J` arc center offset, if present.
    pub arc_offset: Option<Vector>,
    pub mode: DrawMode,
}

type Matcher = fn(&str, usize) -> Result<Option<Command>, LayerError>;

const MATCHERS: [(&str, Matcher); 7] = [
    ("ignorable", match_ignorable),
    ("flash", match_flash),
    ("circle aperture", match_circle_aperture),
    ("rectangle aperture", match_rectangle_aperture),
    ("oval aperture", match_oval_aperture),
    ("aperture selection", match_aperture_selection),
    ("coordinate", match_coordinate),
];

/// Returns `Ok(None)` for a line that is not a supported directive.
///
/// Fails only when a directive matched but one of its numbers could not be decoded.
pub fn classify(line: &str, line_number: usize) -> Result<Option<Command>, LayerError> {
    let line = line.trim();

    for (name, matcher) in MATCHERS.iter() {
        if let Some(command) = matcher(line, line_number)? {
            trace!("Matched {}. line: {}, command: {:?}", name, line_number, command);
            return Ok(Some(command));
        }
    }

    Ok(None)
}

fn match_ignorable(line: &str, _line_number: usize) -> Result<Option<Command>, LayerError> {
    match line.is_empty() || RE_IGNORABLE.is_match(line) {
        true => Ok(Some(Command::Ignore)),
        false => Ok(None),
    }
}

fn match_flash(line: &str, _line_number: usize) -> Result<Option<Command>, LayerError> {
    match RE_FLASH.is_match(line) {
        true => Ok(Some(Command::Flash)),
        false => Ok(None),
    }
}

fn match_circle_aperture(line: &str, line_number: usize) -> Result<Option<Command>, LayerError> {
    let Some(captures) = RE_APERTURE_CIRCLE.captures(line) else {
        return Ok(None);
    };

    let definition = ApertureDefinition::Circle {
        diameter: required_number(&captures, "diameter", line_number)?,
    };

    Ok(Some(Command::DefineAperture {
        code: captures["code"].to_string(),
        definition,
    }))
}

fn match_rectangle_aperture(line: &str, line_number: usize) -> Result<Option<Command>, LayerError> {
    let Some(captures) = RE_APERTURE_RECTANGLE.captures(line) else {
        return Ok(None);
    };

    let definition = ApertureDefinition::Rectangle {
        width: required_number(&captures, "width", line_number)?,
        height: required_number(&captures, "height", line_number)?,
    };

    Ok(Some(Command::DefineAperture {
        code: captures["code"].to_string(),
        definition,
    }))
}

fn match_oval_aperture(line: &str, line_number: usize) -> Result<Option<Command>, LayerError> {
    let Some(captures) = RE_APERTURE_OVAL.captures(line) else {
        return Ok(None);
    };

    let definition = ApertureDefinition::Oval {
        width: required_number(&captures, "width", line_number)?,
        height: required_number(&captures, "height", line_number)?,
    };

    Ok(Some(Command::DefineAperture {
        code: captures["code"].to_string(),
        definition,
    }))
}

fn match_aperture_selection(line: &str, _line_number: usize) -> Result<Option<Command>, LayerError> {
    Ok(RE_APERTURE_SELECTION
        .captures(line)
        .map(|captures| Command::SelectAperture {
            code: captures["code"].to_string(),
        }))
}

fn match_coordinate(line: &str, line_number: usize) -> Result<Option<Command>, LayerError> {
    let Some(captures) = RE_COORDINATE.captures(line) else {
        return Ok(None);
    };

    let x = optional_number(&captures, "x", line_number)?;
    let y = optional_number(&captures, "y", line_number)?;
    let i = optional_number(&captures, "i", line_number)?;
    let j = optional_number(&captures, "j", line_number)?;

    let arc_offset = match (i, j) {
        (Some(i), Some(j)) => Some(Vector::new(i, j)),
        _ => None,
    };

    // a lone '*' matches the expression too, but carries no coordinate
    if x.is_none() && y.is_none() && arc_offset.is_none() {
        return Ok(None);
    }

    let mode = match captures.name("mode").map(|mode| mode.as_str()) {
        Some("2") => DrawMode::Move,
        Some("3") => DrawMode::Flash,
        _ => DrawMode::Draw,
    };

    Ok(Some(Command::Coordinate(CoordinateCommand {
        x,
        y,
        arc_offset,
        mode,
    })))
}

fn optional_number(captures: &Captures, name: &str, line_number: usize) -> Result<Option<f64>, LayerError> {
    captures
        .name(name)
        .map(|literal| parse_number(literal.as_str(), line_number))
        .transpose()
}

fn required_number(captures: &Captures, name: &str, line_number: usize) -> Result<f64, LayerError> {
    parse_number(&captures[name], line_number)
}

/// Always uses '.' as the decimal separator.
fn parse_number(literal: &str, line_number: usize) -> Result<f64, LayerError> {
    literal
        .parse::<f64>()
        .map_err(|source| LayerError::InvalidNumber {
            line_number,
            literal: literal.to_string(),
            source,
        })
}
