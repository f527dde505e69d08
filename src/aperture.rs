use std::collections::HashMap;

use log::{debug, trace};

/// A drawing tool, all dimensions are in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApertureDefinition {
    Circle { diameter: f64 },
    Rectangle { width: f64, height: f64 },
    Oval { width: f64, height: f64 },
}

impl ApertureDefinition {
    /// Only a circle can be used to stroke a line.
    pub fn stroke_width(&self) -> Option<f64> {
        match self {
            ApertureDefinition::Circle {
                diameter,
            } => Some(*diameter),
            ApertureDefinition::Rectangle {
                ..
            }
            | ApertureDefinition::Oval {
                ..
            } => None,
        }
    }
}

/// Apertures by their identifier, e.g. `"10"` for `D10`.
///
/// The empty identifier is always bound to the default aperture and is what unknown identifiers resolve to.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureTable {
    apertures: HashMap<String, ApertureDefinition>,
}

impl ApertureTable {
    pub const DEFAULT_CODE: &'static str = "";

    pub fn new(default_diameter: f64) -> Self {
        let mut apertures = HashMap::new();
        apertures.insert(Self::DEFAULT_CODE.to_string(), ApertureDefinition::Circle {
            diameter: default_diameter,
        });

        Self {
            apertures,
        }
    }

    /// Inserts or replaces the aperture for `code`.
    ///
    /// The default aperture can't be replaced, returns `false` when `code` is [`Self::DEFAULT_CODE`].
    pub fn define(&mut self, code: impl Into<String>, definition: ApertureDefinition) -> bool {
        let code = code.into();
        if code == Self::DEFAULT_CODE {
            debug!("Refusing to redefine the default aperture. definition: {:?}", definition);
            return false;
        }

        trace!("Defining aperture. code: '{}', definition: {:?}", code, definition);
        self.apertures.insert(code, definition);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.apertures.contains_key(code)
    }

    /// Never fails, unknown codes resolve to the default aperture.
    pub fn resolve(&self, code: &str) -> ApertureDefinition {
        self.apertures
            .get(code)
            .or_else(|| self.apertures.get(Self::DEFAULT_CODE))
            .copied()
            .unwrap_or(ApertureDefinition::Circle {
                diameter: 0.0,
            })
    }

    pub fn default_aperture(&self) -> ApertureDefinition {
        self.resolve(Self::DEFAULT_CODE)
    }

    pub fn len(&self) -> usize {
        self.apertures.len()
    }

    /// Always false, the default aperture is always present.
    pub fn is_empty(&self) -> bool {
        self.apertures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApertureDefinition)> {
        self.apertures
            .iter()
            .map(|(code, definition)| (code.as_str(), definition))
    }
}

impl Default for ApertureTable {
    fn default() -> Self {
        Self::new(0.1)
    }
}
