use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;

use log::{debug, info};

use crate::config::{GerberFileSettings, ParserConfiguration};
use crate::diagnostics::Diagnostics;
use crate::error::AssemblyError;
use crate::geometry::BoundingBox;
use crate::layer::GerberLayer;
use crate::spacial::Vector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Top,
    Bottom,
}

/// The physical layers of a board that are needed for an assembly drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    MechanicalOutline,
    TopOverlay,
    TopPaste,
    BottomOverlay,
    BottomPaste,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::MechanicalOutline,
        LayerKind::TopOverlay,
        LayerKind::TopPaste,
        LayerKind::BottomOverlay,
        LayerKind::BottomPaste,
    ];

    /// `None` for layers that belong to both sides, i.e. the outline.
    pub fn side(&self) -> Option<Side> {
        match self {
            LayerKind::MechanicalOutline => None,
            LayerKind::TopOverlay | LayerKind::TopPaste => Some(Side::Top),
            LayerKind::BottomOverlay | LayerKind::BottomPaste => Some(Side::Bottom),
        }
    }
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::MechanicalOutline => write!(f, "mechanical outline"),
            LayerKind::TopOverlay => write!(f, "top overlay"),
            LayerKind::TopPaste => write!(f, "top paste"),
            LayerKind::BottomOverlay => write!(f, "bottom overlay"),
            LayerKind::BottomPaste => write!(f, "bottom paste"),
        }
    }
}

/// The layers of one board, each parsed independently.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    layers: BTreeMap<LayerKind, GerberLayer>,
}

impl Assembly {
    /// Loads every file given in `settings`.
    ///
    /// At least one of the overlays is required, the other layers are optional. A layer that was given but can't be
    /// loaded fails the whole assembly.
    pub fn load(
        settings: &GerberFileSettings,
        config: &ParserConfiguration,
        mut diagnostics: impl Diagnostics,
    ) -> Result<Self, AssemblyError> {
        if settings.top_overlay.is_none() && settings.bottom_overlay.is_none() {
            return Err(AssemblyError::NoSideLayers);
        }

        let files: [(LayerKind, &Option<_>); 5] = [
            (LayerKind::MechanicalOutline, &settings.mechanical_outline),
            (LayerKind::TopOverlay, &settings.top_overlay),
            (LayerKind::TopPaste, &settings.top_paste),
            (LayerKind::BottomOverlay, &settings.bottom_overlay),
            (LayerKind::BottomPaste, &settings.bottom_paste),
        ];

        let mut assembly = Self::default();
        for (kind, path) in files {
            let Some(path) = path else {
                debug!("No file given for {} layer", kind);
                continue;
            };

            let layer = Self::load_layer(kind, path, config, &mut diagnostics)?;
            assembly.insert(kind, layer);
        }

        Ok(assembly)
    }

    fn load_layer(
        kind: LayerKind,
        path: &Path,
        config: &ParserConfiguration,
        diagnostics: impl Diagnostics,
    ) -> Result<GerberLayer, AssemblyError> {
        let parsed = GerberLayer::load_file(path, config, diagnostics).map_err(|source| AssemblyError::Layer {
            kind,
            source,
        })?;
        info!("{} layer loaded successfully", kind);

        Ok(parsed.layer)
    }

    /// Replaces any existing layer of the same kind.
    pub fn insert(&mut self, kind: LayerKind, layer: GerberLayer) -> Option<GerberLayer> {
        self.layers.insert(kind, layer)
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&GerberLayer> {
        self.layers.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// In `LayerKind` order.
    pub fn layers(&self) -> impl Iterator<Item = (LayerKind, &GerberLayer)> {
        self.layers
            .iter()
            .map(|(kind, layer)| (*kind, layer))
    }

    /// The layers drawn together for one side of the board: overlay, paste and outline.
    pub fn layers_for_side(&self, side: Side) -> Vec<(LayerKind, &GerberLayer)> {
        self.layers()
            .filter(|(kind, _)| kind.side().map_or(true, |layer_side| layer_side == side))
            .collect()
    }

    /// Extents of the layers that have shapes, empty layers would otherwise drag the origin to 0,0.
    fn non_empty_extents(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        self.layers
            .values()
            .filter(|layer| !layer.is_empty())
            .map(GerberLayer::find_extents)
    }

    /// The union of the extents of all the non-empty layers.
    pub fn combined_extents(&self) -> Option<BoundingBox> {
        self.non_empty_extents()
            .reduce(|mut combined, extents| {
                combined.expand(&extents);
                combined
            })
    }

    /// The smallest left and top of all the non-empty layers.
    pub fn common_origin(&self) -> Option<Vector> {
        self.combined_extents()
            .map(|extents| extents.min.coords)
    }

    /// Relocates every layer so that no shape is left of, or above, 0,0.
    ///
    /// Returns the offset that was subtracted, or `None` when there was nothing to align.
    pub fn align_to_origin(&mut self) -> Option<Vector> {
        let offset = self.common_origin()?;

        for (kind, layer) in self.layers.iter_mut() {
            debug!("Aligning {} layer", kind);
            layer.relocate(offset);
        }

        Some(offset)
    }
}
