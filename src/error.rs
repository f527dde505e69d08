use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

use crate::assembly::LayerKind;

#[derive(Debug, Error)]
pub enum LayerError {
    #[error("Unable to read gerber file. path: {path:?}, cause: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to read gerber source. cause: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    /// A directive matched, but one of its numbers could not be decoded.
    ///
    /// This indicates a corrupt file, rather than an unsupported command, so the whole parse fails.
    #[error("Invalid number. line: {line_number}, literal: '{literal}', cause: {source}")]
    InvalidNumber {
        line_number: usize,
        literal: String,
        #[source]
        source: ParseFloatError,
    },
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Couldn't load {kind} layer although it was specified. cause: {source}")]
    Layer {
        kind: LayerKind,
        #[source]
        source: LayerError,
    },

    #[error("Neither top nor bottom overlay layer was specified")]
    NoSideLayers,
}
