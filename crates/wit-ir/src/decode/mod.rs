//! Decodes the canonical WIT JSON document produced by the upstream WIT
//! toolchain into a [`crate::Resolve`].
//!
//! The walk is depth-first and forward-only: cross-references are resolved
//! by growing the target arena with placeholders the first time an index is
//! seen, then overwriting that slot once the real definition is reached in
//! document order (see [`builder::Builder`]).

mod builder;
mod json;

use std::io::Read;

use crate::Resolve;

pub use json::Path;

/// All error conditions the decoder can surface, per the error taxonomy in
/// the design notes: schema violations are reported with enough context
/// (a dotted JSON path) to locate the offending value, while anything from
/// the underlying reader or raw JSON syntax is propagated as [`DecodeError::Io`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("error reading WIT JSON: {0}")]
    Io(String),

    #[error("unexpected token at {path}: {message}")]
    UnexpectedToken { path: Path, message: String },

    #[error("unknown primitive type name {name:?} at {path}")]
    UnknownPrimitive { path: Path, name: String },

    #[error("index {index} out of bounds for `{array}` (len {len}) at {path}")]
    BadIndex {
        path: Path,
        array: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid package identifier {ident:?} at {path}: {source}")]
    BadIdent {
        path: Path,
        ident: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid semver {version:?} at {path}")]
    BadVersion { path: Path, version: String },
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        DecodeError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Io(e.to_string())
    }
}

/// Decodes a full [`Resolve`] from `reader`.
///
/// `reader` is consumed in a single pass; the JSON is first tokenized by
/// `serde_json` into a generic value tree (so that malformed JSON syntax
/// surfaces as [`DecodeError::Io`] exactly as upstream reports it), and then
/// walked once, depth-first, by [`builder::Builder`], which is where every
/// schema-level error in this module originates.
pub fn decode(mut reader: impl Read) -> Result<Resolve, DecodeError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    decode_str(&text)
}

/// Decodes a full [`Resolve`] from an in-memory JSON string.
#[tracing::instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn decode_str(text: &str) -> Result<Resolve, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let resolve = builder::Builder::new().build(&value)?;
    tracing::debug!(
        worlds = resolve.worlds.len(),
        interfaces = resolve.interfaces.len(),
        typedefs = resolve.typedefs.len(),
        packages = resolve.packages.len(),
        "decoded WIT document"
    );
    Ok(resolve)
}
