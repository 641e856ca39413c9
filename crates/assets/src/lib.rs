#![warn(missing_docs)]
//! Chain type tables: UV rectangles, per-face textures and pack validation.

mod loader;
mod registry;
mod uv;

pub use loader::{registry_from_file, registry_from_str};
pub use registry::{ChainType, ChainTypeId, ChainTypeRegistry, DEFAULT_CHAIN_TYPE};
pub use uv::{UvRect, PIXELS_PER_UNIT};

use serde::Deserialize;
use thiserror::Error;

/// Chain type definition as authored in `chain_types.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainTypeDefinition {
    /// Identifier used to look the type up (e.g., "iron_chain").
    pub name: String,
    /// Atlas pixel bounds `[x0, y0, x1, y1]` for the +45° face.
    pub side_a: [f32; 4],
    /// Atlas pixel bounds `[x0, y0, x1, y1]` for the -45° face.
    pub side_b: [f32; 4],
}

/// Errors emitted while loading chain type tables.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading tables.
    #[error("failed to read chain types: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse chain types: {0}")]
    Parse(#[from] serde_json::Error),
    /// A UV rectangle is empty, inverted or not finite.
    #[error("chain type '{name}' has an invalid UV rectangle: {reason}")]
    InvalidUv {
        /// Chain type the rectangle belongs to.
        name: String,
        /// Human-readable description of the problem.
        reason: String,
    },
    /// Two entries share the same name.
    #[error("duplicate chain type '{0}'")]
    Duplicate(String),
    /// The table does not define any chain types.
    #[error("chain type table is empty")]
    Empty,
    /// Lookup of a chain type that was never registered.
    #[error("unknown chain type '{0}'")]
    Unknown(String),
}

/// Parse a JSON string into a list of chain type definitions.
pub fn load_chain_types_from_str(input: &str) -> Result<Vec<ChainTypeDefinition>, AssetError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definitions() {
        let json = r#"[
            {"name": "iron_chain", "side_a": [0, 0, 3, 16], "side_b": [3, 0, 6, 16]}
        ]"#;
        let defs = load_chain_types_from_str(json).expect("valid json");
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "iron_chain");
        assert_eq!(defs[0].side_b, [3.0, 0.0, 6.0, 16.0]);
    }

    #[test]
    fn rejects_missing_uv_set() {
        let json = r#"[{"name": "rope", "side_a": [0, 0, 3, 16]}]"#;
        let err = load_chain_types_from_str(json).unwrap_err();
        assert!(matches!(err, AssetError::Parse(_)));
    }
}
