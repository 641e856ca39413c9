use std::fs;
use std::path::Path;

use crate::{AssetError, ChainType, ChainTypeRegistry};

/// Load a chain type registry from the provided JSON file path.
pub fn registry_from_file(path: &Path) -> Result<ChainTypeRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    registry_from_str(&data)
}

/// Load a chain type registry from an in-memory JSON string.
pub fn registry_from_str(input: &str) -> Result<ChainTypeRegistry, AssetError> {
    let defs = crate::load_chain_types_from_str(input)?;
    let types = defs
        .into_iter()
        .map(ChainType::from_definition)
        .collect::<Result<Vec<_>, _>>()?;
    ChainTypeRegistry::new(types)
}
