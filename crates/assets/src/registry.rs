use std::collections::HashMap;

use crate::{AssetError, ChainTypeDefinition, UvRect};

/// Name of the chain type registered by [`ChainTypeRegistry::with_defaults`].
pub const DEFAULT_CHAIN_TYPE: &str = "iron_chain";

/// Dense numeric id of a registered chain type.
pub type ChainTypeId = u16;

/// A chain style: one UV rectangle per crossed face.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainType {
    /// Human-readable identifier (e.g., "iron_chain").
    pub name: String,
    side_a: UvRect,
    side_b: UvRect,
}

impl ChainType {
    /// Construct a chain type, validating both UV rectangles.
    pub fn new(name: impl Into<String>, side_a: UvRect, side_b: UvRect) -> Result<Self, AssetError> {
        let name = name.into();
        for uv in [&side_a, &side_b] {
            uv.validate().map_err(|reason| AssetError::InvalidUv {
                name: name.clone(),
                reason,
            })?;
        }
        Ok(Self {
            name,
            side_a,
            side_b,
        })
    }

    /// Construct from the JSON definition.
    pub fn from_definition(def: ChainTypeDefinition) -> Result<Self, AssetError> {
        Self::new(
            def.name,
            UvRect::from_array(def.side_a),
            UvRect::from_array(def.side_b),
        )
    }

    /// UV rectangle of the +45° face.
    pub fn side_a(&self) -> &UvRect {
        &self.side_a
    }

    /// UV rectangle of the -45° face.
    pub fn side_b(&self) -> &UvRect {
        &self.side_b
    }
}

/// Registry storing chain types keyed by id and name.
#[derive(Debug, Clone)]
pub struct ChainTypeRegistry {
    types: Vec<ChainType>,
    name_to_id: HashMap<String, ChainTypeId>,
}

impl ChainTypeRegistry {
    /// Construct a registry, rejecting empty tables and duplicate names.
    pub fn new(types: Vec<ChainType>) -> Result<Self, AssetError> {
        if types.is_empty() {
            return Err(AssetError::Empty);
        }
        let mut name_to_id = HashMap::new();
        for (id, chain_type) in types.iter().enumerate() {
            if name_to_id
                .insert(chain_type.name.clone(), id as ChainTypeId)
                .is_some()
            {
                return Err(AssetError::Duplicate(chain_type.name.clone()));
            }
        }
        Ok(Self { types, name_to_id })
    }

    /// Registry holding the built-in iron chain (3px wide faces side by side).
    pub fn with_defaults() -> Self {
        let iron = ChainType {
            name: DEFAULT_CHAIN_TYPE.to_string(),
            side_a: UvRect::new(0.0, 0.0, 3.0, 16.0),
            side_b: UvRect::new(3.0, 0.0, 6.0, 16.0),
        };
        let mut name_to_id = HashMap::new();
        name_to_id.insert(iron.name.clone(), 0);
        Self {
            types: vec![iron],
            name_to_id,
        }
    }

    /// Look up a chain type by numeric id.
    pub fn get(&self, id: ChainTypeId) -> Option<&ChainType> {
        self.types.get(id as usize)
    }

    /// Resolve a chain type id by its name.
    pub fn id_by_name(&self, name: &str) -> Option<ChainTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Look up a chain type by name, failing for unregistered names.
    pub fn by_name(&self, name: &str) -> Result<&ChainType, AssetError> {
        self.id_by_name(name)
            .and_then(|id| self.get(id))
            .ok_or_else(|| AssetError::Unknown(name.to_string()))
    }

    /// Number of registered chain types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when the registry holds no chain types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate chain types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ChainType> {
        self.types.iter()
    }
}
