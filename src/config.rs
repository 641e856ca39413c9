use anyhow::Result;
use hangchain_assets::{registry_from_file, ChainTypeRegistry};
use hangchain_render::{MeshSettings, DEFAULT_CACHE_CAPACITY, DEFAULT_HANG_AMOUNT, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CHAINS_PATH: &str = "config/chains.toml";
pub const DEFAULT_CHAIN_TYPES_PATH: &str = "config/chain_types.json";

const QUALITY_RANGE: (f32, f32) = (1.0, 9.0);
const HANG_AMOUNT_RANGE: (f32, f32) = (1.0, 32.0);

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainsConfig {
    /// Segments per block of chain length (1 to 9).
    pub quality: f32,
    /// Catenary parameter; larger values hang tauter (1 to 32).
    pub hang_amount: f32,
    /// Baked meshes kept before the least recently used is evicted.
    pub cache_capacity: usize,
    /// Route chains through the mesh cache instead of rebuilding every frame.
    pub bake: bool,
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            hang_amount: DEFAULT_HANG_AMOUNT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            bake: true,
        }
    }
}

impl ChainsConfig {
    /// Load chain configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CHAINS_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ChainsConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ChainsConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CHAINS_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Chain config not found at {}. Using defaults",
                        path.display()
                    );
                }
                ChainsConfig::default()
            }
        }
    }

    /// Save chain configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Clamp tunables into their supported ranges.
    pub fn sanitized(mut self) -> Self {
        self.quality = clamp_or_default(self.quality, QUALITY_RANGE, DEFAULT_QUALITY, "quality");
        self.hang_amount = clamp_or_default(
            self.hang_amount,
            HANG_AMOUNT_RANGE,
            DEFAULT_HANG_AMOUNT,
            "hang_amount",
        );
        self
    }

    pub fn mesh_settings(&self) -> MeshSettings {
        MeshSettings {
            quality: self.quality,
            hang_amount: self.hang_amount,
        }
    }
}

fn clamp_or_default(value: f32, (min, max): (f32, f32), default: f32, field: &str) -> f32 {
    if !value.is_finite() {
        warn!(field, value, "non-finite chain setting, using default");
        return default;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field, value, clamped, "chain setting out of range, clamped");
    }
    clamped
}

/// Load chain types from the default path, falling back to built-ins.
pub fn load_chain_types() -> ChainTypeRegistry {
    load_chain_types_from_path(Path::new(DEFAULT_CHAIN_TYPES_PATH))
}

/// Load chain types from JSON, logging and falling back to built-ins on failure.
pub fn load_chain_types_from_path(path: &Path) -> ChainTypeRegistry {
    match registry_from_file(path) {
        Ok(registry) => registry,
        Err(err) => {
            warn!(
                "Failed to load chain types {}: {err}. Using defaults",
                path.display()
            );
            ChainTypeRegistry::with_defaults()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("hangchain-{name}-{nanos}"))
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: ChainsConfig = toml::from_str("quality = 2").unwrap();
        assert_eq!(cfg.quality, 2.0);
        assert_eq!(cfg.hang_amount, DEFAULT_HANG_AMOUNT);
        assert_eq!(cfg.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(cfg.bake);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = ChainsConfig {
            quality: 40.0,
            hang_amount: 0.1,
            ..ChainsConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.quality, 9.0);
        assert_eq!(cfg.hang_amount, 1.0);

        let cfg = ChainsConfig {
            quality: f32::NAN,
            ..ChainsConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.quality, DEFAULT_QUALITY);
    }

    #[test]
    fn missing_or_malformed_files_fall_back_to_defaults() {
        let missing = temp_path("missing.toml");
        assert_eq!(ChainsConfig::load_from_path(&missing), ChainsConfig::default());

        let broken = temp_path("broken.toml");
        fs::write(&broken, "quality = [").unwrap();
        assert_eq!(ChainsConfig::load_from_path(&broken), ChainsConfig::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let path = temp_path("chains").join("chains.toml");
        let cfg = ChainsConfig {
            quality: 6.0,
            hang_amount: 12.0,
            cache_capacity: 64,
            bake: false,
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(ChainsConfig::load_from_path(&path), cfg);
        assert_eq!(cfg.mesh_settings().segment_length(), 1.0 / 6.0);
    }

    #[test]
    fn chain_types_fall_back_to_builtins() {
        let registry = load_chain_types_from_path(&temp_path("types.json"));
        assert_eq!(registry.len(), 1);
        assert!(registry.id_by_name(hangchain_assets::DEFAULT_CHAIN_TYPE).is_some());
    }

    #[test]
    fn shipped_chain_types_parse() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CHAIN_TYPES_PATH);
        let registry = registry_from_file(&path).expect("shipped chain types are valid");
        assert!(registry.id_by_name(hangchain_assets::DEFAULT_CHAIN_TYPE).is_some());
    }
}
