//! Biome classification thresholds.

use serde::{Deserialize, Serialize};

/// Elevation tier cut-offs and override thresholds, all in normalized units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeConfig {
    /// At or below: deep ocean.
    pub deep_ocean_level: f32,
    /// At or below: ocean.
    pub sea_level: f32,
    /// At or below: beach.
    pub beach_level: f32,
    /// At or above: alpine.
    pub alpine_line: f32,
    /// At or above: snow peak.
    pub snow_line: f32,

    /// Moisture at or above which lowland becomes marsh.
    pub marsh_moisture: f32,
    /// Rainfall floor for the marsh override.
    pub marsh_rainfall: f32,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            deep_ocean_level: 0.15,
            sea_level: 0.30,
            beach_level: 0.33,
            alpine_line: 0.78,
            snow_line: 0.88,
            marsh_moisture: 0.85,
            marsh_rainfall: 0.45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        let cfg = BiomeConfig::default();
        assert!(cfg.deep_ocean_level < cfg.sea_level);
        assert!(cfg.sea_level < cfg.beach_level);
        assert!(cfg.beach_level < cfg.alpine_line);
        assert!(cfg.alpine_line < cfg.snow_line);
    }
}
