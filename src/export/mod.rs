//! Map export: PNG previews of the generated world.

mod png;

pub use png::{export_biome_png, export_elevation_png, ExportError};
