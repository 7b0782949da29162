//! Procedural generation for the terrain height field and level layout.

pub mod placement;
pub mod terrain;

pub use placement::*;
pub use terrain::*;
