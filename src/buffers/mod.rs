//! Input pixel buffers for stereogram synthesis
//!
//! Both buffer types are read-only once handed to a generator; callers must
//! not mutate them while a synthesis is in flight.

/// Grayscale depth buffers and level operations
pub mod depthmap;
/// Tileable texture buffers, procedural and bitmap-backed
pub mod texture;

pub use depthmap::DepthMap;
pub use texture::{Texture, TextureType};
