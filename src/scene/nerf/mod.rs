pub mod config;
pub mod export;
pub mod property;

pub use crate::error::Error;
pub use burn::tensor::{backend::Backend, Tensor, TensorData};
pub use config::*;

use std::fmt;

/// Features stored per hash-grid entry.
pub const FEATURES_PER_ENTRY: usize = 4;

/// A trained NeRF scene snapshot.
///
/// The snapshot holds the tensors the hardware exporter reads: the
/// hash-grid embedding table with its level boundaries, the sigma and
/// color network weights, and the packed occupancy bitfield. Training,
/// encoder math, and rendering happen elsewhere.
pub struct NerfScene<B: Backend> {
    /// `[T, 4]` where `T` is the last offset.
    pub embeddings: Tensor<B, 2>,
    /// `L + 1` monotonically non-decreasing boundaries into the
    /// embedding rows. Level `i` occupies `offsets[i]..offsets[i + 1]`.
    pub offsets: Vec<usize>,
    /// Sigma network weights, one `[rows, cols]` tensor per layer.
    pub sigma_net: Vec<Tensor<B, 2>>,
    /// Color network weights, one `[rows, cols]` tensor per layer.
    pub color_net: Vec<Tensor<B, 2>>,
    /// Packed occupancy bits, one per grid cell.
    pub density_bitfield: Vec<u8>,
}

impl<B: Backend> fmt::Debug for NerfScene<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("NerfScene")
            .field("embeddings.dims()", &self.embeddings.dims())
            .field("offsets", &self.offsets)
            .field("sigma_net.len()", &self.sigma_net.len())
            .field("color_net.len()", &self.color_net.len())
            .field("density_bitfield.len()", &self.density_bitfield.len())
            .finish()
    }
}

impl<B: Backend> Default for NerfScene<B> {
    #[inline]
    fn default() -> Self {
        NerfSceneConfig::default().into()
    }
}
