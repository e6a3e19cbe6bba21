//! NeRF scene configuration.

pub use super::*;

use crate::hardware::layout::Layer;
use std::fmt;

/// The configuration for [`NerfScene`].
///
/// Converting the configuration builds a shape-correct zeroed snapshot;
/// the training side installs the trained values afterwards.
#[derive(Clone, PartialEq)]
pub struct NerfSceneConfig<B: Backend> {
    /// Tensor device.
    pub device: B::Device,
    /// `L + 1` hash-grid level boundaries.
    pub offsets: Vec<usize>,
    /// Occupancy grid resolution per axis.
    pub grid_resolution: usize,
}

impl<B: Backend> fmt::Debug for NerfSceneConfig<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("NerfSceneConfig")
            .field("device", &self.device)
            .field("offsets", &self.offsets)
            .field("grid_resolution", &self.grid_resolution)
            .finish()
    }
}

impl<B: Backend> Default for NerfSceneConfig<B> {
    fn default() -> Self {
        Self {
            device: Default::default(),
            offsets: vec![0, 8],
            grid_resolution: 32,
        }
    }
}

impl<B: Backend> From<NerfSceneConfig<B>> for NerfScene<B> {
    fn from(config: NerfSceneConfig<B>) -> Self {
        let device = config.device;
        // T
        let entry_count = config.offsets.last().copied().unwrap_or_default();

        // [T, 4]
        let embeddings = Tensor::zeros([entry_count, FEATURES_PER_ENTRY], &device);

        let sigma_net = [Layer::Sigma0, Layer::Sigma1]
            .map(|layer| Tensor::zeros(layer.shape(), &device))
            .into();
        let color_net = [Layer::Color0, Layer::Color1, Layer::Color2]
            .map(|layer| Tensor::zeros(layer.shape(), &device))
            .into();

        // One bit per grid cell.
        let density_bitfield = vec![0; config.grid_resolution.pow(3) / 8];

        Self {
            embeddings,
            offsets: config.offsets,
            sigma_net,
            color_net,
            density_bitfield,
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn scene_from_config_shapes() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let config = NerfSceneConfig::<NdArray<f32>> {
            device,
            offsets: vec![0, 4, 12],
            grid_resolution: 16,
        };

        let scene = NerfScene::from(config);

        assert_eq!(scene.embeddings.dims(), [12, 4]);
        assert_eq!(scene.level_count(), 2);
        assert_eq!(scene.level_entry_count(0), 4);
        assert_eq!(scene.level_entry_count(1), 8);

        assert_eq!(scene.sigma_net[0].dims(), [64, 32]);
        assert_eq!(scene.sigma_net[1].dims(), [16, 64]);
        assert_eq!(scene.color_net[0].dims(), [64, 31]);
        assert_eq!(scene.color_net[1].dims(), [64, 64]);
        assert_eq!(scene.color_net[2].dims(), [3, 64]);

        assert_eq!(scene.density_bitfield.len(), 512);
        assert_eq!(scene.grid_cell_count(), 4096);
    }
}
