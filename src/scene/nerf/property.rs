//! NeRF scene property implementation.

pub use super::*;

/// Derived properties
impl<B: Backend> NerfScene<B> {
    /// Number of hash-grid levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Number of embedding entries of one level.
    #[inline]
    pub fn level_entry_count(
        &self,
        level: usize,
    ) -> usize {
        self.offsets[level + 1] - self.offsets[level]
    }

    /// Number of occupancy grid cells.
    #[inline]
    pub fn grid_cell_count(&self) -> usize {
        self.density_bitfield.len() * 8
    }

    /// Size of the snapshot in bytes.
    pub fn size(&self) -> usize {
        let weight_count = self
            .sigma_net
            .iter()
            .chain(&self.color_net)
            .map(|weights| weights.dims().iter().product::<usize>())
            .sum::<usize>();
        let entry_count = self.embeddings.dims().iter().product::<usize>();

        (entry_count + weight_count) * 4 + self.density_bitfield.len()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn size_counts_every_parameter() {
        use super::*;
        use burn::backend::NdArray;

        let scene = NerfScene::<NdArray<f32>>::default();

        // 8 entries * 4 features, 5 weight matrices, 32^3 bits.
        let target = (8 * 4 + 2048 + 1024 + 1984 + 4096 + 192) * 4 + 4096;
        let output = scene.size();
        assert_eq!(output, target);
    }
}
