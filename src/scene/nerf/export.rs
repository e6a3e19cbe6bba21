//! NeRF scene hardware export implementation.

pub use super::*;

use crate::hardware::{
    bitfield::{self, BLOCK_BITS},
    layout::Layer,
    quantize::Quantizer,
    stream::ChunkWriter,
};
use humansize::{format_size, BINARY};
use std::{
    fs::{remove_file, rename, File},
    io::{BufWriter, Write},
    path::Path,
};

/// Scene exporters
impl<B: Backend> NerfScene<B> {
    /// Encode the scene as the fixed-point hardware parameter stream.
    ///
    /// Chunks are written in the order the inference engine reads them:
    /// one embedding chunk per grid level, the five transformed weight
    /// layers, then the compressed occupancy bitfield. The snapshot is
    /// validated before the first byte is written.
    pub fn encode_hardware(
        &self,
        writer: &mut impl Write,
    ) -> Result<(), Error> {
        self.validate()?;

        let quantizer = Quantizer::init();
        let writer = &mut ChunkWriter::new(BufWriter::new(writer));

        // NOTE: The data type is converted.
        let embeddings = self
            .embeddings
            .to_owned()
            .into_data()
            .convert::<f32>()
            .into_vec()
            .unwrap();
        let codes = quantizer.quantize(&embeddings);
        for level in 0..self.level_count() {
            let start = self.offsets[level] * FEATURES_PER_ENTRY;
            let end = self.offsets[level + 1] * FEATURES_PER_ENTRY;
            writer.write_codes(&codes[start..end])?;
        }

        for (layer, weights) in Layer::ALL.iter().zip(self.weights()) {
            let dims = weights.dims();
            // NOTE: The data type is converted.
            let weights = weights
                .to_owned()
                .into_data()
                .convert::<f32>()
                .into_vec()
                .unwrap();
            let codes = layer.transform(&quantizer.quantize(&weights), dims)?;
            writer.write_codes(&codes)?;
        }

        let compressed = bitfield::compress(&self.density_bitfield, BLOCK_BITS)?;
        writer.write_bytes(&compressed)?;

        writer.flush()?;

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "nerf::exporter::scene::nerf",
            "encode_hardware",
        );

        Ok(())
    }

    /// Save the hardware parameter stream at the given path.
    ///
    /// The stream goes to a sibling temporary file first and is renamed
    /// over the destination, so a pre-existing file is either fully
    /// replaced or left untouched.
    pub fn save_hardware_parameters(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let path_temp = path.with_extension("part");

        let mut file = File::create(&path_temp)?;
        let result = self
            .encode_hardware(&mut file)
            .and_then(|_| Ok(file.sync_all()?));
        drop(file);
        if let Err(error) = result {
            let _ = remove_file(&path_temp);
            return Err(error);
        }

        if let Err(error) = rename(&path_temp, path) {
            let _ = remove_file(&path_temp);
            return Err(error.into());
        }

        log::info!(
            target: "nerf::exporter::scene::nerf",
            "save_hardware_parameters > {}",
            format_size(self.size(), BINARY),
        );

        Ok(())
    }

    /// Validate the snapshot against the fixed hardware contract.
    pub fn validate(&self) -> Result<(), Error> {
        if self.offsets.len() < 2
            || self.offsets.windows(2).any(|pair| pair[0] > pair[1])
        {
            return Err(Error::MismatchedOffsets(format!(
                "{:?} should be at least two non-decreasing boundaries",
                self.offsets,
            )));
        }

        // NOTE: The offsets are validated previously.
        let entry_count = *self.offsets.last().unwrap();
        if self.embeddings.dims() != [entry_count, FEATURES_PER_ENTRY] {
            return Err(Error::MismatchedOffsets(format!(
                "embeddings of {:?} should cover {entry_count} entries",
                self.embeddings.dims(),
            )));
        }

        let layer_count = self.sigma_net.len() + self.color_net.len();
        if layer_count != Layer::ALL.len() {
            return Err(Error::MismatchedLayerCount {
                expected: Layer::ALL.len(),
                found: layer_count,
            });
        }
        for (layer, weights) in Layer::ALL.iter().zip(self.weights()) {
            let dims = weights.dims();
            if dims != layer.shape() {
                return Err(Error::MismatchedShape {
                    layer: *layer,
                    expected: layer.shape(),
                    found: dims,
                });
            }
        }

        if self.density_bitfield.len() % (BLOCK_BITS / 8) != 0 {
            return Err(Error::MisalignedBitfield(
                self.density_bitfield.len(),
                BLOCK_BITS,
            ));
        }

        Ok(())
    }

    #[inline]
    fn weights(&self) -> impl Iterator<Item = &Tensor<B, 2>> {
        self.sigma_net.iter().chain(&self.color_net)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn encode_one_level_grid() {
        use super::*;
        use crate::hardware::stream::ChunkReader;
        use burn::backend::NdArray;
        use std::io::Cursor;

        type B = NdArray<f32>;

        let device = Default::default();
        let mut scene = NerfScene::from(NerfSceneConfig::<B> {
            device,
            offsets: vec![0, 4],
            grid_resolution: 16,
        });
        scene.embeddings = Tensor::from_data(
            TensorData::new(
                (0..16).map(|index| index as f32 * 0.25).collect::<Vec<_>>(),
                [4, FEATURES_PER_ENTRY],
            ),
            &scene.embeddings.device(),
        );

        let mut encoded = vec![];
        scene.encode_hardware(&mut encoded).unwrap();

        let mut reader = ChunkReader::new(Cursor::new(encoded));
        let chunk = reader.read_chunk().unwrap();
        assert_eq!(chunk.len(), 4 * 4 * 2);

        let target = (0..16).map(|index| index * 256).collect::<Vec<i16>>();
        let output = bytemuck::pod_collect_to_vec::<u8, i16>(&chunk);
        assert_eq!(output, target);
    }

    #[test]
    fn encode_chunks_in_fixed_order() {
        use super::*;
        use crate::hardware::stream::ChunkReader;
        use burn::backend::NdArray;
        use std::io::Cursor;

        type B = NdArray<f32>;

        let scene = NerfScene::<B>::default();

        let mut encoded = vec![];
        scene.encode_hardware(&mut encoded).unwrap();

        let mut reader = ChunkReader::new(Cursor::new(encoded));
        let mut chunks = vec![];
        // L + 6 chunks for an L-level grid.
        for _ in 0..scene.level_count() + 6 {
            chunks.push(reader.read_chunk().unwrap());
        }
        assert!(reader.read_chunk().is_err());

        let target = [64, 4096, 2048, 4096, 8192, 512];
        let output = chunks[..6].iter().map(Vec::len).collect::<Vec<_>>();
        assert_eq!(output, target);

        // All-zero color layer 0 stays all zero after the column prepend.
        assert!(chunks[3].iter().all(|&byte| byte == 0));

        let target = bitfield::compress(&scene.density_bitfield, BLOCK_BITS).unwrap();
        assert_eq!(chunks[6], target);
    }

    #[test]
    fn reject_mismatched_snapshots_before_writing() {
        use super::*;
        use burn::backend::NdArray;

        type B = NdArray<f32>;

        let device = Default::default();

        let mut scene = NerfScene::<B>::default();
        scene.sigma_net[1] = Tensor::zeros([64, 64], &device);
        let mut encoded = vec![];
        assert!(scene.encode_hardware(&mut encoded).is_err());
        assert!(encoded.is_empty());

        let mut scene = NerfScene::<B>::default();
        scene.offsets = vec![8, 0];
        assert!(scene.validate().is_err());

        let mut scene = NerfScene::<B>::default();
        scene.color_net.pop();
        assert!(scene.validate().is_err());

        let mut scene = NerfScene::<B>::default();
        scene.density_bitfield.pop();
        assert!(scene.validate().is_err());
    }

    #[test]
    fn save_and_overwrite() {
        use super::*;
        use burn::backend::NdArray;

        type B = NdArray<f32>;

        let dir = std::env::temp_dir().join("nerf-exporter");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.params");

        let scene = NerfScene::<B>::default();
        scene.save_hardware_parameters(&path).unwrap();
        let target = std::fs::read(&path).unwrap();

        scene.save_hardware_parameters(&path).unwrap();
        let output = std::fs::read(&path).unwrap();
        assert_eq!(output, target);
        assert!(!path.with_extension("part").exists());

        std::fs::remove_file(&path).ok();
    }
}
