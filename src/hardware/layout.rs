//! Weight-stationary buffer layout.
//!
//! The inference engine reads each layer's weights as one flat buffer in
//! a fixed per-layer order. Every layer has its own rule; there is no
//! generic case. The rules are kept as data so a hardware layout change
//! stays a table edit.

pub use super::Error;

/// Hidden width of the sigma and color networks.
pub const HIDDEN_DIM: usize = 64;

/// Encoded position features entering the sigma network.
pub const SIGMA_IN_DIM: usize = 32;

/// Density and geometry features leaving the sigma network.
pub const SIGMA_OUT_DIM: usize = 16;

/// Geometry and encoded direction features entering the color network.
pub const COLOR_IN_DIM: usize = 31;

/// RGB channels leaving the color network.
pub const COLOR_OUT_DIM: usize = 3;

/// Column width of one weight-stationary group.
pub const GROUP_DIM: usize = 16;

/// Identity of an exported network layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layer {
    /// Sigma network input layer.
    Sigma0,
    /// Sigma network output layer.
    Sigma1,
    /// Color network input layer.
    Color0,
    /// Color network hidden layer.
    Color1,
    /// Color network output layer.
    Color2,
}

/// Reordering rule applied to one quantized weight matrix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transform {
    /// Flatten row-major with no reshape.
    Flatten,
    /// Split the columns into groups of the given width, stack the groups
    /// along the row axis, then flatten row-major.
    SplitColumns(usize),
    /// Prepend one zero column, then flatten row-major.
    ///
    /// The zero column stands for the reserved input channel of the
    /// hardware's fixed channel count.
    PrependZeroColumn,
    /// Transpose, append one zero column, then flatten row-major.
    TransposeAppendZeroColumn,
}

impl Layer {
    /// The layers in export order.
    pub const ALL: [Self; 5] = [
        Self::Sigma0,
        Self::Sigma1,
        Self::Color0,
        Self::Color1,
        Self::Color2,
    ];

    /// Expected weight shape, `[rows, cols]`. A row is one output channel.
    #[inline]
    pub const fn shape(&self) -> [usize; 2] {
        match self {
            Self::Sigma0 => [HIDDEN_DIM, SIGMA_IN_DIM],
            Self::Sigma1 => [SIGMA_OUT_DIM, HIDDEN_DIM],
            Self::Color0 => [HIDDEN_DIM, COLOR_IN_DIM],
            Self::Color1 => [HIDDEN_DIM, HIDDEN_DIM],
            Self::Color2 => [COLOR_OUT_DIM, HIDDEN_DIM],
        }
    }

    /// Reordering rule of the layer.
    #[inline]
    pub const fn rule(&self) -> Transform {
        match self {
            Self::Sigma0 => Transform::Flatten,
            Self::Sigma1 => Transform::SplitColumns(GROUP_DIM),
            Self::Color0 => Transform::PrependZeroColumn,
            Self::Color1 => Transform::Flatten,
            Self::Color2 => Transform::TransposeAppendZeroColumn,
        }
    }

    /// Element count of the transformed buffer.
    #[inline]
    pub const fn output_len(&self) -> usize {
        let shape = self.shape();
        let rows = shape[0];
        let cols = shape[1];
        match self.rule() {
            Transform::Flatten | Transform::SplitColumns(_) => rows * cols,
            Transform::PrependZeroColumn => rows * (cols + 1),
            Transform::TransposeAppendZeroColumn => cols * (rows + 1),
        }
    }

    /// Reorder one quantized weight matrix into the hardware buffer order.
    ///
    /// ## Errors
    ///
    /// [`Error::MismatchedShape`] when `dims` differs from [`Self::shape`].
    pub fn transform(
        &self,
        weights: &[i16],
        dims: [usize; 2],
    ) -> Result<Vec<i16>, Error> {
        if dims != self.shape() || weights.len() != dims[0] * dims[1] {
            return Err(Error::MismatchedShape {
                layer: *self,
                expected: self.shape(),
                found: dims,
            });
        }

        let [rows, cols] = dims;
        let output = match self.rule() {
            Transform::Flatten => weights.to_vec(),
            Transform::SplitColumns(group) => {
                let mut output = Vec::with_capacity(rows * cols);
                for start in (0..cols).step_by(group) {
                    for row in 0..rows {
                        let index = row * cols + start;
                        output.extend_from_slice(&weights[index..index + group]);
                    }
                }
                output
            },
            Transform::PrependZeroColumn => {
                let mut output = Vec::with_capacity(rows * (cols + 1));
                for row in weights.chunks_exact(cols) {
                    output.push(0);
                    output.extend_from_slice(row);
                }
                output
            },
            Transform::TransposeAppendZeroColumn => {
                let mut output = Vec::with_capacity(cols * (rows + 1));
                for col in 0..cols {
                    for row in 0..rows {
                        output.push(weights[row * cols + col]);
                    }
                    output.push(0);
                }
                output
            },
        };

        debug_assert_eq!(output.len(), self.output_len());

        Ok(output)
    }
}
