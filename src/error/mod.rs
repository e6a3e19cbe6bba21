use crate::hardware::layout::Layer;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bitfield token: {0:#04x}")]
    InvalidBitfieldToken(u8),

    #[error("Invalid chunk length: {0} should be non-negative")]
    InvalidChunkLength(i32),

    #[error("Misaligned bitfield: {0} bytes should be whole blocks of {1} bits")]
    MisalignedBitfield(usize, usize),

    #[error("Mismatched layer count: {found} should be {expected}")]
    MismatchedLayerCount { expected: usize, found: usize },

    #[error("Mismatched offsets: {0}")]
    MismatchedOffsets(String),

    #[error("Mismatched shape for {layer:?}: {found:?} should be {expected:?}")]
    MismatchedShape {
        layer: Layer,
        expected: [usize; 2],
        found: [usize; 2],
    },

    #[error("Oversized chunk: {0} bytes should fit a 32-bit length prefix")]
    OversizedChunk(usize),

    #[error("Truncated bitfield stream: it should have {0} more bytes")]
    TruncatedBitfield(usize),
}
