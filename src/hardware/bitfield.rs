//! Occupancy bitfield compression.
//!
//! The occupancy grid is mostly empty space, so the packed bitfield is
//! run-length encoded over 32-bit blocks: `0x00 run` for all-zero
//! blocks, `0xFF run` for all-one blocks, and `0x01` followed by the
//! literal block bytes for a mixed block. A run covers 1 to 255 blocks.
//! The scheme is deterministic and lossless; [`decompress`] reconstructs
//! the exact input bit pattern.

pub use super::Error;

/// Bits of one compression block.
pub const BLOCK_BITS: usize = 32;

const TOKEN_ZERO: u8 = 0x00;
const TOKEN_RAW: u8 = 0x01;
const TOKEN_FULL: u8 = 0xFF;
const RUN_MAX: usize = u8::MAX as usize;

/// Compress a packed occupancy bitfield over blocks of `block_bits`.
///
/// ## Errors
///
/// [`Error::MisalignedBitfield`] when the bitfield is not a whole number
/// of blocks, or when `block_bits` is not a whole number of bytes.
pub fn compress(
    bitfield: &[u8],
    block_bits: usize,
) -> Result<Vec<u8>, Error> {
    let block_bytes = to_block_bytes(bitfield.len(), block_bits)?;

    let mut output = Vec::new();
    let mut blocks = bitfield.chunks_exact(block_bytes).peekable();
    while let Some(block) = blocks.next() {
        let token = to_token(block);
        if token == TOKEN_RAW {
            output.push(TOKEN_RAW);
            output.extend_from_slice(block);
            continue;
        }

        let mut run = 1_usize;
        while run < RUN_MAX
            && blocks.peek().is_some_and(|next| to_token(next) == token)
        {
            blocks.next();
            run += 1;
        }
        output.push(token);
        output.push(run as u8);
    }

    Ok(output)
}

/// Decompress the output of [`compress`] back into the exact bitfield.
///
/// A zero run length decodes to nothing.
///
/// ## Errors
///
/// [`Error::InvalidBitfieldToken`] on an unknown token, and
/// [`Error::TruncatedBitfield`] when a token's operand runs past the end
/// of the data.
pub fn decompress(
    data: &[u8],
    block_bits: usize,
) -> Result<Vec<u8>, Error> {
    let block_bytes = to_block_bytes(0, block_bits)?;

    let mut output = Vec::new();
    let mut index = 0;
    while index < data.len() {
        let token = data[index];
        index += 1;
        match token {
            TOKEN_RAW => {
                let end = index + block_bytes;
                if end > data.len() {
                    return Err(Error::TruncatedBitfield(end - data.len()));
                }
                output.extend_from_slice(&data[index..end]);
                index = end;
            },
            TOKEN_ZERO | TOKEN_FULL => {
                if index == data.len() {
                    return Err(Error::TruncatedBitfield(1));
                }
                let run = data[index] as usize;
                index += 1;
                let fill = if token == TOKEN_ZERO { 0x00 } else { 0xFF };
                output.resize(output.len() + run * block_bytes, fill);
            },
            other => return Err(Error::InvalidBitfieldToken(other)),
        }
    }

    Ok(output)
}

#[inline]
fn to_block_bytes(
    bitfield_len: usize,
    block_bits: usize,
) -> Result<usize, Error> {
    let block_bytes = block_bits / 8;
    if block_bits == 0 || block_bits % 8 != 0 || bitfield_len % block_bytes != 0 {
        return Err(Error::MisalignedBitfield(bitfield_len, block_bits));
    }
    Ok(block_bytes)
}

#[inline]
fn to_token(block: &[u8]) -> u8 {
    if block.iter().all(|&byte| byte == 0x00) {
        TOKEN_ZERO
    } else if block.iter().all(|&byte| byte == 0xFF) {
        TOKEN_FULL
    } else {
        TOKEN_RAW
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn compress_and_decompress_random() {
        use super::*;
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x3D65);
        for _ in 0..16 {
            // Mostly empty, some full, some mixed, like a trained grid.
            let target = (0..1024)
                .map(|_| match rng.gen_range(0..6) {
                    0..=2 => 0x00,
                    3 => 0xFF,
                    _ => rng.gen(),
                })
                .collect::<Vec<u8>>();

            let compressed = compress(&target, BLOCK_BITS).unwrap();
            let output = decompress(&compressed, BLOCK_BITS).unwrap();
            assert_eq!(output, target);
        }
    }

    #[test]
    fn encode_runs_of_empty_blocks() {
        use super::*;

        // 256 zero blocks split into runs of 255 and 1.
        let bitfield = vec![0x00; 1024];
        let target = vec![0x00, 255, 0x00, 1];
        let output = compress(&bitfield, BLOCK_BITS).unwrap();
        assert_eq!(output, target);

        let bitfield = vec![0xFF; 128];
        let target = vec![0xFF, 32];
        let output = compress(&bitfield, BLOCK_BITS).unwrap();
        assert_eq!(output, target);
    }

    #[test]
    fn encode_mixed_blocks_verbatim() {
        use super::*;

        let mut bitfield = vec![0x00; 4];
        bitfield.extend_from_slice(&[0xFF; 4]);
        bitfield.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
        let target = vec![0x00, 1, 0xFF, 1, 0x01, 0x12, 0x34, 0x56, 0x78];
        let output = compress(&bitfield, BLOCK_BITS).unwrap();
        assert_eq!(output, target);

        let output = decompress(&target, BLOCK_BITS).unwrap();
        assert_eq!(output, bitfield);
    }

    #[test]
    fn reject_misaligned_and_corrupt_input() {
        use super::*;

        assert!(compress(&[0x00; 5], BLOCK_BITS).is_err());
        assert!(compress(&[0x00; 32], 12).is_err());
        assert!(decompress(&[0x02], BLOCK_BITS).is_err());
        assert!(decompress(&[0x01, 0x12], BLOCK_BITS).is_err());
        assert!(decompress(&[0x00], BLOCK_BITS).is_err());
    }
}
