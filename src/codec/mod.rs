//! Recursive octree encoding and decoding over power-of-two cubes.
//!
//! The encoding is a pre-order traversal of an implicit octree: a
//! homogeneous region emits a leaf token (`0`) followed by one value bit,
//! anything else emits a branch token (`1`) followed by the encodings of
//! its eight octants. Both directions walk octants in the same fixed
//! x-outer, y-middle, z-inner, low-before-high order.

pub mod bits;

use self::bits::{BitBuffer, BitReader};

use crate::{
	math::bit::is_pow2,
	math::bounds::Bounds3,
	volume::{Resolution, Volume},
	OtbvError,
	OtbvResult,
};

/// The deepest the octree recursion may go. Enough to accommodate
/// volumes around a million cells per axis.
pub const MAX_DEPTH: usize = 20;

const LEAF: bool = false;

/// Encodes a volume into its octree bit sequence.
///
/// The volume must be a cube with a power-of-two side length;
/// [Volume::pad_to_cube] establishes that shape.
pub fn encode(volume: &Volume) -> OtbvResult<BitBuffer> {
	debug_assert!(
		volume.resolution().is_cube() && is_pow2(volume.resolution().x.max(1)),
		"encode expects a padded power-of-two cube"
	);
	let side = volume.resolution().x as usize;
	let mut encoding = BitBuffer::new();
	encode_region(volume, &mut encoding, Bounds3::cube(side), 0)?;
	Ok(encoding)
}

fn encode_region(
	volume: &Volume,
	encoding: &mut BitBuffer,
	bounds: Bounds3,
	depth: usize,
) -> OtbvResult<()> {
	if depth > MAX_DEPTH {
		return Err(OtbvError::RecursionLimit);
	}
	if bounds.is_empty() {
		// a zero-cell subregion means the cube precondition was violated
		return Err(OtbvError::EmptySubvolume);
	}
	if let Some(value) = volume.uniform_value(bounds) {
		encoding.push(LEAF);
		encoding.push(value);
		return Ok(());
	}
	encoding.push(!LEAF);
	for octant in bounds.split() {
		encode_region(volume, encoding, octant, depth + 1)?;
	}
	Ok(())
}

/// Decodes an octree bit sequence back into a volume of the given
/// resolution.
///
/// Decoding runs over the padded power-of-two cube the encoder saw, then
/// cuts the result down to `resolution`. The whole encoding must be
/// consumed exactly; leftover or missing bits signal a corrupted or
/// truncated stream.
pub fn decode(encoding: &BitBuffer, resolution: Resolution) -> OtbvResult<Volume> {
	let side = resolution.max_pow2_roof() as usize;
	let mut volume = Volume::new(Resolution::cube(side as u32));
	let mut reader = BitReader::new(encoding);
	decode_region(&mut reader, &mut volume, Bounds3::cube(side), 0)?;
	if reader.position() != encoding.len() {
		return Err(OtbvError::EncodingLengthMismatch {
			consumed: reader.position(),
			total: encoding.len(),
		});
	}
	Ok(volume.cut(resolution))
}

fn decode_region(
	reader: &mut BitReader<'_>,
	volume: &mut Volume,
	bounds: Bounds3,
	depth: usize,
) -> OtbvResult<()> {
	if depth > MAX_DEPTH {
		return Err(OtbvError::RecursionLimit);
	}
	if reader.read()? == LEAF {
		let value = reader.read()?;
		volume.fill(bounds, value);
		return Ok(());
	}
	for octant in bounds.split() {
		decode_region(reader, volume, octant, depth + 1)?;
	}
	Ok(())
}
