//! The self-describing binary container: a fixed header followed by the
//! bit-packed octree encoding.

pub mod header;
pub mod reader;
pub mod writer;

pub use self::header::{Header, MAX_RESOLUTION, SIGNATURE};
pub use self::reader::VolumeReader;
pub use self::writer::VolumeWriter;

use std::{
	io::Write,
	path::Path,
};

use crate::{
	codec::bits::BitBuffer,
	volume::{Resolution, Volume},
	OtbvResult,
};

/// The number of leading zero bits required to align `bits` to a byte
/// boundary.
pub const fn pad_len(bits: usize) -> u8 {
	((8 - (bits & 7)) & 7) as u8
}

/// Packs a bit sequence into bytes, most significant bit first,
/// prepending [pad_len] zero bits so the packed stream ends on a byte
/// boundary. Returns the pad length alongside the bytes.
pub fn pack_bits(bits: &BitBuffer) -> (u8, Vec<u8>) {
	let pad = pad_len(bits.len());
	let mut bytes = vec![0u8; (bits.len() + pad as usize) / 8];
	for (index, bit) in bits.iter().enumerate() {
		if bit {
			let position = index + pad as usize;
			bytes[position >> 3] |= 128 >> (position & 7);
		}
	}
	(pad, bytes)
}

/// Unpacks payload bytes back into the encoding, stripping the `pad`
/// leading bits the packer prepended.
pub fn unpack_bits(bytes: &[u8], pad: u8) -> BitBuffer {
	let total = bytes.len() * 8;
	let mut bits = BitBuffer::with_capacity(total.saturating_sub(pad as usize));
	for position in (pad as usize).min(total)..total {
		bits.push(bytes[position >> 3] & (128 >> (position & 7)) != 0);
	}
	bits
}

/// Encodes `volume` and writes it as a container file at `path`,
/// creating or truncating the file.
///
/// Saving a volume with 0 cells is a deliberate no-op kept from the
/// original format: nothing is written, no file is created, and `Ok(())`
/// is returned.
pub fn save<P: AsRef<Path>>(path: P, volume: &Volume) -> OtbvResult<()> {
	if volume.is_empty() {
		log::warn!("The provided volume has a size of 0. Nothing will be written.");
		return Ok(());
	}
	let mut writer = VolumeWriter::create(path)?;
	let written = writer.write_volume(volume)?;
	writer.finish().flush()?;
	log::info!("Written {written} bytes.");
	Ok(())
}

/// Reshapes `data` to `resolution` and saves it. See [save].
pub fn save_flat<P: AsRef<Path>>(
	path: P,
	data: Vec<bool>,
	resolution: Resolution,
) -> OtbvResult<()> {
	let volume = Volume::from_flat(data, resolution)?;
	save(path, &volume)
}

/// Reads a volume back from the container file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> OtbvResult<Volume> {
	let mut reader = VolumeReader::open(path)?;
	reader.read_volume()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::OtbvError;
	use rand::Rng;
	use std::fs;

	fn striped(resolution: Resolution) -> Volume {
		let mut volume = Volume::new(resolution);
		for x in 0..resolution.x as usize {
			for y in 0..resolution.y as usize {
				for z in 0..resolution.z as usize {
					volume.set(x, y, z, (x + z) % 2 == 0);
				}
			}
		}
		volume
	}

	#[test]
	fn pack_alignment_and_leading_pad() {
		let bits: BitBuffer = [true, false, true].into_iter().collect();
		let (pad, bytes) = pack_bits(&bits);
		assert_eq!(pad, 5);
		assert_eq!(bytes, vec![0b0000_0101]);
		let unpacked = unpack_bits(&bytes, pad);
		assert_eq!(unpacked, bits);
	}

	#[test]
	fn pack_byte_aligned_input() {
		let bits: BitBuffer = (0..16).map(|index| index % 3 == 0).collect();
		let (pad, bytes) = pack_bits(&bits);
		assert_eq!(pad, 0);
		assert_eq!(bytes.len(), 2);
		assert_eq!(unpack_bits(&bytes, pad), bits);
	}

	#[test]
	fn save_load_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("striped.otbv");
		let volume = striped(Resolution::new(3, 5, 2));
		save(&path, &volume).unwrap();
		assert_eq!(load(&path).unwrap(), volume);
	}

	#[test]
	fn padded_header_fields() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("padded.otbv");
		save(&path, &striped(Resolution::new(3, 5, 2))).unwrap();
		let bytes = fs::read(&path).unwrap();
		assert_eq!(&bytes[0..5], &SIGNATURE);
		// padded flag is set, the true resolution is stored
		assert_eq!(bytes[5] >> 4 & 1, 1);
		assert_eq!(u32::from_le_bytes(bytes[6..10].try_into().unwrap()), 3);
		assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 5);
		assert_eq!(u32::from_le_bytes(bytes[14..18].try_into().unwrap()), 2);
		let payload_len = u32::from_le_bytes(bytes[18..22].try_into().unwrap());
		assert_eq!(bytes.len(), Header::SIZE + payload_len as usize);
	}

	#[test]
	fn unpadded_cube_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cube.otbv");
		let volume = striped(Resolution::cube(4));
		save(&path, &volume).unwrap();
		let bytes = fs::read(&path).unwrap();
		// a power-of-two cube needs no padding, so only x is stored
		assert_eq!(bytes[5] >> 4 & 1, 0);
		assert_eq!(&bytes[10..18], &[0u8; 8]);
		assert_eq!(load(&path).unwrap(), volume);
	}

	#[test]
	fn homogeneous_payload_is_one_byte() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("solid.otbv");
		// all false, so the padded cube stays homogeneous
		let volume = Volume::new(Resolution::new(9, 4, 7));
		save(&path, &volume).unwrap();
		let bytes = fs::read(&path).unwrap();
		// the 2 encoding bits pad to a single payload byte
		assert_eq!(bytes.len(), Header::SIZE + 1);
		assert_eq!(bytes[22], 0b0000_0000);
		// flags: pad_len 6, padded set
		assert_eq!(bytes[5], 0b1101_0000);
		assert_eq!(load(&path).unwrap(), volume);
	}

	#[test]
	fn empty_save_is_a_no_op() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("empty.otbv");
		save(&path, &Volume::new(Resolution::new(0, 3, 3))).unwrap();
		assert!(!path.exists());
	}

	#[test]
	fn save_flat_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("flat.otbv");
		let data: Vec<bool> = (0..30).map(|index| index % 4 == 0).collect();
		save_flat(&path, data.clone(), Resolution::new(3, 5, 2)).unwrap();
		assert_eq!(load(&path).unwrap().as_flat(), &data[..]);
	}

	#[test]
	fn save_flat_length_mismatch() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mismatch.otbv");
		let result = save_flat(&path, vec![false; 10], Resolution::new(2, 2, 2));
		assert!(matches!(result, Err(OtbvError::ReshapeMismatch { .. })));
		assert!(!path.exists());
	}

	#[test]
	fn corrupted_signature_fails_before_payload() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corrupt.otbv");
		save(&path, &striped(Resolution::cube(4))).unwrap();
		let mut bytes = fs::read(&path).unwrap();
		bytes[0] = b'X';
		fs::write(&path, &bytes).unwrap();
		assert!(matches!(load(&path), Err(OtbvError::SignatureMismatch)));
	}

	#[test]
	fn oversized_resolution_fails_before_payload() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("oversized.otbv");
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&SIGNATURE);
		bytes.push(1 << 4);
		bytes.extend_from_slice(&(MAX_RESOLUTION + 1).to_le_bytes());
		bytes.extend_from_slice(&2u32.to_le_bytes());
		bytes.extend_from_slice(&2u32.to_le_bytes());
		bytes.extend_from_slice(&1u32.to_le_bytes());
		// no payload follows; a correct validation order never reads it
		fs::write(&path, &bytes).unwrap();
		assert!(matches!(
			load(&path),
			Err(OtbvError::ResolutionTooLarge(n)) if n == MAX_RESOLUTION + 1
		));
	}

	#[test]
	fn truncated_payload_is_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("short.otbv");
		save(&path, &striped(Resolution::new(3, 5, 2))).unwrap();
		let bytes = fs::read(&path).unwrap();
		fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
		assert!(matches!(load(&path), Err(OtbvError::IoError(_))));
	}

	#[test]
	fn load_missing_file_fails() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing.otbv");
		assert!(matches!(load(&path), Err(OtbvError::IoError(_))));
	}

	#[test]
	fn random_rectangular_round_trips() {
		let dir = tempfile::tempdir().unwrap();
		let mut rng = rand::thread_rng();
		for index in 0..8 {
			let resolution = Resolution::new(
				rng.gen_range(1..12),
				rng.gen_range(1..12),
				rng.gen_range(1..12),
			);
			let mut volume = Volume::new(resolution);
			for x in 0..resolution.x as usize {
				for y in 0..resolution.y as usize {
					for z in 0..resolution.z as usize {
						volume.set(x, y, z, rng.gen());
					}
				}
			}
			let path = dir.path().join(format!("random_{index}.otbv"));
			save(&path, &volume).unwrap();
			assert_eq!(load(&path).unwrap(), volume);
		}
	}
}
