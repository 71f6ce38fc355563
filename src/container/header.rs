use std::io::{Read, Write};

use crate::{
	ioext::*,
	volume::Resolution,
	OtbvError,
	OtbvResult,
};

/// The five bytes every OTBV container starts with.
pub const SIGNATURE: [u8; 5] = *b"OTBV\x96";

/// The largest cell count allowed along a single axis.
pub const MAX_RESOLUTION: u32 = 100_000;

/// The fixed-size record that precedes the bit-packed payload.
///
/// | bytes | field |
/// |-------|-------|
/// | 0-4   | signature |
/// | 5     | flags: bits 7-5 pad_len, bit 4 padded-to-cube, bits 3-0 reserved |
/// | 6-9   | x resolution |
/// | 10-13 | y resolution (written as 0 when the padded flag is clear) |
/// | 14-17 | z resolution (written as 0 when the padded flag is clear) |
/// | 18-21 | payload length in bytes |
///
/// Integer fields are little-endian. An unpadded volume is already a
/// power-of-two cube, so only its x axis is stored and reading restores
/// y and z from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Leading zero bits prepended to the payload to align it to a byte
	/// boundary. Always in 0..8.
	pub pad_len: u8,
	/// Whether padding to the power-of-two cube changed the volume's shape.
	pub padded: bool,
	/// The true (pre-padding) resolution of the stored volume.
	pub resolution: Resolution,
	/// Length of the bit-packed payload in bytes.
	pub payload_len: u32,
}

impl Header {
	/// Size of the header on the wire, in bytes.
	pub const SIZE: usize = 22;

	/// Packs pad_len and the padded flag into the flags byte.
	pub fn flags(&self) -> u8 {
		(self.pad_len << 5) | ((self.padded as u8) << 4)
	}

	/// Rejects resolutions above [MAX_RESOLUTION]. This runs before any
	/// payload byte is touched.
	pub fn check_resolution(&self) -> OtbvResult<()> {
		let Resolution { x, y, z } = self.resolution;
		for axis in [x, y, z] {
			if axis > MAX_RESOLUTION {
				return Err(OtbvError::ResolutionTooLarge(axis));
			}
		}
		Ok(())
	}
}

impl Readable for Header {
	fn read_from<R: Read>(reader: &mut R) -> OtbvResult<Self> {
		let mut signature = [0u8; 5];
		reader.read_exact(&mut signature)?;
		if signature != SIGNATURE {
			return Err(OtbvError::SignatureMismatch);
		}
		let flags: u8 = reader.read_value()?;
		let pad_len = flags >> 5;
		let padded = (flags >> 4) & 1 == 1;
		let x: u32 = reader.read_value()?;
		let y: u32 = reader.read_value()?;
		let z: u32 = reader.read_value()?;
		let resolution = if padded {
			Resolution::new(x, y, z)
		} else {
			Resolution::cube(x)
		};
		let payload_len: u32 = reader.read_value()?;
		Ok(Self {
			pad_len,
			padded,
			resolution,
			payload_len,
		})
	}
}

impl Writable for Header {
	fn write_to<W: Write>(&self, writer: &mut W) -> OtbvResult<usize> {
		writer.write_all(&SIGNATURE)?;
		let mut written = SIGNATURE.len();
		written += writer.write_value(self.flags())?;
		written += writer.write_value(self.resolution.x)?;
		let (y, z) = if self.padded {
			(self.resolution.y, self.resolution.z)
		} else {
			(0, 0)
		};
		written += writer.write_value(y)?;
		written += writer.write_value(z)?;
		written += writer.write_value(self.payload_len)?;
		Ok(written)
	}
}
