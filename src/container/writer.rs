use std::{
	fs::File,
	io::{
		BufWriter,
		Write,
	},
	path::Path,
};

use crate::{
	codec,
	ioext::*,
	volume::Volume,
	OtbvResult,
};

use super::{
	header::Header,
	pack_bits,
};

/// An abstraction for writing OTBV containers. You hand a byte sink over
/// to this struct, write the volumes you need to write, then call
/// `.finish()` to take the sink back.
pub struct VolumeWriter<W: Write> {
	/// The writer that this [VolumeWriter] is bound to.
	writer: W,
}

impl VolumeWriter<BufWriter<File>> {
	/// Creates (or truncates) the file at `path` and wraps it in a
	/// buffered [VolumeWriter].
	pub fn create(path: impl AsRef<Path>) -> OtbvResult<Self> {
		let file = File::create(path)?;
		Ok(VolumeWriter::new(BufWriter::new(file)))
	}
}

impl<W: Write> VolumeWriter<W> {
	pub fn new(writer: W) -> Self {
		Self { writer }
	}

	/// Pads, encodes and writes `volume` as a complete container record.
	/// Returns the number of bytes written.
	pub fn write_volume(&mut self, volume: &Volume) -> OtbvResult<usize> {
		let padded = volume.pad_to_cube()?;
		let encoding = codec::encode(&padded)?;
		let (pad_len, payload) = pack_bits(&encoding);
		let header = Header {
			pad_len,
			padded: padded.cells() > volume.cells(),
			resolution: volume.resolution(),
			payload_len: payload.len() as u32,
		};
		let mut written = header.write_to(&mut self.writer)?;
		self.writer.write_all(&payload)?;
		written += payload.len();
		Ok(written)
	}

	/// Finish writing and return the contained writer.
	pub fn finish(self) -> W {
		self.writer
	}
}

impl<W: Write> Write for VolumeWriter<W> {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.writer.write(buf)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.writer.flush()
	}
}
