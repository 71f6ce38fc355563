use std::{
	fs::File,
	io::{
		BufReader,
		Read,
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
	unpack_bits,
};

/// An abstraction for reading OTBV containers. You hand a byte source
/// over to this struct, read the volumes you need, then call `.finish()`
/// to take the source back.
pub struct VolumeReader<R: Read> {
	/// The reader that this [VolumeReader] is bound to.
	reader: R,
}

impl VolumeReader<BufReader<File>> {
	/// Opens the file at `path` as a buffered [VolumeReader].
	pub fn open(path: impl AsRef<Path>) -> OtbvResult<Self> {
		let file = File::open(path)?;
		Ok(VolumeReader::new(BufReader::new(file)))
	}
}

impl<R: Read> VolumeReader<R> {
	pub fn new(reader: R) -> Self {
		Self { reader }
	}

	/// Reads one container record and decodes the stored volume.
	/// The header is parsed and its resolution validated before any
	/// payload byte is read.
	pub fn read_volume(&mut self) -> OtbvResult<Volume> {
		let header: Header = self.reader.read_value()?;
		header.check_resolution()?;
		let mut payload = vec![0u8; header.payload_len as usize];
		self.reader.read_exact(&mut payload)?;
		let encoding = unpack_bits(&payload, header.pad_len);
		codec::decode(&encoding, header.resolution)
	}

	/// Finish reading and return the contained reader.
	pub fn finish(self) -> R {
		self.reader
	}
}

impl<R: Read> Read for VolumeReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.reader.read(buf)
	}
}
