use std::io::{
	Read, Write,
};

use byteorder::{
	LittleEndian,
	ReadBytesExt,
	WriteBytesExt,
};

use crate::OtbvResult;

/// Types that can be read from a byte stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> OtbvResult<Self>;
}

/// Types that can be written to a byte stream.
/// `write_to` returns the number of bytes written.
pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> OtbvResult<usize>;
}

pub trait ReadExt {
	fn read_value<T: Readable>(&mut self) -> OtbvResult<T>;
}

impl<R: Read> ReadExt for R {
	fn read_value<T: Readable>(&mut self) -> OtbvResult<T> {
		T::read_from(self)
	}
}

pub trait WriteExt {
	fn write_value<T: Writable>(&mut self, value: T) -> OtbvResult<usize>;
}

impl<W: Write> WriteExt for W {
	fn write_value<T: Writable>(&mut self, value: T) -> OtbvResult<usize> {
		value.write_to(self)
	}
}

impl Readable for u8 {
	fn read_from<R: Read>(reader: &mut R) -> OtbvResult<Self> {
		Ok(reader.read_u8()?)
	}
}

impl Writable for u8 {
	fn write_to<W: Write>(&self, writer: &mut W) -> OtbvResult<usize> {
		writer.write_u8(*self)?;
		Ok(1)
	}
}

// Integer fields of the container header are little-endian on the wire.

impl Readable for u32 {
	fn read_from<R: Read>(reader: &mut R) -> OtbvResult<Self> {
		Ok(reader.read_u32::<LittleEndian>()?)
	}
}

impl Writable for u32 {
	fn write_to<W: Write>(&self, writer: &mut W) -> OtbvResult<usize> {
		writer.write_u32::<LittleEndian>(*self)?;
		Ok(4)
	}
}
