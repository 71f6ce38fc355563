use thiserror::Error;

/// The master error type.
#[derive(Debug, Error)]
pub enum OtbvError {
	#[error("{0}")]
	Custom(String),
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Cannot pad a volume with 0 cells to a cube.")]
	EmptyVolume,
	#[error("Flat data of length {found} cannot be reshaped to a resolution holding {expected} cells.")]
	ReshapeMismatch { expected: usize, found: usize },
	#[error("Flat data of length {0} cannot be reshaped into a cubic volume.")]
	NotACube(usize),
	#[error("Encountered a subvolume with 0 cells while encoding. The volume does not satisfy the codec's power-of-two cube precondition.")]
	EmptySubvolume,
	#[error("Reached the maximum octree depth. The volume is either too large or the encoding is malformed.")]
	RecursionLimit,
	#[error("Unexpected end of the encoding.")]
	UnexpectedEnd,
	#[error("Decoding consumed {consumed} bits of a {total} bit encoding.")]
	EncodingLengthMismatch { consumed: usize, total: usize },
	#[error("Signature validation failed. The stream does not hold a valid OTBV container.")]
	SignatureMismatch,
	#[error("Resolution {0} is above the allowed maximum of {max} per axis.", max = crate::container::MAX_RESOLUTION)]
	ResolutionTooLarge(u32),
}

impl OtbvError {
	#[inline(always)]
	pub fn custom<T, S: AsRef<str>>(msg: S) -> Result<T, Self> {
		Err(OtbvError::Custom(msg.as_ref().to_owned()))
	}
}

pub type OtbvResult<T> = Result<T, OtbvError>;
