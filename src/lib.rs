pub mod math;
pub mod volume;
pub mod codec;
pub mod container;
pub mod ioext;
pub mod error;

pub use byteorder;

pub use error::OtbvError;
pub use error::OtbvResult;
pub use volume::Resolution;
pub use volume::Volume;
pub use container::{save, save_flat, load};
