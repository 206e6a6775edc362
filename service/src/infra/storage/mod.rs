//! [`Storage`] of [`Media`] files.

mod local;
#[cfg(test)]
pub mod memory;

use std::io;

use derive_more::{Debug, Display, Error as StdError, From};

#[cfg(doc)]
use crate::domain::Media;
use crate::domain::media;

#[cfg(test)]
pub use self::memory::Memory;
pub use self::local::Local;

/// Storage operation.
pub use common::Handler as Storage;

/// File to be stored in a [`Storage`].
#[derive(Clone, Debug)]
pub struct Object {
    /// [`media::Path`] to store this [`Object`] at.
    pub path: media::Path,

    /// Content of this [`Object`].
    #[debug(skip)]
    pub content: Vec<u8>,
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O operation failed.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),
}
