//! PDF417 barcode encoder.
//!
//! Bytes go through a greedy segmenter choosing numeric, text or byte
//! compaction, get a length codeword, optional Global Label Identifiers,
//! padding and Reed-Solomon style error correction over GF(929), and are
//! laid out into a matrix of modules that can be rasterized for embedding
//! into a document.
//!
//! ```ignore
//! use pdf417_writer::{EncoderConfig, Pdf417Encoder};
//!
//! let mut encoder = Pdf417Encoder::new(EncoderConfig::default());
//! encoder.encode(b"Hello, world!")?;
//! let bitmap = encoder.bitmap()?;
//! ```

mod tables;
mod error;

pub mod builder;
pub mod config;
pub mod dimension;
pub mod ecc;
pub mod encoder;
pub mod generators;
pub mod high_level;
pub mod segmenter;

pub use builder::{Bitmap, ModuleMatrix};
pub use config::{CharacterSet, EncoderConfig, EncodingControl, ErrorCorrection, GlobalLabel};
pub use dimension::{Geometry, MAX_COLS, MAX_ROWS, MIN_COLS, MIN_ROWS};
pub use encoder::Pdf417Encoder;
pub use error::{GeometryRejected, Pdf417Error};
