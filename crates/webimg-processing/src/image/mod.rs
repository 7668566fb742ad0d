//! Image normalization
//!
//! - flatten: composite transparent pixels onto white
//! - encoder: mozjpeg encoding
//! - normalizer: one file in, one web-ready file out

pub mod encoder;
pub mod flatten;
pub mod normalizer;

pub use encoder::encode_jpeg;
pub use flatten::flatten_onto_white;
pub use normalizer::{ImageNormalizer, Normalizer};
