//! Scrawl Render Library
//!
//! The raster side of Scrawl: an oversampled CPU pixel buffer (tiny-skia),
//! the compositor that redraws background, image, table and ruler, image
//! decoding, and the [`Surface`] that binds the core gesture state machine
//! to the buffer.

mod buffer;
mod compositor;
pub mod image;
mod surface;
mod text;

pub use buffer::{LineStyle, RasterBuffer};
pub use compositor::Compositor;
pub use image::{
    DecodeTicket, DecodedImage, ImageError, ImageFormat, ImageResult, ImageSlot, ImageState,
    decode_bytes, decode_source, encode_data_uri,
};
pub use surface::{Surface, SurfaceConfig};
pub use text::{FontError, TableFont};
