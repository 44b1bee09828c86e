//! Background image decoding and decode bookkeeping.
//!
//! The surface never fetches anything: sources are data URIs handed over
//! by the shell. Decoding is kept separate from the surface so a shell can
//! run it whenever it likes and report back with a [`DecodeTicket`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use scrawl_core::ImagePlacement;
use std::fmt;
use thiserror::Error;
use tiny_skia::{IntSize, Pixmap};

/// Image decoding errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Decode failed: {0}")]
    Decode(#[from] ::image::ImageError),
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Image format of an encoded source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A decoded image ready to be drawn (premultiplied RGBA).
#[derive(Clone)]
pub struct DecodedImage {
    pixmap: Pixmap,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl DecodedImage {
    /// Build from straight-alpha RGBA8 rows.
    pub fn from_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> ImageResult<Self> {
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
        let size = IntSize::from_wh(width, height).ok_or(ImageError::Empty { width, height })?;
        let pixmap = Pixmap::from_vec(data, size).ok_or(ImageError::Empty { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Where a freshly loaded image goes: natural size at the origin.
    pub fn natural_placement(&self) -> ImagePlacement {
        ImagePlacement::at_origin(self.width(), self.height())
    }
}

/// Decode encoded image bytes (PNG, JPEG or WebP).
pub fn decode_bytes(bytes: &[u8]) -> ImageResult<DecodedImage> {
    let rgba = ::image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.into_raw())
}

/// Decode a `data:<mime>;base64,<payload>` source.
pub fn decode_source(source: &str) -> ImageResult<DecodedImage> {
    decode_bytes(&data_uri_bytes(source)?)
}

/// Extract the payload of a base64 data URI.
pub fn data_uri_bytes(source: &str) -> ImageResult<Vec<u8>> {
    let unsupported = || {
        let preview: String = source.chars().take(32).collect();
        ImageError::UnsupportedSource(preview)
    };
    let rest = source.trim().strip_prefix("data:").ok_or_else(unsupported)?;
    let (header, payload) = rest.split_once(',').ok_or_else(unsupported)?;
    if !header.ends_with(";base64") {
        return Err(unsupported());
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Build a data URI for encoded image bytes.
pub fn encode_data_uri(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

/// Handle for one requested decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeTicket {
    generation: u64,
}

/// Decode state of the current background image.
#[derive(Debug, Clone, Default)]
pub enum ImageState {
    #[default]
    Empty,
    Pending,
    Ready(DecodedImage),
    Failed,
}

/// Tracks which image the surface should show and discards decodes that
/// finish after their image was replaced or cleared.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    generation: u64,
    source: Option<String>,
    state: ImageState,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// Switch to a new source. Every outstanding ticket goes stale.
    /// Returns a ticket for the new decode, or `None` when cleared.
    pub fn request(&mut self, source: Option<&str>) -> Option<DecodeTicket> {
        self.generation += 1;
        self.source = source.map(str::to_string);
        match source {
            Some(_) => {
                self.state = ImageState::Pending;
                Some(DecodeTicket {
                    generation: self.generation,
                })
            }
            None => {
                self.state = ImageState::Empty;
                None
            }
        }
    }

    /// Whether a ticket still refers to the current source.
    pub fn is_current(&self, ticket: DecodeTicket) -> bool {
        ticket.generation == self.generation && self.source.is_some()
    }

    /// Store a decode result. Returns `false` for stale tickets.
    pub fn complete(&mut self, ticket: DecodeTicket, result: &ImageResult<DecodedImage>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = match result {
            Ok(image) => ImageState::Ready(image.clone()),
            Err(_) => ImageState::Failed,
        };
        true
    }

    /// The decoded image, if it belongs to `source`.
    pub fn image_for(&self, source: Option<&str>) -> Option<&DecodedImage> {
        match &self.state {
            ImageState::Ready(image) if source.is_some() && source == self.source.as_deref() => {
                Some(image)
            }
            _ => None,
        }
    }
}
