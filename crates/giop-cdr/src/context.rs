//! CDR stream context
//!
//! The context is the out-of-band metadata that travels alongside a byte
//! stream: byte order, the negotiated GIOP version, and the code sets used
//! for narrow and wide characters. The buffers never interpret it; they only
//! carry it so a read-back stream decodes exactly as the writer encoded.

use std::fmt;

/// Calculate padding needed to align `position + base_offset` to `alignment`.
///
/// Alignments of 0 and 1 never pad. The same formula is used for non
/// power-of-two alignments.
#[inline]
pub fn align_padding(position: usize, base_offset: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return 0;
    }
    let remainder = position.wrapping_add(base_offset) % alignment;
    if remainder == 0 {
        0
    } else {
        alignment - remainder
    }
}

/// GIOP protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GiopVersion {
    pub major: u8,
    pub minor: u8,
}

impl GiopVersion {
    pub const V1_0: Self = Self::new(1, 0);
    pub const V1_1: Self = Self::new(1, 1);
    pub const V1_2: Self = Self::new(1, 2);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether this library can frame and decode messages of this version
    pub fn is_supported(&self) -> bool {
        *self >= Self::V1_0 && *self <= Self::V1_2
    }

    /// GIOP 1.2 changed wstring to an octet-counted, terminator-free form
    pub fn uses_octet_counted_wstring(&self) -> bool {
        *self >= Self::V1_2
    }

    /// Fragment messages and the more-fragments flag exist from 1.1
    pub fn supports_fragments(&self) -> bool {
        *self >= Self::V1_1
    }
}

impl Default for GiopVersion {
    fn default() -> Self {
        Self::V1_2
    }
}

impl fmt::Display for GiopVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// OSF registry code set identifiers used by GIOP code set negotiation
pub mod code_sets {
    /// ISO 8859-1 (Latin-1), the CORBA default narrow code set
    pub const ISO_8859_1: u32 = 0x0001_0001;
    /// UTF-16, the CORBA default wide code set
    pub const UTF_16: u32 = 0x0001_0109;
    /// UCS-2 level 1
    pub const UCS_2: u32 = 0x0001_0100;
    /// UTF-8
    pub const UTF_8: u32 = 0x0501_0001;
}

/// Negotiated transmission code sets for `char` and `wchar` data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeSetContext {
    pub char_data: u32,
    pub wide_char_data: u32,
}

impl CodeSetContext {
    pub const fn new(char_data: u32, wide_char_data: u32) -> Self {
        Self {
            char_data,
            wide_char_data,
        }
    }
}

impl Default for CodeSetContext {
    fn default() -> Self {
        Self::new(code_sets::ISO_8859_1, code_sets::UTF_16)
    }
}

/// CDR encoding/decoding context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdrContext {
    /// Whether to use little-endian byte order
    pub little_endian: bool,
    /// GIOP version the stream is encoded for
    pub version: GiopVersion,
    /// Negotiated code sets
    pub code_set: CodeSetContext,
}

impl CdrContext {
    /// Create a little-endian GIOP 1.2 context with the default code sets
    pub fn new() -> Self {
        Self {
            little_endian: true,
            version: GiopVersion::default(),
            code_set: CodeSetContext::default(),
        }
    }

    /// Create a context with big-endian byte order
    pub fn big_endian() -> Self {
        Self {
            little_endian: false,
            ..Self::new()
        }
    }

    /// Create a context with specified byte order
    pub fn with_byte_order(little_endian: bool) -> Self {
        Self {
            little_endian,
            ..Self::new()
        }
    }

    pub fn with_version(mut self, version: GiopVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_code_set(mut self, code_set: CodeSetContext) -> Self {
        self.code_set = code_set;
        self
    }

    /// The CDR byte-order octet: 1 for little-endian, 0 for big-endian
    pub fn byte_order_flag(&self) -> u8 {
        u8::from(self.little_endian)
    }
}

impl Default for CdrContext {
    fn default() -> Self {
        Self::new()
    }
}
