//! CDR string and octet sequence types
//!
//! Wire formats:
//! ```text
//! string:           length: u32 (including NUL), chars[length - 1], 0x00
//! wstring GIOP 1.0: length: u32 (code units including NUL), u16[length], stream byte order
//! wstring GIOP 1.2: length: u32 (octets), UTF-16 units, big-endian unless a BOM says otherwise
//! sequence<octet>:  length: u32, octets[length]
//! ```
//!
//! Which narrow and wide encodings apply comes from the buffer's code set
//! context; the wide layout also depends on its GIOP version.

use bytes::Bytes;

use crate::context::code_sets;
use crate::error::MAX_CDR_ALLOCATION_SIZE;
use crate::{AlignedReadBuffer, AlignedWriteBuffer, CdrDecode, CdrEncode, CdrError, Result};

const BOM_BIG_ENDIAN: [u8; 2] = [0xFE, 0xFF];
const BOM_LITTLE_ENDIAN: [u8; 2] = [0xFF, 0xFE];
const BOM: u16 = 0xFEFF;

fn check_allocation(requested: usize) -> Result<()> {
    if requested > MAX_CDR_ALLOCATION_SIZE {
        return Err(CdrError::AllocationLimitExceeded {
            requested,
            limit: MAX_CDR_ALLOCATION_SIZE,
        });
    }
    Ok(())
}

fn encode_length(out: &mut AlignedWriteBuffer, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| CdrError::AllocationLimitExceeded {
        requested: len,
        limit: u32::MAX as usize,
    })?;
    len.cdr_encode(out)
}

fn decode_length(input: &mut AlignedReadBuffer) -> Result<usize> {
    let len = u32::cdr_decode(input)? as usize;
    check_allocation(len)?;
    Ok(len)
}

/// Narrow string (IDL `string`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CdrString(pub String);

impl CdrString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for CdrString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CdrString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CdrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CdrEncode for CdrString {
    fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()> {
        if self.0.contains('\0') {
            return Err(CdrError::InvalidString("embedded NUL".to_string()));
        }

        let encoded: Vec<u8> = match out.context().code_set.char_data {
            code_sets::UTF_8 => self.0.as_bytes().to_vec(),
            code_sets::ISO_8859_1 => self
                .0
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        CdrError::InvalidString(format!("{c:?} is not representable in ISO 8859-1"))
                    })
                })
                .collect::<Result<_>>()?,
            other => return Err(CdrError::UnsupportedCodeSet(other)),
        };

        out.align(<Self as CdrEncode>::cdr_align())?;
        encode_length(out, encoded.len() + 1)?;
        out.write(&encoded)?;
        out.write_u8(0)?;
        Ok(())
    }

    fn cdr_align() -> usize {
        4
    }
}

impl CdrDecode for CdrString {
    fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self> {
        let char_data = input.context().code_set.char_data;
        if char_data != code_sets::UTF_8 && char_data != code_sets::ISO_8859_1 {
            return Err(CdrError::UnsupportedCodeSet(char_data));
        }

        input.align(<Self as CdrDecode>::cdr_align())?;
        let len = decode_length(input)?;
        if len == 0 {
            return Err(CdrError::InvalidString("zero length".to_string()));
        }
        let raw = input.read(len)?;
        let (&last, chars) = raw.split_last().ok_or_else(|| {
            CdrError::InvalidString("zero length".to_string())
        })?;
        if last != 0 {
            return Err(CdrError::InvalidString("missing NUL terminator".to_string()));
        }

        let s = if char_data == code_sets::UTF_8 {
            String::from_utf8(chars.to_vec())?
        } else {
            chars.iter().map(|&b| char::from(b)).collect()
        };
        Ok(Self(s))
    }

    fn cdr_align() -> usize {
        4
    }
}

/// Wide string (IDL `wstring`), transmitted as UTF-16
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CdrWString(pub String);

impl CdrWString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for CdrWString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CdrWString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CdrWString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn check_wide_code_set(wide_char_data: u32) -> Result<()> {
    match wide_char_data {
        code_sets::UTF_16 => Ok(()),
        other => Err(CdrError::UnsupportedCodeSet(other)),
    }
}

impl CdrEncode for CdrWString {
    fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()> {
        let ctx = *out.context();
        check_wide_code_set(ctx.code_set.wide_char_data)?;
        let units: Vec<u16> = self.0.encode_utf16().collect();
        out.align(<Self as CdrEncode>::cdr_align())?;

        if ctx.version.uses_octet_counted_wstring() {
            // a leading FEFF/FFFE unit would otherwise read back as a BOM
            let needs_bom = matches!(units.first(), Some(&BOM) | Some(&0xFFFE));
            encode_length(out, (units.len() + usize::from(needs_bom)) * 2)?;
            if needs_bom {
                out.write(&BOM_BIG_ENDIAN)?;
            }
            for unit in units {
                out.write(&unit.to_be_bytes())?;
            }
        } else {
            if units.contains(&0) {
                return Err(CdrError::InvalidString("embedded NUL".to_string()));
            }
            encode_length(out, units.len() + 1)?;
            for unit in units.into_iter().chain(std::iter::once(0)) {
                unit.cdr_encode(out)?;
            }
        }
        Ok(())
    }

    fn cdr_align() -> usize {
        4
    }
}

impl CdrDecode for CdrWString {
    fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self> {
        let ctx = *input.context();
        check_wide_code_set(ctx.code_set.wide_char_data)?;
        input.align(<Self as CdrDecode>::cdr_align())?;

        let units = if ctx.version.uses_octet_counted_wstring() {
            let octets = decode_length(input)?;
            if octets % 2 != 0 {
                return Err(CdrError::InvalidString(format!("odd wstring length {octets}")));
            }
            let raw = input.read(octets)?;
            let (little_endian, body) = match raw.get(..2) {
                Some(bom) if bom == BOM_BIG_ENDIAN => (false, &raw[2..]),
                Some(bom) if bom == BOM_LITTLE_ENDIAN => (true, &raw[2..]),
                _ => (false, &raw[..]),
            };
            body.chunks_exact(2)
                .map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if little_endian {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                })
                .collect::<Vec<u16>>()
        } else {
            let count = decode_length(input)?;
            if count == 0 {
                return Err(CdrError::InvalidString("zero length".to_string()));
            }
            let mut units = Vec::with_capacity(count.min(input.remaining() / 2));
            for _ in 0..count {
                units.push(u16::cdr_decode(input)?);
            }
            if units.pop() != Some(0) {
                return Err(CdrError::InvalidString("missing NUL terminator".to_string()));
            }
            units
        };

        let s = char::decode_utf16(units).collect::<std::result::Result<String, _>>()?;
        Ok(Self(s))
    }

    fn cdr_align() -> usize {
        4
    }
}

/// Octet sequence (IDL `sequence<octet>`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CdrOctets(pub Bytes);

impl CdrOctets {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl CdrEncode for CdrOctets {
    fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()> {
        encode_length(out, self.0.len())?;
        out.write(&self.0)?;
        Ok(())
    }

    fn cdr_align() -> usize {
        4
    }
}

impl CdrDecode for CdrOctets {
    fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self> {
        let len = decode_length(input)?;
        Ok(Self(input.read(len)?))
    }

    fn cdr_align() -> usize {
        4
    }
}
