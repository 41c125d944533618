//! CDR primitive type implementations
//!
//! CDR primitive types and their encodings:
//!
//! | IDL Type           | Rust Type | Size | Alignment |
//! |--------------------|-----------|------|-----------|
//! | boolean            | bool      | 1    | 1         |
//! | octet              | u8        | 1    | 1         |
//! | char (narrow)      | i8        | 1    | 1         |
//! | short              | i16       | 2    | 2         |
//! | unsigned short     | u16       | 2    | 2         |
//! | long               | i32       | 4    | 4         |
//! | unsigned long      | u32       | 4    | 4         |
//! | long long          | i64       | 8    | 8         |
//! | unsigned long long | u64       | 8    | 8         |
//! | float              | f32       | 4    | 4         |
//! | double             | f64       | 8    | 8         |
//!
//! Multi-byte values use the byte order of the buffer's [`CdrContext`](crate::CdrContext).

use crate::{AlignedReadBuffer, AlignedWriteBuffer, CdrDecode, CdrEncode, CdrError, Result};

// Macro to implement CdrEncode/CdrDecode for fixed-size numeric types
macro_rules! impl_cdr_primitive {
    ($ty:ty, $size:expr) => {
        impl CdrEncode for $ty {
            fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()> {
                out.align(<Self as CdrEncode>::cdr_align())?;
                let bytes = if out.context().little_endian {
                    self.to_le_bytes()
                } else {
                    self.to_be_bytes()
                };
                out.write(&bytes)?;
                Ok(())
            }

            fn cdr_align() -> usize {
                $size
            }
        }

        impl CdrDecode for $ty {
            fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self> {
                input.align(<Self as CdrDecode>::cdr_align())?;
                let bytes = input.read_array::<{ $size }>()?;
                let value = if input.context().little_endian {
                    <$ty>::from_le_bytes(bytes)
                } else {
                    <$ty>::from_be_bytes(bytes)
                };
                Ok(value)
            }

            fn cdr_align() -> usize {
                $size
            }
        }
    };
}

impl_cdr_primitive!(u8, 1);
impl_cdr_primitive!(i8, 1);
impl_cdr_primitive!(u16, 2);
impl_cdr_primitive!(i16, 2);
impl_cdr_primitive!(u32, 4);
impl_cdr_primitive!(i32, 4);
impl_cdr_primitive!(u64, 8);
impl_cdr_primitive!(i64, 8);
impl_cdr_primitive!(f32, 4);
impl_cdr_primitive!(f64, 8);

/// CDR boolean - a single octet, 0 for false and 1 for true
impl CdrEncode for bool {
    fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()> {
        out.write_u8(u8::from(*self))?;
        Ok(())
    }
}

impl CdrDecode for bool {
    fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self> {
        match input.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CdrError::InvalidBoolean(other)),
        }
    }
}
