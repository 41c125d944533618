//! Round-Trip Tests - composite values through the aligned buffers
//!
//! These tests exercise:
//! - Structs mixing 1/2/4/8-byte alignment at every base offset
//! - Both byte orders and GIOP 1.0 vs 1.2 wide strings
//! - Handoff metadata and isolation
//! - Desynchronization when reader and writer disagree on the base offset

mod common;

use common::*;
use giop_cdr::{
    AlignedWriteBuffer, CdrContext, CdrDecode, CdrEncode, CdrWString, GiopVersion,
};

#[test]
fn test_readings_roundtrip_at_every_base_offset() {
    init_tracing();

    for base in 0..16 {
        let mut out = AlignedWriteBuffer::new();
        out.set_base_offset(base);
        let readings: Vec<Reading> = (0..5).map(Reading::sample).collect();
        for r in &readings {
            r.cdr_encode(&mut out).unwrap();
        }

        let mut input = out.to_read_buffer();
        input.set_base_offset(base);
        for expected in &readings {
            assert_eq!(&Reading::cdr_decode(&mut input).unwrap(), expected, "base {base}");
        }
        assert!(input.is_empty(), "base {base}");
    }
}

#[test]
fn test_base_offset_changes_encoded_length() {
    let encode_at = |base: usize| {
        let mut out = AlignedWriteBuffer::new();
        out.set_base_offset(base);
        1u8.cdr_encode(&mut out).unwrap();
        2u64.cdr_encode(&mut out).unwrap();
        out.len()
    };

    assert_eq!(encode_at(0), 16);
    assert_eq!(encode_at(3), 13);
    assert_eq!(encode_at(7), 9);
    assert_eq!(encode_at(12), 12);
}

#[test]
fn test_mismatched_base_offset_desynchronizes() {
    let mut out = AlignedWriteBuffer::new();
    1u8.cdr_encode(&mut out).unwrap();
    0x11223344u32.cdr_encode(&mut out).unwrap();

    let mut input = out.to_read_buffer();
    input.set_base_offset(1);
    assert_eq!(u8::cdr_decode(&mut input).unwrap(), 1);
    assert_ne!(u32::cdr_decode(&mut input).unwrap(), 0x11223344);
}

#[test]
fn test_big_endian_readings() {
    let ctx = CdrContext::big_endian();
    let mut out = AlignedWriteBuffer::with_context(ctx);
    Reading::sample(3).cdr_encode(&mut out).unwrap();
    // bool, pad, u16 channel = 3 big-endian
    assert_eq!(&out.as_slice()[2..4], &[0, 3]);

    let mut input = out.to_read_buffer();
    assert_eq!(Reading::cdr_decode(&mut input).unwrap(), Reading::sample(3));
}

#[test]
fn test_giop_1_0_wide_strings() {
    let ctx = CdrContext::new().with_version(GiopVersion::V1_0);
    let mut out = AlignedWriteBuffer::with_context(ctx);
    Reading::sample(8).cdr_encode(&mut out).unwrap();
    CdrWString::new("tail").cdr_encode(&mut out).unwrap();

    let mut input = out.to_read_buffer();
    assert_eq!(input.context().version, GiopVersion::V1_0);
    assert_eq!(Reading::cdr_decode(&mut input).unwrap(), Reading::sample(8));
    assert_eq!(CdrWString::cdr_decode(&mut input).unwrap().as_str(), "tail");
}

#[test]
fn test_wide_string_layout_depends_on_handed_off_version() {
    let ctx = CdrContext::new().with_version(GiopVersion::V1_1);
    let mut out = AlignedWriteBuffer::with_context(ctx);
    CdrWString::new("ab").cdr_encode(&mut out).unwrap();

    // A reader that lost the version would take the 1.2 octet-counted path
    let mut wrong = out.to_read_buffer();
    wrong.set_context(CdrContext::new());
    assert!(CdrWString::cdr_decode(&mut wrong).is_err());

    let mut right = out.to_read_buffer();
    assert_eq!(CdrWString::cdr_decode(&mut right).unwrap().as_str(), "ab");
}

#[test]
fn test_handoff_twice_yields_identical_independent_readers() {
    let mut out = AlignedWriteBuffer::new();
    Point { x: 1, y: 2 }.cdr_encode(&mut out).unwrap();

    let mut a = out.to_read_buffer();
    let b = out.to_read_buffer();
    assert_eq!(a.as_slice(), b.as_slice());

    Point::cdr_decode(&mut a).unwrap();
    assert_eq!(a.position(), 8);
    assert_eq!(b.position(), 0);

    out.reset();
    Point { x: 9, y: 9 }.cdr_encode(&mut out).unwrap();
    let mut b = b;
    assert_eq!(Point::cdr_decode(&mut b).unwrap(), Point { x: 1, y: 2 });
}

#[test]
fn test_reset_reuses_buffer() {
    let mut out = AlignedWriteBuffer::new();
    out.set_base_offset(4);
    Reading::sample(1).cdr_encode(&mut out).unwrap();
    let first = out.snapshot_bytes();

    out.reset();
    Reading::sample(1).cdr_encode(&mut out).unwrap();
    assert_eq!(out.snapshot_bytes(), first);
}
