//! Message Tests - GIOP envelopes around aligned bodies
//!
//! These tests exercise:
//! - Bodies aligned against the full message, behind the 12-byte header
//! - Every supported version and byte order
//! - Encapsulations with their own byte order inside a body
//! - Truncated and oversized input surfacing as decode failures

mod common;

use bytes::BytesMut;
use common::*;
use giop_cdr::message::HEADER_SIZE;
use giop_cdr::{
    code_sets, read_encapsulation, read_message, read_message_with, write_encapsulation,
    AlignmentError, CdrContext, CdrDecode, CdrEncode, CdrError, CdrString, CodeSetContext,
    GiopVersion, MessageBuilder, MessageType, Operation, WriteBufferConfig,
};

const VERSIONS: [GiopVersion; 3] = [GiopVersion::V1_0, GiopVersion::V1_1, GiopVersion::V1_2];

#[test]
fn test_message_roundtrip_all_versions_and_byte_orders() {
    init_tracing();

    for version in VERSIONS {
        for little_endian in [true, false] {
            let ctx = CdrContext::with_byte_order(little_endian).with_version(version);
            let mut builder = MessageBuilder::new(ctx, MessageType::Reply);
            for seed in 0..3 {
                builder.put(&Reading::sample(seed)).unwrap();
            }
            let message = builder.finish().unwrap();

            let (header, mut body) = read_message(message).unwrap();
            assert_eq!(header.version, version);
            assert_eq!(header.little_endian(), little_endian);
            assert_eq!(body.context().version, version);
            for seed in 0..3 {
                assert_eq!(Reading::cdr_decode(&mut body).unwrap(), Reading::sample(seed));
            }
            assert!(body.is_empty());
        }
    }
}

#[test]
fn test_doubles_land_on_message_boundaries() {
    let mut builder = MessageBuilder::new(CdrContext::new(), MessageType::Request);
    builder.put(&1u8).unwrap();
    builder.put(&1.0f64).unwrap();
    builder.put(&2u16).unwrap();
    builder.put(&2.0f64).unwrap();
    let message = builder.finish().unwrap();

    // u8@12, f64@16, u16@24, f64@32
    assert_eq!(message.len(), 40);
    assert_eq!(&message[16..24], &1.0f64.to_le_bytes());
    assert_eq!(&message[32..40], &2.0f64.to_le_bytes());

    let (_, mut body) = read_message(message).unwrap();
    u8::cdr_decode(&mut body).unwrap();
    f64::cdr_decode(&mut body).unwrap();
    assert_eq!(body.message_position(), 24);
}

#[test]
fn test_encapsulation_inside_body() {
    let mut builder = MessageBuilder::new(CdrContext::new(), MessageType::LocateReply);
    builder.put(&5u8).unwrap();
    write_encapsulation(builder.body(), false, |inner| {
        Point { x: -1, y: 1 }.cdr_encode(inner)?;
        CdrString::new("nested").cdr_encode(inner)
    })
    .unwrap();
    builder.put(&9u32).unwrap();
    let message = builder.finish().unwrap();

    let (_, mut body) = read_message(message).unwrap();
    assert_eq!(u8::cdr_decode(&mut body).unwrap(), 5);
    let mut inner = read_encapsulation(&mut body).unwrap();
    assert!(!inner.context().little_endian);
    assert_eq!(inner.base_offset(), 0);
    assert_eq!(Point::cdr_decode(&mut inner).unwrap(), Point { x: -1, y: 1 });
    assert_eq!(CdrString::cdr_decode(&mut inner).unwrap().as_str(), "nested");
    assert!(inner.is_empty());
    assert_eq!(u32::cdr_decode(&mut body).unwrap(), 9);
}

#[test]
fn test_fragment_flag_roundtrip() {
    let ctx = CdrContext::big_endian().with_version(GiopVersion::V1_1);
    let mut builder = MessageBuilder::new(ctx, MessageType::Fragment);
    builder.set_more_fragments(true);
    builder.put(&7u32).unwrap();
    let message = builder.finish().unwrap();

    let (header, _) = read_message(message).unwrap();
    assert_eq!(header.message_type, MessageType::Fragment);
    assert!(header.more_fragments());
    assert!(!header.little_endian());
}

#[test]
fn test_fragment_rejected_for_giop_1_0() {
    let ctx = CdrContext::new().with_version(GiopVersion::V1_0);
    let builder = MessageBuilder::new(ctx, MessageType::Fragment);
    assert!(matches!(builder.finish(), Err(CdrError::InvalidMessageType(7))));
}

#[test]
fn test_negotiated_utf8_code_set() {
    init_tracing();

    let negotiated = CodeSetContext::new(code_sets::UTF_8, code_sets::UTF_16);
    let mut builder = MessageBuilder::new(
        CdrContext::new().with_code_set(negotiated),
        MessageType::Request,
    );
    builder.put(&7u8).unwrap();
    builder.put(&CdrString::new("€uro")).unwrap();
    let message = builder.finish().unwrap();

    // u8 at 12, length 4-aligned at 16, 7 UTF-8 bytes incl. NUL
    assert_eq!(message.len(), HEADER_SIZE + 4 + 4 + 7);

    let (_, mut body) = read_message_with(message.clone(), negotiated).unwrap();
    assert_eq!(body.context().code_set, negotiated);
    assert_eq!(u8::cdr_decode(&mut body).unwrap(), 7);
    assert_eq!(CdrString::cdr_decode(&mut body).unwrap().as_str(), "€uro");
    assert!(body.is_empty());

    // Without the negotiated code sets every UTF-8 byte reads as one Latin-1 char
    let (_, mut body) = read_message(message).unwrap();
    assert_eq!(u8::cdr_decode(&mut body).unwrap(), 7);
    let misread = CdrString::cdr_decode(&mut body).unwrap();
    assert_eq!(misread.as_str(), "\u{e2}\u{82}\u{ac}uro");
    assert_ne!(misread.as_str(), "€uro");
}

#[test]
fn test_unsupported_narrow_code_set_fails_body_decode() {
    let mut builder = MessageBuilder::new(CdrContext::new(), MessageType::Request);
    builder.put(&CdrString::new("plain")).unwrap();
    let message = builder.finish().unwrap();

    let ucs2_narrow = CodeSetContext::new(code_sets::UCS_2, code_sets::UTF_16);
    let (_, mut body) = read_message_with(message, ucs2_narrow).unwrap();
    let err = CdrString::cdr_decode(&mut body).unwrap_err();
    assert!(matches!(err, CdrError::UnsupportedCodeSet(code_sets::UCS_2)));
}

#[test]
fn test_truncated_message_is_size_mismatch() {
    let mut builder = MessageBuilder::new(CdrContext::new(), MessageType::Request);
    builder.put(&Reading::sample(2)).unwrap();
    let message = builder.finish().unwrap();

    let err = read_message(message.slice(..message.len() - 3)).unwrap_err();
    assert!(matches!(err, CdrError::SizeMismatch { .. }));
}

#[test]
fn test_understated_size_fails_body_decode() {
    let mut builder = MessageBuilder::new(CdrContext::new(), MessageType::Request);
    builder.put(&Reading::sample(4)).unwrap();
    let message = builder.finish().unwrap();

    // Claim a body 6 bytes shorter than written
    let declared = (message.len() - HEADER_SIZE - 6) as u32;
    let mut patched = BytesMut::from(&message[..]);
    patched[8..12].copy_from_slice(&declared.to_le_bytes());

    let (_, mut body) = read_message(patched.freeze()).unwrap();
    let err = Reading::cdr_decode(&mut body).unwrap_err();
    assert!(matches!(err, CdrError::Alignment(e) if e.is_underrun()));
}

#[test]
fn test_body_size_limit() {
    let config = WriteBufferConfig {
        initial_capacity: 16,
        max_len: Some(10),
    };
    let mut builder = MessageBuilder::with_config(config, CdrContext::new(), MessageType::Request);
    builder.put(&1u8).unwrap();
    builder.put(&2u32).unwrap();

    // body len 8, message position 20; aligning to 24 needs 4 more bytes
    let err = builder.put(&3u64).unwrap_err();
    match err {
        CdrError::Alignment(AlignmentError::StorageExhausted {
            op,
            alignment,
            requested,
            len,
        }) => {
            assert_eq!(op, Operation::Align);
            assert_eq!(alignment, 8);
            assert_eq!(requested, 4);
            assert_eq!(len, 8);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_garbage_is_rejected() {
    let err = read_message(bytes::Bytes::from_static(b"HTTP/1.1 200 OK")).unwrap_err();
    assert!(matches!(err, CdrError::BadMagic(_)));

    let err = read_message(bytes::Bytes::from_static(b"GIO")).unwrap_err();
    assert!(matches!(err, CdrError::Alignment(_)));
}
