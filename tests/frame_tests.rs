use winkdings::frame::*;

#[test]
fn test_decode_hello() {
    let frame = decode(b"#0005#hello").expect("frame");
    assert_eq!(frame.header_length, 5);
    assert_eq!(frame.payload, b"hello");
}

#[test]
fn test_decode_hex_case() {
    let lower = decode(b"#000a#0123456789").expect("lower");
    let upper = decode(b"#000A#0123456789").expect("upper");
    assert_eq!(lower, upper);
    assert_eq!(lower.header_length, 10);

    let input = [b"#0100#".as_slice(), &[b'z'; 256]].concat();
    let frame = decode(&input).expect("big");
    assert_eq!(frame.header_length, 0x100);
    assert_eq!(frame.payload.len(), 256);
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let frame = decode(b"#0003#abcdef").expect("frame");
    assert_eq!(frame.header_length, 3);
    assert_eq!(frame.payload, b"abc");
}

#[test]
fn test_decode_payload_may_contain_delimiter() {
    let frame = decode(b"#0002###").expect("frame");
    assert_eq!(frame.payload, b"##");
}

#[test]
fn test_too_short() {
    assert_eq!(decode(b""), Err(FrameError::LineTooShort));
    assert_eq!(decode(b"#"), Err(FrameError::LineTooShort));
    // six bytes, a complete header without payload
    assert_eq!(decode(b"#0001#"), Err(FrameError::LineTooShort));
    // a zero header without payload never reaches the header check
    assert_eq!(decode(b"#0000#"), Err(FrameError::LineTooShort));
    // length is checked before format
    assert_eq!(decode(b"garbag"), Err(FrameError::LineTooShort));
}

#[test]
fn test_invalid_format() {
    assert_eq!(decode(b"garbage"), Err(FrameError::InvalidFormat));
    assert_eq!(decode(b"00005#hello"), Err(FrameError::InvalidFormat));
    assert_eq!(decode(b"#0005-hello"), Err(FrameError::InvalidFormat));
    // format is checked before the header digits
    assert_eq!(decode(b"#zzzz-hello"), Err(FrameError::InvalidFormat));
}

#[test]
fn test_invalid_header() {
    assert_eq!(decode(b"#0000#x"), Err(FrameError::InvalidHeader));
    assert_eq!(decode(b"#00g1#abc"), Err(FrameError::InvalidHeader));
    assert_eq!(decode(b"# 001#abc"), Err(FrameError::InvalidHeader));
    assert_eq!(decode(b"#-001#abc"), Err(FrameError::InvalidHeader));
    assert_eq!(decode(&[b'#', b'0', b'0', 0xe9, b'1', b'#', b'a']), Err(FrameError::InvalidHeader));
}

#[test]
fn test_payload_truncated() {
    assert_eq!(decode(b"#0009#abc"), Err(FrameError::PayloadTruncated));
    assert_eq!(decode(b"#FFFF#abc"), Err(FrameError::PayloadTruncated));
    assert_eq!(decode(b"#0002#a"), Err(FrameError::PayloadTruncated));
}

#[test]
fn test_payload_exact() {
    let frame = decode(b"#0001#a").expect("frame");
    assert_eq!(frame.header_length, 1);
    assert_eq!(frame.payload, b"a");
}

#[test]
fn test_diagnostics() {
    assert_eq!(FrameError::LineTooShort.diagnostic(), b"FAIL too short\n");
    assert_eq!(FrameError::InvalidFormat.diagnostic(), b"FAIL invalid format\n");
    assert_eq!(
        FrameError::InvalidHeader.diagnostic(),
        b"FAIL invalid header byte count\n"
    );
    assert_eq!(
        FrameError::PayloadTruncated.diagnostic(),
        b"FAIL shorter than specified\n"
    );
    assert_eq!(FrameError::TooLong.diagnostic(), b"FAIL too long\n");
}

#[test]
fn test_display() {
    assert_eq!(FrameError::InvalidHeader.to_string(), "invalid header byte count");
    assert_eq!(FrameError::TooLong.to_string(), "line too long");
}

#[test]
fn test_encode_header() {
    assert_eq!(&encode_header(5), b"#0005#");
    assert_eq!(&encode_header(0x1a2b), b"#1A2B#");
    assert_eq!(&encode_header(0xffff), b"#FFFF#");

    let mut line = encode_header(3).to_vec();
    line.extend_from_slice(b"xyz");
    assert_eq!(decode(&line).expect("frame").payload, b"xyz");
}
