//! Encodes values with `valcbor` and reads them back with an independent
//! decoder.

use ciborium::value::{Integer, Value as Cbor};
use valcbor::{Encoder, Tagged, Value, encode};

fn decode(data: &[u8]) -> Cbor {
    ciborium::from_reader(data).expect("Failed to decode")
}

/// What a conformant decoder should see for `value`.
fn expected(value: &Value) -> Cbor {
    match value {
        Value::Integer(n) => Cbor::Integer(Integer::try_from(*n).unwrap()),
        Value::Double(f) => Cbor::Float(*f),
        Value::Single(f) => Cbor::Float(*f as f64),
        Value::Text(s) => Cbor::Text(s.clone()),
        Value::Bytes(b) => Cbor::Bytes(b.clone()),
        Value::Array(items) => Cbor::Array(items.iter().map(expected).collect()),
        Value::Map(pairs)
            if !pairs.is_empty()
                && pairs
                    .iter()
                    .enumerate()
                    .all(|(i, (k, _))| *k == Value::Integer(i as i128)) =>
        {
            Cbor::Array(pairs.iter().map(|(_, v)| expected(v)).collect())
        }
        Value::Map(pairs) => Cbor::Map(
            pairs
                .iter()
                .map(|(k, v)| (expected(k), expected(v)))
                .collect(),
        ),
        Value::Bool(b) => Cbor::Bool(*b),
        Value::Null => Cbor::Null,
        Value::Tagged(t) => Cbor::Tag(t.tag(), Box::new(expected(t.value()))),
        Value::Undefined | Value::Simple(_) => panic!("No ciborium equivalent"),
    }
}

fn round_trip(value: Value) {
    let data = encode(value.clone()).unwrap();
    assert_eq!(decode(&data), expected(&value), "{value:?}");
}

#[test]
fn integers() {
    for n in [
        0i128,
        1,
        23,
        24,
        255,
        256,
        65535,
        65536,
        u32::MAX as i128,
        u32::MAX as i128 + 1,
        u64::MAX as i128,
        -1,
        -24,
        -25,
        -256,
        -257,
        i64::MIN as i128,
        -(u64::MAX as i128) - 1,
    ] {
        round_trip(Value::Integer(n));
    }
}

#[test]
fn floats() {
    for f in [0.0, -0.0, 1.5, -4.1, 1.0e300, f64::MAX, f64::INFINITY] {
        round_trip(Value::Double(f));
    }
    for f in [0.5f32, 100000.0, f32::MIN_POSITIVE, f32::NEG_INFINITY] {
        round_trip(Value::Single(f));
    }

    match decode(&encode(f64::NAN).unwrap()) {
        Cbor::Float(f) => assert!(f.is_nan()),
        other => panic!("Expected a float, got {other:?}"),
    }
}

#[test]
fn strings() {
    round_trip("".into());
    round_trip("short".into());
    round_trip("x".repeat(300).into());
    round_trip("\u{00e9}".repeat(300).into());
    round_trip("a\u{6c34}\u{10151}".repeat(200).into());
    round_trip(vec![0u8; 0].into());
    round_trip((0..=255u8).cycle().take(1000).collect::<Vec<_>>().into());
}

#[test]
fn composites() {
    let doc = Value::map([
        ("name", Value::from("sensor-7")),
        ("readings", Value::array([1.5, 2.25, -0.125])),
        ("flags", Value::array([true, false])),
        ("missing", Value::Null),
        (
            "dense",
            Value::map([(0, "zero"), (1, "one"), (2, "two")]),
        ),
        ("sparse", Value::map([(0, "zero"), (2, "two")])),
        ("empty", Value::Map(Vec::new())),
        ("blob", Value::from(&b"\x00\x01\x02"[..])),
        ("when", Tagged::new(0, "2013-03-21T20:04:00Z").into()),
        (
            "nested",
            Value::array([Value::array([Value::array([Value::from(1)])])]),
        ),
    ]);
    round_trip(doc);
}

#[test]
fn replaced_tag_payload() {
    let encoder = Encoder::new().with_replacer(|tag: u64, value: Value| match (tag, value) {
        (1, Value::Text(s)) if s == "epoch" => Ok(Value::from(0)),
        (_, value) => Ok::<_, core::convert::Infallible>(value),
    });
    let data = encoder.encode(Tagged::new(1, "epoch")).unwrap();
    assert_eq!(
        decode(&data),
        Cbor::Tag(1, Box::new(Cbor::Integer(0.into())))
    );
}

#[test]
fn sequence() {
    let encoder = Encoder::new();
    let mut data = Vec::new();
    let first = encoder.encode_into("first", &mut data).unwrap();
    let second = encoder.encode_into(Value::array([1, 2]), &mut data).unwrap();

    assert_eq!(first.end, second.start);
    assert_eq!(decode(&data[first]), Cbor::Text("first".into()));
    assert_eq!(
        decode(&data[second]),
        Cbor::Array(vec![Cbor::Integer(1.into()), Cbor::Integer(2.into())])
    );
}
