//! The literal end-to-end scenarios of §8, exercised through the public
//! dispatch API against hand-built [`StaticAbi`] fixtures.

use abi_codec::abi::{AbiField, AbiStruct, AbiVariant, StaticAbi};
use abi_codec::dispatch::Codec;
use abi_codec::resolver::resolve;
use abi_codec::value::Value;
use indexmap::IndexMap;

fn field(name: &str, type_expr: &str) -> AbiField {
    AbiField { name: name.to_string(), type_expr: type_expr.to_string() }
}

#[test]
fn primitive_uint32_matches_the_literal_byte_pattern() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "wrapper".to_string(),
            base: None,
            fields: vec![field("v", "uint32")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert("v".to_string(), Value::UInt(305_419_896));
    let bytes = codec.pack("wrapper", &Value::Record(record)).unwrap();
    assert_eq!(bytes, vec![0x78, 0x56, 0x34, 0x12]);

    let decoded = codec.unpack("wrapper", &bytes).unwrap();
    assert_eq!(decoded.as_record().unwrap()["v"], Value::UInt(305_419_896));
}

#[test]
fn length_prefixed_string_matches_the_literal_byte_pattern() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "wrapper".to_string(),
            base: None,
            fields: vec![field("s", "string")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert("s".to_string(), Value::Str("hi".to_string()));
    let bytes = codec.pack("wrapper", &Value::Record(record)).unwrap();
    assert_eq!(bytes, vec![0x02, b'h', b'i']);

    let decoded = codec.unpack("wrapper", &bytes).unwrap();
    assert_eq!(decoded.as_record().unwrap()["s"].as_str(), Some("hi"));
}

/// The `transaction_header`/`transaction` struct-with-base scenario (§8
/// scenario 3): six all-zero fixed header fields plus three zero-length
/// arrays, 16 bytes total, all zero.
#[test]
fn struct_with_base_all_zero_fields() {
    let abi = StaticAbi {
        structs: vec![
            AbiStruct {
                name: "transaction_header".to_string(),
                base: None,
                fields: vec![
                    field("expiration", "time_point_sec"),
                    field("ref_block_num", "uint16"),
                    field("ref_block_prefix", "uint32"),
                    field("max_net_usage_words", "varuint32"),
                    field("max_cpu_usage_ms", "uint8"),
                    field("delay_sec", "varuint32"),
                ],
            },
            AbiStruct {
                name: "transaction".to_string(),
                base: Some("transaction_header".to_string()),
                fields: vec![
                    field("context_free_actions", "bytes[]"),
                    field("actions", "bytes[]"),
                    field("transaction_extensions", "bytes[]"),
                ],
            },
        ],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert("expiration".to_string(), Value::UInt(0));
    record.insert("ref_block_num".to_string(), Value::UInt(0));
    record.insert("ref_block_prefix".to_string(), Value::UInt(0));
    record.insert("max_net_usage_words".to_string(), Value::UInt(0));
    record.insert("max_cpu_usage_ms".to_string(), Value::UInt(0));
    record.insert("delay_sec".to_string(), Value::UInt(0));
    record.insert("context_free_actions".to_string(), Value::List(vec![]));
    record.insert("actions".to_string(), Value::List(vec![]));
    record.insert("transaction_extensions".to_string(), Value::List(vec![]));

    let bytes = codec.pack("transaction", &Value::Record(record.clone())).unwrap();
    assert_eq!(bytes.len(), 16);
    assert!(bytes.iter().all(|&b| b == 0));

    let decoded = codec.unpack("transaction", &bytes).unwrap();
    assert_eq!(decoded, Value::Record(record));
}

#[test]
fn optional_present_and_absent() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("x", "uint8?")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut present = IndexMap::new();
    present.insert("x".to_string(), Value::UInt(7));
    let bytes = codec.pack("t", &Value::Record(present.clone())).unwrap();
    assert_eq!(bytes, vec![0x01, 0x07]);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(present));

    let mut absent = IndexMap::new();
    absent.insert("x".to_string(), Value::Absent);
    let bytes = codec.pack("t", &Value::Record(absent.clone())).unwrap();
    assert_eq!(bytes, vec![0x00]);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(absent));
}

#[test]
fn extension_tail_present_and_absent() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("a", "uint8"), field("b", "uint8$")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut absent = IndexMap::new();
    absent.insert("a".to_string(), Value::UInt(1));
    absent.insert("b".to_string(), Value::Absent);
    let bytes = codec.pack("t", &Value::Record(absent.clone())).unwrap();
    assert_eq!(bytes, vec![0x01]);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(absent));

    let mut present = IndexMap::new();
    present.insert("a".to_string(), Value::UInt(1));
    present.insert("b".to_string(), Value::UInt(2));
    let bytes = codec.pack("t", &Value::Record(present.clone())).unwrap();
    assert_eq!(bytes, vec![0x01, 0x02]);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(present));
}

/// Truncating the trailing extension bytes off an encoded struct must still
/// decode, with the missing fields coming back absent (§8 invariant 4).
#[test]
fn truncated_extension_tail_still_decodes() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("a", "uint8"), field("b", "uint8$"), field("c", "string$")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut full = IndexMap::new();
    full.insert("a".to_string(), Value::UInt(9));
    full.insert("b".to_string(), Value::UInt(5));
    full.insert("c".to_string(), Value::Str("hi".to_string()));
    let bytes = codec.pack("t", &Value::Record(full)).unwrap();

    // Truncate off every trailing extension field one at a time.
    let truncated_to_a_b = &bytes[..2];
    let mut expect_a_b = IndexMap::new();
    expect_a_b.insert("a".to_string(), Value::UInt(9));
    expect_a_b.insert("b".to_string(), Value::UInt(5));
    expect_a_b.insert("c".to_string(), Value::Absent);
    assert_eq!(codec.unpack("t", truncated_to_a_b).unwrap(), Value::Record(expect_a_b));

    let truncated_to_a = &bytes[..1];
    let mut expect_a = IndexMap::new();
    expect_a.insert("a".to_string(), Value::UInt(9));
    expect_a.insert("b".to_string(), Value::Absent);
    expect_a.insert("c".to_string(), Value::Absent);
    assert_eq!(codec.unpack("t", truncated_to_a).unwrap(), Value::Record(expect_a));
}

#[test]
fn variant_by_index_matches_the_literal_byte_pattern() {
    let abi = StaticAbi {
        variants: vec![AbiVariant {
            name: "either".to_string(),
            cases: vec!["uint32".to_string(), "string".to_string()],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut value = IndexMap::new();
    value.insert("type".to_string(), Value::Str("string".to_string()));
    value.insert("value".to_string(), Value::Str("hi".to_string()));
    let bytes = codec.pack("either", &Value::Record(value)).unwrap();
    assert_eq!(bytes, vec![0x01, 0x02, b'h', b'i']);

    // `uint32` and `string` classify to distinct host classes, so this
    // variant's `string` case is its only case of that class: unpack
    // returns the bare payload rather than re-tagging it (§4.4 "or — when
    // compatible — just the payload"), which is what lets a bare-form
    // pack-side value round-trip through unpack unchanged (§8 invariant 1).
    let decoded = codec.unpack("either", &bytes).unwrap();
    assert_eq!(decoded, Value::Str("hi".to_string()));
}

/// `T?[]` (array of optionals, each with its own presence byte) vs `T[]?`
/// (optional array: one presence byte, then a length-prefixed list) must
/// compose distinctly (§4.3 "Nesting is permitted and must compose
/// correctly").
#[test]
fn nested_modifiers_compose_in_declared_order() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("a", "uint8?[]"), field("b", "uint8[]?")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert(
        "a".to_string(),
        Value::List(vec![Value::UInt(1), Value::Absent, Value::UInt(3)]),
    );
    record.insert("b".to_string(), Value::List(vec![Value::UInt(9), Value::UInt(8)]));
    let bytes = codec.pack("t", &Value::Record(record.clone())).unwrap();

    // `a`: count=3, then per-element presence byte + value.
    let mut expected = vec![0x03, 0x01, 0x01, 0x00, 0x01, 0x03];
    // `b`: one presence byte, then count=2, then two raw bytes.
    expected.extend([0x01, 0x02, 0x09, 0x08]);
    assert_eq!(bytes, expected);

    let decoded = codec.unpack("t", &bytes).unwrap();
    assert_eq!(decoded, Value::Record(record));
}

#[test]
fn signed_128_bit_minimum_round_trips() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("v", "int128")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert("v".to_string(), Value::Int(i128::MIN));
    let bytes = codec.pack("t", &Value::Record(record.clone())).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(record));
}

#[test]
fn empty_string_and_empty_array_are_a_single_zero_byte() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("s", "string"), field("a", "uint8[]")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let mut record = IndexMap::new();
    record.insert("s".to_string(), Value::Str(String::new()));
    record.insert("a".to_string(), Value::List(vec![]));
    let bytes = codec.pack("t", &Value::Record(record.clone())).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00]);
    assert_eq!(codec.unpack("t", &bytes).unwrap(), Value::Record(record));
}

#[test]
fn alias_delegates_to_its_target_routine() {
    let abi = StaticAbi {
        aliases: vec![abi_codec::abi::AbiAlias {
            name: "my_id".to_string(),
            type_expr: "uint64".to_string(),
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);

    let bytes = codec.pack("my_id", &Value::UInt(42)).unwrap();
    assert_eq!(bytes, 42u64.to_le_bytes());
    assert_eq!(codec.unpack("my_id", &bytes).unwrap(), Value::UInt(42));
}

#[test]
fn missing_required_field_is_an_encode_error() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("required", "uint8")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);
    let err = codec.pack("t", &Value::Record(IndexMap::new())).unwrap_err();
    assert!(matches!(
        err,
        abi_codec::CodecError::Encode(abi_codec::error::EncodeError::MissingField(ref f)) if f == "required"
    ));
}

/// A missing key for an `optional` field is an error, not silent absence:
/// only `extension` fields get that leniency (§4.3 "absent key ⇒ error
/// except where the outermost modifier is `extension`").
#[test]
fn missing_key_for_an_optional_field_is_an_encode_error() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("x", "uint8?")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);
    let err = codec.pack("t", &Value::Record(IndexMap::new())).unwrap_err();
    assert!(matches!(
        err,
        abi_codec::CodecError::Encode(abi_codec::error::EncodeError::MissingField(ref f)) if f == "x"
    ));
}

#[test]
fn truncated_buffer_is_a_decode_error() {
    let abi = StaticAbi {
        structs: vec![AbiStruct {
            name: "t".to_string(),
            base: None,
            fields: vec![field("v", "uint32")],
        }],
        ..Default::default()
    };
    let registry = resolve(&abi).unwrap();
    let codec = Codec::new(&registry);
    let err = codec.unpack("t", &[0x01, 0x02]).unwrap_err();
    assert!(matches!(
        err,
        abi_codec::CodecError::Decode(abi_codec::error::DecodeError::Truncated { .. })
    ));
}
