//! Compiles an Antelope-style ABI schema into specialized binary pack/unpack
//! routines.
//!
//! A host parses its ABI JSON into anything implementing [`abi::AbiView`],
//! hands it to [`resolver::resolve`] to get back a [`resolver::Registry`],
//! then builds a [`dispatch::Codec`] over that registry and calls
//! [`dispatch::Codec::pack`]/[`dispatch::Codec::unpack`] by type name.
//!
//! ```
//! use abi_codec::abi::{AbiField, AbiStruct, StaticAbi};
//! use abi_codec::dispatch::Codec;
//! use abi_codec::resolver::resolve;
//! use abi_codec::value::Value;
//! use indexmap::IndexMap;
//!
//! let abi = StaticAbi {
//!     structs: vec![AbiStruct {
//!         name: "greeting".to_string(),
//!         base: None,
//!         fields: vec![AbiField { name: "text".to_string(), type_expr: "string".to_string() }],
//!     }],
//!     ..Default::default()
//! };
//! let registry = resolve(&abi).unwrap();
//! let codec = Codec::new(&registry);
//!
//! let mut record = IndexMap::new();
//! record.insert("text".to_string(), Value::Str("hi".to_string()));
//! let bytes = codec.pack("greeting", &Value::Record(record)).unwrap();
//! let value = codec.unpack("greeting", &bytes).unwrap();
//! assert_eq!(value.as_record().unwrap()["text"].as_str(), Some("hi"));
//! ```

pub mod abi;
pub mod dispatch;
pub mod error;
mod emitter;
pub mod ir;
pub mod resolver;
pub mod value;
mod wire;

pub use error::CodecError;
pub use value::Value;
