//! MsgPack codec using `rmp-serde`.
//!
//! Args and reply values are encoded with `to_vec_named`, so structs travel as
//! maps keyed by field name rather than positional arrays. A dispatched reply
//! is handed to whatever transport hosts the map, and the callers on the other
//! side look reply fields up by name. Reordering the fields of a reply struct
//! therefore does not break them, and neither does adding a field they ignore.
//!
//! # Example
//!
//! ```
//! use rpc_service_map::codec::MsgPackCodec;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Operands {
//!     a: i64,
//!     b: i64,
//! }
//!
//! let args = Operands { a: 1, b: 2 };
//! let encoded = MsgPackCodec::encode(&args).unwrap();
//! let decoded: Operands = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, args);
//! ```

use crate::error::Result;

/// MessagePack codec for args and reply values.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map).
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug, Default)]
    struct Operands {
        a: i64,
        b: i64,
        label: String,
    }

    #[test]
    fn test_structs_encode_as_maps() {
        let args = Operands {
            a: 1,
            b: 2,
            label: "sum".to_string(),
        };

        let encoded = MsgPackCodec::encode(&args).unwrap();

        // fixmap with 3 entries; positional encoding would be 0x93
        assert_eq!(encoded[0], 0x83, "Expected fixmap, got {:02X}", encoded[0]);

        let decoded: Operands = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn test_fields_matched_by_name() {
        #[derive(Serialize)]
        struct NewerOperands {
            label: String,
            b: i64,
            a: i64,
            precise: bool,
        }

        let encoded = MsgPackCodec::encode(&NewerOperands {
            label: "diff".to_string(),
            b: 4,
            a: 10,
            precise: true,
        })
        .unwrap();

        let decoded: Operands = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(
            decoded,
            Operands {
                a: 10,
                b: 4,
                label: "diff".to_string(),
            }
        );
    }

    #[test]
    fn test_unit_reply() {
        let encoded = MsgPackCodec::encode(&()).unwrap();
        MsgPackCodec::decode::<()>(&encoded).unwrap();
    }

    #[test]
    fn test_null_decodes_to_none() {
        let encoded = MsgPackCodec::encode(&Option::<i32>::None).unwrap();
        assert_eq!(encoded, vec![0xc0]);

        let decoded: Option<i32> = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_binary_payload() {
        let data: Vec<u8> = vec![0x01, 0x02, 0x03];
        let encoded = MsgPackCodec::encode(&serde_bytes::Bytes::new(&data)).unwrap();
        assert_eq!(encoded[0], 0xc4, "Expected bin8 format");

        let decoded: serde_bytes::ByteBuf = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded.as_ref(), &data);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<Operands> = MsgPackCodec::decode(b"not valid msgpack");
        assert!(matches!(result, Err(RegistryError::MsgPackDecode(_))));
    }

    #[test]
    fn test_decode_error_on_wrong_shape() {
        let encoded = MsgPackCodec::encode(&"just a string").unwrap();
        let result: Result<Operands> = MsgPackCodec::decode(&encoded);
        assert!(result.is_err());
    }
}
