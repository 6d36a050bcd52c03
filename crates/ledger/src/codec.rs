//! Record codec: JSON (de)serialization of stored collections.
//!
//! All defaulting of missing fields is declared on the record types
//! themselves (serde `default` attributes) and applied here, so call sites
//! never hand-patch half-decoded records.
//!
//! Decode policy: a malformed stored value degrades to an empty collection
//! so a corrupt entry cannot take the whole storefront down, but the
//! corruption is logged as a storage error for observability.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::store::StorageError;

/// Decode the collection stored under `key`.
///
/// `None` (key absent) and malformed values both yield an empty collection;
/// the latter is logged.
pub(crate) fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            let corrupt = StorageError::Corrupt {
                key: key.to_owned(),
                reason: err.to_string(),
            };
            error!(error = %corrupt, "discarding malformed stored collection");
            Vec::new()
        }
    }
}

/// Encode a collection for storage under `key`.
pub(crate) fn encode_collection<T: Serialize>(
    key: &str,
    items: &[T],
) -> Result<String, StorageError> {
    serde_json::to_string(items).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        #[serde(default)]
        quantity: u32,
    }

    #[test]
    fn test_absent_key_decodes_empty() {
        let items: Vec<Record> = decode_collection("cart_u1", None);
        assert!(items.is_empty());
    }

    #[test]
    fn test_malformed_value_degrades_to_empty() {
        let items: Vec<Record> = decode_collection("cart_u1", Some("{not json"));
        assert!(items.is_empty());
    }

    #[test]
    fn test_missing_fields_take_declared_defaults() {
        let items: Vec<Record> = decode_collection("cart_u1", Some(r#"[{"name":"x"}]"#));
        assert_eq!(
            items,
            vec![Record {
                name: "x".to_owned(),
                quantity: 0
            }]
        );
    }

    #[test]
    fn test_encode_round_trip() {
        let items = vec![Record {
            name: "x".to_owned(),
            quantity: 2,
        }];
        let encoded = encode_collection("cart_u1", &items).expect("encode");
        let decoded: Vec<Record> = decode_collection("cart_u1", Some(&encoded));
        assert_eq!(decoded, items);
    }
}
