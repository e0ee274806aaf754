//! Payload size measurement.
//!
//! The sizer is the oracle for the claim-check threshold decision: a
//! payload whose measured size exceeds the configured maximum is offloaded
//! to the blob store instead of travelling inline. The measure is the
//! length of the payload's canonical JSON encoding, so it is deterministic
//! for a given value and stable across repeated calls.

use crate::serializer::JsonSerializer;
use crate::Result;
use serde::Serialize;

pub struct PayloadSizer;

impl PayloadSizer {
    /// Returns the serialized footprint of `payload` in bytes.
    ///
    /// Pure measurement: no side effects, no dependence on external state.
    pub fn size_of<T: Serialize>(payload: &T) -> Result<usize> {
        Ok(JsonSerializer::to_bytes(payload)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_is_serialized_length() {
        let payload = json!({"id": 1, "name": "order"});
        let size = PayloadSizer::size_of(&payload).unwrap();
        assert_eq!(size, serde_json::to_vec(&payload).unwrap().len());
    }

    #[test]
    fn test_size_is_stable_across_calls() {
        let payload = json!({"a": [1, 2, 3], "b": {"c": "d"}});
        let first = PayloadSizer::size_of(&payload).unwrap();
        let second = PayloadSizer::size_of(&payload).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_larger_payload_measures_larger() {
        let small = json!({"v": "x"});
        let large = json!({"v": "x".repeat(4096)});
        assert!(
            PayloadSizer::size_of(&large).unwrap() > PayloadSizer::size_of(&small).unwrap()
        );
    }
}
