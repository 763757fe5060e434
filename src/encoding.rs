//! Property body codec.
//!
//! The orchestrator ships resource properties as opaque JSON byte sequences.
//! Decoding is a pure function of (bytes, target shape): bodies are stored
//! immutably on the request and decoded on demand, as many times as needed,
//! including speculative decodes into different target types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RequestError;

/// Opaque state handed from one invocation's outcome to the next
/// invocation's input, used to resume long-running operations.
///
/// String keys with JSON-compatible values, so the mapping round-trips
/// through the orchestrator wire format unchanged.
pub type CallbackContext = serde_json::Map<String, serde_json::Value>;

/// Decode a property body into the caller-supplied target in place.
///
/// On success the target is replaced with the decoded value. On failure a
/// [`RequestError::Marshaling`] wrapping the structural decode error is
/// returned and the target must not be used.
///
/// Emptiness policy is the caller's concern: an empty body decodes to a
/// `Marshaling` error here, and [`crate::InvocationRequest`] applies the
/// per-body rules before calling in.
pub fn decode_into<T: DeserializeOwned>(body: &[u8], target: &mut T) -> Result<(), RequestError> {
    *target = serde_json::from_slice(body)?;
    Ok(())
}

/// Encode a model back into the wire format.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, RequestError> {
    Ok(serde_json::to_vec(value)?)
}
