//! Length-prefixed message framing.
//!
//! Each message is a 4-byte big-endian length followed by the JSON payload.
//! These functions are pure over byte buffers; [`crate::Connection`] applies
//! them to a live stream.

use serde::{Serialize, de::DeserializeOwned};

use crate::MAX_MESSAGE_SIZE;
use crate::error::{ProtocolError, ProtocolResult};

/// Encodes a message to bytes with its length prefix.
///
/// Returns the complete frame, ready for transmission.
///
/// # Example
///
/// ```rust
/// use monto_protocol::{encode_message, decode_message, BrokerNotice, Message};
///
/// let msg = Message::Notification(BrokerNotice::new(serde_json::json!({"event": "flush"})));
/// let bytes = encode_message(&msg).unwrap();
/// let decoded: Message = decode_message(&bytes).unwrap();
/// assert_eq!(decoded, msg);
/// ```
pub fn encode_message<T: Serialize>(message: &T) -> ProtocolResult<Vec<u8>> {
    let json = serde_json::to_vec(message)?;
    let len = json.len() as u32;

    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(4 + json.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&json);
    Ok(frame)
}

/// Decodes a message from a complete frame (length prefix plus payload).
pub fn decode_message<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
    if data.len() < 4 {
        return Err(ProtocolError::IncompleteMessage {
            expected: 4,
            received: data.len(),
        });
    }

    let len_bytes: [u8; 4] = data[0..4].try_into().expect("sliced exactly four bytes");
    let len = u32::from_be_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_SIZE as usize {
        return Err(ProtocolError::MessageTooLarge {
            size: len as u32,
            max: MAX_MESSAGE_SIZE,
        });
    }

    if len == 0 {
        return Err(ProtocolError::EmptyMessage);
    }

    if data.len() < 4 + len {
        return Err(ProtocolError::IncompleteMessage {
            expected: 4 + len,
            received: data.len(),
        });
    }

    let message = serde_json::from_slice(&data[4..4 + len])?;
    Ok(message)
}
