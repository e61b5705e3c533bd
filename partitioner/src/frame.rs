//! Length-prefixed frames exchanged with process-pool workers over
//! stdin/stdout.
//!
//! ```text
//! +----------------+------------------+
//! | length (4 LE)  | JSON payload     |
//! +----------------+------------------+
//! ```
//!
//! A work item is a header frame followed by the chunk's values as raw
//! little-endian `i32`s, four bytes each:
//!
//! ```text
//! +----------------+-----------------------------+----------------------+
//! | length (4 LE)  | {"chunk":..,"offset":..,    | count * i32 (LE)     |
//! |                |  "count":..}                |                      |
//! +----------------+-----------------------------+----------------------+
//! ```

use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on a single JSON frame. Chunk values travel outside frames.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

const PREFIX_LEN: usize = 4;

const VALUE_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame too large: {size} bytes (max {max} bytes)")]
    FrameTooLarge { size: usize, max: usize },

    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("work item announces {0} values, more than this platform can address")]
    TooManyValues(u64),

    #[error("end of stream")]
    EndOfStream,
}

/// The copied values of one chunk, sent to a worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub chunk: usize,
    pub offset: usize,
    pub values: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkHeader {
    chunk: usize,
    offset: usize,
    count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerReply {
    /// `index` is relative to the full sequence, not the chunk.
    Max { chunk: usize, index: usize, value: i32 },
    Failed { chunk: usize, reason: String },
}

pub fn encode_frame<T: Serialize>(message: &T) -> Result<Vec<u8>, FrameError> {
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_FRAME_SIZE {
        return Err(FrameError::FrameTooLarge {
            size: payload.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decodes the single frame held in `bytes`. Trailing bytes are ignored.
pub fn decode_frame<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FrameError> {
    if bytes.is_empty() {
        return Err(FrameError::EndOfStream);
    }
    if bytes.len() < PREFIX_LEN {
        return Err(FrameError::Truncated {
            expected: PREFIX_LEN,
            actual: bytes.len(),
        });
    }

    let mut prefix = [0u8; PREFIX_LEN];
    prefix.copy_from_slice(&bytes[..PREFIX_LEN]);
    let len = checked_len(prefix)?;

    let payload = &bytes[PREFIX_LEN..];
    if payload.len() < len {
        return Err(FrameError::Truncated {
            expected: len,
            actual: payload.len(),
        });
    }
    Ok(serde_json::from_slice(&payload[..len])?)
}

pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), FrameError> {
    writer.write_all(&encode_frame(message)?)?;
    writer.flush()?;
    Ok(())
}

pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, FrameError> {
    let mut prefix = [0u8; PREFIX_LEN];
    match reader.read_exact(&mut prefix) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(FrameError::EndOfStream),
        Err(e) => return Err(FrameError::Io(e)),
    }
    let len = checked_len(prefix)?;

    let mut payload = Vec::with_capacity(len);
    let actual = reader.take(len as u64).read_to_end(&mut payload)?;
    if actual < len {
        return Err(FrameError::Truncated {
            expected: len,
            actual,
        });
    }
    Ok(serde_json::from_slice(&payload)?)
}

pub fn encode_work_item(item: &WorkItem) -> Result<Vec<u8>, FrameError> {
    let header = encode_frame(&WorkHeader {
        chunk: item.chunk,
        offset: item.offset,
        count: item.values.len() as u64,
    })?;

    let mut bytes = Vec::with_capacity(header.len() + item.values.len() * VALUE_LEN);
    bytes.extend_from_slice(&header);
    for value in &item.values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

pub fn read_work_item<R: Read>(reader: &mut R) -> Result<WorkItem, FrameError> {
    let header: WorkHeader = read_frame(reader)?;
    let expected = usize::try_from(header.count)
        .ok()
        .and_then(|count| count.checked_mul(VALUE_LEN))
        .ok_or(FrameError::TooManyValues(header.count))?;

    let mut body = Vec::with_capacity(expected);
    let actual = reader.take(expected as u64).read_to_end(&mut body)?;
    if actual < expected {
        return Err(FrameError::Truncated { expected, actual });
    }

    let values = body
        .chunks_exact(VALUE_LEN)
        .map(|raw| i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
        .collect();
    Ok(WorkItem {
        chunk: header.chunk,
        offset: header.offset,
        values,
    })
}

fn checked_len(prefix: [u8; PREFIX_LEN]) -> Result<usize, FrameError> {
    let len = u32::from_le_bytes(prefix) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(len)
}
