//! SSE (Server-Sent Events) progress stream parser
//!
//! Parses the document-loading progress stream. SSE format consists of:
//! - `event: <type>` - event type line
//! - `data: <json>` - data payload line
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - Event type definitions (ProgressEvent, SseLine, SseParseError)
//! - `parser` - Parsing logic (SseParser, parse_sse_line, parse_progress_event)

mod events;
mod parser;

pub use events::{ProgressEvent, SseLine, SseParseError};
pub use parser::{parse_progress_event, parse_sse_line, SseParser};
