//! Minimal Minecraft protocol 47 (1.8.x) wire layer.
//!
//! This is deliberately shallow: only the packets the bot exchanges are
//! modeled, everything else decodes to an ignored `Unknown`.

pub mod chat;
pub mod packets;
pub mod varint;
pub mod wire;

pub use packets::{ClientboundLogin, ClientboundPlay, Serverbound};
pub use wire::Framing;

/// Protocol version spoken during the handshake (1.8.x).
pub const PROTOCOL_VERSION: i32 = 47;

/// Hard cap on a single frame. The vanilla limit is 2^21 - 1 bytes; anything
/// near it is not something this bot ever receives legitimately.
pub const MAX_FRAME_LEN: usize = 2 * 1024 * 1024;

/// Serverbound chat messages are limited to 100 characters in 1.8.
pub const MAX_CHAT_LEN: usize = 100;
