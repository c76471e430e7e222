use std::io;

use thiserror::Error;

/// Errors from the wire layer.
#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("varint wider than 5 bytes")]
    VarIntTooLong,

    #[error("frame of {0} bytes exceeds the protocol limit")]
    FrameTooLarge(usize),

    #[error("string of {0} bytes exceeds field limit")]
    StringTooLong(usize),

    #[error("malformed packet: {0}")]
    Malformed(String),

    /// The server closed the socket. Not a protocol violation; the session
    /// layer treats it as an ordinary disconnect.
    #[error("connection closed by server")]
    ConnectionClosed,
}

/// Errors that end a client session abnormally.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("login rejected: {0}")]
    LoginRejected(String),

    #[error("could not resolve address: {0}")]
    AddressResolution(String),
}
