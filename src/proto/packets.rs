//! Typed packets for the handful of messages the bot exchanges.
//!
//! Packet ids are per protocol state; decode is therefore split by state and
//! encode resolves the id from the variant. Unknown clientbound packets are
//! surfaced as `Unknown` and skipped by the caller rather than treated as
//! errors (servers send far more than a bot needs to understand).

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::ProtoError;
use crate::proto::varint::{read_varint, write_varint};
use crate::proto::wire::{read_string, write_string};

/// Packets the bot sends.
#[derive(Debug, Clone, PartialEq)]
pub enum Serverbound {
    Handshake {
        protocol_version: i32,
        server_address: String,
        server_port: u16,
        next_state: i32,
    },
    LoginStart {
        name: String,
    },
    KeepAlive {
        id: i32,
    },
    Chat {
        message: String,
    },
    /// Absolute position + orientation, echoed to confirm server teleports.
    PositionLook {
        x: f64,
        feet_y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    },
    /// Orientation only. The anti-idle camera nudge.
    Look {
        yaw: f32,
        pitch: f32,
        on_ground: bool,
    },
}

impl Serverbound {
    pub fn packet_id(&self) -> i32 {
        match self {
            Serverbound::Handshake { .. } => 0x00,
            Serverbound::LoginStart { .. } => 0x00,
            Serverbound::KeepAlive { .. } => 0x00,
            Serverbound::Chat { .. } => 0x01,
            Serverbound::PositionLook { .. } => 0x06,
            Serverbound::Look { .. } => 0x05,
        }
    }

    pub fn encode_body(&self) -> Result<Vec<u8>, ProtoError> {
        let mut body = Vec::new();
        let w: &mut Vec<u8> = &mut body;
        match self {
            Serverbound::Handshake {
                protocol_version,
                server_address,
                server_port,
                next_state,
            } => {
                write_varint(w, *protocol_version)?;
                write_string(w, server_address)?;
                w.write_u16::<BigEndian>(*server_port)?;
                write_varint(w, *next_state)?;
            }
            Serverbound::LoginStart { name } => {
                write_string(w, name)?;
            }
            Serverbound::KeepAlive { id } => {
                write_varint(w, *id)?;
            }
            Serverbound::Chat { message } => {
                write_string(w, message)?;
            }
            Serverbound::PositionLook {
                x,
                feet_y,
                z,
                yaw,
                pitch,
                on_ground,
            } => {
                w.write_f64::<BigEndian>(*x)?;
                w.write_f64::<BigEndian>(*feet_y)?;
                w.write_f64::<BigEndian>(*z)?;
                w.write_f32::<BigEndian>(*yaw)?;
                w.write_f32::<BigEndian>(*pitch)?;
                w.write_u8(*on_ground as u8)?;
            }
            Serverbound::Look {
                yaw,
                pitch,
                on_ground,
            } => {
                w.write_f32::<BigEndian>(*yaw)?;
                w.write_f32::<BigEndian>(*pitch)?;
                w.write_u8(*on_ground as u8)?;
            }
        }
        Ok(body)
    }
}

/// Clientbound packets during the login phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundLogin {
    /// Reason is a chat-component JSON document.
    Disconnect { reason: String },
    /// Online-mode handshake. The bot does not speak it; fields are not read.
    EncryptionRequest,
    LoginSuccess { uuid: String, username: String },
    SetCompression { threshold: i32 },
    Unknown { packet_id: i32 },
}

impl ClientboundLogin {
    pub fn decode(packet_id: i32, data: &[u8]) -> Result<Self, ProtoError> {
        let mut r = Cursor::new(data);
        let packet = match packet_id {
            0x00 => ClientboundLogin::Disconnect {
                reason: read_string(&mut r)?,
            },
            0x01 => ClientboundLogin::EncryptionRequest,
            0x02 => ClientboundLogin::LoginSuccess {
                uuid: read_string(&mut r)?,
                username: read_string(&mut r)?,
            },
            0x03 => ClientboundLogin::SetCompression {
                threshold: read_varint(&mut r)?,
            },
            other => ClientboundLogin::Unknown { packet_id: other },
        };
        Ok(packet)
    }
}

/// Clientbound packets during the play phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundPlay {
    KeepAlive {
        id: i32,
    },
    JoinGame {
        entity_id: i32,
        gamemode: u8,
        dimension: i8,
    },
    Chat {
        /// Raw chat-component JSON.
        json: String,
        /// 0 = chat, 1 = system, 2 = action bar.
        position: u8,
    },
    PositionAndLook {
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        /// Bit set means the corresponding field is a delta, not absolute.
        flags: u8,
    },
    Disconnect {
        reason: String,
    },
    Unknown {
        packet_id: i32,
    },
}

impl ClientboundPlay {
    pub fn decode(packet_id: i32, data: &[u8]) -> Result<Self, ProtoError> {
        let mut r = Cursor::new(data);
        let packet = match packet_id {
            0x00 => ClientboundPlay::KeepAlive {
                id: read_varint(&mut r)?,
            },
            0x01 => {
                let entity_id = r.read_i32::<BigEndian>()?;
                let gamemode = r.read_u8()?;
                let dimension = r.read_i8()?;
                // difficulty, max players, level type and the debug flag
                // follow; the bot has no use for them.
                ClientboundPlay::JoinGame {
                    entity_id,
                    gamemode,
                    dimension,
                }
            }
            0x02 => {
                let json = read_string(&mut r)?;
                let position = r.read_u8().unwrap_or(0);
                ClientboundPlay::Chat { json, position }
            }
            0x08 => ClientboundPlay::PositionAndLook {
                x: r.read_f64::<BigEndian>()?,
                y: r.read_f64::<BigEndian>()?,
                z: r.read_f64::<BigEndian>()?,
                yaw: r.read_f32::<BigEndian>()?,
                pitch: r.read_f32::<BigEndian>()?,
                flags: r.read_u8()?,
            },
            0x40 => ClientboundPlay::Disconnect {
                reason: read_string(&mut r)?,
            },
            other => ClientboundPlay::Unknown { packet_id: other },
        };
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_body_layout() {
        let packet = Serverbound::Handshake {
            protocol_version: 47,
            server_address: "mc.example.net".into(),
            server_port: 25565,
            next_state: 2,
        };
        let body = packet.encode_body().unwrap();
        // VarInt(47), string(14), u16 port, VarInt(2)
        assert_eq!(body[0], 47);
        assert_eq!(body[1], 14);
        assert_eq!(&body[2..16], b"mc.example.net");
        assert_eq!(&body[16..18], &25565u16.to_be_bytes());
        assert_eq!(body[18], 2);
    }

    #[test]
    fn decode_play_chat() {
        let mut data = Vec::new();
        write_string(&mut data, r#"{"text":"hi"}"#).unwrap();
        data.push(1);
        let packet = ClientboundPlay::decode(0x02, &data).unwrap();
        assert_eq!(
            packet,
            ClientboundPlay::Chat {
                json: r#"{"text":"hi"}"#.into(),
                position: 1
            }
        );
    }

    #[test]
    fn decode_login_success() {
        let mut data = Vec::new();
        write_string(&mut data, "069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap();
        write_string(&mut data, "BotAFK").unwrap();
        let packet = ClientboundLogin::decode(0x02, &data).unwrap();
        match packet {
            ClientboundLogin::LoginSuccess { username, .. } => assert_eq!(username, "BotAFK"),
            other => panic!("unexpected packet: {:?}", other),
        }
    }

    #[test]
    fn unknown_ids_are_not_errors() {
        assert_eq!(
            ClientboundPlay::decode(0x26, &[1, 2, 3]).unwrap(),
            ClientboundPlay::Unknown { packet_id: 0x26 }
        );
        assert_eq!(
            ClientboundLogin::decode(0x7E, &[]).unwrap(),
            ClientboundLogin::Unknown { packet_id: 0x7E }
        );
    }

    #[test]
    fn truncated_position_packet_is_malformed() {
        assert!(ClientboundPlay::decode(0x08, &[0u8; 10]).is_err());
    }
}
