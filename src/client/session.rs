use std::time::Instant;

/// Protocol state of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// TCP open, handshake not yet sent.
    Handshaking,
    /// LoginStart sent, waiting for LoginSuccess.
    Login,
    /// In the world.
    Play,
}

/// Account credentials. The password belongs to the server's auth plugin,
/// not to Mojang; it is only ever sent as chat commands.
#[derive(Clone, Debug)]
pub struct Account {
    pub username: String,
    pub password: String,
}

/// Last server-confirmed position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

/// Mutable state for one connection attempt. A new session is built per
/// attempt, so nothing here survives a reconnect.
#[derive(Clone, Debug)]
pub struct ClientSession {
    pub state: SessionState,
    pub started_at: Instant,
    pub position: Option<Position>,
    pub spawned: bool,
    /// Flattened reason from a Disconnect packet, if the server sent one.
    pub last_disconnect_reason: Option<String>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Handshaking,
            started_at: Instant::now(),
            position: None,
            spawned: false,
            last_disconnect_reason: None,
        }
    }

    pub fn transition_to(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Apply a PositionAndLook update. Flag bits mark fields the server sent
    /// as deltas relative to our current value (X 0x01, Y 0x02, Z 0x04,
    /// yaw 0x08, pitch 0x10).
    pub fn apply_position_update(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
        flags: u8,
    ) -> Position {
        let base = self.position.unwrap_or(Position {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        });
        let updated = Position {
            x: if flags & 0x01 != 0 { base.x + x } else { x },
            y: if flags & 0x02 != 0 { base.y + y } else { y },
            z: if flags & 0x04 != 0 { base.z + z } else { z },
            yaw: if flags & 0x08 != 0 { base.yaw + yaw } else { yaw },
            pitch: if flags & 0x10 != 0 {
                base.pitch + pitch
            } else {
                pitch
            },
        };
        self.position = Some(updated);
        updated
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_update_replaces_position() {
        let mut session = ClientSession::new();
        let p = session.apply_position_update(100.5, 64.0, -8.5, 90.0, 10.0, 0x00);
        assert_eq!(p.x, 100.5);
        assert_eq!(p.yaw, 90.0);
        assert_eq!(session.position, Some(p));
    }

    #[test]
    fn relative_flags_apply_deltas() {
        let mut session = ClientSession::new();
        session.apply_position_update(10.0, 64.0, 10.0, 45.0, 0.0, 0x00);
        // X and yaw relative, the rest absolute
        let p = session.apply_position_update(2.0, 70.0, -3.0, 15.0, 5.0, 0x01 | 0x08);
        assert_eq!(p.x, 12.0);
        assert_eq!(p.y, 70.0);
        assert_eq!(p.z, -3.0);
        assert_eq!(p.yaw, 60.0);
        assert_eq!(p.pitch, 5.0);
    }
}
