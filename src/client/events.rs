/// Events broadcast from the client as the session progresses.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum GameEvent {
    /// Chat line from the server, already flattened to plain text.
    ChatMessageReceived {
        message: String,
        /// 0 = chat box, 1 = system message, 2 = action bar.
        position: u8,
    },
    /// The server put us into the world.
    Spawned {
        entity_id: i32,
        gamemode: u8,
        dimension: i8,
    },
    /// The server set or corrected our position and orientation.
    PositionUpdated {
        x: f64,
        y: f64,
        z: f64,
        yaw: f32,
        pitch: f32,
    },
    /// The login handshake completed.
    LoginSucceeded { username: String, uuid: String },
}

/// Lifecycle events, mostly emitted by the supervisor.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ClientSystemEvent {
    /// Connection established and authenticated at the protocol level.
    Connected,
    Disconnected {
        reason: Option<String>,
        will_reconnect: bool,
        delay_secs: u64,
    },
    Reconnecting {
        attempt: u32,
        delay_secs: u64,
    },
    ConnectionFailed {
        reason: String,
    },
    /// Session teardown marker; consumers stop when they see it.
    Shutdown,
}

/// Raw event as emitted by the client, before bus enrichment.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Game(GameEvent),
    System(ClientSystemEvent),
}

/// Actions consumers and scripts can ask the client to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientAction {
    /// Send a chat line (or command) to the server.
    SendChat { message: String },
    /// Point the camera. Used by the anti-idle script.
    Look { yaw: f32, pitch: f32 },
    /// Close the session.
    Disconnect,
}
