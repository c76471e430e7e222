pub mod anti_afk;
pub mod auto_auth;

pub use anti_afk::AntiAfkScript;
pub use auto_auth::AutoAuthScript;
