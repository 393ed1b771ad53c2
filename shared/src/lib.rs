//! Wire contract shared between the game client and the server.
//!
//! All positions are expressed in a fixed 1920x1080 logical space,
//! regardless of the actual window size. Field names mirror the
//! server's JSON serialization exactly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LOGICAL_WIDTH: f32 = 1920.0;
pub const LOGICAL_HEIGHT: f32 = 1080.0;

/// Background grid spacing, in viewport pixels (scales with the
/// window, not with the game world).
pub const GRID_CELL_PX: f32 = 50.0;

/// How long a transient fire trigger keeps `shoot` raised before the
/// matching release is sent.
pub const FIRE_PULSE_MS: u64 = 100;

pub const PLAYER_RADIUS: f32 = 12.0;
pub const FACING_LINE_LEN: f32 = 25.0;
pub const BULLET_RADIUS: f32 = 5.0;
/// Bullet trail length, in logical units back along the flight angle.
pub const BULLET_TRAIL_LEN: f32 = 10.0;

/// A player as the server reports it. Replaced wholesale by every
/// snapshot that carries a `players` field; the client never mutates
/// one except for the local player's optimistic aim angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
    #[serde(rename = "Angle")]
    pub angle: f32,
    /// Spendable upgrade points; only present for snapshots that
    /// include progression data.
    #[serde(
        default,
        rename = "skill_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub skill_points: Option<u32>,
}

impl Player {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            angle: 0.0,
            skill_points: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
    #[serde(rename = "Angle")]
    pub angle: f32,
}

/// Full input state, sent as a complete object on every relevant
/// change. Never a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim angle in radians, computed in logical space.
    pub angle: f32,
    pub shoot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStat {
    Damage,
    Health,
    Movement,
    Reload,
}

/// Non-input commands sent over the game socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientCommand {
    Upgrade { stat: UpgradeStat },
}

/// Partial inbound snapshot. A field that is present fully replaces
/// the client's copy; absent fields leave it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatePatch {
    #[serde(default)]
    pub players: Option<HashMap<u64, Player>>,
    #[serde(default)]
    pub bullets: Option<Vec<Bullet>>,
    #[serde(default, rename = "myPlayerId")]
    pub my_player_id: Option<u64>,
}

// Auth service contract (request/response over HTTP).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
