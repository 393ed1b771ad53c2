//! Authoritative snapshot buffer and local identity.

use log::{debug, info};
use shared::{Bullet, Player, StatePatch};
use std::collections::HashMap;

/// Canonical in-memory copy of the latest server snapshot plus the
/// client's own identity and optimistic skill-point counter.
///
/// Players and bullets are only ever written by the connection pump
/// (patch application and lifecycle transitions); the render loop and
/// the input sampler read them. The single exception is the local
/// player's aim angle, which is updated optimistically before each
/// aim send so the facing line tracks the pointer without a round
/// trip.
#[derive(Debug, Default)]
pub struct StateStore {
    players: HashMap<u64, Player>,
    bullets: Vec<Bullet>,
    my_player_id: Option<u64>,
    authenticated: bool,
    skill_points: u32,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: a field present in the patch replaces the
    /// corresponding store field wholesale, absent fields stay as they
    /// are. Last patch wins; there is no versioning.
    pub fn apply_patch(&mut self, patch: StatePatch) {
        if let Some(id) = patch.my_player_id {
            // Identity is set once per connection and only cleared on
            // disconnect.
            if self.my_player_id.is_none() {
                info!("server assigned player id {}", id);
                self.my_player_id = Some(id);
            }
        }

        if let Some(players) = patch.players {
            if let Some(me) = self.my_player_id {
                if let Some(points) = players.get(&me).and_then(|p| p.skill_points) {
                    if points != self.skill_points {
                        debug!("skill points synced to {}", points);
                    }
                    self.skill_points = points;
                }
            }
            self.players = players;
        }

        if let Some(bullets) = patch.bullets {
            self.bullets = bullets;
        }
    }

    pub fn mark_connected(&mut self) {
        self.authenticated = true;
    }

    pub fn mark_disconnected(&mut self) {
        self.authenticated = false;
        self.my_player_id = None;
    }

    /// Sets the local player's facing angle ahead of the server echo.
    pub fn set_local_angle(&mut self, angle: f32) {
        if let Some(id) = self.my_player_id {
            if let Some(player) = self.players.get_mut(&id) {
                player.angle = angle;
            }
        }
    }

    /// Consumes one skill point; returns false (and changes nothing)
    /// when none are available.
    pub fn take_skill_point(&mut self) -> bool {
        if self.skill_points == 0 {
            return false;
        }
        self.skill_points -= 1;
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn my_player_id(&self) -> Option<u64> {
        self.my_player_id
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.my_player_id.and_then(|id| self.players.get(&id))
    }

    pub fn players(&self) -> &HashMap<u64, Player> {
        &self.players
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }
}
