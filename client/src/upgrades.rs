//! Optimistic skill-point spending.
//!
//! A spend decrements the local counter and emits one upgrade message
//! without waiting for acknowledgment; the server never confirms or
//! rejects explicitly, it just reflects the authoritative count in
//! later snapshots.

use crate::network::ConnectionChannel;
use crate::state::StateStore;
use log::{debug, info};
use macroquad::prelude::*;
use shared::UpgradeStat;

/// Spends one point on `stat`. Rejected locally when the counter is
/// zero: no message goes out and nothing changes.
pub fn spend(store: &mut StateStore, channel: &ConnectionChannel, stat: UpgradeStat) -> bool {
    if !store.take_skill_point() {
        debug!("no skill points available for {:?}", stat);
        return false;
    }
    channel.send_upgrade(stat);
    info!("spent a skill point on {:?} ({} left)", stat, store.skill_points());
    true
}

/// Keys 1-4 spend on damage/health/movement/reload.
pub fn handle_keys(store: &mut StateStore, channel: &ConnectionChannel) {
    let bindings = [
        (KeyCode::Key1, UpgradeStat::Damage),
        (KeyCode::Key2, UpgradeStat::Health),
        (KeyCode::Key3, UpgradeStat::Movement),
        (KeyCode::Key4, UpgradeStat::Reload),
    ];
    for (key, stat) in bindings {
        if is_key_pressed(key) {
            spend(store, channel, stat);
        }
    }
}
