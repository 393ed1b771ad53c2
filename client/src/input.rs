//! Input sampling with change detection and a rate policy.

use crate::mapping::CoordinateMapper;
use crate::network::ConnectionChannel;
use crate::state::StateStore;
use macroquad::prelude::*;
use shared::{InputState, FIRE_PULSE_MS};
use std::time::{Duration, Instant};

/// Aim-only updates are throttled so pointer micro-movement cannot
/// saturate the wire. Flag and fire changes always send immediately.
/// A suppressed aim update is never lost: it stays pending and is
/// flushed by [`InputSampler::poll`] once the interval elapses.
const AIM_SEND_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Owns the single live [`InputState`] and decides when a change is
/// worth a send. Every mutation that returns `Some` must be forwarded
/// to the channel by the caller; nothing accumulates silently.
pub struct InputSampler {
    state: InputState,
    fire_release_at: Option<Instant>,
    last_aim_sent: Option<Instant>,
    aim_pending: bool,
    last_pointer: Option<Vec2>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self {
            state: InputState::default(),
            fire_release_at: None,
            last_aim_sent: None,
            aim_pending: false,
            last_pointer: None,
        }
    }

    /// Sets or clears a directional flag; yields the full state to
    /// send iff the flag actually changed.
    pub fn set_direction(&mut self, direction: Direction, pressed: bool) -> Option<InputState> {
        let flag = match direction {
            Direction::Up => &mut self.state.up,
            Direction::Down => &mut self.state.down,
            Direction::Left => &mut self.state.left,
            Direction::Right => &mut self.state.right,
        };
        if *flag == pressed {
            return None;
        }
        *flag = pressed;
        Some(self.state.clone())
    }

    /// Recomputes the aim angle from the pointer's logical position
    /// relative to the local player. The angle is always updated; the
    /// returned send is throttled to one per interval, and a
    /// suppressed update stays pending until [`poll`](Self::poll)
    /// flushes it.
    pub fn aim(
        &mut self,
        pointer: Vec2,
        viewport: Vec2,
        mapper: &CoordinateMapper,
        player_pos: Vec2,
        now: Instant,
    ) -> Option<InputState> {
        let logical = mapper.to_logical(pointer, viewport);
        self.state.angle = (logical.y - player_pos.y).atan2(logical.x - player_pos.x);

        if let Some(last) = self.last_aim_sent {
            if now.duration_since(last) < AIM_SEND_INTERVAL {
                self.aim_pending = true;
                return None;
            }
        }
        self.last_aim_sent = Some(now);
        self.aim_pending = false;
        Some(self.state.clone())
    }

    /// Transient fire trigger: raise `shoot` now and schedule the
    /// matching release one pulse later. The release is best-effort
    /// and may race a held button; the server owns fire timing.
    pub fn pulse_fire(&mut self, now: Instant) -> InputState {
        self.state.shoot = true;
        self.fire_release_at = Some(now + Duration::from_millis(FIRE_PULSE_MS));
        self.state.clone()
    }

    pub fn press_fire(&mut self) -> InputState {
        self.state.shoot = true;
        self.state.clone()
    }

    pub fn release_fire(&mut self) -> InputState {
        self.state.shoot = false;
        self.state.clone()
    }

    /// Fires deferred sends: the pending pulse release once its
    /// deadline passes, and any aim update the throttle suppressed
    /// once the interval elapses. The release deadline is not
    /// cancelable; a manual release in between just means the flag is
    /// lowered twice.
    pub fn poll(&mut self, now: Instant) -> Option<InputState> {
        let mut due = false;

        if let Some(at) = self.fire_release_at {
            if now >= at {
                self.fire_release_at = None;
                self.state.shoot = false;
                due = true;
            }
        }

        if self.aim_pending {
            let elapsed = self
                .last_aim_sent
                .map_or(true, |last| now.duration_since(last) >= AIM_SEND_INTERVAL);
            if elapsed {
                self.aim_pending = false;
                self.last_aim_sent = Some(now);
                due = true;
            }
        }

        if due {
            Some(self.state.clone())
        } else {
            None
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Polls macroquad's input state once per frame and pushes every
    /// resulting change to the channel. Pointer aim is a no-op until
    /// the local player is known.
    pub fn sample(
        &mut self,
        store: &mut StateStore,
        mapper: &CoordinateMapper,
        channel: &ConnectionChannel,
    ) {
        let now = Instant::now();

        let bindings = [
            (
                Direction::Up,
                is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            ),
            (
                Direction::Down,
                is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            ),
            (
                Direction::Left,
                is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            ),
            (
                Direction::Right,
                is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            ),
        ];
        for (direction, pressed) in bindings {
            if let Some(input) = self.set_direction(direction, pressed) {
                channel.send_input(&input);
            }
        }

        let pointer = Vec2::from(mouse_position());
        if self.last_pointer != Some(pointer) {
            self.last_pointer = Some(pointer);
            if let Some(player) = store.local_player() {
                let player_pos = Vec2::new(player.x, player.y);
                let viewport = Vec2::new(screen_width(), screen_height());
                let to_send = self.aim(pointer, viewport, mapper, player_pos, now);
                store.set_local_angle(self.state.angle);
                if let Some(input) = to_send {
                    channel.send_input(&input);
                }
            }
        }

        if is_key_pressed(KeyCode::Space) {
            channel.send_input(&self.pulse_fire(now));
        }
        if is_mouse_button_pressed(MouseButton::Left) {
            channel.send_input(&self.press_fire());
        }
        if is_mouse_button_released(MouseButton::Left) {
            channel.send_input(&self.release_fire());
        }
        if let Some(input) = self.poll(now) {
            channel.send_input(&input);
        }
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f32::consts::FRAC_PI_2;

    fn identity_viewport() -> Vec2 {
        Vec2::new(shared::LOGICAL_WIDTH, shared::LOGICAL_HEIGHT)
    }

    #[test]
    fn direction_changes_send_full_state() {
        let mut sampler = InputSampler::new();

        let sent = sampler.set_direction(Direction::Up, true).unwrap();
        assert!(sent.up);
        assert!(!sent.down);

        // Unchanged flag: no send.
        assert!(sampler.set_direction(Direction::Up, true).is_none());

        let sent = sampler.set_direction(Direction::Up, false).unwrap();
        assert!(!sent.up);
    }

    #[test]
    fn aim_right_of_player_is_angle_zero() {
        let mut sampler = InputSampler::new();
        let mapper = CoordinateMapper::new();

        let sent = sampler
            .aim(
                Vec2::new(600.0, 500.0),
                identity_viewport(),
                &mapper,
                Vec2::new(500.0, 500.0),
                Instant::now(),
            )
            .unwrap();
        assert_approx_eq!(sent.angle, 0.0, 1e-5);
    }

    #[test]
    fn aim_below_player_is_half_pi() {
        let mut sampler = InputSampler::new();
        let mapper = CoordinateMapper::new();

        let sent = sampler
            .aim(
                Vec2::new(500.0, 600.0),
                identity_viewport(),
                &mapper,
                Vec2::new(500.0, 500.0),
                Instant::now(),
            )
            .unwrap();
        assert_approx_eq!(sent.angle, FRAC_PI_2, 1e-5);
    }

    #[test]
    fn aim_converts_pointer_through_viewport_scale() {
        let mut sampler = InputSampler::new();
        let mapper = CoordinateMapper::new();

        // Half-size window: viewport (300, 250) is logical (600, 500).
        let sent = sampler
            .aim(
                Vec2::new(300.0, 250.0),
                Vec2::new(960.0, 540.0),
                &mapper,
                Vec2::new(500.0, 500.0),
                Instant::now(),
            )
            .unwrap();
        assert_approx_eq!(sent.angle, 0.0, 1e-5);
    }

    #[test]
    fn aim_sends_are_throttled_but_angle_still_tracks() {
        let mut sampler = InputSampler::new();
        let mapper = CoordinateMapper::new();
        let now = Instant::now();
        let player = Vec2::new(500.0, 500.0);

        assert!(sampler
            .aim(Vec2::new(600.0, 500.0), identity_viewport(), &mapper, player, now)
            .is_some());

        // 1 ms later: suppressed, but the angle keeps updating.
        let sent = sampler.aim(
            Vec2::new(500.0, 600.0),
            identity_viewport(),
            &mapper,
            player,
            now + Duration::from_millis(1),
        );
        assert!(sent.is_none());
        assert_approx_eq!(sampler.state().angle, FRAC_PI_2, 1e-5);

        assert!(sampler
            .aim(
                Vec2::new(600.0, 500.0),
                identity_viewport(),
                &mapper,
                player,
                now + Duration::from_millis(20),
            )
            .is_some());
    }

    #[test]
    fn suppressed_aim_update_is_flushed_not_lost() {
        let mut sampler = InputSampler::new();
        let mapper = CoordinateMapper::new();
        let now = Instant::now();
        let player = Vec2::new(500.0, 500.0);

        let sent = sampler
            .aim(Vec2::new(600.0, 500.0), identity_viewport(), &mapper, player, now)
            .unwrap();
        assert_approx_eq!(sent.angle, 0.0, 1e-5);

        // The pointer moves inside the throttle window, then rests.
        assert!(sampler
            .aim(
                Vec2::new(500.0, 600.0),
                identity_viewport(),
                &mapper,
                player,
                now + Duration::from_millis(1),
            )
            .is_none());

        // The final angle still goes out once the interval elapses.
        let flushed = sampler.poll(now + Duration::from_millis(20)).unwrap();
        assert_approx_eq!(flushed.angle, FRAC_PI_2, 1e-5);

        // Flushed exactly once.
        assert!(sampler.poll(now + Duration::from_millis(40)).is_none());
    }

    #[test]
    fn pulse_fire_releases_after_the_delay() {
        let mut sampler = InputSampler::new();
        let now = Instant::now();

        let sent = sampler.pulse_fire(now);
        assert!(sent.shoot);

        // Not due yet.
        assert!(sampler.poll(now + Duration::from_millis(50)).is_none());
        assert!(sampler.state().shoot);

        let sent = sampler.poll(now + Duration::from_millis(150)).unwrap();
        assert!(!sent.shoot);
        assert!(sampler.poll(now + Duration::from_millis(200)).is_none());
    }

    #[test]
    fn overlapping_triggers_never_leave_shoot_stuck() {
        let mut sampler = InputSampler::new();
        let now = Instant::now();

        // Press, click pulse, release, all overlapping.
        assert!(sampler.press_fire().shoot);
        assert!(sampler.pulse_fire(now + Duration::from_millis(10)).shoot);
        assert!(!sampler.release_fire().shoot);

        // The pending pulse release still fires and lowers the flag
        // a second time; it never re-raises it.
        let late = sampler.poll(now + Duration::from_millis(200));
        assert!(matches!(late, Some(ref input) if !input.shoot));
        assert!(!sampler.state().shoot);
    }

    #[test]
    fn manual_release_before_pulse_deadline_wins() {
        let mut sampler = InputSampler::new();
        let now = Instant::now();

        sampler.pulse_fire(now);
        sampler.release_fire();
        assert!(!sampler.state().shoot);

        // Press again after the deadline passed: the stale release
        // lowers the flag (accepted race, server is authoritative).
        sampler.press_fire();
        let stale = sampler.poll(now + Duration::from_millis(150)).unwrap();
        assert!(!stale.shoot);
    }
}
