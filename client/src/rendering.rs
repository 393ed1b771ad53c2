use crate::mapping::CoordinateMapper;
use crate::state::StateStore;
use macroquad::prelude::*;
use shared::{
    Bullet, Player, BULLET_RADIUS, BULLET_TRAIL_LEN, FACING_LINE_LEN, GRID_CELL_PX, PLAYER_RADIUS,
};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    /// Paints one frame from the current store contents. Reads only;
    /// an empty store or missing identity renders the idle/connecting
    /// state instead of failing.
    pub fn draw(&self, store: &StateStore, mapper: &CoordinateMapper) {
        let viewport = Vec2::new(screen_width(), screen_height());

        clear_background(Color::from_rgba(26, 26, 26, 255));
        self.draw_grid(viewport);

        for player in store.players().values() {
            let is_local = Some(player.id) == store.my_player_id();
            self.draw_player(player, is_local, mapper, viewport);
        }

        for bullet in store.bullets() {
            self.draw_bullet(bullet, mapper, viewport);
        }

        if let Some(player) = store.local_player() {
            self.draw_debug_overlay(player);
        }

        if !store.is_authenticated() {
            self.draw_connecting_overlay(viewport);
        }
    }

    // Grid spacing is in viewport pixels, so it scales with the window
    // rather than the game world.
    fn draw_grid(&self, viewport: Vec2) {
        let color = Color::new(1.0, 1.0, 1.0, 0.1);

        let mut x = 0.0;
        while x < viewport.x {
            draw_line(x, 0.0, x, viewport.y, 1.0, color);
            x += GRID_CELL_PX;
        }

        let mut y = 0.0;
        while y < viewport.y {
            draw_line(0.0, y, viewport.x, y, 1.0, color);
            y += GRID_CELL_PX;
        }
    }

    fn draw_player(
        &self,
        player: &Player,
        is_local: bool,
        mapper: &CoordinateMapper,
        viewport: Vec2,
    ) {
        let pos = mapper.to_viewport(Vec2::new(player.x, player.y), viewport);

        let fill = if is_local { GREEN } else { RED };
        let outline = if is_local { WHITE } else { BLACK };
        draw_circle(pos.x, pos.y, PLAYER_RADIUS, fill);
        draw_circle_lines(pos.x, pos.y, PLAYER_RADIUS, 2.0, outline);

        let tip = pos + Vec2::new(player.angle.cos(), player.angle.sin()) * FACING_LINE_LEN;
        draw_line(pos.x, pos.y, tip.x, tip.y, 3.0, WHITE);

        let label = player.id.to_string();
        draw_text(&label, pos.x - 4.0, pos.y + 4.0, 16.0, WHITE);
    }

    fn draw_bullet(&self, bullet: &Bullet, mapper: &CoordinateMapper, viewport: Vec2) {
        let pos = mapper.to_viewport(Vec2::new(bullet.x, bullet.y), viewport);

        // Trail extends back along the flight direction, measured in
        // logical units so it tracks the world, not the window.
        let tail_logical = Vec2::new(
            bullet.x - BULLET_TRAIL_LEN * bullet.angle.cos(),
            bullet.y - BULLET_TRAIL_LEN * bullet.angle.sin(),
        );
        let tail = mapper.to_viewport(tail_logical, viewport);
        draw_line(
            tail.x,
            tail.y,
            pos.x,
            pos.y,
            2.0,
            Color::new(1.0, 1.0, 0.0, 0.5),
        );

        draw_circle(pos.x, pos.y, BULLET_RADIUS, YELLOW);
    }

    fn draw_debug_overlay(&self, player: &Player) {
        let position = format!("Position: ({}, {})", player.x.round(), player.y.round());
        draw_text(&position, 10.0, 20.0, 16.0, WHITE);

        let angle = format!("Angle: {} deg", player.angle.to_degrees().round());
        draw_text(&angle, 10.0, 40.0, 16.0, WHITE);
    }

    fn draw_connecting_overlay(&self, viewport: Vec2) {
        draw_rectangle(
            viewport.x / 2.0 - 150.0,
            viewport.y / 2.0 - 25.0,
            300.0,
            50.0,
            Color::new(0.0, 0.0, 0.0, 0.7),
        );

        let text = "Connecting to server...";
        let dims = measure_text(text, None, 20, 1.0);
        draw_text(
            text,
            viewport.x / 2.0 - dims.width / 2.0,
            viewport.y / 2.0 + dims.height / 2.0,
            20.0,
            WHITE,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
