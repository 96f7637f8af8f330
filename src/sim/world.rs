/// WorldState: the complete snapshot of a running game. Holds the single
/// player, the static terrain, the tuning constants, and loop bookkeeping.
/// Owned by the frame driver and passed by reference into step and render.
///
/// ## Camera / Viewport
///
/// World coordinates are pixels; the renderer maps them onto terminal
/// cells. The camera is a pixel-space viewport that follows the player
/// with a dead-zone, and centers worlds smaller than the viewport.

use crate::config::PhysicsConfig;
use crate::domain::entity::Player;
use crate::domain::terrain::TerrainSet;
use crate::sim::level::Level;

/// Pixel-space viewport. `(x, y)` is the world position of the top-left
/// visible pixel; `view_w`/`view_h` are set by the renderer each frame
/// from the terminal size.
#[derive(Clone, Debug)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub view_w: f32,
    pub view_h: f32,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0.0, y: 0.0, view_w: 0.0, view_h: 0.0 }
    }

    /// Follow a target point, scrolling only when it leaves the inner
    /// dead-zone (20% margins). Worlds smaller than the viewport are
    /// centered instead.
    pub fn follow(&mut self, tx: f32, ty: f32, world_w: f32, world_h: f32) {
        if self.view_w <= 0.0 || self.view_h <= 0.0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -((self.view_w - world_w) / 2.0);
        } else {
            let margin = self.view_w / 5.0;
            if tx < self.x + margin {
                self.x = tx - margin;
            } else if tx > self.x + self.view_w - margin {
                self.x = tx - self.view_w + margin;
            }
            self.x = self.x.clamp(0.0, world_w - self.view_w);
        }

        if world_h <= self.view_h {
            self.y = -((self.view_h - world_h) / 2.0);
        } else {
            let margin = self.view_h / 5.0;
            if ty < self.y + margin {
                self.y = ty - margin;
            } else if ty > self.y + self.view_h - margin {
                self.y = ty - self.view_h + margin;
            }
            self.y = self.y.clamp(0.0, world_h - self.view_h);
        }
    }

    /// Snap directly so the target is centered (used on spawn/reset).
    pub fn center_on(&mut self, tx: f32, ty: f32, world_w: f32, world_h: f32) {
        if self.view_w <= 0.0 || self.view_h <= 0.0 {
            return;
        }
        if world_w <= self.view_w {
            self.x = -((self.view_w - world_w) / 2.0);
        } else {
            self.x = (tx - self.view_w / 2.0).clamp(0.0, world_w - self.view_w);
        }
        if world_h <= self.view_h {
            self.y = -((self.view_h - world_h) / 2.0);
        } else {
            self.y = (ty - self.view_h / 2.0).clamp(0.0, world_h - self.view_h);
        }
    }
}

pub struct WorldState {
    // ── Entities ──
    pub player: Player,
    pub terrain: TerrainSet,

    // ── Level geometry ──
    pub world_w: f32,
    pub world_h: f32,
    pub spawn: (f32, f32),
    pub player_size: (f32, f32),
    pub level_name: String,

    // ── Tuning ──
    pub physics: PhysicsConfig,

    // ── Loop bookkeeping ──
    pub tick: u64,
    pub paused: bool,
    /// Consecutive frames the player has ended airborne. Used to tell a
    /// real landing apart from the per-frame grounded-contact flicker.
    pub airborne_frames: u32,
    /// Smoothed frames-per-second, for the HUD.
    pub fps: f32,

    // ── Camera / Viewport ──
    pub camera: Camera,
}

impl WorldState {
    pub fn new(level: Level, physics: PhysicsConfig) -> Self {
        let (pw, ph) = level.player_size;
        let mut world = WorldState {
            player: Player::new(level.spawn.0, level.spawn.1, pw, ph),
            terrain: TerrainSet::new(level.blocks),
            world_w: level.world_w,
            world_h: level.world_h,
            spawn: level.spawn,
            player_size: level.player_size,
            level_name: level.name,
            physics,
            tick: 0,
            paused: false,
            airborne_frames: 0,
            fps: 0.0,
            camera: Camera::new(),
        };
        world
            .camera
            .center_on(level.spawn.0, level.spawn.1, world.world_w, world.world_h);
        world
    }

    /// Put the player back at the spawn point with zeroed velocity.
    pub fn respawn(&mut self) {
        let (pw, ph) = self.player_size;
        self.player = Player::new(self.spawn.0, self.spawn.1, pw, ph);
        self.airborne_frames = 0;
        self.camera
            .center_on(self.spawn.0, self.spawn.1, self.world_w, self.world_h);
    }
}
