/// The step function: advances the world by one frame.
///
/// Processing order:
///   1. Intents — jump and horizontal movement, acting on the contact set
///      and motion state produced by the previous resolve pass
///   2. Frame reset — contacts cleared, grounded status revoked
///   3. Collision resolution — once per block, in terrain order, against
///      the player's projected position
///   4. Integration — commit velocity, then accumulate gravity if airborne
///   5. Fall safety net — respawn a player that left the world downward
///
/// Resolution before integration is what makes the look-ahead work: the
/// resolver corrects the projected position before `update` commits it.

use crate::domain::collision;
use crate::domain::entity::{FrameInput, MotionState};
use crate::sim::event::GameEvent;
use crate::sim::world::WorldState;

/// A landing sound only fires after this many consecutive airborne frames;
/// a standing player flickers airborne for a frame at a time while its
/// grounded contact is re-confirmed, and that flicker must stay silent.
const LANDED_MIN_AIR_FRAMES: u32 = 3;

/// How far below the world bottom the player may fall before respawning.
const FALL_RESPAWN_MARGIN: f32 = 200.0;

pub fn step(world: &mut WorldState, input: FrameInput, dt: f32) -> Vec<GameEvent> {
    if world.paused {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    // ── 1. Intents ──
    let was_grounded = world.player.state == MotionState::Grounded;
    if input.jump {
        world.player.jump(world.physics.jump_power);
        if was_grounded {
            events.push(GameEvent::Jumped);
        }
    }
    world
        .player
        .set_horizontal_intent(input.movement, world.physics.run_speed, dt);

    let prev_contacts = world.player.contacts;
    let air_frames = world.airborne_frames;

    // ── 2 + 3. Reset, then re-earn contacts from every block ──
    world.player.begin_frame();
    for block in world.terrain.iter() {
        collision::resolve(&mut world.player, block);
    }

    let contacts = world.player.contacts;
    if contacts.top
        && world.player.state == MotionState::Grounded
        && air_frames >= LANDED_MIN_AIR_FRAMES
    {
        events.push(GameEvent::Landed { y: world.player.rect.y });
    }
    if (contacts.left && !prev_contacts.left) || (contacts.right && !prev_contacts.right) {
        events.push(GameEvent::WallBumped { x: world.player.rect.x });
    }
    if contacts.bottom && !prev_contacts.bottom {
        events.push(GameEvent::CeilingBumped { y: world.player.rect.y });
    }

    // ── 4. Integration ──
    world
        .player
        .update(world.physics.gravity, dt);

    if world.player.state == MotionState::Grounded {
        world.airborne_frames = 0;
    } else {
        world.airborne_frames = world.airborne_frames.saturating_add(1);
    }

    // ── 5. Fall safety net ──
    if world.player.rect.y > world.world_h + FALL_RESPAWN_MARGIN {
        world.respawn();
        events.push(GameEvent::Fell);
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::domain::entity::MoveDir;
    use crate::domain::geometry::Rect;
    use crate::sim::level::Level;

    const IDLE: FrameInput = FrameInput { movement: None, jump: false };
    const JUMP: FrameInput = FrameInput { movement: None, jump: true };

    /// A world with gravity 8, dt-friendly constants, and the given blocks.
    fn world_with(spawn: (f32, f32), blocks: Vec<Rect>) -> WorldState {
        let level = Level {
            name: "test".to_string(),
            world_w: 800.0,
            world_h: 600.0,
            spawn,
            player_size: (20.0, 30.0),
            blocks,
        };
        let physics = PhysicsConfig { gravity: 8.0, run_speed: 450.0, jump_power: 2.0 };
        WorldState::new(level, physics)
    }

    // ── End-to-end landing ──

    #[test]
    fn falling_player_lands_flush_on_the_block() {
        // Gravity 8 with dt 1: the projected bottom first exceeds the
        // block top on the third frame, which grounds the player and
        // snaps it flush.
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);

        step(&mut w, IDLE, 1.0);
        assert_eq!(w.player.rect.y, 250.0);
        assert_eq!(w.player.vy, 8.0);

        step(&mut w, IDLE, 1.0);
        assert_eq!(w.player.rect.y, 258.0);
        assert_eq!(w.player.vy, 16.0);

        step(&mut w, IDLE, 1.0);
        assert_eq!(w.player.rect.y, 260.0);
        assert_eq!(w.player.vy, 0.0);
        assert_eq!(w.player.state, MotionState::Grounded);
        assert!(w.player.contacts.top);
    }

    #[test]
    fn grounding_must_be_reconfirmed_every_frame() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);
        for _ in 0..3 {
            step(&mut w, IDLE, 1.0);
        }
        assert_eq!(w.player.state, MotionState::Grounded);

        // Flush contact means no strict overlap next frame: the player
        // goes airborne again and gravity resumes in that same frame.
        step(&mut w, IDLE, 1.0);
        assert_eq!(w.player.state, MotionState::Airborne);
        assert_eq!(w.player.vy, 8.0);
        assert_eq!(w.player.rect.y, 260.0);
    }

    #[test]
    fn standing_player_never_sinks() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);
        for _ in 0..100 {
            step(&mut w, IDLE, 1.0);
            assert!(w.player.rect.bottom() <= 290.0);
        }
        assert_eq!(w.player.rect.y, 260.0);
    }

    // ── Jump ──

    #[test]
    fn jump_fires_only_from_the_ground() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);
        // Airborne from spawn: jump input is swallowed.
        let events = step(&mut w, JUMP, 1.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Jumped)));

        for _ in 0..2 {
            step(&mut w, IDLE, 1.0);
        }
        assert_eq!(w.player.state, MotionState::Grounded);

        let events = step(&mut w, JUMP, 1.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Jumped)));
        assert_eq!(w.player.state, MotionState::Airborne);
    }

    // ── Wall contact ──

    #[test]
    fn wall_contact_blocks_the_matching_intent_next_frame() {
        // Tall wall right of the spawn; running right raises the wall's
        // left-side flag. dt keeps the per-frame speed (9 px) below the
        // player width, inside the look-ahead's coverage.
        let wall = Rect::new(500.0, 0.0, 50.0, 600.0);
        let floor = Rect::new(0.0, 280.0, 800.0, 50.0);
        let mut w = world_with((475.0, 250.0), vec![wall, floor]);

        let input = FrameInput { movement: Some(MoveDir::Right), jump: false };
        let events = step(&mut w, input, 0.02);
        assert!(w.player.contacts.left);
        assert_eq!(w.player.rect.right(), 500.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::WallBumped { .. })));

        // A Left intent while the left flag is raised is treated as
        // blocked: the setter leaves vx at zero.
        let x_before = w.player.rect.x;
        let input = FrameInput { movement: Some(MoveDir::Left), jump: false };
        step(&mut w, input, 0.02);
        assert_eq!(w.player.rect.x, x_before);
    }

    #[test]
    fn repeated_wall_pressure_bumps_once() {
        let wall = Rect::new(500.0, 0.0, 50.0, 600.0);
        let floor = Rect::new(0.0, 280.0, 800.0, 50.0);
        let mut w = world_with((475.0, 250.0), vec![wall, floor]);

        let input = FrameInput { movement: Some(MoveDir::Right), jump: false };
        let mut bumps = 0;
        for _ in 0..10 {
            let events = step(&mut w, input, 0.02);
            bumps += events
                .iter()
                .filter(|e| matches!(e, GameEvent::WallBumped { .. }))
                .count();
        }
        // The wall is re-resolved every frame, but only the first contact
        // is a fresh edge.
        assert_eq!(bumps, 1);
    }

    // ── Degenerate inputs ──

    #[test]
    fn distant_block_leaves_the_player_alone() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(0.0, 590.0, 50.0, 10.0)]);
        step(&mut w, IDLE, 1.0);
        assert!(!w.player.contacts.any());
        assert_eq!(w.player.rect.x, 400.0);
        assert_eq!(w.player.rect.y, 250.0); // vy was 0 on the first frame
        assert_eq!(w.player.vy, 8.0);
    }

    #[test]
    fn zero_dt_is_a_graceful_noop() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);
        step(&mut w, IDLE, 0.0);
        assert_eq!(w.player.rect.y, 250.0);
        assert_eq!(w.player.vy, 0.0);
    }

    #[test]
    fn paused_world_does_not_advance() {
        let mut w = world_with((400.0, 250.0), vec![Rect::new(390.0, 290.0, 100.0, 20.0)]);
        w.paused = true;
        let events = step(&mut w, JUMP, 1.0);
        assert!(events.is_empty());
        assert_eq!(w.tick, 0);
        assert_eq!(w.player.rect.y, 250.0);
        assert_eq!(w.player.vy, 0.0);
    }

    // ── Landing sound gate ──

    #[test]
    fn landing_event_needs_a_real_fall() {
        let mut w = world_with((400.0, 100.0), vec![Rect::new(300.0, 290.0, 200.0, 20.0)]);
        let mut landings = 0;
        for _ in 0..60 {
            let events = step(&mut w, IDLE, 0.1);
            landings += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Landed { .. }))
                .count();
        }
        // One long fall, one landing; the grounded-contact flicker after
        // it never re-triggers the event.
        assert_eq!(landings, 1);
    }

    // ── Fall safety net ──

    #[test]
    fn falling_out_of_the_world_respawns() {
        let mut w = world_with((400.0, 250.0), vec![]);
        let mut fell = false;
        for _ in 0..80 {
            let events = step(&mut w, IDLE, 1.0);
            if events.iter().any(|e| matches!(e, GameEvent::Fell)) {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!(w.player.rect.x, 400.0);
        assert_eq!(w.player.rect.y, 250.0);
        assert_eq!(w.player.vy, 0.0);
    }
}
