/// The player entity and its frame-by-frame controller.
///
/// Motion state is deliberately unstable: `begin_frame` drops the player
/// back to Airborne every frame, and only a top-contact resolution against
/// some block re-confirms Grounded. Standing on a floor therefore means
/// being re-grounded every frame; lose the contact once and gravity
/// resumes immediately.

use super::collision::ContactSet;
use super::geometry::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MotionState {
    Grounded,
    Airborne,
}

/// Horizontal movement direction (continuous while the key is held).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
}

/// One frame's worth of intent, as collected by the frame driver.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub movement: Option<MoveDir>,
    pub jump: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity in pixels per frame (dt-scaled by the intent setter).
    pub vx: f32,
    /// Vertical velocity; gravity accumulates onto it while airborne.
    pub vy: f32,
    pub state: MotionState,
    /// This frame's accumulated contact flags. Valid only for the frame
    /// that produced them.
    pub contacts: ContactSet,
}

impl Player {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Player {
            rect: Rect::new(x, y, w, h),
            vx: 0.0,
            vy: 0.0,
            state: MotionState::Airborne,
            contacts: ContactSet::default(),
        }
    }

    /// Translate held direction into horizontal velocity for this frame.
    ///
    /// An intent toward a side whose contact flag is already raised is
    /// treated as blocked and leaves the player standing still, so a wall
    /// resolved this frame cannot be re-entered in the same frame.
    pub fn set_horizontal_intent(&mut self, movement: Option<MoveDir>, speed: f32, dt: f32) {
        self.vx = match movement {
            Some(MoveDir::Left) if !self.contacts.left => -speed * dt,
            Some(MoveDir::Right) if !self.contacts.right => speed * dt,
            _ => 0.0,
        };
    }

    /// Launch upward. Only a grounded player can jump; calling this while
    /// airborne is a no-op, not an error.
    pub fn jump(&mut self, power: f32) {
        if self.state != MotionState::Grounded {
            return;
        }
        self.vy = -power;
        self.state = MotionState::Airborne;
    }

    /// Start-of-frame reset: contacts cleared, grounded status revoked.
    /// Runs before the resolver pass so that grounding must be re-earned
    /// from a fresh top contact every single frame.
    pub fn begin_frame(&mut self) {
        self.contacts = ContactSet::default();
        self.state = MotionState::Airborne;
    }

    /// Commit this frame's velocity, then accumulate gravity if airborne.
    /// State never flips here: only collision resolution grounds the
    /// player, and only `begin_frame` un-grounds it.
    pub fn update(&mut self, gravity: f32, dt: f32) {
        self.rect.x += self.vx;
        self.rect.y += self.vy;
        if self.state == MotionState::Airborne {
            self.vy += gravity * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut p = Player::new(100.0, 100.0, 20.0, 30.0);
        p.state = MotionState::Grounded;
        p
    }

    // ── Horizontal intent ──

    #[test]
    fn intent_sets_dt_scaled_velocity() {
        let mut p = Player::new(0.0, 0.0, 20.0, 30.0);
        p.set_horizontal_intent(Some(MoveDir::Right), 450.0, 0.01);
        assert_eq!(p.vx, 4.5);
        p.set_horizontal_intent(Some(MoveDir::Left), 450.0, 0.01);
        assert_eq!(p.vx, -4.5);
        p.set_horizontal_intent(None, 450.0, 0.01);
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn intent_toward_contacted_side_is_blocked() {
        let mut p = Player::new(0.0, 0.0, 20.0, 30.0);
        p.contacts.left = true;
        p.set_horizontal_intent(Some(MoveDir::Left), 450.0, 0.01);
        assert_eq!(p.vx, 0.0);
        // The opposite direction stays available.
        p.set_horizontal_intent(Some(MoveDir::Right), 450.0, 0.01);
        assert_eq!(p.vx, 4.5);
    }

    #[test]
    fn zero_dt_means_no_motion() {
        let mut p = Player::new(0.0, 0.0, 20.0, 30.0);
        p.set_horizontal_intent(Some(MoveDir::Right), 450.0, 0.0);
        assert_eq!(p.vx, 0.0);
        p.update(8.0, 0.0);
        assert_eq!(p.rect.x, 0.0);
        assert_eq!(p.vy, 0.0);
    }

    // ── Jump ──

    #[test]
    fn grounded_jump_launches() {
        let mut p = grounded_player();
        p.jump(2.0);
        assert_eq!(p.vy, -2.0);
        assert_eq!(p.state, MotionState::Airborne);
    }

    #[test]
    fn airborne_jump_is_a_noop() {
        let mut p = Player::new(0.0, 0.0, 20.0, 30.0);
        p.vy = 3.5;
        p.jump(2.0);
        assert_eq!(p.vy, 3.5);
        assert_eq!(p.state, MotionState::Airborne);
    }

    // ── Update / gravity ──

    #[test]
    fn update_integrates_then_accumulates_gravity() {
        let mut p = Player::new(10.0, 10.0, 20.0, 30.0);
        p.vx = 2.0;
        p.vy = 3.0;
        p.update(8.0, 0.5);
        assert_eq!(p.rect.x, 12.0);
        assert_eq!(p.rect.y, 13.0);
        assert_eq!(p.vy, 7.0); // 3.0 + 8.0 * 0.5
    }

    #[test]
    fn grounded_player_accumulates_no_gravity() {
        let mut p = grounded_player();
        p.update(8.0, 0.5);
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.state, MotionState::Grounded);
    }

    #[test]
    fn begin_frame_revokes_grounding_and_contacts() {
        let mut p = grounded_player();
        p.contacts.top = true;
        p.begin_frame();
        assert_eq!(p.state, MotionState::Airborne);
        assert!(!p.contacts.any());
    }
}
