/// Collision resolution between the moving player and one static block.
///
/// ## How a pair is resolved
///
/// All checks run against the player's *projected* rectangle (current
/// position plus current velocity), so penetration is caught one frame
/// before integration commits it. This is a one-step look-ahead, not a
/// full continuous sweep; motion faster than one player-size per frame
/// can still tunnel.
///
///   1. Broad check — strict overlap of the projected rectangle and the
///      block on both axes. No overlap, no action.
///   2. Side classification — each of the four flags is tested
///      independently against the block's matching edge, so a moving
///      corner can raise two adjacent flags at once.
///   3. Corner disambiguation — for each adjacent pair of raised flags,
///      the axis with the larger penetration depth loses its flag; on an
///      exact tie the vertical flag survives.
///   4. Resolution — each surviving flag zeroes the velocity on its axis
///      and snaps the player flush to the block edge. A top contact is
///      what confirms the player as grounded.
///
/// ## Flag orientation
///
/// Flags are named for the block edge the projected rectangle crossed:
/// `left` means the projected left edge lies left of the block's left
/// edge, and its resolution pushes the player out to the block's left.
///
/// ┌──────────┬─────────────────────────────┬───────────────────────────┐
/// │ flag     │ raised when (projected)     │ resolution                │
/// ├──────────┼─────────────────────────────┼───────────────────────────┤
/// │ left     │ left edge   < block left    │ vx = 0, x = block.x − w   │
/// │ right    │ right edge  > block right   │ vx = 0, x = block.right   │
/// │ top      │ top edge    < block top     │ vy = 0, grounded,         │
/// │          │                             │ y = block.y − h           │
/// │ bottom   │ bottom edge > block bottom  │ vy = 0, y = block.bottom  │
/// └──────────┴─────────────────────────────┴───────────────────────────┘

use super::entity::{MotionState, Player};
use super::geometry::Rect;

/// Which block sides the player's projected rectangle crossed this frame.
///
/// Recomputed from scratch every frame; never carried across frames. The
/// per-frame set on the player is the OR of every block's resolved set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContactSet {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ContactSet {
    #[allow(dead_code)]
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn merge(&mut self, other: ContactSet) {
        self.left |= other.left;
        self.right |= other.right;
        self.top |= other.top;
        self.bottom |= other.bottom;
    }
}

// ══════════════════════════════════════════════════════════════
// Per-pair resolution
// ══════════════════════════════════════════════════════════════

/// Resolve the player against a single block.
///
/// Mutates position/velocity/state as needed, ORs the surviving flags into
/// the player's frame contact set, and returns this pair's flags. Pairs with
/// no projected overlap leave the player untouched and return an empty set.
pub fn resolve(player: &mut Player, block: &Rect) -> ContactSet {
    let projected = player.rect.offset(player.vx, player.vy);
    if !projected.intersects(block) {
        return ContactSet::default();
    }

    let mut hits = classify_sides(&projected, block);
    settle_corners(&mut hits, &projected, block);
    apply(player, block, hits);
    player.contacts.merge(hits);
    hits
}

/// Independent per-edge tests. Not mutually exclusive: a corner entered
/// diagonally raises both of its adjacent flags.
fn classify_sides(projected: &Rect, block: &Rect) -> ContactSet {
    ContactSet {
        left: projected.x < block.x,
        right: projected.right() > block.right(),
        top: projected.y < block.y,
        bottom: projected.bottom() > block.bottom(),
    }
}

/// Corner tie-break: when two adjacent flags are raised, the axis that
/// penetrates deeper is the one the player did NOT arrive from, so its
/// flag is cleared. Equal depths keep the vertical flag.
fn settle_corners(hits: &mut ContactSet, projected: &Rect, block: &Rect) {
    if hits.left && hits.top {
        if (projected.right() - block.x).abs() >= (projected.bottom() - block.y).abs() {
            hits.left = false;
        } else {
            hits.top = false;
        }
    }
    if hits.right && hits.top {
        if (projected.x - block.right()).abs() >= (projected.bottom() - block.y).abs() {
            hits.right = false;
        } else {
            hits.top = false;
        }
    }
    if hits.left && hits.bottom {
        if (projected.right() - block.x).abs() >= (projected.y - block.bottom()).abs() {
            hits.left = false;
        } else {
            hits.bottom = false;
        }
    }
    if hits.right && hits.bottom {
        if (projected.x - block.right()).abs() >= (projected.y - block.bottom()).abs() {
            hits.right = false;
        } else {
            hits.bottom = false;
        }
    }
}

/// Apply every surviving flag: kill the axis velocity and snap flush to the
/// block edge. Later blocks in the terrain may re-snap the same axis;
/// last-applied wins.
fn apply(player: &mut Player, block: &Rect, hits: ContactSet) {
    if hits.left {
        player.vx = 0.0;
        player.rect.x = block.x - player.rect.w();
    }
    if hits.right {
        player.vx = 0.0;
        player.rect.x = block.right();
    }
    if hits.top {
        player.vy = 0.0;
        player.state = MotionState::Grounded;
        player.rect.y = block.y - player.rect.h();
    }
    if hits.bottom {
        player.vy = 0.0;
        player.rect.y = block.bottom();
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32, vx: f32, vy: f32) -> Player {
        let mut p = Player::new(x, y, 20.0, 30.0);
        p.vx = vx;
        p.vy = vy;
        p
    }

    // ── Broad check ──

    #[test]
    fn no_overlap_is_a_noop() {
        let mut p = player_at(0.0, 0.0, 5.0, 5.0);
        let block = Rect::new(500.0, 500.0, 50.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(!hits.any());
        assert_eq!(p.rect.x, 0.0);
        assert_eq!(p.rect.y, 0.0);
        assert_eq!(p.vx, 5.0);
        assert_eq!(p.vy, 5.0);
        assert_eq!(p.state, MotionState::Airborne);
    }

    #[test]
    fn edge_touching_projection_is_a_noop() {
        // Projected bottom lands exactly on the block top: strict overlap
        // fails, so the grounded contact is NOT confirmed this frame.
        let mut p = player_at(100.0, 120.0, 0.0, 0.0);
        let block = Rect::new(0.0, 150.0, 400.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(!hits.any());
    }

    // ── Single-side contacts ──

    #[test]
    fn falling_onto_a_floor_grounds_and_snaps() {
        let mut p = player_at(120.0, 115.0, 0.0, 10.0);
        let block = Rect::new(0.0, 150.0, 400.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.top);
        assert!(!hits.left && !hits.right && !hits.bottom);
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.state, MotionState::Grounded);
        // Resolution is authoritative: flush, no residual penetration.
        assert_eq!(p.rect.bottom(), block.y);
    }

    #[test]
    fn running_into_a_wall_from_the_left() {
        // Player moving right into a tall wall; vertically inside its span
        // so only the left flag can raise.
        let mut p = player_at(70.0, 50.0, 15.0, 0.0);
        let block = Rect::new(100.0, 0.0, 50.0, 200.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.left);
        assert!(!hits.top && !hits.bottom && !hits.right);
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.rect.right(), block.x);
    }

    #[test]
    fn running_into_a_wall_from_the_right() {
        let mut p = player_at(160.0, 50.0, -15.0, 0.0);
        let block = Rect::new(100.0, 0.0, 50.0, 200.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.right);
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.rect.x, block.right());
    }

    #[test]
    fn jumping_into_a_ceiling() {
        let mut p = player_at(100.0, 60.0, 0.0, -15.0);
        let block = Rect::new(0.0, 0.0, 800.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.bottom);
        assert!(!hits.top);
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.rect.y, block.bottom());
        // A ceiling hit never grounds the player.
        assert_eq!(p.state, MotionState::Airborne);
    }

    // ── Corner disambiguation ──

    #[test]
    fn deeper_axis_loses_at_a_corner() {
        // Projected (98,98,20,30) against block (100,100,50,50):
        // horizontal depth |118−100| = 18, vertical |128−100| = 28.
        // Vertical is deeper, so the top flag is cleared and the pair
        // resolves as a side hit.
        let mut p = player_at(98.0, 98.0, 0.0, 0.0);
        let block = Rect::new(100.0, 100.0, 50.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.left);
        assert!(!hits.top);
        assert_eq!(p.rect.x, block.x - p.rect.w());
        assert_eq!(p.rect.y, 98.0);
    }

    #[test]
    fn shallow_vertical_overlap_wins_the_corner() {
        // Landing near the left corner of a wide floor: projected
        // (95,125..155) raises left and top, but the horizontal depth
        // |115−100| = 15 dwarfs the vertical |155−150| = 5, so this is
        // a landing.
        let mut p = player_at(95.0, 115.0, 0.0, 10.0);
        let block = Rect::new(100.0, 150.0, 600.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.top);
        assert!(!hits.left);
        assert_eq!(p.rect.bottom(), block.y);
        assert_eq!(p.state, MotionState::Grounded);
    }

    #[test]
    fn corner_tie_keeps_the_vertical_flag() {
        // Projected (90,80,20,30) vs block (100,100,50,50): horizontal
        // depth |110−100| = 10 and vertical |110−100| = 10 tie exactly.
        let mut p = player_at(90.0, 80.0, 0.0, 0.0);
        let block = Rect::new(100.0, 100.0, 50.0, 50.0);
        let hits = resolve(&mut p, &block);
        assert!(hits.top);
        assert!(!hits.left);
        assert_eq!(p.rect.bottom(), block.y);
    }

    #[test]
    fn bottom_corner_disambiguates_too() {
        // Rising into the underside near the block's left corner with a
        // shallow vertical depth: the bottom flag survives.
        let mut p = player_at(95.0, 148.0, 0.0, -10.0);
        let block = Rect::new(100.0, 50.0, 200.0, 90.0);
        // Projected (95,138..168): horizontal depth |115−100| = 15,
        // vertical depth |138−140| = 2.
        let hits = resolve(&mut p, &block);
        assert!(hits.bottom);
        assert!(!hits.left);
        assert_eq!(p.rect.y, block.bottom());
        assert_eq!(p.vy, 0.0);
    }

    // ── Frame contact set ──

    #[test]
    fn pair_flags_accumulate_on_the_player() {
        let mut p = player_at(120.0, 115.0, 0.0, 10.0);
        let floor = Rect::new(0.0, 150.0, 400.0, 50.0);
        let far = Rect::new(600.0, 0.0, 50.0, 50.0);
        resolve(&mut p, &floor);
        resolve(&mut p, &far);
        // The miss must not erase the earlier hit.
        assert!(p.contacts.top);
        assert!(!p.contacts.left);
    }
}
