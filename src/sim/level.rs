/// Level construction.
///
/// ## Sources (priority order):
///   1. `level_file` from config (ASCII grid, `.txt`)
///   2. Built-in layout
///
/// ## ASCII grid format:
///   Lines starting with `;` are comments; the first one names the level.
///   Every other line is a map row; each character is one 50 px cell:
///     '#' = terrain cell          'P' = player spawn
///     ' ' or '.' = empty
///
/// Horizontal runs of '#' are merged into single blocks, so a ten-cell
/// floor is one 500 px rectangle rather than ten seams. Blocks are emitted
/// row-major, which fixes the collision resolution order.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::domain::geometry::Rect;

/// Side of one grid cell, in world pixels.
pub const CELL: f32 = 50.0;

const BUILTIN_W: f32 = 800.0;
const BUILTIN_H: f32 = 600.0;
const PLAYER_W: f32 = 20.0;
const PLAYER_H: f32 = 30.0;

/// Everything the simulation needs to start: world bounds, spawn point,
/// player size, and the static block list.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub world_w: f32,
    pub world_h: f32,
    pub spawn: (f32, f32),
    pub player_size: (f32, f32),
    pub blocks: Vec<Rect>,
}

#[derive(Debug)]
pub enum LevelError {
    Io(io::Error),
    /// The grid contains no 'P' spawn marker.
    NoSpawn,
    /// The grid has no rows (or only comment lines).
    Empty,
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "{e}"),
            LevelError::NoSpawn => write!(f, "level has no player spawn ('P')"),
            LevelError::Empty => write!(f, "level has no map rows"),
        }
    }
}

impl From<io::Error> for LevelError {
    fn from(e: io::Error) -> Self {
        LevelError::Io(e)
    }
}

// ══════════════════════════════════════════════════════════════
// Built-in layout
// ══════════════════════════════════════════════════════════════

/// The default 800×600 level: an ascending staircase of 50 px cells on the
/// left, a full-width floor row, and one floating 200×100 platform. Fully
/// deterministic; the staircase's lowest cell in each column sits one cell
/// below the floor line and is never reachable.
pub fn builtin_level() -> Level {
    let cols = (BUILTIN_W / CELL) as i32; // 16
    let mut blocks = Vec::new();

    for i in 0..(cols - 5) {
        for j in 0..=i {
            blocks.push(Rect::new(
                i as f32 * CELL,
                BUILTIN_H - j as f32 * CELL,
                CELL,
                CELL,
            ));
        }
    }
    for i in 0..cols {
        blocks.push(Rect::new(i as f32 * CELL, BUILTIN_H - CELL, CELL, CELL));
    }
    blocks.push(Rect::new(
        BUILTIN_W / 2.0 - 400.0,
        BUILTIN_H / 2.0 - 150.0,
        200.0,
        100.0,
    ));

    Level {
        name: "Proving Ground".to_string(),
        world_w: BUILTIN_W,
        world_h: BUILTIN_H,
        spawn: (BUILTIN_W / 2.0, BUILTIN_H / 2.0 - 200.0),
        player_size: (PLAYER_W, PLAYER_H),
        blocks,
    }
}

// ══════════════════════════════════════════════════════════════
// ASCII grid loader
// ══════════════════════════════════════════════════════════════

pub fn load_level_file(path: &Path) -> Result<Level, LevelError> {
    let text = fs::read_to_string(path)?;
    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unnamed".to_string());
    parse_grid(&text, fallback_name)
}

fn parse_grid(text: &str, fallback_name: String) -> Result<Level, LevelError> {
    let mut name = fallback_name;
    let mut named = false;
    let mut rows: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(';') {
            if !named {
                let trimmed = rest.trim();
                if !trimmed.is_empty() {
                    name = trimmed.to_string();
                    named = true;
                }
            }
            continue;
        }
        rows.push(line);
    }

    // Drop trailing blank rows so an ending newline doesn't pad the world.
    while rows.last().is_some_and(|r| r.trim().is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(LevelError::Empty);
    }

    let mut blocks = Vec::new();
    let mut spawn = None;
    let mut width = 0usize;

    for (y, row) in rows.iter().enumerate() {
        let mut run_start: Option<usize> = None;
        let mut x = 0usize;
        for ch in row.chars() {
            match ch {
                '#' => {
                    if run_start.is_none() {
                        run_start = Some(x);
                    }
                }
                _ => {
                    if let Some(start) = run_start.take() {
                        blocks.push(cell_run(start, x, y));
                    }
                    if ch == 'P' {
                        spawn = Some((x as f32 * CELL, y as f32 * CELL));
                    }
                }
            }
            x += 1;
        }
        if let Some(start) = run_start {
            blocks.push(cell_run(start, x, y));
        }
        width = width.max(x);
    }

    let spawn = spawn.ok_or(LevelError::NoSpawn)?;

    Ok(Level {
        name,
        world_w: width as f32 * CELL,
        world_h: rows.len() as f32 * CELL,
        spawn,
        player_size: (PLAYER_W, PLAYER_H),
        blocks,
    })
}

/// One merged block covering grid columns [start, end) on row y.
fn cell_run(start: usize, end: usize, y: usize) -> Rect {
    Rect::new(
        start as f32 * CELL,
        y as f32 * CELL,
        (end - start) as f32 * CELL,
        CELL,
    )
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_layout_is_deterministic() {
        let a = builtin_level();
        let b = builtin_level();
        // Staircase 1+2+…+11 = 66, floor 16, platform 1.
        assert_eq!(a.blocks.len(), 83);
        assert_eq!(a.blocks, b.blocks);
        assert_eq!(a.spawn, (400.0, 100.0));
        assert_eq!(a.player_size, (20.0, 30.0));
    }

    #[test]
    fn builtin_floor_spans_full_width() {
        let level = builtin_level();
        let floor: Vec<_> = level
            .blocks
            .iter()
            .filter(|b| b.y == level.world_h - CELL)
            .collect();
        // 16 floor cells plus the staircase cells that land on the same row.
        assert!(floor.len() >= 16);
        assert!(floor.iter().any(|b| b.x == 0.0));
        assert!(floor.iter().any(|b| b.right() == level.world_w));
    }

    #[test]
    fn grid_rows_parse_into_merged_runs() {
        let text = "; Test Pit\n\
                    #  P #\n\
                    ######\n";
        let level = parse_grid(text, "fallback".into()).unwrap();
        assert_eq!(level.name, "Test Pit");
        // Row 0: two single cells; row 1: one six-cell run.
        assert_eq!(level.blocks.len(), 3);
        assert_eq!(level.blocks[2], Rect::new(0.0, CELL, 6.0 * CELL, CELL));
        assert_eq!(level.spawn, (3.0 * CELL, 0.0));
        assert_eq!(level.world_w, 6.0 * CELL);
        assert_eq!(level.world_h, 2.0 * CELL);
    }

    #[test]
    fn missing_spawn_is_an_error() {
        let err = parse_grid("###\n", "x".into()).unwrap_err();
        assert!(matches!(err, LevelError::NoSpawn));
    }

    #[test]
    fn empty_grid_is_an_error() {
        let err = parse_grid("; only a name\n\n", "x".into()).unwrap_err();
        assert!(matches!(err, LevelError::Empty));
    }
}
