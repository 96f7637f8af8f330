/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of Cells)
///   2. Compare each cell with `back` (the previous frame)
///   3. Emit terminal commands only for cells that changed
///   4. Batch everything with `queue!`, flush once at the end
///   5. Swap front/back
///
/// World coordinates are pixels; one terminal cell covers a
/// PX_PER_COL × PX_PER_ROW pixel region (cells are about twice as tall as
/// they are wide, so the two scales keep blocks visually square). The
/// camera decides which pixel window is visible.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::MotionState;
use crate::sim::world::WorldState;

/// World pixels covered by one terminal column / row.
const PX_PER_COL: f32 = 10.0;
const PX_PER_ROW: f32 = 25.0;

/// Row layout: HUD on top, the world view below, help at the bottom.
const HUD_ROW: usize = 0;
const VIEW_ROW: usize = 2;
const RESERVED_BELOW: usize = 2;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, so the
    /// cleared screen and the composed cells are guaranteed to match.
    const BASE_BG: Color = Color::Rgb { r: 10, g: 10, b: 16 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel that differs from any real cell, forcing a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn bg(bg: Color) -> Cell {
        Cell { ch: ' ', fg: Color::White, bg }
    }
}

/// In-world empty space, slightly lighter than the void outside the
/// level so the world edges read on screen.
const WORLD_BG: Color = Color::Rgb { r: 24, g: 24, b: 36 };
const BLOCK_BG: Color = Color::Rgb { r: 188, g: 188, b: 200 };
const PLAYER_BG: Color = Color::Rgb { r: 64, g: 128, b: 228 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 58 };

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, fg, bg });
            cx += 1;
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force a full repaint on the first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Size the camera viewport in pixels, then follow the player.
        let view_rows = self.term_h.saturating_sub(VIEW_ROW + RESERVED_BELOW).max(1);
        world.camera.view_w = self.term_w as f32 * PX_PER_COL;
        world.camera.view_h = view_rows as f32 * PX_PER_ROW;
        let px = world.player.rect.x + world.player.rect.w() / 2.0;
        let py = world.player.rect.y + world.player.rect.h() / 2.0;
        world.camera.follow(px, py, world.world_w, world.world_h);

        self.front.clear();
        self.compose_hud(world);
        self.compose_scene(world, view_rows);
        self.compose_help();

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Composition ──

    fn compose_hud(&mut self, w: &WorldState) {
        let state = match w.player.state {
            MotionState::Grounded => "grounded",
            MotionState::Airborne => "airborne",
        };
        let hud = format!(
            " {}  pos {:>4.0},{:<4.0} vel {:>+6.1},{:<+6.1} {:<8} {:>4.0} fps ",
            w.level_name, w.player.rect.x, w.player.rect.y, w.player.vx, w.player.vy, state, w.fps,
        );
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::bg(HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
        if w.paused {
            let tag = " PAUSED ";
            let x = self.front.width.saturating_sub(tag.len() + 1);
            self.front.put_str(x, HUD_ROW, tag, Color::Black, Color::Rgb { r: 210, g: 190, b: 60 });
        }
    }

    fn compose_scene(&mut self, w: &WorldState, view_rows: usize) {
        // World interior, then terrain, then the player on top.
        self.fill_px_rect(w, view_rows, 0.0, 0.0, w.world_w, w.world_h, Cell::bg(WORLD_BG));
        for block in w.terrain.iter() {
            self.fill_px_rect(w, view_rows, block.x, block.y, block.right(), block.bottom(), Cell::bg(BLOCK_BG));
        }
        let p = &w.player.rect;
        self.fill_px_rect(w, view_rows, p.x, p.y, p.right(), p.bottom(), Cell::bg(PLAYER_BG));
    }

    /// Fill the cells covered by a world-pixel rectangle, clipped to the
    /// visible viewport. Any overlap with a cell claims the whole cell, so
    /// the player never rounds away to nothing.
    fn fill_px_rect(
        &mut self,
        w: &WorldState,
        view_rows: usize,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        cell: Cell,
    ) {
        let cam = &w.camera;
        let c0 = (((x0 - cam.x) / PX_PER_COL).floor() as i64).max(0);
        let c1 = ((((x1 - cam.x) / PX_PER_COL).ceil()) as i64).min(self.front.width as i64);
        let r0 = (((y0 - cam.y) / PX_PER_ROW).floor() as i64).max(0);
        let r1 = ((((y1 - cam.y) / PX_PER_ROW).ceil()) as i64).min(view_rows as i64);
        for r in r0..r1 {
            for c in c0..c1 {
                self.front.set(c as usize, VIEW_ROW + r as usize, cell);
            }
        }
    }

    fn compose_help(&mut self) {
        let row = self.front.height.saturating_sub(1);
        let help = " ←/→ or A/D run   Space/W jump   P pause   R reset   Q quit";
        self.front.put_str(0, row, help, Color::DarkGrey, Cell::BASE_BG);
    }

    // ── Diff emit ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
