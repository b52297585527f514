/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The 800×600 world is scaled onto whatever the terminal offers between
/// the HUD row and the help row, so one cell covers a variable number of
/// world pixels. Every body covers at least one cell.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::anim::AnimKey;
use crate::domain::body::Body;
use crate::sim::world::{Backdrop, Phase, WorldState, WORLD_HEIGHT, WORLD_WIDTH};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell outside the playfield. Using the
    /// same RGB for `Clear` keeps VTE row gaps from showing as lines.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by compose; forces a full repaint when written to `back`.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

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

    /// Draw a glyph over whatever background is already there.
    fn glyph(&mut self, x: usize, y: usize, ch: char, fg: Color) {
        let bg = self.get(x, y).bg;
        self.set(x, y, Cell::new(ch, fg, bg));
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Like `put_str`, keeping each cell's background.
    fn put_str_over(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.glyph(x + i, y, ch, fg);
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 1;
/// HUD above the field, help bar below it.
const RESERVED_ROWS: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const SKY_TOP: (u8, u8, u8) = (40, 90, 170);
const SKY_BOTTOM: (u8, u8, u8) = (130, 185, 235);
const GRASS: Color = Color::Rgb { r: 90, g: 170, b: 60 };
const DIRT: Color = Color::Rgb { r: 110, g: 72, b: 40 };
const PEBBLE: Color = Color::Rgb { r: 150, g: 110, b: 70 };
const PEBBLE_SPACING: f32 = 5.0;
const STAR_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const BOMB_FG: Color = Color::Rgb { r: 25, g: 25, b: 25 };
const DUDE_FG: Color = Color::Rgb { r: 170, g: 90, b: 220 };
const DEBUG_FG: Color = Color::Magenta;

/// Mapping from world pixels to playfield cells.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    cols: usize,
    rows: usize,
}

/// Inclusive cell rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRect {
    c0: usize,
    r0: usize,
    c1: usize,
    r1: usize,
}

impl Viewport {
    fn fit(term_w: usize, term_h: usize) -> Self {
        Viewport {
            cols: term_w.max(1),
            rows: term_h.saturating_sub(RESERVED_ROWS).max(1),
        }
    }

    fn col(&self, x: f32) -> usize {
        let c = (x / WORLD_WIDTH * self.cols as f32).floor();
        (c.max(0.0) as usize).min(self.cols - 1)
    }

    /// Screen row (HUD offset included).
    fn row(&self, y: f32) -> usize {
        let r = (y / WORLD_HEIGHT * self.rows as f32).floor();
        FIELD_ROW + (r.max(0.0) as usize).min(self.rows - 1)
    }

    /// Cells covered by a body. The right/bottom edge is exclusive in world
    /// space, so a body ending exactly on a cell boundary does not spill.
    fn rect(&self, body: &Body) -> CellRect {
        let c0 = self.col(body.left());
        let r0 = self.row(body.top());
        let c1 = self.col(body.right() - 0.01).max(c0);
        let r1 = self.row(body.bottom() - 0.01).max(r0);
        CellRect { c0, r0, c1, r1 }
    }
}

fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> Color {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color::Rgb { r: mix(a.0, b.0), g: mix(a.1, b.1), b: mix(a.2, b.2) }
}

fn tint_color(rgb: u32) -> Color {
    Color::Rgb {
        r: ((rgb >> 16) & 0xFF) as u8,
        g: ((rgb >> 8) & 0xFF) as u8,
        b: (rgb & 0xFF) as u8,
    }
}

/// Head glyph per facing, leg glyph per sprite frame.
fn player_glyphs(key: AnimKey, frame: u8) -> (char, char) {
    let head = match key {
        AnimKey::Left => '<',
        AnimKey::Turn => 'o',
        AnimKey::Right => '>',
    };
    let legs = match key {
        AnimKey::Turn => 'A',
        _ if frame % 2 == 0 => '/',
        _ => '\\',
    };
    (head, legs)
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, w: &WorldState) {
    let vp = Viewport::fit(buf.width, buf.height);
    buf.clear();

    if let Some(sky) = &w.backdrop {
        compose_sky(buf, &vp, sky);
    }
    compose_platforms(buf, &vp, w);
    compose_stars(buf, &vp, w);
    compose_bombs(buf, &vp, w);
    compose_player(buf, &vp, w);
    compose_score_text(buf, &vp, w);
    if w.physics.debug {
        compose_debug(buf, &vp, w);
    }
    compose_hud(buf, w);
    if w.phase() == Phase::GameOver {
        compose_game_over(buf, &vp, w);
    }
    compose_help(buf, &vp);
}

/// Vertical gradient over the cells the sky image covers.
fn compose_sky(buf: &mut FrameBuffer, vp: &Viewport, sky: &Backdrop) {
    let c0 = vp.col(sky.x - sky.width / 2.0);
    let c1 = vp.col(sky.x + sky.width / 2.0 - 0.01);
    let r0 = vp.row(sky.y - sky.height / 2.0);
    let r1 = vp.row(sky.y + sky.height / 2.0 - 0.01);
    for row in r0..=r1 {
        let t = if r1 > r0 { (row - r0) as f32 / (r1 - r0) as f32 } else { 0.0 };
        let bg = lerp_rgb(SKY_TOP, SKY_BOTTOM, t);
        for col in c0..=c1 {
            buf.set(col, row, Cell::new(' ', Color::White, bg));
        }
    }
}

fn compose_platforms(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    for p in &w.platforms {
        let r = vp.rect(&p.body);
        // Pebble spacing stretches with the sprite scale.
        let pebble_every = ((PEBBLE_SPACING * p.scale).round() as usize).max(2);
        for row in r.r0..=r.r1 {
            for col in r.c0..=r.c1 {
                let cell = if row == r.r0 {
                    Cell::new('▀', GRASS, DIRT)
                } else if (col - r.c0 + row) % pebble_every == 0 {
                    Cell::new('·', PEBBLE, DIRT)
                } else {
                    Cell::new(' ', Color::White, DIRT)
                };
                buf.set(col, row, cell);
            }
        }
    }
}

fn compose_stars(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    for s in w.stars.iter().filter(|s| s.is_active()) {
        buf.glyph(vp.col(s.body.pos.x), vp.row(s.body.pos.y), '*', STAR_FG);
    }
}

fn compose_bombs(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    for b in w.bombs.iter().filter(|b| b.body.visible) {
        buf.glyph(vp.col(b.body.pos.x), vp.row(b.body.pos.y), '@', BOMB_FG);
    }
}

fn compose_player(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    let player = &w.player;
    if !player.body.visible {
        return;
    }
    let fg = player.tint.map(tint_color).unwrap_or(DUDE_FG);
    let (head, legs) = player_glyphs(player.anim.current(), player.anim.frame());
    let r = vp.rect(&player.body);
    for row in r.r0..=r.r1 {
        let ch = if row == r.r0 {
            head
        } else if row == r.r1 {
            legs
        } else {
            '#'
        };
        for col in r.c0..=r.c1 {
            buf.glyph(col, row, ch, fg);
        }
    }
}

fn compose_score_text(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    let label = &w.score_text;
    buf.put_str_over(vp.col(label.x), vp.row(label.y), &label.text, Color::Black);
}

fn compose_debug(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    let bodies = w
        .platforms
        .iter()
        .map(|p| &p.body)
        .chain(std::iter::once(&w.player.body))
        .chain(w.stars.iter().map(|s| &s.body))
        .chain(w.bombs.iter().map(|b| &b.body))
        .filter(|b| b.enabled);
    for body in bodies {
        let r = vp.rect(body);
        for col in r.c0..=r.c1 {
            buf.glyph(col, r.r0, '-', DEBUG_FG);
            buf.glyph(col, r.r1, '-', DEBUG_FG);
        }
        for row in r.r0..=r.r1 {
            buf.glyph(r.c0, row, '|', DEBUG_FG);
            buf.glyph(r.c1, row, '|', DEBUG_FG);
        }
        for (c, rr) in [(r.c0, r.r0), (r.c1, r.r0), (r.c0, r.r1), (r.c1, r.r1)] {
            buf.glyph(c, rr, '+', DEBUG_FG);
        }
    }
}

fn compose_hud(buf: &mut FrameBuffer, w: &WorldState) {
    let hud = format!(
        " Score: {:<6}  Stars: {:>2}/{:<2}  Bombs: {:<3}  Level: {:<3}  Seed: {}",
        w.session.score,
        w.active_stars(),
        w.stars.len(),
        w.bombs.len(),
        w.levels_cleared + 1,
        w.seed,
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    if w.physics.debug {
        let body = &w.player.body;
        let contact = if body.touching.none() { "air" } else if body.touching.down { "ground" } else { "wall" };
        let probe = format!(
            "{} {} v=({:.0},{:.0}) ",
            w.player.anim.current().as_str(),
            contact,
            body.vel.x,
            body.vel.y,
        );
        let x = buf.width.saturating_sub(probe.chars().count());
        buf.put_str(x, HUD_ROW, &probe, DEBUG_FG, HUD_BG);
    }
}

fn compose_game_over(buf: &mut FrameBuffer, vp: &Viewport, w: &WorldState) {
    let score = format!("Final score: {}", w.session.score);
    let lines = ["G A M E   O V E R", score.as_str(), "Esc / Q: quit"];
    let box_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 6;
    let box_h = lines.len() + 2;
    let x0 = vp.cols.saturating_sub(box_w) / 2;
    let y0 = FIELD_ROW + vp.rows.saturating_sub(box_h) / 2;
    let bg = Color::Rgb { r: 40, g: 10, b: 10 };

    for y in y0..y0 + box_h {
        for x in x0..x0 + box_w {
            buf.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
    for (i, line) in lines.iter().enumerate() {
        let x = x0 + (box_w - line.chars().count()) / 2;
        let fg = if i == 0 { Color::Rgb { r: 255, g: 60, b: 60 } } else { Color::White };
        buf.put_str(x, y0 + 1 + i, line, fg, bg);
    }
}

fn compose_help(buf: &mut FrameBuffer, vp: &Viewport) {
    let help_row = FIELD_ROW + vp.rows;
    if help_row < buf.height {
        let help = " ←/→ A/D: run   ↑ W Space: jump   Esc/Q: quit";
        buf.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
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
        self.back.cells.fill(Cell::INVALID);
        log::debug!("terminal {}x{}", self.term_w, self.term_h);

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

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let phase = world.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(phase);
        }

        compose(&mut self.front, world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Position of the cursor after the last Print, if known.
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors, not ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
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
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
