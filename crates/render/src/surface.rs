use crate::sheet::SpriteSheet;
use canvaswalk_common::{Color, Rect};
use std::fmt::Write as _;

/// Anything that can clear itself, fill rectangles and blit from a sprite sheet.
///
/// Mirrors the subset of a 2D canvas context the render step needs.
pub trait Surface {
    fn clear(&mut self);
    fn fill_rect(&mut self, color: &Color, dst: Rect);
    fn draw_image(&mut self, sheet: &SpriteSheet, src: Rect, dst: Rect);

    /// Called once the frame's draw calls are issued. Surfaces that buffer
    /// (terminals, swapchains) show the frame here.
    fn present(&mut self) {}
}

/// One call made against a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { color: Color, dst: Rect },
    DrawImage { sheet: String, src: Rect, dst: Rect },
}

/// Surface that records the calls made against it since the last clear.
///
/// Used by tests and by the headless CLI to dump frames as text.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls of the current frame, starting with its `Clear`.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears seen, i.e. frames started.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Human-readable dump of the current frame.
    pub fn to_debug_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ({} calls) ===", self.frames, self.commands.len());
        for cmd in &self.commands {
            let _ = match cmd {
                DrawCommand::Clear => writeln!(out, "  clear"),
                DrawCommand::FillRect { color, dst } => writeln!(
                    out,
                    "  fill   {:<8} x={:.2} y={:.2} w={:.2} h={:.2}",
                    color.as_str(),
                    dst.x,
                    dst.y,
                    dst.w,
                    dst.h
                ),
                DrawCommand::DrawImage { sheet, src, dst } => writeln!(
                    out,
                    "  blit   {sheet} src=({:.0}, {:.0}) x={:.2} y={:.2} w={:.2} h={:.2}",
                    src.x, src.y, dst.x, dst.y, dst.w, dst.h
                ),
            };
        }
        out
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.frames += 1;
    }

    fn fill_rect(&mut self, color: &Color, dst: Rect) {
        self.commands.push(DrawCommand::FillRect {
            color: color.clone(),
            dst,
        });
    }

    fn draw_image(&mut self, sheet: &SpriteSheet, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::DrawImage {
            sheet: sheet.name.clone(),
            src,
            dst,
        });
    }
}

/// One character cell of a `CellSurface`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Option<Color>,
}

impl Cell {
    const BLANK: Self = Self {
        glyph: ' ',
        color: None,
    };
}

/// Glyph used for cells covered by a sprite blit.
pub const SPRITE_GLYPH: char = '#';

/// Rasterises draw calls into a grid of character cells.
///
/// Each cell covers `px_per_cell` pixels horizontally and twice that
/// vertically, roughly matching terminal glyph proportions. A cell is covered
/// when its centre lies inside the destination rect.
#[derive(Debug, Clone)]
pub struct CellSurface {
    cols: usize,
    rows: usize,
    px_per_cell: f32,
    cells: Vec<Cell>,
}

impl CellSurface {
    pub fn new(cols: usize, rows: usize, px_per_cell: f32) -> Self {
        Self {
            cols,
            rows,
            px_per_cell: px_per_cell.max(f32::EPSILON),
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = (row * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Grid as text, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            out.extend(self.row(row).iter().map(|c| c.glyph));
            out.push('\n');
        }
        out
    }

    fn cover(&mut self, dst: Rect, cell: &Cell) {
        let cell_w = self.px_per_cell;
        let cell_h = self.px_per_cell * 2.0;
        let span = |lo: f32, hi: f32, size: f32, limit: usize| {
            // Cells whose centre (i + 0.5) * size lies in [lo, hi).
            let first = (lo / size - 0.5).ceil().max(0.0) as usize;
            let last = ((hi / size - 0.5).ceil().max(0.0) as usize).min(limit);
            first..last
        };
        let cols = span(dst.x, dst.right(), cell_w, self.cols);
        let rows = span(dst.y, dst.bottom(), cell_h, self.rows);
        for row in rows {
            for col in cols.clone() {
                self.cells[row * self.cols + col] = cell.clone();
            }
        }
    }
}

impl Surface for CellSurface {
    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_rect(&mut self, color: &Color, dst: Rect) {
        let cell = Cell {
            glyph: color.initial(),
            color: Some(color.clone()),
        };
        self.cover(dst, &cell);
    }

    fn draw_image(&mut self, _sheet: &SpriteSheet, _src: Rect, dst: Rect) {
        self.cover(
            dst,
            &Cell {
                glyph: SPRITE_GLYPH,
                color: None,
            },
        );
    }
}
