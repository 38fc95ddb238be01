//! MazeView: maps a grid plus game state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each maze cell is `cell_w` terminal columns wide. A maze larger than the
//! viewport is shown through a window that follows the player.

use crate::core::{GameState, Grid};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Position;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiStatusView {
    pub addr: String,
    pub connected: usize,
    pub streaming: usize,
}

/// Everything in the side panel that is not game state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusView {
    pub http_url: Option<String>,
    pub ai: Option<AiStatusView>,
    pub last_event: Option<String>,
}

const PANEL_W: u16 = 30;

const WALL: CellStyle = CellStyle::new(Rgb::new(110, 110, 130), Rgb::new(30, 30, 40));
const FLOOR: CellStyle = CellStyle::new(Rgb::new(70, 70, 80), Rgb::new(30, 30, 40));
const PLAYER: CellStyle = CellStyle::new(Rgb::new(255, 220, 80), Rgb::new(30, 30, 40)).bold();
const EXIT: CellStyle = CellStyle::new(Rgb::new(100, 230, 120), Rgb::new(30, 30, 40)).bold();
const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

pub struct MazeView {
    /// Terminal columns per maze cell.
    cell_w: u16,
}

impl Default for MazeView {
    fn default() -> Self {
        // Two terminal columns per maze cell.
        Self { cell_w: 2 }
    }
}

/// First visible index so that `focus` stays centred where possible.
fn window_start(focus: usize, visible: usize, total: usize) -> usize {
    if total <= visible {
        0
    } else {
        focus.saturating_sub(visible / 2).min(total - visible)
    }
}

impl MazeView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        grid: &Grid,
        state: &GameState,
        status: &StatusView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(crate::fb::Cell::BLANK);

        let maze_area_w = viewport.width.saturating_sub(PANEL_W + 1);
        let vis_cols = (maze_area_w.saturating_sub(2) / self.cell_w) as usize;
        let vis_rows = viewport.height.saturating_sub(2) as usize;
        let vis_cols = vis_cols.min(grid.width());
        let vis_rows = vis_rows.min(grid.height());

        if vis_cols > 0 && vis_rows > 0 {
            let col0 = window_start(state.player_position.col, vis_cols, grid.width());
            let row0 = window_start(state.player_position.row, vis_rows, grid.height());

            let frame_w = vis_cols as u16 * self.cell_w + 2;
            let frame_h = vis_rows as u16 + 2;
            fb.draw_frame(0, 0, frame_w, frame_h, BORDER);

            for dy in 0..vis_rows {
                for dx in 0..vis_cols {
                    let pos = Position::new(row0 + dy, col0 + dx);
                    let (ch, style) = if pos == state.player_position {
                        ('@', PLAYER)
                    } else if pos == state.exit_position {
                        ('E', EXIT)
                    } else if grid.is_wall(pos) {
                        ('█', WALL)
                    } else {
                        (' ', FLOOR)
                    };
                    let x = 1 + dx as u16 * self.cell_w;
                    let y = 1 + dy as u16;
                    let fill = if ch == '█' { '█' } else { ' ' };
                    fb.fill_rect(x, y, self.cell_w, 1, fill, style);
                    fb.put_char(x, y, ch, style);
                }
            }

            self.draw_panel(fb, state, status, frame_w + 1, viewport);

            if state.is_completed {
                let text = " EXIT REACHED! ";
                let text_w = text.chars().count() as u16;
                let x = frame_w.saturating_sub(text_w) / 2;
                fb.put_str(x, frame_h / 2, text, LABEL);
            }
        } else {
            fb.put_str(0, 0, "Terminal too small", LABEL);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        grid: &Grid,
        state: &GameState,
        status: &StatusView,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(grid, state, status, viewport, &mut fb);
        fb
    }

    fn draw_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        status: &StatusView,
        x: u16,
        viewport: Viewport,
    ) {
        if x >= viewport.width {
            return;
        }
        let dim = VALUE.dim();
        let mut y = 0u16;
        let mut line = |fb: &mut FrameBuffer, label: &str, value: &str| {
            let cx = fb.put_str(x, y, label, LABEL);
            fb.put_str(cx, y, value, VALUE);
            y = y.saturating_add(1);
        };

        line(fb, "TUI MAZE", "");
        line(fb, "", "");
        line(fb, "Moves  ", &state.move_count.to_string());
        line(fb, "Status ", state.status_label());
        line(
            fb,
            "Player ",
            &format!("({}, {})", state.player_position.col, state.player_position.row),
        );
        line(
            fb,
            "Exit   ",
            &format!("({}, {})", state.exit_position.col, state.exit_position.row),
        );
        line(
            fb,
            "Maze   ",
            &format!("{}x{}", state.maze_size.width, state.maze_size.height),
        );
        line(fb, "", "");
        line(fb, "HTTP   ", status.http_url.as_deref().unwrap_or("off"));
        match &status.ai {
            Some(ai) => {
                line(fb, "AI     ", &ai.addr);
                line(
                    fb,
                    "       ",
                    &format!("{} clients, {} streaming", ai.connected, ai.streaming),
                );
            }
            None => line(fb, "AI     ", "off"),
        }
        line(fb, "", "");
        line(fb, "Last event", "");
        line(fb, "  ", status.last_event.as_deref().unwrap_or("-"));
        line(fb, "", "");

        let hints = [
            "arrows/WASD/HJKL  move",
            "space/.  wait",
            "r  reset   n  new level",
            "q  quit",
        ];
        for hint in hints {
            if y >= viewport.height {
                break;
            }
            fb.put_str(x, y, hint, dim);
            y = y.saturating_add(1);
        }
    }
}
