//! Layout and drawing: playfield, next preview, score, thinking overlay, combo banner, game over.

use crate::theme::{Theme, shade};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};
use tentrixtui::{Session, Stats};

/// Terminal cells per grid cell.
const CELL_WIDTH: u16 = 5;
const CELL_HEIGHT: u16 = 2;

const SIDEBAR_WIDTH: u16 = 24;

/// Flash on cleared cells, fading back to whatever is there now.
const CLEAR_FADE_MS: u32 = 450;
/// "Combo xN!" fade-out.
const COMBO_FADE_MS: u32 = 1000;

/// Playfield size in terminal cells, border included.
fn playfield_pixel_size(width: usize, height: usize) -> (u16, u16) {
    (
        width as u16 * CELL_WIDTH + 2,
        height as u16 * CELL_HEIGHT + 2,
    )
}

/// Effects driven by engine events; owned by the app, advanced while drawing.
#[derive(Default)]
pub struct FxState {
    /// Cells to flash; the effect is built on the next frame.
    clear_cells: Vec<(usize, usize)>,
    clear_effect: Option<Effect>,
    combo: Option<ComboBanner>,
    last_process: Option<Instant>,
}

struct ComboBanner {
    count: u32,
    bonus: u32,
    effect: Effect,
}

impl FxState {
    pub fn flash_cells(&mut self, cells: &[(usize, usize)]) {
        if self.clear_effect.is_some() {
            self.clear_effect = None;
            self.clear_cells.clear();
        }
        self.clear_cells.extend_from_slice(cells);
    }

    pub fn show_combo(&mut self, count: u32, bonus: u32) {
        let effect = fx::fade_to_fg(Color::Reset, (COMBO_FADE_MS, Interpolation::QuadIn));
        self.combo = Some(ComboBanner {
            count,
            bonus,
            effect,
        });
    }

    /// Time since the last frame, for effect processing.
    fn advance(&mut self, now: Instant) -> TfxDuration {
        let delta = self
            .last_process
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(std::time::Duration::ZERO);
        self.last_process = Some(now);
        TfxDuration::from_millis(delta.as_millis().min(u32::MAX as u128) as u32)
    }
}

/// Draw the game: board, sidebar, then overlays.
pub fn draw(frame: &mut Frame, session: &Session, theme: &Theme, fx: &mut FxState, now: Instant) {
    let area = frame.area();
    let (board_outer, sidebar) = game_layout(area, session);
    let board = board_inner(board_outer, session);

    draw_playfield(frame, session, theme, board_outer, board);
    draw_sidebar(frame, session, theme, sidebar);

    let delta = fx.advance(now);
    apply_clear_effect(frame, theme, fx, board, delta);
    draw_combo_banner(frame, theme, fx, board, delta);

    if session.is_paused() {
        draw_thinking_overlay(frame, theme, board);
    }
    if session.is_game_over() {
        draw_game_over(frame, session, theme, board_outer);
    }
}

/// Board (with border) and sidebar, centred in `area`.
fn game_layout(area: Rect, session: &Session) -> (Rect, Rect) {
    let grid = session.grid();
    let (pw, ph) = playfield_pixel_size(grid.width(), grid.height());
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph.max(20)),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let board = Rect {
        height: ph.min(inner[0].height),
        ..inner[0]
    };
    (board, inner[1])
}

/// Inner board rect: one grid cell is CELL_WIDTH x CELL_HEIGHT terminal cells.
fn board_inner(outer: Rect, session: &Session) -> Rect {
    let grid = session.grid();
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (grid.width() as u16 * CELL_WIDTH).min(outer.width.saturating_sub(2)),
        height: (grid.height() as u16 * CELL_HEIGHT).min(outer.height.saturating_sub(2)),
    }
}

/// Terminal rect of one grid cell, clipped to the board.
fn cell_rect(board: Rect, column: usize, row: usize) -> Option<Rect> {
    let x = board.x + column as u16 * CELL_WIDTH;
    let y = board.y + row as u16 * CELL_HEIGHT;
    if x >= board.right() || y >= board.bottom() {
        return None;
    }
    Some(Rect {
        x,
        y,
        width: CELL_WIDTH.min(board.right() - x),
        height: CELL_HEIGHT.min(board.bottom() - y),
    })
}

fn paint_block(frame: &mut Frame, rect: Rect, number: u8, color: Color, number_fg: Color) {
    let buf = frame.buffer_mut();
    let label = format!("{number:^width$}", width = CELL_WIDTH as usize);
    let top = Style::default()
        .fg(number_fg)
        .bg(color)
        .add_modifier(Modifier::BOLD);
    buf.set_stringn(rect.x, rect.y, &label, rect.width as usize, top);
    // Darker lower half gives each block an edge.
    let lower = shade(color, 0.7);
    for y in rect.y + 1..rect.bottom() {
        for x in rect.x..rect.right() {
            buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(lower));
        }
    }
}

fn paint_empty(frame: &mut Frame, rect: Rect, theme: &Theme) {
    let buf = frame.buffer_mut();
    let dot = Style::default().fg(theme.div_line).bg(theme.bg);
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            buf[(x, y)].set_symbol(" ").set_style(dot);
        }
    }
    let mid = rect.x + rect.width / 2;
    buf[(mid, rect.y)].set_symbol("·");
}

/// Outline of where the falling block would land.
fn paint_shadow(frame: &mut Frame, rect: Rect, number: u8, color: Color, theme: &Theme) {
    let buf = frame.buffer_mut();
    let label = format!("[{number:^width$}]", width = CELL_WIDTH as usize - 2);
    let style = Style::default().fg(color).bg(theme.bg);
    buf.set_stringn(rect.x, rect.y, &label, rect.width as usize, style);
}

fn draw_playfield(frame: &mut Frame, session: &Session, theme: &Theme, outer: Rect, board: Rect) {
    let title = format!(" Tentrix  | Score: {} ", session.score());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    block.render(outer, frame.buffer_mut());

    let grid = session.grid();
    for column in 0..grid.width() {
        let Some(cells) = grid.column(column) else {
            continue;
        };
        for (row, cell) in cells.iter().enumerate() {
            let Some(rect) = cell_rect(board, column, row) else {
                continue;
            };
            match cell {
                Some(b) => paint_block(frame, rect, b.number, theme.block_color(b.color), theme.number_fg),
                None => paint_empty(frame, rect, theme),
            }
        }
    }

    if let Some(piece) = session.falling() {
        let color = theme.block_color(piece.block.color);
        if let Some(landing) = session.landing_row() {
            if landing != piece.row {
                if let Some(rect) = cell_rect(board, piece.column, landing) {
                    paint_shadow(frame, rect, piece.block.number, color, theme);
                }
            }
        }
        if let Some(rect) = cell_rect(board, piece.column, piece.row) {
            paint_block(frame, rect, piece.block.number, color, theme.number_fg);
        }
    }
}

/// Flash cleared cells white and fade back (TachyonFX).
fn apply_clear_effect(
    frame: &mut Frame,
    theme: &Theme,
    fx: &mut FxState,
    board: Rect,
    delta: TfxDuration,
) {
    if fx.clear_effect.is_none() && !fx.clear_cells.is_empty() {
        let positions: HashSet<(u16, u16)> = fx
            .clear_cells
            .iter()
            .filter_map(|&(c, r)| cell_rect(board, c, r))
            .flat_map(|r| r.positions().map(|p| (p.x, p.y)))
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            positions.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_from(
            theme.number_fg,
            Color::White,
            (CLEAR_FADE_MS, Interpolation::QuadOut),
        )
        .with_filter(filter)
        .with_area(board);
        fx.clear_effect = Some(effect);
    }

    if let Some(effect) = fx.clear_effect.as_mut() {
        frame.render_effect(effect, board, delta);
        if effect.done() {
            fx.clear_effect = None;
            fx.clear_cells.clear();
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// "Combo xN!" over the middle of the board, fading out.
fn draw_combo_banner(
    frame: &mut Frame,
    theme: &Theme,
    fx: &mut FxState,
    board: Rect,
    delta: TfxDuration,
) {
    let Some(banner) = fx.combo.as_mut() else {
        return;
    };
    let rect = centered(board, board.width, 2);
    let lines = vec![
        Line::from(Span::styled(
            format!("Combo x{}!", banner.count),
            Style::default()
                .fg(theme.combo)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("+{}", banner.bonus),
            Style::default().fg(theme.combo),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(rect, frame.buffer_mut());
    frame.render_effect(&mut banner.effect, rect, delta);
    if banner.effect.done() {
        fx.combo = None;
    }
}

fn draw_thinking_overlay(frame: &mut Frame, theme: &Theme, board: Rect) {
    let popup = centered(board, board.width.min(20), 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Thinking...",
            Style::default()
                .fg(theme.thinking)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Space: resume",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let Stats {
        pieces_placed,
        groups_cleared,
        best_chain,
        ..
    } = session.stats();
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", session.score()), fg)),
        Line::from(Span::styled(format!(" Blocks: {pieces_placed} "), fg)),
        Line::from(Span::styled(format!(" Groups: {groups_cleared} "), fg)),
        Line::from(Span::styled(format!(" Best chain: {best_chain} "), fg)),
        Line::from(""),
        Line::from(Span::styled(
            " R: Restart    Q: Quit ",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    let popup = centered(area, area.width, lines.len() as u16 + 2);
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Tentrixtui ", Style::default().fg(theme.title))),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

fn sidebar_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
}

fn draw_sidebar(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let stats = session.stats();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_HEIGHT + 3), // Next (border + title + blocks)
            Constraint::Length(1),               // gap
            Constraint::Length(7),               // Stats
            Constraint::Length(1),               // gap
            Constraint::Length(3),               // Colours
            Constraint::Min(0),                  // Keys
        ])
        .split(area);

    // --- Next ---
    let next_block = sidebar_block(theme);
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    Paragraph::new(Line::from(Span::styled("Next", title_style)))
        .render(next_inner, frame.buffer_mut());
    let mut x = next_inner.x;
    let y = next_inner.y + 1;
    for upcoming in session.queue() {
        if x + CELL_WIDTH > next_inner.right() || y + CELL_HEIGHT > next_inner.bottom() + 1 {
            break;
        }
        let rect = Rect {
            x,
            y,
            width: CELL_WIDTH,
            height: CELL_HEIGHT.min(next_inner.bottom().saturating_sub(y)),
        };
        paint_block(
            frame,
            rect,
            upcoming.number,
            theme.block_color(upcoming.color),
            theme.number_fg,
        );
        x += CELL_WIDTH + 1;
    }

    // --- Stats ---
    let stats_block = sidebar_block(theme);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats_lines = vec![
        stat("Score: ", session.score().to_string()),
        stat("Chain: ", session.chain_count().to_string()),
        stat("Best chain: ", stats.best_chain.to_string()),
        stat("Groups: ", stats.groups_cleared.to_string()),
        stat("Combos: ", stats.combos.to_string()),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    // --- Colours in play ---
    let colours_block = sidebar_block(theme).title(Span::styled("Colours", title_style));
    let colours_inner = colours_block.inner(chunks[4]);
    colours_block.render(chunks[4], frame.buffer_mut());
    draw_colour_strip(frame, session, theme, colours_inner);

    // --- Keys ---
    let key_style = Style::default().fg(theme.inactive_fg);
    let keys = vec![
        Line::from(Span::styled(" ←/→  move", key_style)),
        Line::from(Span::styled(" ↓    soft drop", key_style)),
        Line::from(Span::styled(" ↑    hard drop", key_style)),
        Line::from(Span::styled(" spc  think", key_style)),
        Line::from(Span::styled(" q    quit", key_style)),
    ];
    Paragraph::new(keys).render(chunks[5], frame.buffer_mut());
}

/// One swatch per colour in play.
fn draw_colour_strip(frame: &mut Frame, session: &Session, theme: &Theme, area: Rect) {
    let palette = session.config().palette();
    let swatch_w = (area.width / palette.len().max(1) as u16).clamp(1, 4);
    for (i, color) in palette.iter().enumerate() {
        let r = Rect {
            x: area.x + i as u16 * swatch_w,
            y: area.y,
            width: swatch_w.saturating_sub(1).max(1),
            height: area.height.min(1),
        };
        if r.right() > area.right() {
            break;
        }
        let c = theme.block_color(*color);
        Paragraph::new("█".repeat(r.width as usize))
            .style(Style::default().fg(c).bg(theme.bg))
            .render(r, frame.buffer_mut());
    }
}
