//! Terminal UI rendering with ratatui

use crate::board::{BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_ROWS};
use crate::game::Snapshot;
use crate::settings::Settings;
use crate::tetromino::PieceKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + stats(16) = 38
const GAME_WIDTH: u16 = 38;
/// Total height needed: board(20) + hidden rows + 2 for borders
const GAME_HEIGHT: u16 = (VISIBLE_ROWS + HIDDEN_ROWS) as u16 + 2;

/// Colour of locked blocks, which keep no piece identity
const LOCKED_COLOR: Color = Color::Rgb(0, 150, 200);

/// Get the color for a falling piece
fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::T => Color::Magenta,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::J => Color::Blue,
        PieceKind::L => Color::Rgb(255, 165, 0), // Orange
    }
}

/// Render the whole game screen
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot<'_>, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2),
            Constraint::Length(16),
        ])
        .split(game_area);

    render_board(frame, layout[0], snapshot, settings);
    render_stats(frame, layout[1], snapshot);

    if snapshot.game_over {
        render_overlay(frame, area, "GAME OVER", "Press R to restart");
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// What to draw in one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellView {
    Empty,
    Locked,
    Piece(PieceKind),
    Shadow(PieceKind),
}

/// Resolve the contents of every displayed cell, hidden rows first
fn board_cells(snapshot: &Snapshot<'_>, show_shadow: bool) -> Vec<[CellView; BOARD_WIDTH]> {
    let top = -(HIDDEN_ROWS as i32);
    let mut rows = vec![[CellView::Empty; BOARD_WIDTH]; HIDDEN_ROWS + VISIBLE_ROWS];

    for (row, cells) in snapshot.board.rows().enumerate() {
        for (col, &filled) in cells.iter().enumerate() {
            if filled {
                rows[row + HIDDEN_ROWS][col] = CellView::Locked;
            }
        }
    }

    let mut paint = |row: i32, col: i32, view: CellView| {
        let Ok(r) = usize::try_from(row - top) else {
            return;
        };
        let Ok(c) = usize::try_from(col) else {
            return;
        };
        if let Some(cell) = rows.get_mut(r).and_then(|cells| cells.get_mut(c)) {
            *cell = view;
        }
    };

    let piece = snapshot.piece;
    if !snapshot.game_over {
        // Shadow only in the visible area, under the piece itself
        if show_shadow && piece.landing_row > piece.row {
            for (row, col) in piece.landing_positions() {
                if row >= 0 {
                    paint(row, col, CellView::Shadow(piece.kind));
                }
            }
        }
        for (row, col) in piece.block_positions() {
            paint(row, col, CellView::Piece(piece.kind));
        }
    }

    rows
}

fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>, settings: &Settings) {
    let (block_char, shadow_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = board_cells(snapshot, settings.visual.show_shadow)
        .iter()
        .map(|cells| {
            let spans: Vec<Span> = cells
                .iter()
                .map(|cell| match *cell {
                    CellView::Empty => Span::raw(EMPTY),
                    CellView::Locked => Span::styled(block_char, Style::default().fg(LOCKED_COLOR)),
                    CellView::Piece(kind) => Span::styled(block_char, Style::default().fg(piece_color(kind))),
                    CellView::Shadow(kind) => {
                        Span::styled(shadow_char, Style::default().fg(piece_color(kind)).dim())
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.points),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.level),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", snapshot.lines),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        Line::styled("Z/X  rotate", Style::default().fg(Color::DarkGray)),
        Line::styled("←/→  move", Style::default().fg(Color::DarkGray)),
        Line::styled("↓    drop", Style::default().fg(Color::DarkGray)),
        Line::styled("R    restart", Style::default().fg(Color::DarkGray)),
        Line::styled("Q    quit", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Green).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Green)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
