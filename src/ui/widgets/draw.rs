//! Draw functions used by [crate::ui::render].
//!
//! Panels, the footer, the context menu and the modal dialogs. Popups record the area they
//! were drawn in so mouse presses can be hit-tested against them on the next event.

use crate::app::dialog::{ConfirmDeleteDialog, Modal, NameDialog, NameStatus};
use crate::app::forest::Forest;
use crate::app::menu::ContextMenu;
use crate::core::paths::dir_name;
use crate::ui::widgets::{anchored_rect, centered_rect, input_field_view, truncate_to_width};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const DIR_OPEN_MARKER: &str = "▾ ";
const DIR_CLOSED_MARKER: &str = "▸ ";
const FILE_MARKER: &str = "  ";
const INDENT: &str = "  ";

fn accent() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Draws one panel: a title line with the root's name, then the visible rows.
pub(crate) fn draw_panel(frame: &mut Frame, forest: &Forest, idx: usize, area: Rect) {
    let Some(panel) = forest.panel(idx) else {
        return;
    };
    let focused = forest.focus() == idx;
    let title_style = if focused {
        accent().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(title_style)
        .title(Span::styled(
            format!(" {} ", dir_name(panel.root_path())),
            title_style,
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let icons = forest.icons();
    let lines: Vec<Line> = panel
        .rows()
        .into_iter()
        .enumerate()
        .skip(panel.scroll())
        .take(inner.height as usize)
        .map(|(row_idx, row)| {
            let marker = match (row.entry.is_dir(), row.expanded) {
                (true, true) => DIR_OPEN_MARKER,
                (true, false) => DIR_CLOSED_MARKER,
                (false, _) => FILE_MARKER,
            };
            let icon = icons.icon(&row.entry, row.expanded);
            let mut text = INDENT.repeat(row.depth);
            text.push_str(marker);
            if !icon.is_empty() {
                text.push_str(icon);
                text.push(' ');
            }
            text.push_str(row.entry.name());

            let mut style = if row.entry.is_dir() {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            if row_idx == panel.selected() {
                style = if focused {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style.add_modifier(Modifier::UNDERLINED)
                };
            }
            Line::from(Span::styled(truncate_to_width(&text, width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draws the bottom line: the last event, or a short key hint.
pub(crate) fn draw_footer(frame: &mut Frame, status: Option<&str>, area: Rect) {
    let text = status.unwrap_or("enter: open/toggle  m: menu  tab: next root  q: quit");
    let para = Paragraph::new(truncate_to_width(text, area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Draws the context menu next to its anchor and records its area.
pub(crate) fn draw_menu(frame: &mut Frame, menu: &mut ContextMenu, bounds: Rect) {
    let label_width = menu
        .items()
        .iter()
        .map(|a| a.label().width())
        .max()
        .unwrap_or(0) as u16;
    let area = anchored_rect(
        bounds,
        menu.anchor(),
        label_width + 4,
        menu.items().len() as u16 + 2,
    );

    let lines: Vec<Line> = menu
        .items()
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == menu.selected() {
                accent().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" {} ", action.label()), style))
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(accent()),
        ),
        area,
    );
    menu.set_area(area);
}

/// Draws whichever modal is open and records its area.
pub(crate) fn draw_modal(frame: &mut Frame, modal: &mut Modal, bounds: Rect) {
    let area = match modal {
        Modal::Name(dialog) => draw_name_dialog(frame, dialog, bounds),
        Modal::ConfirmDelete(dialog) => draw_confirm_dialog(frame, dialog, bounds),
    };
    modal.set_area(area);
}

fn dialog_width(lines: &[String], bounds: Rect) -> u16 {
    let longest = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    (longest + 4).max(50).min(bounds.width)
}

fn draw_name_dialog(frame: &mut Frame, dialog: &NameDialog, bounds: Rect) -> Rect {
    let headers = dialog.header_lines();
    let status = dialog.status_text();
    let mut measured = headers.clone();
    measured.extend(status.clone());
    let width = dialog_width(&measured, bounds);
    let area = centered_rect(bounds, width, headers.len() as u16 + 4);
    let inner_width = area.width.saturating_sub(2) as usize;

    let prompt = dialog.prompt();
    let field_width = inner_width.saturating_sub(prompt.width() + 1);
    let input = dialog.input();
    let (visible, cursor) = input_field_view(input.text(), input.cursor(), field_width);
    let input_style = if input.is_all_selected() {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let mut lines: Vec<Line> = headers.iter().map(|h| Line::raw(h.clone())).collect();
    lines.push(Line::from(vec![
        Span::styled(prompt.clone(), accent()),
        Span::raw(" "),
        Span::styled(visible.to_string(), input_style),
    ]));
    let status_style = match dialog.status() {
        NameStatus::Empty => Style::default(),
        NameStatus::Free(_) => Style::default().fg(Color::Black).bg(Color::Green),
        NameStatus::Taken(_) => Style::default().fg(Color::White).bg(Color::Red),
    };
    lines.push(Line::from(Span::styled(
        truncate_to_width(status.as_deref().unwrap_or(""), inner_width),
        status_style,
    )));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(accent()),
        ),
        area,
    );

    let cursor_x = area.x + 1 + (prompt.width() + 1 + cursor) as u16;
    let cursor_y = area.y + 1 + headers.len() as u16;
    if cursor_x < area.right().saturating_sub(1) {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
    area
}

fn draw_confirm_dialog(frame: &mut Frame, dialog: &mut ConfirmDeleteDialog, bounds: Rect) -> Rect {
    let text = dialog.lines();
    let width = dialog_width(&text, bounds);
    let area = centered_rect(bounds, width, text.len() as u16 + 3);
    let red = Style::default().fg(Color::Red);

    let mut lines: Vec<Line> = text.into_iter().map(Line::raw).collect();
    let label = format!("[ {} ]", dialog.button_label());
    let label_width = label.width() as u16;
    lines.push(Line::from(Span::styled(label, red.add_modifier(Modifier::BOLD))).right_aligned());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL).border_style(red)),
        area,
    );

    let button_y = area.bottom().saturating_sub(2);
    let button_x = area.right().saturating_sub(1 + label_width);
    dialog.set_button_area(Rect::new(button_x, button_y, label_width, 1));
    area
}
