//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and the layout
//! helper that stacks one panel per root.
//!
//! Rendering reads the runtime state and writes back only layout facts (panel areas, popup
//! areas) that mouse handling needs.

use crate::app::CanopyRoot;
use crate::ui::widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

/// Renders the whole canopy UI for one frame.
pub fn render(frame: &mut Frame, root: &mut CanopyRoot) {
    let [container, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
        .areas(frame.area());

    let forest = &mut root.forest;
    let panel_areas = layout_panels(container, forest.panels().len(), forest.panel_ratios());
    forest.set_layout(container, &panel_areas);

    for (idx, area) in panel_areas.iter().enumerate() {
        widgets::draw_panel(frame, forest, idx, *area);
    }

    if let Some(menu) = forest.menu_mut() {
        widgets::draw_menu(frame, menu, container);
    }
    let full = frame.area();
    if let Some(modal) = forest.modal_mut() {
        widgets::draw_modal(frame, modal, full);
    }

    widgets::draw_footer(frame, root.status(), footer);
}

/// Splits `area` vertically into `count` panels sized by `ratios`.
///
/// Missing or zero ratios count as 1. The last panel takes whatever the rounding left over.
pub fn layout_panels(area: Rect, count: usize, ratios: &[u16]) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let weights: Vec<u32> = (0..count)
        .map(|i| ratios.get(i).copied().unwrap_or(1).max(1) as u32)
        .collect();
    let total: u32 = weights.iter().sum();

    let mut constraints = Vec::with_capacity(count);
    let mut sum_pct: u16 = 0;
    for (i, weight) in weights.iter().enumerate() {
        let pct = if i + 1 == count {
            100u16.saturating_sub(sum_pct)
        } else {
            let pct = ((*weight as f32 / total as f32) * 100.0).round() as u16;
            sum_pct += pct;
            pct
        };
        constraints.push(Constraint::Percentage(pct));
    }

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::Forest;
    use crate::config::Config;
    use crate::core::ExcludeFilter;

    use ratatui::{Terminal, backend::TestBackend};
    use std::error;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_layout_panels_ratios() {
        let area = Rect::new(0, 0, 80, 30);

        let chunks = layout_panels(area, 3, &[]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.iter().map(|c| c.height).sum::<u16>(), 30);
        assert!(chunks.windows(2).all(|w| w[0].bottom() == w[1].y));

        let chunks = layout_panels(area, 2, &[2, 1]);
        assert_eq!(chunks[0].height + chunks[1].height, 30);
        assert!((19..=21).contains(&chunks[0].height));

        assert!(layout_panels(area, 0, &[1]).is_empty());
    }

    #[test]
    fn test_render_records_layout_and_draws_rows() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let a = dir.path().join("alpha");
        let b = dir.path().join("beta");
        fs::create_dir_all(a.join("src"))?;
        fs::create_dir_all(&b)?;
        fs::write(b.join("notes.txt"), "")?;

        let forest = Forest::new(vec![a, b], ExcludeFilter::empty(), Default::default())?;
        let mut root = CanopyRoot::from_forest(forest, &Config::default());
        let mut terminal = Terminal::new(TestBackend::new(40, 12))?;

        terminal.draw(|f| render(f, &mut root))?;

        let areas: Vec<Rect> = root.forest.panels().iter().map(|p| p.area()).collect();
        assert_eq!(areas[0].y, 0);
        assert_eq!(areas[1].y, areas[0].bottom());
        assert_eq!(areas[0].height + areas[1].height, 11);
        let second = areas[1].y;
        assert_eq!(root.forest.panel_at(second + 1), Some((1, 1)));

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..40)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect::<String>()
        };
        assert!(row(0).contains("alpha"));
        assert!(row(1).contains("▸ src"));
        assert!(row(second).contains("beta"));
        assert!(row(second + 1).contains("notes.txt"));

        root.forest.activate(1, 0);
        root.update();
        terminal.draw(|f| render(f, &mut root))?;
        let buffer = terminal.backend().buffer();
        let footer: String = (0..40).map(|x| buffer[(x, 11)].symbol().to_string()).collect();
        assert!(footer.starts_with("open "));
        Ok(())
    }
}
