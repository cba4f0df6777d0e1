use ratatui::layout::{ Constraint, Layout, Rect };

/// Place a fixed-height stack of rows in the vertical middle of `area`
pub fn vertically_centered(area: Rect, rows: &[u16]) -> Vec<Rect> {
  let height: u16 = rows.iter().sum();
  let padding = area.height.saturating_sub(height) / 2;

  let outer = Layout::vertical([
      Constraint::Length(padding),
      Constraint::Length(height),
      Constraint::Min(0),
    ])
    .split(area);

  Layout::vertical(rows.iter().map(|row| Constraint::Length(*row)))
    .split(outer[1])
    .to_vec()
}
