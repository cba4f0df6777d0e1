use ratatui::{
  layout::Alignment,
  style::{ Style, Stylize },
  text::Text,
  widgets::{ Paragraph, Wrap },
  Frame,
};

use crate::widget::layout::vertically_centered;

/// Shown while the first schedule download is running
pub fn draw(frame: &mut Frame, room_label: &str, status: &str) {
  let rows = vertically_centered(frame.area(), &[1, 1, 2]);

  let title = Paragraph::new(Text::from(heading(room_label)).bold())
    .alignment(Alignment::Center);
  frame.render_widget(title, rows[0]);

  let body = Paragraph::new(status)
    .style(Style::new().dark_gray())
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
  frame.render_widget(body, rows[2]);
}

pub fn heading(room_label: &str) -> String {
  if crate::room::is_bof(room_label) {
    room_label.to_string()
  } else {
    format!("ROOM {}", room_label)
  }
}
