use chrono::NaiveDateTime;
use ratatui::{
  layout::{ Alignment, Constraint, Layout, Rect },
  style::{ Style, Stylize },
  text::{ Line, Span, Text },
  widgets::{ Block, Paragraph, Wrap },
  Frame,
};

use signage::{ PhotoCache, Presentation, Rotation, Schedule };

use crate::view::startup::heading;
use crate::widget::talk;

/// Everything one redraw needs, borrowed from the current snapshot
pub struct Screen<'a> {
  pub room_label: &'a str,
  pub now: NaiveDateTime,
  pub simulated: bool,
  pub schedule: &'a Schedule,
  pub rotation: Rotation<'a>,
  pub photos: &'a PhotoCache,
}

pub fn draw(frame: &mut Frame, screen: &Screen) {
  let [header_area, current_area, upcoming_area] = Layout::vertical([
      Constraint::Length(3),
      Constraint::Min(8),
      Constraint::Length(6),
    ])
    .areas(frame.area());

  draw_header(frame, header_area, screen);

  match screen.rotation.first {
    Some(first) => draw_current(frame, current_area, screen, first),
    None => {
      let done = Paragraph::new("No more presentations in this room.")
        .alignment(Alignment::Center)
        .block(Block::bordered());
      frame.render_widget(done, current_area);
    }
  }

  draw_upcoming(frame, upcoming_area, screen);
}

fn draw_header(frame: &mut Frame, area: Rect, screen: &Screen) {
  let block = Block::bordered();
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [room_area, clock_area] = Layout::horizontal([
      Constraint::Min(0),
      Constraint::Length(28),
    ])
    .areas(inner);

  frame.render_widget(Paragraph::new(heading(screen.room_label)).bold(), room_area);

  let mut clock = screen.now.format("%a %d %b %H:%M").to_string();
  if screen.simulated {
    clock.push_str(" (test)");
  }
  frame.render_widget(Paragraph::new(clock).alignment(Alignment::Right), clock_area);
}

fn draw_current(frame: &mut Frame, area: Rect, screen: &Screen, presentation: &Presentation) {
  let label = if presentation.start <= screen.now { " NOW " } else { " NEXT " };
  let block = Block::bordered().title(label.bold());
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let speakers = talk::speaker_lines(screen.schedule, presentation, screen.photos);
  let speaker_rows = u16::try_from(speakers.len()).unwrap_or(u16::MAX);
  let [details_area, speakers_area] = Layout::vertical([
      Constraint::Min(0),
      Constraint::Length(speaker_rows),
    ])
    .areas(inner);

  let mut lines = vec![
    Line::from(presentation.title.to_uppercase()).bold(),
    Line::from(talk::time_range_with_length(presentation)),
  ];
  if let Some(category) = talk::category(presentation) {
    lines.push(Line::from(category).italic());
  }
  if let Some(summary) = presentation.summary.as_deref() {
    lines.push(Line::default());
    lines.push(Line::from(summary));
  }
  let bios = talk::speaker_bios(screen.schedule, presentation);
  if !bios.is_empty() {
    lines.push(Line::default());
    lines.extend(bios.into_iter().map(|bio| Line::styled(bio, Style::new().dark_gray())));
  }

  let details = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
  frame.render_widget(details, details_area);
  frame.render_widget(Paragraph::new(Text::from(speakers)), speakers_area);
}

fn draw_upcoming(frame: &mut Frame, area: Rect, screen: &Screen) {
  let block = Block::bordered().title(" COMING UP ");

  let lines: Vec<Line> = [screen.rotation.second, screen.rotation.third]
    .into_iter()
    .flatten()
    .flat_map(|presentation| {
      [
        Line::from(vec![
          Span::from(talk::time_range(presentation)).bold(),
          Span::from("  "),
          Span::from(presentation.title.as_str()),
        ]),
        Line::styled(
          format!("               {}", talk::speaker_names(screen.schedule, presentation)),
          Style::new().dark_gray(),
        ),
      ]
    })
    .collect();

  let upcoming = if lines.is_empty() {
    Paragraph::new("Nothing else scheduled.")
  } else {
    Paragraph::new(Text::from(lines))
  };
  frame.render_widget(upcoming.block(block), area);
}
