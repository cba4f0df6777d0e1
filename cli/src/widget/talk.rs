use ratatui::{
  style::{ Style, Stylize },
  text::{ Line, Span },
};

use signage::{ PhotoCache, Presentation, Schedule };

pub fn time_range(presentation: &Presentation) -> String {
  format!(
    "{} - {}",
    presentation.start.format("%H:%M"),
    presentation.end.format("%H:%M"),
  )
}

pub fn time_range_with_length(presentation: &Presentation) -> String {
  format!("{}  ({} min)", time_range(presentation), presentation.duration_minutes())
}

/// "Track / type" when either is known
pub fn category(presentation: &Presentation) -> Option<String> {
  let parts: Vec<&str> = [presentation.track.as_deref(), presentation.talk_type.as_deref()]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

  if parts.is_empty() {
    None
  } else {
    Some(parts.join(" / "))
  }
}

pub fn speaker_names(schedule: &Schedule, presentation: &Presentation) -> String {
  schedule
    .speakers_for(presentation)
    .iter()
    .map(|speaker| speaker.name.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

/// "Name: bio" for every speaker who has a bio
pub fn speaker_bios(schedule: &Schedule, presentation: &Presentation) -> Vec<String> {
  schedule
    .speakers_for(presentation)
    .into_iter()
    .filter_map(|speaker| {
      speaker
        .bio
        .as_deref()
        .filter(|bio| !bio.trim().is_empty())
        .map(|bio| format!("{}: {}", speaker.name, bio.trim()))
    })
    .collect()
}

/// One line per speaker, marked when their photo is on disk
pub fn speaker_lines<'a>(
  schedule: &'a Schedule,
  presentation: &Presentation,
  photos: &PhotoCache,
) -> Vec<Line<'a>> {
  schedule
    .speakers_for(presentation)
    .into_iter()
    .map(|speaker| {
      let marker = if photos.cached_path(&speaker.id).is_some() {
        Span::styled("[photo] ", Style::new().green())
      } else {
        Span::styled("[  -  ] ", Style::new().dark_gray())
      };

      let mut spans = vec![marker, Span::from(speaker.name.as_str()).bold()];
      if let Some(company) = speaker.company.as_deref().filter(|c| !c.is_empty()) {
        spans.push(Span::from(format!("  {}", company)).italic());
      }
      Line::from(spans)
    })
    .collect()
}
