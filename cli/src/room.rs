/// Label shown for a room id: `room5` becomes `5`, `bof2` becomes `BOF2`
///
/// Other venues name their rooms differently; anything else is rejected.
pub fn room_label(room: &str) -> Option<String> {
  if let Some(number) = room.strip_prefix("room") {
    Some(number.to_string())
  } else if let Some(number) = room.strip_prefix("bof") {
    Some(format!("BOF{}", number))
  } else {
    None
  }
}

pub fn is_bof(label: &str) -> bool {
  label.starts_with("BOF")
}
