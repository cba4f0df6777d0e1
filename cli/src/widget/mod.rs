pub mod layout;
pub mod talk;
