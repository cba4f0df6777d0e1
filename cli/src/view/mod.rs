pub mod schedule;
pub mod startup;
