pub mod records;
pub mod uploads;
