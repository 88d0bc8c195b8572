pub mod driver;
pub mod garage;
pub mod job;
