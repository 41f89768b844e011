//! Solution loading and write-back tests

pub mod tests_disk_round_trip;
