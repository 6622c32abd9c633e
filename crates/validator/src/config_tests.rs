use clap::Parser;

use super::*;

fn base_config() -> Config {
    Config::parse_from(["healthmonitor-validator"])
}

#[test]
fn defaults_parse_and_validate() {
    let config = base_config();
    assert!(config.validate().is_ok());
    assert_eq!(config.worker_count, 1);
    assert!(config.notify_created);
    assert!(!config.notify_continued);
}

#[test]
fn rejects_inverted_bounds() {
    let mut config = base_config();
    config.temp_low = 40.0;
    config.temp_high = 35.0;
    assert!(config.validate().is_err());
}

#[test]
fn rejects_zero_workers() {
    let mut config = base_config();
    config.worker_count = 0;
    assert!(config.validate().is_err());
}
