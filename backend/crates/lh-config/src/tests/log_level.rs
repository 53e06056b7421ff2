use crate::LogLevel;
use crate::tests::{setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::eq;
use log::LevelFilter;
use serial_test::serial;

#[test]
fn given_known_names_in_any_case_when_parsed_then_matching_level() {
    assert_that!(*LogLevel::parse_lenient("WARN"), eq(LevelFilter::Warn));
    assert_that!(*LogLevel::parse_lenient("trace"), eq(LevelFilter::Trace));
    assert_that!(*LogLevel::parse_lenient(" off "), eq(LevelFilter::Off));
}

#[test]
fn given_unknown_name_when_parsed_then_info() {
    let level: LogLevel = "verbose".parse().unwrap();

    assert_that!(LevelFilter::from(level), eq(LevelFilter::Info));
}

#[test]
#[serial]
fn given_non_string_level_in_toml_when_load_then_info() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[logging]\nlevel = 3\n");

    // When
    let config = crate::Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(LevelFilter::Info));
}
