use log::LevelFilter;
use tccprofile::{init_logging, log_level_override};

#[test]
fn verbose_wins_over_quiet() {
    assert_eq!(log_level_override(true, false), Some(LevelFilter::Debug));
    assert_eq!(log_level_override(true, true), Some(LevelFilter::Debug));
    assert_eq!(log_level_override(false, true), Some(LevelFilter::Error));
}

#[test]
fn no_flags_defers_to_environment() {
    assert_eq!(log_level_override(false, false), None);
}

#[test]
fn logging_can_be_initialized_twice() {
    init_logging(false, true);
    init_logging(true, false);
}
