use crate::ServerConfig;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, ok, some};

fn with_port(port: u32) -> ServerConfig {
    ServerConfig {
        port,
        ..ServerConfig::default()
    }
}

// =========================================================================
// Validation Tests - Server
// =========================================================================

#[test]
fn given_port_zero_when_validate_then_error() {
    assert_that!(with_port(0).validate(), err(anything()));
    assert_that!(with_port(0).bind_port(), none());
}

#[test]
fn given_port_above_65535_when_validate_then_error() {
    assert_that!(with_port(70_000).validate(), err(anything()));
    assert_that!(with_port(65_536).bind_port(), none());
}

#[test]
fn given_port_bounds_when_validate_then_ok() {
    assert_that!(with_port(1).validate(), ok(anything()));
    assert_that!(with_port(65_535).validate(), ok(anything()));
    assert_that!(with_port(65_535).bind_port(), some(eq(65_535)));
}

#[test]
fn given_port_error_when_displayed_then_mentions_range_and_value() {
    let message = with_port(70_000).validate().unwrap_err().to_string();

    assert!(message.contains("1-65535"), "{message}");
    assert!(message.contains("70000"), "{message}");
}
