use crate::{CliError, Cli, Commands, parse_value};

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use googletest::prelude::*;
use lh_auth::{IdentityResolver, ResolveOptions};
use lh_config::ConfigError;
use lh_core::SystemClock;
use serde_json::json;

#[test]
fn given_set_with_global_flags_when_parsed_then_fields_populated() {
    let cli = Cli::try_parse_from([
        "lh",
        "set",
        "fontSize",
        "large",
        "--pretty",
        "--config-dir",
        "/tmp/lh",
    ])
    .unwrap();

    assert_that!(
        cli.command,
        eq(&Commands::Set {
            key: "fontSize".to_string(),
            value: "large".to_string(),
        })
    );
    assert_that!(cli.pretty, eq(true));
    assert_that!(cli.config_dir, some(eq(&PathBuf::from("/tmp/lh"))));
}

#[test]
fn given_resolve_with_required_role_when_parsed_then_role_captured() {
    let cli = Cli::try_parse_from(["lh", "resolve", "u-1:jane:user", "--require-role", "admin"])
        .unwrap();

    assert_that!(
        cli.command,
        eq(&Commands::Resolve {
            credential: "u-1:jane:user".to_string(),
            require_role: Some("admin".to_string()),
        })
    );
}

#[test]
fn given_missing_subcommand_when_parsed_then_error() {
    assert!(Cli::try_parse_from(["lh"]).is_err());
}

#[test]
fn given_json_literals_when_parsed_then_typed_values() {
    assert_that!(parse_value("42"), eq(&json!(42)));
    assert_that!(parse_value("false"), eq(&json!(false)));
    assert_that!(parse_value(r#"{"a":1}"#), eq(&json!({ "a": 1 })));
    assert_that!(parse_value(r#""quoted""#), eq(&json!("quoted")));
}

#[test]
fn given_bare_word_when_parsed_then_string() {
    assert_that!(parse_value("large"), eq(&json!("large")));
    assert_that!(parse_value("en-GB"), eq(&json!("en-GB")));
}

#[test]
fn given_auth_error_when_exit_code_then_two() {
    let resolver = IdentityResolver::new(Arc::new(SystemClock));
    let source = resolver.resolve(None, &ResolveOptions::default()).unwrap_err();

    let error = CliError::from(source);

    assert_that!(error.exit_code(), eq(2));
    assert_that!(error.to_string(), contains_substring("MISSING_CREDENTIAL"));
}

#[test]
fn given_config_error_when_exit_code_then_one() {
    let error = CliError::from(ConfigError::config("broken"));

    assert_that!(error.exit_code(), eq(1));
}
