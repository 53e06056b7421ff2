use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::User.as_str(), "user");
    assert_eq!(Role::Supervisor.as_str(), "supervisor");
    assert_eq!(Role::Admin.as_str(), "admin");
}

#[test]
fn test_role_from_str_is_case_insensitive() {
    assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
    assert_eq!(Role::from_str("Supervisor").unwrap(), Role::Supervisor);
    assert_eq!(Role::from_str("USER").unwrap(), Role::User);
    assert!(Role::from_str("root").is_err());
}

#[test]
fn test_role_hierarchy() {
    assert!(Role::Admin.satisfies(Role::Admin));
    assert!(Role::Admin.satisfies(Role::Supervisor));
    assert!(Role::Admin.satisfies(Role::User));
    assert!(Role::Supervisor.satisfies(Role::User));
    assert!(!Role::Supervisor.satisfies(Role::Admin));
    assert!(!Role::User.satisfies(Role::Supervisor));
}
