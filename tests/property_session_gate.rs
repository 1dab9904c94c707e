//! Property Test: Session gate form validation
//!
//! This property test verifies that:
//! - Login succeeds for any pair of non-empty fields and fails if either is empty
//! - Registration reports missing fields before mismatched passwords
//! - Registration succeeds exactly when all fields are present and the passwords match

use planthabitat::test_utils::generators;
use planthabitat::{validate_login, validate_registration, Navigator, Screen, SessionError};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: non-empty credentials always open the dashboard
    #[test]
    fn prop_login_accepts_non_empty(
        username in generators::non_empty_field(),
        password in generators::non_empty_field(),
    ) {
        let mut nav = Navigator::new();
        prop_assert!(nav.submit_login(&username, &password).is_ok());
        prop_assert_eq!(nav.current(), Screen::Dashboard);
    }

    /// Property: an empty field never gets past the login form
    #[test]
    fn prop_login_rejects_empty_field(field in generators::non_empty_field()) {
        prop_assert_eq!(validate_login("", &field), Err(SessionError::MissingCredentials));
        prop_assert_eq!(validate_login(&field, ""), Err(SessionError::MissingCredentials));
    }

    /// Property: mismatched confirmation is rejected
    #[test]
    fn prop_registration_rejects_mismatch(
        username in generators::non_empty_field(),
        (password, confirm) in generators::mismatched_passwords(),
    ) {
        prop_assert_eq!(
            validate_registration(&username, &password, &confirm),
            Err(SessionError::PasswordMismatch)
        );
    }

    /// Property: a missing field is reported even when passwords also differ
    #[test]
    fn prop_registration_missing_field_wins(
        (password, confirm) in generators::mismatched_passwords(),
    ) {
        prop_assert_eq!(
            validate_registration("", &password, &confirm),
            Err(SessionError::IncompleteRegistration)
        );
    }

    /// Property: matching passwords register and return to Login
    #[test]
    fn prop_registration_accepts_match(
        username in generators::non_empty_field(),
        password in generators::non_empty_field(),
    ) {
        let mut nav = Navigator::new();
        nav.navigate(Screen::Register);
        let alert = nav.submit_registration(&username, &password, &password);
        prop_assert!(alert.is_ok());
        prop_assert_eq!(nav.current(), Screen::Login);
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;

    #[test]
    fn test_specific_login_cases() {
        assert_eq!(
            validate_login("", "x"),
            Err(SessionError::MissingCredentials)
        );
        assert!(validate_login("u", "p").is_ok());
    }

    #[test]
    fn test_specific_registration_cases() {
        assert_eq!(
            validate_registration("u", "p", "q"),
            Err(SessionError::PasswordMismatch)
        );
        assert!(validate_registration("u", "p", "p").is_ok());
    }
}
