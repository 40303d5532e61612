//! Local demo authentication.
//!
//! This is a placeholder, not real auth: there is no credential store and no
//! server round trip. Any email/password passing the shape checks signs in,
//! and the "network" is a fixed simulated delay. Do not quietly upgrade this
//! module; replacing it with real authentication is a product decision.

pub mod commands;
mod store;

pub use store::{SessionRecord, SessionStore};

use std::time::Duration;

use chrono::Utc;
use log::info;

use crate::errors::ValidationError;
use crate::report::ReportStore;

/// Simulated round-trip latency applied to successful sign-in/sign-up.
const AUTH_LATENCY: Duration = Duration::from_secs(1);

/// Minimal `local@domain.tld` shape check; intentionally no more than that.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

fn validate_sign_up(
    email: &str,
    password: &str,
    confirm_password: &str,
    name: &str,
) -> Result<(), ValidationError> {
    validate_credentials(email, password)?;
    if name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Validate, wait out the simulated latency, persist and return the session.
/// No state is written on a validation failure.
pub async fn sign_in(
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<SessionRecord, ValidationError> {
    validate_credentials(email, password)?;

    tokio::time::sleep(AUTH_LATENCY).await;

    let local_part = email.split('@').next().unwrap_or(email);
    let record = SessionRecord {
        email: email.to_string(),
        display_name: local_part.to_string(),
        established_at: Utc::now(),
    };
    store.persist(record.clone());
    info!("Signed in as {}", record.email);
    Ok(record)
}

pub async fn sign_up(
    store: &SessionStore,
    email: &str,
    password: &str,
    confirm_password: &str,
    name: &str,
) -> Result<SessionRecord, ValidationError> {
    validate_sign_up(email, password, confirm_password, name)?;

    tokio::time::sleep(AUTH_LATENCY).await;

    let record = SessionRecord {
        email: email.to_string(),
        display_name: name.to_string(),
        established_at: Utc::now(),
    };
    store.persist(record.clone());
    info!("Signed up {}", record.email);
    Ok(record)
}

/// Clear the persisted session and all report/history state. Everything the
/// session owned goes with it.
pub async fn logout(store: &SessionStore, report: &ReportStore) {
    store.clear();
    report.clear().await;
    info!("Logged out");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Utc;
    use serde_json::Map;

    use super::*;
    use crate::report::UploadedSummary;

    fn scratch_store() -> (SessionStore, PathBuf) {
        let path =
            std::env::temp_dir().join(format!("chemviz-auth-{}.json", uuid::Uuid::new_v4()));
        (SessionStore::new(path.clone()), path)
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@sub.example.co"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@exam ple.com"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn validation_rules_fire_in_order() {
        assert_eq!(
            validate_credentials("", ""),
            Err(ValidationError::MissingCredentials)
        );
        // A malformed email is reported before the short password.
        assert_eq!(
            validate_credentials("nope", "abc"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_credentials("user@example.com", "abc"),
            Err(ValidationError::PasswordTooShort)
        );
        // Sign-up: password length is checked before the name.
        assert_eq!(
            validate_sign_up("user@example.com", "abc", "abc", ""),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_sign_up("user@example.com", "secret1", "secret1", ""),
            Err(ValidationError::MissingName)
        );
        assert_eq!(
            validate_sign_up("user@example.com", "secret1", "secret2", "Avery"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_sign_up("user@example.com", "secret1", "secret1", "Avery"),
            Ok(())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sign_in_derives_display_name_from_local_part() {
        let (store, path) = scratch_store();
        let record = sign_in(&store, "avery.lee@plant.example", "secret1")
            .await
            .unwrap();
        assert_eq!(record.display_name, "avery.lee");
        assert_eq!(store.current().unwrap().email, "avery.lee@plant.example");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_up_uses_the_supplied_name() {
        let (store, path) = scratch_store();
        let record = sign_up(&store, "avery@plant.example", "secret1", "secret1", "Avery Lee")
            .await
            .unwrap();
        assert_eq!(record.display_name, "Avery Lee");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_validation_writes_no_state() {
        let (store, path) = scratch_store();
        let result = sign_in(&store, "user@example.com", "abc").await;
        assert_eq!(result.unwrap_err(), ValidationError::PasswordTooShort);
        assert!(store.current().is_none());
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_session_report_and_history() {
        let (store, path) = scratch_store();
        sign_in(&store, "user@example.com", "secret1").await.unwrap();

        let report = ReportStore::new();
        report
            .install_summary(UploadedSummary {
                total_items: 4,
                avg_flowrate: 1.0,
                avg_pressure: 2.0,
                avg_temperature: 3.0,
                type_distribution: Map::new(),
                rows: None,
                source_filename: "plant.csv".to_string(),
                received_at: Utc::now(),
            })
            .await;

        logout(&store, &report).await;

        assert!(store.current().is_none());
        assert!(report.current_summary().await.is_none());
        assert!(report.history().await.is_empty());

        // A fresh store on the same path restores nothing.
        let restored = SessionStore::new(path);
        assert!(restored.current().is_none());
    }
}
