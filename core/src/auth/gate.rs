use crate::prelude::{TrackError, TrackResult};
use crate::telemetry::log::LogManager;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::env;
use std::fmt;

pub const DEFAULT_SESSION_TTL_HOURS: u32 = 3;

pub const USERNAME_VAR: &str = "ADMIN_USERNAME";
pub const PASSWORD_VAR: &str = "ADMIN_PASSWORD";

/// The configured admin credential pair. Either half may be missing, in which
/// case no login can succeed.
#[derive(Clone, Default)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn from_env() -> Self {
        Self {
            username: env::var(USERNAME_VAR).ok(),
            password: env::var(PASSWORD_VAR).ok(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        match (&self.username, &self.password) {
            (Some(expected_user), Some(expected_pass)) => {
                expected_user == username && expected_pass == password
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Login state held by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub authenticated: bool,
    pub login_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    LoggedOut,
    LoggedIn,
}

/// Username/password gate in front of the dashboard. Sessions expire lazily:
/// expiry is only noticed when [`SessionGate::check`] runs on the next request.
pub struct SessionGate {
    credentials: Credentials,
    ttl: Duration,
    logger: LogManager,
}

impl SessionGate {
    pub fn new(credentials: Credentials, ttl_hours: u32) -> Self {
        let logger = LogManager::new("gate");
        if !credentials.is_configured() {
            logger.warn(&format!(
                "{} / {} not set; every login attempt will be rejected",
                USERNAME_VAR, PASSWORD_VAR
            ));
        }
        Self {
            credentials,
            ttl: Duration::hours(i64::from(ttl_hours)),
            logger,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolves the session state at `now`, logging out an expired session.
    pub fn check(&self, session: &mut AuthSession, now: DateTime<Utc>) -> GateState {
        let active = match (session.authenticated, session.login_time) {
            (true, Some(login_time)) => now - login_time < self.ttl,
            _ => false,
        };
        if active {
            return GateState::LoggedIn;
        }
        if session.authenticated {
            self.logger.record("session expired");
        }
        *session = AuthSession::default();
        GateState::LoggedOut
    }

    /// Attempts a login. On failure the session is left untouched.
    pub fn submit(
        &self,
        session: &mut AuthSession,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> TrackResult<()> {
        if !self.credentials.matches(username, password) {
            self.logger
                .warn(&format!("rejected login attempt for {:?}", username));
            return Err(TrackError::InvalidCredentials);
        }
        session.authenticated = true;
        session.login_time = Some(now);
        self.logger.record(&format!("{} logged in", username));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn gate() -> SessionGate {
        SessionGate::new(Credentials::new("admin", "secret"), DEFAULT_SESSION_TTL_HOURS)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn wrong_password_leaves_session_logged_out() {
        let gate = gate();
        let mut session = AuthSession::default();
        let result = gate.submit(&mut session, "admin", "wrong", noon());
        assert!(matches!(result, Err(TrackError::InvalidCredentials)));
        assert!(!session.authenticated);
        assert_eq!(gate.check(&mut session, noon()), GateState::LoggedOut);

        gate.submit(&mut session, "admin", "secret", noon()).unwrap();
        assert_eq!(gate.check(&mut session, noon()), GateState::LoggedIn);
    }

    #[test]
    fn session_expires_after_ttl() {
        let gate = gate();
        let mut session = AuthSession::default();
        gate.submit(&mut session, "admin", "secret", noon()).unwrap();

        let still_valid = noon() + Duration::hours(2) + Duration::minutes(59);
        assert_eq!(gate.check(&mut session, still_valid), GateState::LoggedIn);

        let expired = noon() + Duration::hours(3) + Duration::minutes(1);
        assert_eq!(gate.check(&mut session, expired), GateState::LoggedOut);
        assert_eq!(session, AuthSession::default());
    }

    #[test]
    fn exactly_three_hours_is_expired() {
        let gate = gate();
        let mut session = AuthSession::default();
        gate.submit(&mut session, "admin", "secret", noon()).unwrap();
        assert_eq!(
            gate.check(&mut session, noon() + Duration::hours(3)),
            GateState::LoggedOut
        );
    }

    #[test]
    fn unconfigured_gate_rejects_everything() {
        let gate = SessionGate::new(Credentials::default(), DEFAULT_SESSION_TTL_HOURS);
        let mut session = AuthSession::default();
        assert!(gate.submit(&mut session, "", "", noon()).is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(!rendered.contains("secret"));
    }
}
