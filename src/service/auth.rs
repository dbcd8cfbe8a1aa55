use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use log::{info, warn};

use super::crypto;
use crate::{db::UserStore, dto::LoginUserRequest, errors::BoothError};

/// Past this many tracked usernames, stale entries are swept on the next attempt.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Attempts {
    failures: u32,
    in_flight: u32,
    first_failure: Instant,
    locked_until: Option<Instant>,
}

impl Attempts {
    fn new(now: Instant) -> Self {
        Self {
            failures: 0,
            in_flight: 0,
            first_failure: now,
            locked_until: None,
        }
    }

    /// Forgets failures whose window or lock has run out.
    fn expire(&mut self, now: Instant, lockout: Duration) {
        let stale = match self.locked_until {
            Some(until) => until <= now,
            None => now.duration_since(self.first_failure) >= lockout,
        };
        if stale {
            self.failures = 0;
            self.locked_until = None;
        }
    }

    fn is_idle(&self) -> bool {
        self.failures == 0 && self.in_flight == 0 && self.locked_until.is_none()
    }
}

enum Outcome {
    Failed,
    Succeeded,
    Abandoned,
}

/// Per-username lockout after repeated failed logins.
///
/// An attempt is reserved with [`LoginThrottle::try_begin`] before the
/// password is checked, so concurrent guesses count against the limit
/// while they are still in flight.
#[derive(Clone)]
pub struct LoginThrottle {
    attempts: Arc<Mutex<HashMap<String, Attempts>>>,
    max_failures: u32,
    lockout: Duration,
}

impl LoginThrottle {
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_failures,
            lockout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Attempts>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserves one attempt for `username`, or `Err(TooManyAttempts)` while it
    /// is locked or enough attempts are already failed or pending.
    pub fn try_begin(&self, username: &str) -> Result<LoginAttempt, BoothError> {
        let now = Instant::now();
        let mut attempts = self.lock();
        if attempts.len() >= SWEEP_THRESHOLD {
            attempts.retain(|_, a| {
                a.expire(now, self.lockout);
                !a.is_idle()
            });
        }
        let entry = attempts
            .entry(username.to_string())
            .or_insert_with(|| Attempts::new(now));
        entry.expire(now, self.lockout);
        if entry.locked_until.is_some() || entry.failures + entry.in_flight >= self.max_failures {
            if entry.is_idle() {
                attempts.remove(username);
            }
            return Err(BoothError::TooManyAttempts);
        }
        entry.in_flight += 1;
        Ok(LoginAttempt {
            throttle: self.clone(),
            username: username.to_string(),
            settled: false,
        })
    }

    fn settle(&self, username: &str, outcome: Outcome) {
        let now = Instant::now();
        let mut attempts = self.lock();
        let Some(entry) = attempts.get_mut(username) else {
            return;
        };
        entry.in_flight = entry.in_flight.saturating_sub(1);
        match outcome {
            Outcome::Failed => {
                if entry.failures == 0 {
                    entry.first_failure = now;
                }
                entry.failures += 1;
                if entry.failures >= self.max_failures && entry.locked_until.is_none() {
                    entry.locked_until = Some(now + self.lockout);
                    warn!("login locked for '{}' after {} failures", username, entry.failures);
                }
            }
            Outcome::Succeeded => {
                entry.failures = 0;
                entry.locked_until = None;
            }
            Outcome::Abandoned => {}
        }
        if entry.is_idle() {
            attempts.remove(username);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.lock().len()
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }
}

/// A reserved login attempt. Dropping it unsettled releases the reservation
/// without counting a failure.
pub struct LoginAttempt {
    throttle: LoginThrottle,
    username: String,
    settled: bool,
}

impl LoginAttempt {
    pub fn fail(mut self) {
        self.settled = true;
        self.throttle.settle(&self.username, Outcome::Failed);
    }

    pub fn succeed(mut self) {
        self.settled = true;
        self.throttle.settle(&self.username, Outcome::Succeeded);
    }
}

impl Drop for LoginAttempt {
    fn drop(&mut self) {
        if !self.settled {
            self.throttle.settle(&self.username, Outcome::Abandoned);
        }
    }
}

/// Verifies credentials against the stored salted hash.
///
/// Unknown usernames are not tracked; only wrong passwords count towards
/// the lockout.
pub async fn login(
    users: &dyn UserStore,
    throttle: &LoginThrottle,
    req: LoginUserRequest,
) -> Result<(), BoothError> {
    let LoginUserRequest { username, password } = req;
    let attempt = throttle.try_begin(&username)?;
    let Some(user) = users.get_by_username(&username).await? else {
        return Err(BoothError::UserNotFound);
    };
    if crypto::verify(password, user.pwd_hash).await? {
        attempt.succeed();
        info!("user '{}' logged in", username);
        Ok(())
    } else {
        attempt.fail();
        Err(BoothError::InvalidCredentials)
    }
}
