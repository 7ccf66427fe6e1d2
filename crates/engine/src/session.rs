//! Client session and second-factor state.
//!
//! Both flags live in a small key/value store so that they survive a
//! restart of the client, the same way a browser keeps them in local
//! storage:
//!
//! - `auth_session` = `active` while a client is signed in,
//! - `trustbank_2fa` = `true` once an authenticator app is provisioned.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{EngineError, Passcode, ProvisioningSecret, ResultEngine, Scheduler, Verifier};

pub const SESSION_KEY: &str = "auth_session";
pub const SESSION_ACTIVE: &str = "active";
pub const TWO_FACTOR_KEY: &str = "trustbank_2fa";
pub const TWO_FACTOR_ENABLED: &str = "true";

const FIXED_USERNAME: &str = "admin";
const FIXED_PASSWORD: &str = "1234";

pub trait KeyValueStore: Debug + Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()>;
    fn remove(&mut self, key: &str) -> ResultEngine<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ResultEngine<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> ResultEngine<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Which credentials the sign-in form accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginPolicy {
    /// Any input signs the client in.
    #[default]
    AcceptAny,
    /// Only the built-in `admin` / `1234` pair.
    Fixed,
}

impl LoginPolicy {
    fn accepts(self, credentials: &Credentials) -> bool {
        match self {
            Self::AcceptAny => true,
            Self::Fixed => {
                credentials.username == FIXED_USERNAME && credentials.password == FIXED_PASSWORD
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignInStep {
    Authenticated,
    /// Credentials were fine; an authenticator code is still required.
    SecondFactorRequired,
}

#[derive(Debug)]
pub struct SessionGate {
    store: Box<dyn KeyValueStore>,
    policy: LoginPolicy,
    second_factor: bool,
    pending_second_factor: bool,
}

impl SessionGate {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            policy: LoginPolicy::default(),
            second_factor: true,
            pending_second_factor: false,
        }
    }

    pub fn with_policy(mut self, policy: LoginPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether sign-in asks for an authenticator code when 2FA is on.
    pub fn with_second_factor(mut self, enabled: bool) -> Self {
        self.second_factor = enabled;
        self
    }

    pub fn policy(&self) -> LoginPolicy {
        self.policy
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(SESSION_KEY).as_deref() == Some(SESSION_ACTIVE)
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.store.get(TWO_FACTOR_KEY).as_deref() == Some(TWO_FACTOR_ENABLED)
    }

    pub fn awaiting_second_factor(&self) -> bool {
        self.pending_second_factor
    }

    pub fn sign_in(&mut self, credentials: &Credentials) -> ResultEngine<SignInStep> {
        if !self.policy.accepts(credentials) {
            tracing::info!(username = %credentials.username, "sign-in rejected");
            return Err(EngineError::InvalidCredentials);
        }
        if self.second_factor && self.two_factor_enabled() {
            self.pending_second_factor = true;
            tracing::debug!("sign-in waiting for second factor");
            return Ok(SignInStep::SecondFactorRequired);
        }
        self.persist_session()?;
        Ok(SignInStep::Authenticated)
    }

    pub fn complete_second_factor(
        &mut self,
        passcode: &Passcode,
        verifier: &dyn Verifier,
    ) -> ResultEngine<()> {
        if !self.pending_second_factor {
            return Err(EngineError::InvalidState(
                "no sign-in is waiting for a second factor".to_string(),
            ));
        }
        if !passcode.is_complete() {
            return Err(EngineError::IncompletePasscode);
        }
        if !verifier.passcode(passcode) {
            return Err(EngineError::InvalidCredentials);
        }
        self.pending_second_factor = false;
        self.persist_session()
    }

    /// Signs in after a successful biometric scan.
    pub fn sign_in_verified(&mut self) -> ResultEngine<()> {
        self.pending_second_factor = false;
        self.persist_session()
    }

    /// Abandons a sign-in that is waiting for its second factor.
    pub fn cancel_second_factor(&mut self) {
        self.pending_second_factor = false;
    }

    pub fn sign_out(&mut self) -> ResultEngine<()> {
        self.pending_second_factor = false;
        self.store.remove(SESSION_KEY)?;
        tracing::info!("session closed");
        Ok(())
    }

    /// Turns on 2FA once the client proved possession of `secret`.
    pub fn provision_two_factor(
        &mut self,
        secret: &ProvisioningSecret,
        passcode: &Passcode,
        verifier: &dyn Verifier,
    ) -> ResultEngine<()> {
        if !passcode.is_complete() {
            return Err(EngineError::IncompletePasscode);
        }
        if !verifier.passcode(passcode) {
            return Err(EngineError::InvalidCredentials);
        }
        self.store.set(TWO_FACTOR_KEY, TWO_FACTOR_ENABLED)?;
        tracing::info!(secret = %secret.grouped(), "two-factor authentication enabled");
        Ok(())
    }

    pub fn disable_two_factor(&mut self) -> ResultEngine<()> {
        self.store.remove(TWO_FACTOR_KEY)?;
        tracing::info!("two-factor authentication disabled");
        Ok(())
    }

    fn persist_session(&mut self) -> ResultEngine<()> {
        self.store.set(SESSION_KEY, SESSION_ACTIVE)?;
        tracing::info!("session opened");
        Ok(())
    }
}

const BIOMETRIC_SCAN: Duration = Duration::from_millis(2000);
const BIOMETRIC_REDIRECT: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiometricPhase {
    Idle,
    Scanning,
    Verified,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignInTimerKind {
    ScanFinished,
    Redirect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignInTimer {
    pub attempt: u64,
    pub kind: SignInTimerKind,
}

/// Face-scan sign-in offered next to the credentials form.
#[derive(Debug)]
pub struct BiometricSignIn {
    phase: BiometricPhase,
    attempt: u64,
}

impl Default for BiometricSignIn {
    fn default() -> Self {
        Self {
            phase: BiometricPhase::Idle,
            attempt: 0,
        }
    }
}

impl BiometricSignIn {
    pub fn phase(&self) -> BiometricPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, BiometricPhase::Scanning | BiometricPhase::Verified)
    }

    pub fn start(&mut self, scheduler: &mut dyn Scheduler<SignInTimer>) {
        if self.is_active() {
            return;
        }
        self.attempt += 1;
        self.phase = BiometricPhase::Scanning;
        scheduler.schedule(
            BIOMETRIC_SCAN,
            SignInTimer {
                attempt: self.attempt,
                kind: SignInTimerKind::ScanFinished,
            },
        );
    }

    /// Returns `true` once the gate has been signed in.
    pub fn on_timer(
        &mut self,
        timer: SignInTimer,
        verifier: &dyn Verifier,
        gate: &mut SessionGate,
        scheduler: &mut dyn Scheduler<SignInTimer>,
    ) -> ResultEngine<bool> {
        if timer.attempt != self.attempt {
            return Ok(false);
        }
        match (timer.kind, self.phase) {
            (SignInTimerKind::ScanFinished, BiometricPhase::Scanning) => {
                if verifier.biometric() {
                    self.phase = BiometricPhase::Verified;
                    scheduler.schedule(
                        BIOMETRIC_REDIRECT,
                        SignInTimer {
                            attempt: self.attempt,
                            kind: SignInTimerKind::Redirect,
                        },
                    );
                } else {
                    self.phase = BiometricPhase::Rejected;
                }
                Ok(false)
            }
            (SignInTimerKind::Redirect, BiometricPhase::Verified) => {
                gate.sign_in_verified()?;
                self.phase = BiometricPhase::Idle;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualScheduler, SimulatedVerifier};

    fn gate() -> SessionGate {
        SessionGate::new(Box::new(MemoryStore::default()))
    }

    fn code(digits: &str) -> Passcode {
        let mut code = Passcode::new();
        code.paste(digits);
        code
    }

    #[test]
    fn accept_any_signs_in_and_out() {
        let mut gate = gate();
        assert!(!gate.is_authenticated());
        assert_eq!(
            gate.sign_in(&Credentials::default()).unwrap(),
            SignInStep::Authenticated
        );
        assert!(gate.is_authenticated());
        gate.sign_out().unwrap();
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn fixed_policy_checks_the_pair() {
        let mut gate = gate().with_policy(LoginPolicy::Fixed);
        assert_eq!(
            gate.sign_in(&Credentials::new("admin", "0000")).unwrap_err(),
            EngineError::InvalidCredentials
        );
        assert!(!gate.is_authenticated());
        gate.sign_in(&Credentials::new("admin", "1234")).unwrap();
        assert!(gate.is_authenticated());
    }

    #[test]
    fn second_factor_is_required_once_provisioned() {
        let verifier = SimulatedVerifier;
        let mut gate = gate();
        gate.provision_two_factor(&ProvisioningSecret::default(), &code("123456"), &verifier)
            .unwrap();
        assert!(gate.two_factor_enabled());

        assert_eq!(
            gate.sign_in(&Credentials::default()).unwrap(),
            SignInStep::SecondFactorRequired
        );
        assert!(!gate.is_authenticated());
        assert_eq!(
            gate.complete_second_factor(&code("123"), &verifier).unwrap_err(),
            EngineError::IncompletePasscode
        );
        gate.complete_second_factor(&code("123456"), &verifier).unwrap();
        assert!(gate.is_authenticated());

        gate.disable_two_factor().unwrap();
        assert!(!gate.two_factor_enabled());
    }

    #[test]
    fn second_factor_can_be_switched_off() {
        let mut store = MemoryStore::default();
        store.set(TWO_FACTOR_KEY, TWO_FACTOR_ENABLED).unwrap();
        let mut gate = SessionGate::new(Box::new(store)).with_second_factor(false);
        assert_eq!(
            gate.sign_in(&Credentials::default()).unwrap(),
            SignInStep::Authenticated
        );
    }

    #[test]
    fn complete_second_factor_without_pending_sign_in_fails() {
        let mut gate = gate();
        assert!(matches!(
            gate.complete_second_factor(&code("123456"), &SimulatedVerifier),
            Err(EngineError::InvalidState(_))
        ));
    }

    #[test]
    fn biometric_sign_in_waits_for_scan_and_redirect() {
        let verifier = SimulatedVerifier;
        let mut gate = gate();
        let mut scheduler: ManualScheduler<SignInTimer> = ManualScheduler::default();
        let mut biometric = BiometricSignIn::default();

        biometric.start(&mut scheduler);
        assert_eq!(biometric.phase(), BiometricPhase::Scanning);

        assert_eq!(scheduler.advance(Duration::from_millis(1999), |_, _| {}), 0);
        let timer = scheduler.pop_next().unwrap();
        assert_eq!(scheduler.elapsed(), Duration::from_millis(2000));
        assert!(!biometric.on_timer(timer, &verifier, &mut gate, &mut scheduler).unwrap());
        assert_eq!(biometric.phase(), BiometricPhase::Verified);
        assert!(!gate.is_authenticated());

        let timer = scheduler.pop_next().unwrap();
        assert_eq!(scheduler.elapsed(), Duration::from_millis(3000));
        assert!(biometric.on_timer(timer, &verifier, &mut gate, &mut scheduler).unwrap());
        assert!(gate.is_authenticated());
    }
}
