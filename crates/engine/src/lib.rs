//! Core of the TrustBank client.
//!
//! The crate holds everything that is not presentation: the account and
//! transaction model, the [`Ledger`] that owns them, the funds-transfer
//! wizard, the session gate and the link-account flow. Simulated delays are
//! expressed as events handed to a [`Scheduler`], so every flow can be
//! driven step by step in tests.
//!
//! ```rust
//! use engine::{Ledger, Money};
//!
//! let ledger = Ledger::seeded();
//! assert_eq!(ledger.account("acc_1").unwrap().balance, Money::dollars(8_500_000));
//! ```

pub use accounts::{Account, AccountKind, LinkedAccount, LinkedAccountKind};
pub use error::EngineError;
pub use ledger::{Ledger, TRANSFER_MERCHANT, TransferPosting};
pub use link::{INSTITUTIONS, LinkAccountWizard, LinkStep, LinkTimer};
pub use money::Money;
pub use otp::{PASSCODE_LEN, Passcode, ProvisioningSecret};
pub use scheduler::{ManualScheduler, Scheduler, date_label};
pub use seed::{UserProfile, current_user};
pub use session::{
    BiometricPhase, BiometricSignIn, Credentials, FileStore, KeyValueStore, LoginPolicy,
    MemoryStore, SessionGate, SignInStep, SignInTimer, SignInTimerKind,
};
pub use transactions::{AmountOrder, Direction, DirectionFilter, Transaction, TransactionQuery};
pub use verify::{SimulatedVerifier, Verifier};
pub use wizard::{
    AchSpeed, FormError, PasscodeError, PasscodeOutcome, ProcessingStage, ScanStatus, TimerKind,
    TransferFailure, TransferForm, TransferKind, TransferReceipt, TransferWizard,
    ValidatedTransfer, WizardState, WizardTimer,
};

mod accounts;
mod error;
mod ledger;
mod link;
mod money;
mod otp;
mod scheduler;
pub mod seed;
pub mod session;
mod transactions;
mod verify;
mod wizard;

pub type ResultEngine<T> = Result<T, EngineError>;
