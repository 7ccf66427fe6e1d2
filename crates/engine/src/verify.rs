//! Identity verification capability.
//!
//! Every flow that asks "is this really the client?" goes through a
//! [`Verifier`]. The client ships with [`SimulatedVerifier`].

use std::fmt::Debug;

use crate::Passcode;

pub trait Verifier: Debug {
    /// Result of a face scan.
    fn biometric(&self) -> bool;

    /// Whether `code` is accepted as the current authenticator code.
    fn passcode(&self, code: &Passcode) -> bool;
}

/// Accepts every scan and every complete code.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedVerifier;

impl Verifier for SimulatedVerifier {
    fn biometric(&self) -> bool {
        true
    }

    fn passcode(&self, code: &Passcode) -> bool {
        code.is_complete()
    }
}
