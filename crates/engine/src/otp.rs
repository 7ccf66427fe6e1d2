//! One-time passcode entry and authenticator provisioning.

use std::fmt;

/// Number of digits of an authenticator code.
pub const PASSCODE_LEN: usize = 6;

/// A partially typed 6-digit code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Passcode {
    digits: Vec<u8>,
}

impl Passcode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a digit. Non-digits and input past the sixth digit are
    /// ignored; returns whether the character was taken.
    pub fn push(&mut self, ch: char) -> bool {
        if self.is_complete() {
            return false;
        }
        match ch.to_digit(10) {
            Some(d) => {
                self.digits.push(d as u8);
                true
            }
            None => false,
        }
    }

    pub fn pop(&mut self) {
        self.digits.pop();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Fills the code from pasted text.
    ///
    /// Only the first six characters are considered and the paste is
    /// dropped unless all of them are digits. Slots beyond the pasted
    /// length keep what was typed before.
    pub fn paste(&mut self, text: &str) -> bool {
        let head: Vec<char> = text.trim().chars().take(PASSCODE_LEN).collect();
        if head.is_empty() || !head.iter().all(char::is_ascii_digit) {
            return false;
        }
        for (i, ch) in head.iter().enumerate() {
            let d = ch.to_digit(10).unwrap_or_default() as u8;
            match self.digits.get_mut(i) {
                Some(slot) => *slot = d,
                None => self.digits.push(d),
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.len() == PASSCODE_LEN
    }

    /// The digit in slot `index`, if typed.
    pub fn digit(&self, index: usize) -> Option<u8> {
        self.digits.get(index).copied()
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Base32 shared secret shown when setting up an authenticator app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisioningSecret {
    secret: String,
}

impl Default for ProvisioningSecret {
    fn default() -> Self {
        Self::new("JBSWY3DPEHPK3PXP")
    }
}

impl ProvisioningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.secret
    }

    /// `JBSW Y3DP EHPK 3PXP`
    pub fn grouped(&self) -> String {
        self.secret
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Key URI understood by authenticator apps.
    pub fn otpauth_uri(&self, account: &str) -> String {
        format!(
            "otpauth://totp/TrustBank:{account}?secret={}&issuer=TrustBank",
            self.secret
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_stops_at_six_digits() {
        let mut code = Passcode::new();
        assert!(!code.push('x'));
        for ch in "1234567".chars() {
            code.push(ch);
        }
        assert!(code.is_complete());
        assert_eq!(code.to_string(), "123456");

        code.pop();
        assert_eq!(code.len(), 5);
        assert!(!code.is_complete());
    }

    #[test]
    fn paste_takes_first_six_digits_only() {
        let mut code = Passcode::new();
        assert!(code.paste("98765432"));
        assert_eq!(code.to_string(), "987654");

        let mut code = Passcode::new();
        assert!(!code.paste("12a456"));
        assert!(code.is_empty());

        let mut code = Passcode::new();
        for ch in "11111".chars() {
            code.push(ch);
        }
        assert!(code.paste("22"));
        assert_eq!(code.to_string(), "22111");
    }

    #[test]
    fn secret_formats() {
        let secret = ProvisioningSecret::default();
        assert_eq!(secret.grouped(), "JBSW Y3DP EHPK 3PXP");
        assert_eq!(
            secret.otpauth_uri("howard.woods@trustbank.com"),
            "otpauth://totp/TrustBank:howard.woods@trustbank.com?secret=JBSWY3DPEHPK3PXP&issuer=TrustBank"
        );
    }
}
