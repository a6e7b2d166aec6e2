use crate::address::Address;
use crate::errors::{WalletError, WalletResult};
use regex::Regex;

const MAX_MEMO_LENGTH: usize = 256;
const MAX_EMAIL_LENGTH: usize = 254;

/// Input validation for values that reach the store from UI forms
pub struct InputValidator {
    // Compiled regex patterns for performance
    ethereum_address_pattern: Regex,
    injective_address_pattern: Regex,
    private_key_pattern: Regex,
    email_pattern: Regex,

    // Blacklisted patterns for security
    malicious_patterns: Vec<Regex>,
}

impl InputValidator {
    pub fn new() -> WalletResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| WalletError::ValidationError(format!("Invalid regex: {}", e)))
        };

        Ok(InputValidator {
            ethereum_address_pattern: compile(r"^0x[a-fA-F0-9]{40}$")?,
            injective_address_pattern: compile(r"^inj1[02-9ac-hj-np-z]{38}$")?,
            private_key_pattern: compile(r"^(0x)?[a-fA-F0-9]{64}$")?,
            email_pattern: compile(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
            malicious_patterns: vec![
                compile(r"<script")?,
                compile(r"javascript:")?,
                compile(r"data:text/html")?,
                compile(r"vbscript:")?,
                compile(r"onload=")?,
                compile(r"onerror=")?,
            ],
        })
    }

    /// Validate a `0x` account address
    pub fn validate_ethereum_address(&self, address: &str) -> WalletResult<()> {
        self.check_basic_security(address)?;

        if !self.ethereum_address_pattern.is_match(address) {
            return Err(WalletError::InvalidAddress(format!(
                "'{}' is not a 0x address",
                address
            )));
        }

        Ok(())
    }

    /// Validate a bech32 account address, checksum included
    pub fn validate_injective_address(&self, address: &str) -> WalletResult<()> {
        self.check_basic_security(address)?;

        if !self.injective_address_pattern.is_match(address) {
            return Err(WalletError::InvalidAddress(format!(
                "'{}' is not an inj address",
                address
            )));
        }

        Address::from_string(address).map(|_| ())
    }

    pub fn validate_private_key(&self, private_key: &str) -> WalletResult<()> {
        if !self.private_key_pattern.is_match(private_key.trim()) {
            return Err(WalletError::InvalidKey(
                "Private key must be 32 bytes of hex".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_email(&self, email: &str) -> WalletResult<()> {
        self.check_basic_security(email)?;

        if email.len() > MAX_EMAIL_LENGTH || !self.email_pattern.is_match(email) {
            return Err(WalletError::ValidationError(
                "Email format is invalid".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_memo(&self, memo: &str) -> WalletResult<()> {
        self.check_basic_security(memo)?;

        if memo.chars().count() > MAX_MEMO_LENGTH {
            return Err(WalletError::ValidationError(format!(
                "Memo exceeds {} characters",
                MAX_MEMO_LENGTH
            )));
        }

        Ok(())
    }

    /// Check for basic security issues in any input
    fn check_basic_security(&self, input: &str) -> WalletResult<()> {
        if input.len() > 1000 {
            return Err(WalletError::ValidationError("Input too long".to_string()));
        }

        let lowered = input.to_lowercase();
        if self
            .malicious_patterns
            .iter()
            .any(|pattern| pattern.is_match(&lowered))
        {
            return Err(WalletError::ValidationError(
                "Input contains potentially malicious content".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::get_injective_address;

    const HEX: &str = "0xaf79152ac5df276d9a8e1e2e22822f9713474902";

    #[test]
    fn accepts_both_address_forms() {
        let validator = InputValidator::new().unwrap();
        validator.validate_ethereum_address(HEX).unwrap();
        let injective = get_injective_address(HEX).unwrap();
        validator.validate_injective_address(&injective).unwrap();
    }

    #[test]
    fn rejects_bad_bech32_checksum() {
        let validator = InputValidator::new().unwrap();
        let mut injective = get_injective_address(HEX).unwrap();
        let last = injective.pop().unwrap();
        injective.push(if last == 'q' { 'p' } else { 'q' });
        assert!(matches!(
            validator.validate_injective_address(&injective),
            Err(WalletError::InvalidAddress(_))
        ));
    }

    #[test]
    fn private_key_shape() {
        let validator = InputValidator::new().unwrap();
        let key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        validator.validate_private_key(key).unwrap();
        validator.validate_private_key(&format!("0x{}", key)).unwrap();
        assert!(validator.validate_private_key("0x1234").is_err());
    }

    #[test]
    fn memo_and_email_guards() {
        let validator = InputValidator::new().unwrap();
        validator.validate_email("trader@example.com").unwrap();
        assert!(validator.validate_email("not-an-email").is_err());
        validator.validate_memo("rebalance").unwrap();
        assert!(validator.validate_memo("<script>alert(1)</script>").is_err());
        assert!(validator.validate_memo(&"m".repeat(257)).is_err());
    }
}
