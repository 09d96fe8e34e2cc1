//! Integer/string base conversion

use crate::backend::{BackendError, BackendResult};
use crate::resolve::BaseconParams;

/// Digits in value order. A base `n` codec uses the first `n` symbols.
pub const ALPHABET: &[u8; 65] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCodec {
    base: u32,
}

impl BaseCodec {
    pub fn new(params: &BaseconParams) -> BackendResult<Self> {
        if !(2..=ALPHABET.len() as u32).contains(&params.base) {
            return Err(BackendError::InvalidInput(format!(
                "base {} is outside 2..={}",
                params.base,
                ALPHABET.len()
            )));
        }
        Ok(Self { base: params.base })
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn encode(&self, mut value: u64) -> String {
        if value == 0 {
            return "0".to_string();
        }

        let base = u64::from(self.base);
        let mut digits = Vec::new();
        while value > 0 {
            digits.push(ALPHABET[(value % base) as usize]);
            value /= base;
        }
        digits.reverse();
        // Every byte comes from the ASCII alphabet
        digits.into_iter().map(char::from).collect()
    }

    pub fn decode(&self, text: &str) -> BackendResult<u64> {
        if text.is_empty() {
            return Err(BackendError::InvalidInput("empty string".into()));
        }

        let base = u64::from(self.base);
        text.bytes().try_fold(0u64, |acc, byte| {
            let digit = self
                .digit_value(byte)
                .ok_or_else(|| BackendError::Decode(format!(
                    "'{}' is not a base {} digit",
                    char::from(byte),
                    self.base
                )))?;
            acc.checked_mul(base)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| BackendError::Decode(format!("'{text}' overflows u64")))
        })
    }

    fn digit_value(&self, byte: u8) -> Option<u64> {
        ALPHABET[..self.base as usize]
            .iter()
            .position(|&d| d == byte)
            .map(|p| p as u64)
    }
}
