use std::fmt;

use crate::error::InvalidCep;

/// Number of digits in a Brazilian postal code (CEP).
pub const CEP_LEN: usize = 8;

/// Returns true iff `value` is exactly eight ASCII decimal digits.
pub fn is_valid_cep(value: &str) -> bool {
    value.len() == CEP_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

/// A validated postal code. Only constructible through [`Cep::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub fn parse(value: &str) -> Result<Self, InvalidCep> {
        if is_valid_cep(value) { Ok(Self(value.to_owned())) } else { Err(InvalidCep) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Cep {
    type Error = InvalidCep;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
