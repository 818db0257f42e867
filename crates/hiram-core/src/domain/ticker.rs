use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upper bound on symbol length.
const MAX_TICKER_LEN: usize = 20;

/// Symbol as listed by the catalog, normalized to uppercase.
///
/// Directory symbols carry share-class and instrument suffixes (`BRK.B`,
/// `ABR$D`, `0700.HK`), so any printable ASCII character is accepted except
/// `/`. Never empty, never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let symbol = input.trim();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        if let Some((index, ch)) = symbol
            .char_indices()
            .find(|&(_, ch)| !ch.is_ascii_graphic() || ch == '/')
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        // ASCII only from here on, so bytes == chars.
        if symbol.len() > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: symbol.len(),
                max: MAX_TICKER_LEN,
            });
        }

        Ok(Self(symbol.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}
