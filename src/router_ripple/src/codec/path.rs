use std::str::FromStr;

use super::super::error::RippleError;
use super::super::network::AccountId;
use super::amount::Currency;

const TYPE_ACCOUNT: u8 = 0x01;
const TYPE_CURRENCY: u8 = 0x10;
const TYPE_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_SET_END: u8 = 0x00;

/// One hop of a payment path. At least one component must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    pub fn account(account: AccountId) -> Self {
        Self {
            account: Some(account),
            ..Default::default()
        }
    }

    fn type_byte(&self) -> u8 {
        let mut step_type = 0;
        if self.account.is_some() {
            step_type |= TYPE_ACCOUNT;
        }
        if self.currency.is_some() {
            step_type |= TYPE_CURRENCY;
        }
        if self.issuer.is_some() {
            step_type |= TYPE_ISSUER;
        }
        step_type
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), RippleError> {
        let step_type = self.type_byte();
        if step_type == 0 {
            return Err(RippleError::InvalidPath("empty path step".to_string()));
        }
        out.push(step_type);
        if let Some(account) = &self.account {
            out.extend_from_slice(account.as_bytes());
        }
        if let Some(currency) = &self.currency {
            out.extend_from_slice(&currency.0);
        }
        if let Some(issuer) = &self.issuer {
            out.extend_from_slice(issuer.as_bytes());
        }
        Ok(())
    }
}

impl FromStr for PathStep {
    type Err = RippleError;

    /// `rAddress`, `CUR` or `CUR/rIssuer`.
    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let step = step.trim();
        if step.is_empty() {
            return Err(RippleError::InvalidPath("empty path step".to_string()));
        }
        if let Some((currency, issuer)) = step.split_once('/') {
            return Ok(Self {
                account: None,
                currency: Some(currency.parse()?),
                issuer: Some(issuer.parse()?),
            });
        }
        if step.starts_with('r') && step.len() > 20 {
            return Ok(Self::account(step.parse()?));
        }
        Ok(Self {
            currency: Some(step.parse()?),
            ..Default::default()
        })
    }
}

/// Alternative routes for a cross-currency payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathSet(pub Vec<Vec<PathStep>>);

impl PathSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Paths joined by 0xFF, terminated by 0x00.
    pub fn encode(&self) -> Result<Vec<u8>, RippleError> {
        let mut out = Vec::new();
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(RippleError::InvalidPath("empty path".to_string()));
            }
            if i > 0 {
                out.push(PATH_SEPARATOR);
            }
            for step in path {
                step.encode_into(&mut out)?;
            }
        }
        out.push(PATH_SET_END);
        Ok(out)
    }
}

impl FromStr for PathSet {
    type Err = RippleError;

    /// Paths separated by `,`, steps within a path by `=>`.
    fn from_str(paths: &str) -> Result<Self, Self::Err> {
        if paths.trim().is_empty() {
            return Ok(PathSet::default());
        }
        paths
            .split(',')
            .map(|path| path.split("=>").map(str::parse).collect::<Result<Vec<PathStep>, _>>())
            .collect::<Result<Vec<_>, _>>()
            .map(PathSet)
    }
}
