//! Native and issued-asset amounts in the ledger's 8 / 48 byte encodings.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use super::super::error::RippleError;
use super::super::network::AccountId;

/// 10^17 drops, the total native supply.
pub const MAX_NATIVE_DROPS: i64 = 100_000_000_000_000_000;
pub const DROPS_PER_XRP: i64 = 1_000_000;
const NATIVE_DECIMALS: usize = 6;

const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
/// Digits kept while parsing before the rest are dropped.
const PARSE_MANTISSA_LIMIT: u64 = 100_000_000_000_000_000;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;

static ISO_CURRENCY_LOCK: OnceLock<Regex> = OnceLock::new();
const ISO_CURRENCY_REGEX: &str = r"^[A-Za-z0-9?!@#$%^&*<>(){}\[\]|]{3}$";
static HEX_CURRENCY_LOCK: OnceLock<Regex> = OnceLock::new();
const HEX_CURRENCY_REGEX: &str = r"^[0-9A-Fa-f]{40}$";

/// 160-bit currency code. All zeros is the native asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Currency(pub [u8; 20]);

impl Currency {
    pub fn native() -> Self {
        Currency([0u8; 20])
    }

    pub fn is_native(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// `XRP`, a three character ISO-style code, or 40 hex characters.
    pub fn from_code(code: &str) -> Result<Self, RippleError> {
        let iso = ISO_CURRENCY_LOCK.get_or_init(|| Regex::new(ISO_CURRENCY_REGEX).unwrap());
        let hex_code = HEX_CURRENCY_LOCK.get_or_init(|| Regex::new(HEX_CURRENCY_REGEX).unwrap());

        if code == "XRP" {
            Ok(Self::native())
        } else if iso.is_match(code) {
            let mut bytes = [0u8; 20];
            bytes[12..15].copy_from_slice(code.as_bytes());
            Ok(Currency(bytes))
        } else if hex_code.is_match(code) {
            let mut bytes = [0u8; 20];
            hex::decode_to_slice(code, &mut bytes).map_err(|e| RippleError::InvalidCurrency(format!("{}: {}", code, e)))?;
            Ok(Currency(bytes))
        } else {
            Err(RippleError::InvalidCurrency(code.to_string()))
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_native() {
            return write!(f, "XRP");
        }
        let bytes = &self.0;
        let is_standard = bytes[..12].iter().all(|b| *b == 0) && bytes[15..].iter().all(|b| *b == 0);
        match std::str::from_utf8(&bytes[12..15]) {
            Ok(code) if is_standard => write!(f, "{}", code),
            _ => write!(f, "{}", hex::encode_upper(bytes)),
        }
    }
}

impl FromStr for Currency {
    type Err = RippleError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Self::from_code(code)
    }
}

/// Decimal value of an issued asset: `mantissa × 10^exponent`, kept normalised
/// so that equal values have equal representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IssuedValue {
    negative: bool,
    mantissa: u64,
    exponent: i32,
}

impl IssuedValue {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(negative: bool, mantissa: u64, exponent: i32) -> Result<Self, RippleError> {
        let out_of_range = || RippleError::InvalidAmount(format!("exponent of {}e{} is out of range", mantissa, exponent));
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        if mantissa == 0 {
            return Ok(Self::zero());
        }
        while mantissa < MIN_MANTISSA {
            mantissa *= 10;
            exponent = exponent.checked_sub(1).ok_or_else(out_of_range)?;
        }
        while mantissa > MAX_MANTISSA {
            mantissa /= 10;
            exponent = exponent.checked_add(1).ok_or_else(out_of_range)?;
        }
        if exponent > MAX_EXPONENT {
            return Err(RippleError::InvalidAmount(format!(
                "value {}e{} is too large to encode",
                mantissa, exponent
            )));
        }
        if exponent < MIN_EXPONENT {
            return Ok(Self::zero());
        }
        Ok(Self {
            negative,
            mantissa,
            exponent,
        })
    }

    /// `value × 10^exponent`, e.g. an integer amount scaled by `-decimals`.
    pub fn from_scaled(value: i64, exponent: i32) -> Result<Self, RippleError> {
        Self::new(value < 0, value.unsigned_abs(), exponent)
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    fn signum(&self) -> i8 {
        match (self.is_zero(), self.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        if self.is_zero() {
            return NOT_NATIVE_BIT.to_be_bytes();
        }
        let mut bits = NOT_NATIVE_BIT;
        if !self.negative {
            bits |= POSITIVE_BIT;
        }
        bits |= ((self.exponent + 97) as u64) << 54;
        bits |= self.mantissa;
        bits.to_be_bytes()
    }
}

impl Ord for IssuedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = (self.signum(), other.signum());
        if lhs != rhs {
            return lhs.cmp(&rhs);
        }
        if lhs == 0 {
            return Ordering::Equal;
        }
        let magnitude = (self.exponent, self.mantissa).cmp(&(other.exponent, other.mantissa));
        if lhs > 0 {
            magnitude
        } else {
            magnitude.reverse()
        }
    }
}

impl PartialOrd for IssuedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for IssuedValue {
    type Err = RippleError;

    /// Decimal string as returned by ledger RPCs: `-12.5`, `0.001`, `1e-3`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || RippleError::InvalidAmount(value.to_string());
        let trimmed = value.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (number, exp_part) = match unsigned.find(['e', 'E']) {
            Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
            None => (unsigned, None),
        };
        let (integer, fraction) = match number.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (number, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut mantissa: u64 = 0;
        let mut exponent: i32 = match exp_part {
            Some(exp) => exp.parse::<i32>().map_err(|_| invalid())?,
            None => 0,
        };
        for digit in integer.bytes().map(|b| u64::from(b - b'0')) {
            if mantissa < PARSE_MANTISSA_LIMIT {
                mantissa = mantissa * 10 + digit;
            } else {
                exponent = exponent.checked_add(1).ok_or_else(invalid)?;
            }
        }
        for digit in fraction.bytes().map(|b| u64::from(b - b'0')) {
            if mantissa < PARSE_MANTISSA_LIMIT {
                mantissa = mantissa * 10 + digit;
                exponent = exponent.checked_sub(1).ok_or_else(invalid)?;
            }
        }

        Self::new(negative, mantissa, exponent)
    }
}

impl Display for IssuedValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }
        let digits = mantissa.to_string();
        let sign = if self.negative { "-" } else { "" };
        if exponent >= 0 {
            return write!(f, "{}{}{}", sign, digits, "0".repeat(exponent as usize));
        }
        let point = digits.len() as i32 + exponent;
        if point > 0 {
            let (integer, fraction) = digits.split_at(point as usize);
            write!(f, "{}{}.{}", sign, integer, fraction)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
        }
    }
}

/// Payment amount: native drops, or an issued asset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Native(i64),
    Issued {
        value: IssuedValue,
        currency: Currency,
        issuer: AccountId,
    },
}

impl Amount {
    pub fn native(drops: i64) -> Result<Self, RippleError> {
        if !(0..=MAX_NATIVE_DROPS).contains(&drops) {
            return Err(RippleError::InvalidAmount(format!("native amount {} out of range", drops)));
        }
        Ok(Amount::Native(drops))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RippleError> {
        match self {
            Amount::Native(drops) => {
                if !(0..=MAX_NATIVE_DROPS).contains(drops) {
                    return Err(RippleError::InvalidAmount(format!("native amount {} out of range", drops)));
                }
                Ok(((*drops as u64) | POSITIVE_BIT).to_be_bytes().to_vec())
            }
            Amount::Issued { value, currency, issuer } => {
                if currency.is_native() {
                    return Err(RippleError::InvalidCurrency("issued amount cannot use XRP".to_string()));
                }
                let mut bytes = Vec::with_capacity(48);
                bytes.extend_from_slice(&value.to_bytes());
                bytes.extend_from_slice(&currency.0);
                bytes.extend_from_slice(issuer.as_bytes());
                Ok(bytes)
            }
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Amount::Native(drops) => write!(f, "{}", drops),
            Amount::Issued { value, currency, issuer } => write!(f, "{}/{}/{}", value, currency, issuer),
        }
    }
}

/// Parse a native fee: integer drops (`"12"`) or a decimal XRP value (`"0.000012"`).
pub fn parse_native_drops(value: &str) -> Result<i64, RippleError> {
    let invalid = || RippleError::InvalidAmount(format!("malformed native value {}", value));
    let drops = match value.split_once('.') {
        None => value.parse::<i64>().map_err(|_| invalid())?,
        Some((integer, fraction)) => {
            if fraction.len() > NATIVE_DECIMALS || !fraction.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let integer: i64 = if integer.is_empty() { 0 } else { integer.parse().map_err(|_| invalid())? };
            let fraction: i64 = format!("{:0<width$}", fraction, width = NATIVE_DECIMALS)
                .parse()
                .map_err(|_| invalid())?;
            integer
                .checked_mul(DROPS_PER_XRP)
                .and_then(|v| v.checked_add(fraction))
                .ok_or_else(invalid)?
        }
    };
    if !(0..=MAX_NATIVE_DROPS).contains(&drops) {
        return Err(invalid());
    }
    Ok(drops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(s: &str) -> IssuedValue {
        s.parse().unwrap()
    }

    #[test]
    fn test_currency_codes() {
        assert!(Currency::from_code("XRP").unwrap().is_native());

        let usd = Currency::from_code("USD").unwrap();
        assert_eq!(&usd.0[12..15], b"USD");
        assert_eq!(usd.to_string(), "USD");

        let hex_code = "0158415500000000C1F76FF6ECB0BAC600000000";
        let gold = Currency::from_code(hex_code).unwrap();
        assert_eq!(gold.to_string(), hex_code);

        assert!(Currency::from_code("US").is_err());
        assert!(Currency::from_code("DOLLARS").is_err());
    }

    #[test]
    fn test_normalisation() {
        let v = IssuedValue::from_scaled(1_500_000, -6).unwrap();
        assert_eq!(v.mantissa(), 1_500_000_000_000_000);
        assert_eq!(v.exponent(), -15);
        assert_eq!(v.to_string(), "1.5");

        let v = IssuedValue::from_scaled(i64::MAX, 0).unwrap();
        assert_eq!(v.mantissa(), 9_223_372_036_854_775);
        assert_eq!(v.exponent(), 3);
    }

    #[test]
    fn test_overflow_and_underflow() {
        assert!(IssuedValue::new(false, 1, 96).is_err());
        assert!(IssuedValue::new(false, 1, -200).unwrap().is_zero());
    }

    #[test]
    fn test_extreme_exponents_are_rejected() {
        assert!(matches!(
            "1e-2147483648".parse::<IssuedValue>(),
            Err(RippleError::InvalidAmount(_))
        ));
        assert!(matches!(
            "0.1e-2147483648".parse::<IssuedValue>(),
            Err(RippleError::InvalidAmount(_))
        ));
        assert!(matches!(
            "123456789012345678901234567890e2147483647".parse::<IssuedValue>(),
            Err(RippleError::InvalidAmount(_))
        ));
        assert!(matches!(
            IssuedValue::new(false, 1, i32::MIN),
            Err(RippleError::InvalidAmount(_))
        ));
        assert!(matches!(
            IssuedValue::new(false, u64::MAX, i32::MAX),
            Err(RippleError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(value("123.456").to_string(), "123.456");
        assert_eq!(value("-0.001").to_string(), "-0.001");
        assert_eq!(value("1e3").to_string(), "1000");
        assert_eq!(value("0").to_string(), "0");
        assert_eq!(value("0.000"), IssuedValue::zero());
        assert!("abc".parse::<IssuedValue>().is_err());
        assert!("1.2.3".parse::<IssuedValue>().is_err());
        assert!("".parse::<IssuedValue>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(value("10") > value("9.99"));
        assert!(value("0.5") > value("-100"));
        assert!(value("-1") > value("-2"));
        assert!(value("0") > value("-0.0001"));
        assert_eq!(value("1.50").cmp(&value("1.5")), Ordering::Equal);
        assert!(value("100") >= IssuedValue::from_scaled(100_000_000, -6).unwrap());
    }

    #[test]
    fn test_native_encoding() {
        let bytes = Amount::native(1_000_000).unwrap().to_bytes().unwrap();
        assert_eq!(hex::encode_upper(bytes), "40000000000F4240");
        assert!(Amount::native(-1).is_err());
        assert!(Amount::native(MAX_NATIVE_DROPS + 1).is_err());
    }

    #[test]
    fn test_issued_encoding() {
        let amount = Amount::Issued {
            value: value("1"),
            currency: Currency::from_code("USD").unwrap(),
            issuer: AccountId([0x11; 20]),
        };
        let bytes = amount.to_bytes().unwrap();
        assert_eq!(bytes.len(), 48);
        // 10^15 × 10^-15, exponent byte 97 - 15 = 82
        assert_eq!(hex::encode_upper(&bytes[..8]), "D4838D7EA4C68000");
        assert_eq!(&bytes[20..23], b"USD");
        assert_eq!(&bytes[28..], &[0x11; 20]);

        let zero = Amount::Issued {
            value: IssuedValue::zero(),
            currency: Currency::from_code("USD").unwrap(),
            issuer: AccountId([0x11; 20]),
        };
        assert_eq!(hex::encode_upper(&zero.to_bytes().unwrap()[..8]), "8000000000000000");
    }

    #[test]
    fn test_parse_native_drops() {
        assert_eq!(parse_native_drops("10").unwrap(), 10);
        assert_eq!(parse_native_drops("0.00001").unwrap(), 10);
        assert_eq!(parse_native_drops("1.5").unwrap(), 1_500_000);
        assert!(parse_native_drops("0.0000001").is_err());
        assert!(parse_native_drops("-5").is_err());
        assert!(parse_native_drops("ten").is_err());
    }
}
