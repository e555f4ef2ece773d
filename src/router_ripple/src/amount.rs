use candid::Nat;
use num_traits::ToPrimitive;
use router_lib::token_config::TokenConfig;
use router_lib::RouterError;
use tracing::error;

use super::codec::{Amount, Currency, IssuedValue};
use super::network::AccountId;

/// Convert a router integer amount into the ledger payment amount for `token`.
///
/// Native tokens pay drops directly; issued tokens pay `amount × 10^-decimals`
/// of (currency, issuer).
pub fn get_payment_amount(amount: &Nat, token: &TokenConfig) -> Result<Amount, RouterError> {
    let (currency_code, issuer) = token
        .ripple_extra
        .as_ref()
        .map(|extra| (extra.currency.as_str(), extra.issuer.as_str()))
        .unwrap_or_default();
    let currency = Currency::from_code(currency_code).map_err(|_| RouterError::UnknownCurrency(currency_code.to_string()))?;

    let value = amount.0.to_i64().ok_or_else(|| RouterError::AmountOverflow(amount.0.to_string()))?;

    if currency.is_native() {
        return Ok(Amount::native(value)?);
    }

    let issuer: AccountId = issuer.parse().map_err(|_| RouterError::UnknownIssuer(issuer.to_string()))?;
    let value = IssuedValue::from_scaled(value, -i32::from(token.decimals)).map_err(|e| {
        error!(
            currency = currency_code,
            issuer = %issuer,
            amount = %amount.0,
            decimals = token.decimals,
            error = %e,
            "get payment amount failed"
        );
        RouterError::from(e)
    })?;

    Ok(Amount::Issued { value, currency, issuer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use router_lib::token_config::RippleExtra;

    const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn token(currency: &str, issuer: &str, decimals: u8) -> TokenConfig {
        TokenConfig {
            token_id: currency.to_string(),
            decimals,
            contract_address: String::new(),
            ripple_extra: Some(RippleExtra {
                currency: currency.to_string(),
                issuer: issuer.to_string(),
            }),
        }
    }

    #[test]
    fn test_native_amount() {
        let amount = get_payment_amount(&Nat::from(15_000_000u64), &token("XRP", "", 6)).unwrap();
        assert_eq!(amount, Amount::Native(15_000_000));
    }

    #[test]
    fn test_issued_amount_is_scaled_by_decimals() {
        let amount = get_payment_amount(&Nat::from(1_500_000u64), &token("USD", ISSUER, 6)).unwrap();
        match amount {
            Amount::Issued { value, currency, issuer } => {
                assert_eq!(value.to_string(), "1.5");
                assert_eq!(currency.to_string(), "USD");
                assert_eq!(issuer.to_address(), ISSUER);
            }
            Amount::Native(_) => panic!("expected issued amount"),
        }
    }

    #[test]
    fn test_overflow_names_the_value() {
        let too_big = Nat::from(u64::MAX);
        let err = get_payment_amount(&too_big, &token("XRP", "", 6)).unwrap_err();
        assert_eq!(err, RouterError::AmountOverflow(u64::MAX.to_string()));
        assert_eq!(err.to_string(), format!("amount value {} is overflow of type int64", u64::MAX));
    }

    #[test]
    fn test_native_amount_above_supply_is_rejected() {
        let err = get_payment_amount(&Nat::from(i64::MAX as u64), &token("XRP", "", 6)).unwrap_err();
        assert!(matches!(err, RouterError::Encoding(_)));
    }

    #[test]
    fn test_unknown_currency_and_issuer() {
        let err = get_payment_amount(&Nat::from(1u64), &token("DOLLAR", ISSUER, 6)).unwrap_err();
        assert_eq!(err, RouterError::UnknownCurrency("DOLLAR".to_string()));

        let err = get_payment_amount(&Nat::from(1u64), &token("USD", "rBadIssuer", 6)).unwrap_err();
        assert_eq!(err, RouterError::UnknownIssuer("rBadIssuer".to_string()));

        let mut no_extra = token("USD", ISSUER, 6);
        no_extra.ripple_extra = None;
        assert!(matches!(
            get_payment_amount(&Nat::from(1u64), &no_extra),
            Err(RouterError::UnknownCurrency(_))
        ));
    }
}
