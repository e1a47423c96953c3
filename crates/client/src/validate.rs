//! Form validation for auction creation and bidding.

use num_bigint::BigUint;
use num_traits::Zero;
use std::str::FromStr;

use crate::error::ClientError;
use crate::format::{format_strk_amount, parse_strk_amount};

/// Raw user input for creating an auction.
#[derive(Debug, Clone, Default)]
pub struct AuctionForm {
    pub asset_id: String,
    /// Decimal STRK.
    pub starting_price: String,
    /// Seconds.
    pub duration: String,
}

/// Per-field validation messages; all `None` means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFormErrors {
    pub asset_id: Option<String>,
    pub starting_price: Option<String>,
    pub duration: Option<String>,
}

impl AuctionFormErrors {
    pub fn is_valid(&self) -> bool {
        self.asset_id.is_none() && self.starting_price.is_none() && self.duration.is_none()
    }
}

pub fn validate_auction_form(form: &AuctionForm) -> AuctionFormErrors {
    let mut errors = AuctionFormErrors::default();

    let asset_id = form.asset_id.trim();
    if asset_id.is_empty() {
        errors.asset_id = Some("Asset ID is required".to_string());
    } else if BigUint::from_str(asset_id).is_err() {
        errors.asset_id = Some("Asset ID must be a non-negative whole number".to_string());
    }

    if parse_strk_amount(&form.starting_price).is_zero() {
        errors.starting_price = Some("Starting price must be greater than 0".to_string());
    }

    match form.duration.trim().parse::<u64>() {
        Ok(d) if d > 0 => {}
        _ => errors.duration = Some("Duration must be selected".to_string()),
    }

    errors
}

/// Validate a bid form, returning the parsed smallest-unit amount.
///
/// Collects every failure rather than stopping at the first, the way a
/// form renders all its messages at once.
pub fn validate_bid_form(
    bid_amount: &str,
    starting_price: &BigUint,
    secret: &str,
) -> Result<BigUint, Vec<String>> {
    let mut errors = Vec::new();

    let amount = parse_strk_amount(bid_amount);
    if amount.is_zero() {
        errors.push("Bid amount must be greater than 0".to_string());
    }
    if &amount < starting_price {
        errors.push(format!(
            "Bid must be at least {} STRK",
            format_strk_amount(starting_price)
        ));
    }
    if secret.trim().is_empty() {
        errors.push("Secret is required".to_string());
    }

    if errors.is_empty() {
        Ok(amount)
    } else {
        Err(errors)
    }
}

/// Reject amounts below the starting price before anything reaches the
/// network.
pub fn ensure_sufficient_bid(
    amount: &BigUint,
    starting_price: &BigUint,
) -> Result<(), ClientError> {
    if amount < starting_price {
        return Err(ClientError::InsufficientBid {
            amount: format_strk_amount(amount),
            starting_price: format_strk_amount(starting_price),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auction_form_happy_path() {
        let form = AuctionForm {
            asset_id: "17".to_string(),
            starting_price: "1.5".to_string(),
            duration: "3600".to_string(),
        };
        assert!(validate_auction_form(&form).is_valid());
    }

    #[test]
    fn auction_form_catches_each_field() {
        let form = AuctionForm {
            asset_id: "".to_string(),
            starting_price: "0".to_string(),
            duration: "nope".to_string(),
        };
        let errors = validate_auction_form(&form);
        assert!(errors.asset_id.is_some());
        assert!(errors.starting_price.is_some());
        assert!(errors.duration.is_some());

        let form = AuctionForm {
            asset_id: "1.5".to_string(),
            starting_price: "2".to_string(),
            duration: "60".to_string(),
        };
        let errors = validate_auction_form(&form);
        assert!(errors.asset_id.is_some());
        assert!(errors.starting_price.is_none());
    }

    #[test]
    fn auction_form_matches_create_command_inputs() {
        // The create-auction command funnels its flags through here after
        // converting the duration to seconds.
        let form = AuctionForm {
            asset_id: "42".to_string(),
            starting_price: "0.5".to_string(),
            duration: 7_200.to_string(),
        };
        assert!(validate_auction_form(&form).is_valid());

        let form = AuctionForm {
            starting_price: "0".to_string(),
            ..form
        };
        let errors = validate_auction_form(&form);
        assert!(errors.starting_price.is_some());
        assert!(errors.asset_id.is_none());
    }

    #[test]
    fn bid_form_validation() {
        let starting = parse_strk_amount("2");

        let amount = validate_bid_form("3", &starting, "0xabc").unwrap();
        assert_eq!(amount, parse_strk_amount("3"));

        let errors = validate_bid_form("1", &starting, "").unwrap_err();
        assert_eq!(errors.len(), 2);

        let errors = validate_bid_form("0", &starting, "0xabc").unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn sufficient_bid_check() {
        let starting = parse_strk_amount("2");
        assert!(ensure_sufficient_bid(&parse_strk_amount("2"), &starting).is_ok());
        assert!(matches!(
            ensure_sufficient_bid(&parse_strk_amount("1.9"), &starting),
            Err(ClientError::InsufficientBid { .. })
        ));
    }
}
