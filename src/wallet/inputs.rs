use crate::core::constants::check_security;
use crate::error::{Result, TernaryError};
use crate::wallet::Address;
use log::debug;
use serde::{Deserialize, Serialize};

/// Addresses picked to fund a transfer, with their combined balance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inputs {
    inputs: Vec<Address>,
    total_balance: i64,
}

impl Inputs {
    pub fn get_inputs(&self) -> &[Address] {
        &self.inputs
    }

    pub fn get_total_balance(&self) -> i64 {
        self.total_balance
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Walks `addresses` with their `balances` and keeps the funded ones.
///
/// Key indices count from `start`. With a non-zero `threshold` the walk stops at the
/// first address that brings the total to it, so later funded addresses are not
/// collected. A zero threshold collects every funded address.
pub fn select_inputs(
    addresses: &[String],
    balances: &[i64],
    start: u64,
    threshold: i64,
    security: u8,
) -> Result<Inputs> {
    check_security(security)?;
    if addresses.len() != balances.len() {
        return Err(TernaryError::InvalidAddress(format!(
            "{} addresses but {} balances",
            addresses.len(),
            balances.len()
        )));
    }

    let mut threshold_reached = threshold == 0;
    let mut selected = Inputs::default();

    for (index, (address, &balance)) in (start..).zip(addresses.iter().zip(balances)) {
        if balance <= 0 {
            continue;
        }
        selected
            .inputs
            .push(Address::with_key(address, balance, index, security)?);
        selected.total_balance = selected.total_balance.saturating_add(balance);

        if !threshold_reached && selected.total_balance >= threshold {
            threshold_reached = true;
            break;
        }
    }

    if !threshold_reached {
        return Err(TernaryError::NotEnoughBalance {
            required: threshold,
            available: selected.total_balance,
        });
    }
    debug!(
        "Selected {} inputs holding {}",
        selected.len(),
        selected.total_balance
    );
    Ok(selected)
}
