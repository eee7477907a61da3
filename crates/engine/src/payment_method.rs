//! Payment method vocabulary shared by expenses and income.

use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    CreditCard,
    DebitCard,
    NetBanking,
    Wallet,
    Cash,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        Self::Upi,
        Self::CreditCard,
        Self::DebitCard,
        Self::NetBanking,
        Self::Wallet,
        Self::Cash,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::NetBanking => "net_banking",
            Self::Wallet => "wallet",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "upi" => Ok(Self::Upi),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "net_banking" => Ok(Self::NetBanking),
            "wallet" => Ok(Self::Wallet),
            "cash" => Ok(Self::Cash),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}
