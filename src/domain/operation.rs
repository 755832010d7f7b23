//! Operation kind. Closed enumeration: a wallet operation is either a
//! deposit or a withdrawal, nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPERATION_KINDS: &[&str] = &["DEPOSIT", "WITHDRAW"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Deposit,
    Withdraw,
}

impl OperationKind {
    /// Wire/storage representation, as stored in `wallet_operations.operation_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
        }
    }

    /// Parses the wire representation. Case-sensitive: `deposit` is not a
    /// valid operation type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DEPOSIT" => Some(OperationKind::Deposit),
            "WITHDRAW" => Some(OperationKind::Withdraw),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(OperationKind::parse("DEPOSIT"), Some(OperationKind::Deposit));
        assert_eq!(OperationKind::parse("WITHDRAW"), Some(OperationKind::Withdraw));
    }

    #[test]
    fn rejects_unknown_kinds() {
        assert_eq!(OperationKind::parse("TRANSFER"), None);
        assert_eq!(OperationKind::parse("deposit"), None);
        assert_eq!(OperationKind::parse(""), None);
        assert_eq!(OperationKind::parse(" DEPOSIT"), None);
    }

    #[test]
    fn round_trips_as_str() {
        for kind in [OperationKind::Deposit, OperationKind::Withdraw] {
            assert_eq!(OperationKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn serializes_to_wire_form() {
        let json = serde_json::to_string(&OperationKind::Withdraw).unwrap();
        assert_eq!(json, "\"WITHDRAW\"");
    }
}
