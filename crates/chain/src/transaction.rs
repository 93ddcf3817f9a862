use {
    derive_more::{Display, From, Into},
    serde::{Deserialize, Serialize},
};

/// Identifier of a submitted transaction.
///
/// The value is opaque: only the client that issued it knows how to
/// interpret it.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHash(pub String);

impl From<&str> for TransactionHash {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Address of a deployed contract, as reported by the node.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractAddress(pub String);

impl From<&str> for ContractAddress {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A contract deployment as handed to the node.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployRequest {
    /// Contract source code.
    pub code: String,
    /// Constructor arguments in order.
    pub args: Vec<serde_json::Value>,
}

/// Lifecycle of a transaction on the node.
///
/// Nodes report the status either by name or by its numeric code, which is
/// the discriminant below.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "StatusRepr")]
#[repr(u8)]
pub enum TransactionStatus {
    Uninitialized = 0,
    Pending = 1,
    Proposing = 2,
    Committing = 3,
    Revealing = 4,
    Accepted = 5,
    Undetermined = 6,
    Finalized = 7,
    Canceled = 8,
    AppealRevealing = 9,
    AppealCommitting = 10,
    ReadyToFinalize = 11,
    ValidatorsTimeout = 12,
    LeaderTimeout = 13,
}

impl TransactionStatus {
    /// Whether a transaction in this status satisfies a wait for `target`.
    /// A finalized transaction has necessarily been accepted before.
    pub fn has_reached(self, target: Self) -> bool {
        self == target || (target == Self::Accepted && self == Self::Finalized)
    }

    /// Whether the transaction can no longer reach any other status.
    pub fn is_rejected(self) -> bool {
        matches!(self, Self::Canceled)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<StatusRepr> for TransactionStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusRepr::Code(code) => Self::from_repr(code)
                .ok_or_else(|| format!("unknown transaction status code {code}")),
            StatusRepr::Name(name) => name
                .parse::<Self>()
                .ok()
                .or_else(|| name.parse::<u8>().ok().and_then(Self::from_repr))
                .ok_or_else(|| format!("unknown transaction status {name:?}")),
        }
    }
}

/// Outcome of a transaction once it reached the status that was waited for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub hash: TransactionHash,
    pub status: TransactionStatus,
    /// Set for deployments only.
    pub contract_address: Option<ContractAddress>,
}
