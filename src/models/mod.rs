// Transaction as served to clients, plus the upstream (Helius) record shape

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub signature: String,
    pub timestamp: i64,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl Transaction {
    pub fn new(
        signature: impl Into<String>,
        timestamp: i64,
        amount: f64,
        kind: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            timestamp,
            amount,
            kind: kind.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One leg of a token transfer as reported by the indexer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeliusTokenTransfer {
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
    #[serde(default)]
    pub token_amount: Option<f64>,
}

/// Enriched transaction record returned by `v0/addresses/{address}/transactions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeliusTransaction {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub token_transfers: Option<Vec<HeliusTokenTransfer>>,
}

impl From<HeliusTransaction> for Transaction {
    // Only the first transfer leg is surfaced.
    fn from(record: HeliusTransaction) -> Self {
        let leg = record
            .token_transfers
            .and_then(|legs| legs.into_iter().next())
            .unwrap_or_default();

        Self {
            signature: record.signature,
            timestamp: record.timestamp.unwrap_or(0),
            amount: leg.token_amount.unwrap_or(0.0),
            kind: record.kind.unwrap_or_default(),
            from: leg.from_user_account.unwrap_or_default(),
            to: leg.to_user_account.unwrap_or_default(),
        }
    }
}
