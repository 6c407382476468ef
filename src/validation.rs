use bs58;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid Solana address format: {0}")]
    InvalidSolanaAddress(String),
}

/// Which slice of the history a `GET /api/transactions` caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Only the in-process recent buffer.
    Recent,
    /// Buffer merged with the indexer history.
    Full,
}

impl FeedKind {
    /// Anything other than `recent` (including nothing) means the full feed.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("recent") => FeedKind::Recent,
            _ => FeedKind::Full,
        }
    }
}

pub fn validate_solana_address(address: &str) -> Result<(), ValidationError> {
    // Check if address is empty
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    // Decode base58 string
    let decoded = match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes,
        Err(_) => return Err(ValidationError::InvalidSolanaAddress(address.to_string())),
    };

    // Solana addresses are 32 bytes
    if decoded.len() != 32 {
        return Err(ValidationError::InvalidSolanaAddress(address.to_string()));
    }

    Ok(())
}
