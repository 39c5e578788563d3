//! Peer set configuration.
//!
//! # Responsibilities
//! - Parse the comma-separated peer list
//! - Keep peers in configuration order
//! - Build the uppercase URL for each peer

use url::Url;

/// Path the uppercase operation is served on.
pub const UPPERCASE_PATH: &str = "/uppercase";

/// Error type for peer addresses.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    #[error("invalid peer address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("peer address {0:?} has no host")]
    MissingHost(String),
}

/// Ordered list of remote peers. Empty means no proxying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerSet {
    peers: Vec<String>,
}

impl PeerSet {
    /// Parse `"host:port,host:port"`. Whitespace is trimmed and empty entries
    /// are dropped, so `""` gives an empty set.
    pub fn parse(list: &str) -> Self {
        Self::from_addresses(list.split(','))
    }

    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers = addresses
            .into_iter()
            .map(|a| a.as_ref().trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        Self { peers }
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(String::as_str)
    }

    /// Uppercase URL of every peer, in order.
    pub fn uppercase_urls(&self) -> Result<Vec<Url>, PeerError> {
        self.iter().map(uppercase_url).collect()
    }
}

impl std::fmt::Display for PeerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.peers.join(" "))
    }
}

/// `http://<address>/uppercase`. Addresses that already carry an http(s)
/// scheme keep it.
pub fn uppercase_url(address: &str) -> Result<Url, PeerError> {
    let base = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    let mut url = Url::parse(&base).map_err(|source| PeerError::InvalidAddress {
        address: address.to_string(),
        source,
    })?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(PeerError::MissingHost(address.to_string()));
    }
    url.set_path(UPPERCASE_PATH);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order() {
        let peers = PeerSet::parse("localhost:8001, localhost:8002,localhost:8003");
        assert_eq!(
            peers.iter().collect::<Vec<_>>(),
            ["localhost:8001", "localhost:8002", "localhost:8003"]
        );
        assert_eq!(peers.to_string(), "[localhost:8001 localhost:8002 localhost:8003]");
    }

    #[test]
    fn test_parse_empty() {
        assert!(PeerSet::parse("").is_empty());
        assert!(PeerSet::parse(" , ,").is_empty());
    }

    #[test]
    fn test_uppercase_url() {
        let url = uppercase_url("localhost:8001").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/uppercase");

        let url = uppercase_url("https://peer.internal").unwrap();
        assert_eq!(url.as_str(), "https://peer.internal/uppercase");
    }

    #[test]
    fn test_invalid_address() {
        assert!(uppercase_url("local host:80").is_err());
        assert!(PeerSet::parse("ok:1,bad host:2").uppercase_urls().is_err());
    }
}
