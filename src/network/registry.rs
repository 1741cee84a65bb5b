use std::collections::BTreeSet;

use log::debug;
use url::Url;

use crate::error::LedgerError;

/// Reduce a peer address to `host[:port]`.
///
/// Accepts full URLs (`http://10.0.0.2:5000/`) as well as bare `host:port`
/// strings; scheme, path and query are dropped.
pub fn normalize_address(address: &str) -> Result<String, LedgerError> {
    let trimmed = address.trim();
    let invalid = || LedgerError::InvalidNodeAddress(address.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Known peers, deduplicated after normalization.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one peer. Returns `false` if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool, LedgerError> {
        let node = normalize_address(address)?;
        let added = self.nodes.insert(node.clone());
        debug!("NODES - register {address} -> {node} (new={added})");
        Ok(added)
    }

    /// Add several peers at once; nothing is inserted unless every address
    /// parses. Returns how many were new.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize, LedgerError> {
        let normalized = addresses
            .iter()
            .map(|a| normalize_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut added = 0;
        for node in &normalized {
            if self.register(node)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Peers in sorted order.
    pub fn nodes(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(
            normalize_address("http://192.168.0.5:5000").unwrap(),
            "192.168.0.5:5000"
        );
        assert_eq!(
            normalize_address("https://node.example:8443/chain?x=1").unwrap(),
            "node.example:8443"
        );
        assert_eq!(normalize_address("localhost:5001").unwrap(), "localhost:5001");
        assert_eq!(normalize_address("  10.0.0.1:80  ").unwrap(), "10.0.0.1");
        assert_eq!(normalize_address("http://[::1]:5000/").unwrap(), "[::1]:5000");
    }

    #[test]
    fn rejects_unparseable_addresses() {
        for bad in ["", "   ", "http://", "http://:5000", "host:notaport"] {
            assert_eq!(
                normalize_address(bad),
                Err(LedgerError::InvalidNodeAddress(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = NodeRegistry::new();
        assert_eq!(registry.register("http://127.0.0.1:5001"), Ok(true));
        assert_eq!(registry.register("127.0.0.1:5001"), Ok(false));
        assert_eq!(registry.register("http://127.0.0.1:5001/"), Ok(false));
        assert_eq!(registry.nodes(), vec!["127.0.0.1:5001".to_string()]);
    }

    #[test]
    fn register_all_is_all_or_nothing() {
        let mut registry = NodeRegistry::new();
        let err = registry.register_all(&["http://a:1", "http://"]);
        assert!(err.is_err());
        assert!(registry.is_empty());

        let added = registry
            .register_all(&["http://b:2", "http://a:1", "a:1"])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(registry.nodes(), vec!["a:1".to_string(), "b:2".to_string()]);
        assert_eq!(registry.len(), 2);
    }
}
