//! Resident directory backends

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use doorman_config::ResidentEntry;
use doorman_core::{DirectoryError, ResidentDirectory, ResidentLookup};

/// Normalize for comparison: trimmed, lowercased, single-spaced
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// In-memory directory built from configuration
///
/// Matching ignores case and extra whitespace.
#[derive(Debug, Default)]
pub struct StaticResidentDirectory {
    residents: HashMap<String, HashSet<String>>,
}

impl StaticResidentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ResidentEntry>) -> Self {
        let mut directory = Self::new();
        for entry in entries {
            directory.add(&entry.apartment, &entry.name);
        }
        directory
    }

    /// Add a resident to an apartment
    pub fn add(&mut self, apartment: &str, name: &str) {
        self.residents
            .entry(normalize(apartment))
            .or_default()
            .insert(normalize(name));
    }

    pub fn len(&self) -> usize {
        self.residents.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResidentDirectory for StaticResidentDirectory {
    async fn lookup(
        &self,
        apartment_number: &str,
        resident_name: &str,
    ) -> Result<ResidentLookup, DirectoryError> {
        let exists = self
            .residents
            .get(&normalize(apartment_number))
            .is_some_and(|names| names.contains(&normalize(resident_name)));

        tracing::debug!(
            apartment = %apartment_number,
            exists,
            "Static directory lookup"
        );

        Ok(ResidentLookup { exists })
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Remote directory service
///
/// Issues `GET {endpoint}?apartment=..&resident=..` and expects
/// `{"exists": bool}`.
pub struct HttpResidentDirectory {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: u64,
}

impl HttpResidentDirectory {
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout_ms,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> DirectoryError {
        if err.is_timeout() {
            DirectoryError::Timeout(self.timeout_ms)
        } else if err.is_decode() {
            DirectoryError::InvalidResponse(err.to_string())
        } else {
            DirectoryError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl ResidentDirectory for HttpResidentDirectory {
    async fn lookup(
        &self,
        apartment_number: &str,
        resident_name: &str,
    ) -> Result<ResidentLookup, DirectoryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("apartment", apartment_number), ("resident", resident_name)])
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "Directory returned error status"
            );
            return Err(DirectoryError::Unavailable(format!(
                "directory returned status {}",
                status
            )));
        }

        response
            .json::<ResidentLookup>()
            .await
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_lookup() {
        let mut directory = StaticResidentDirectory::new();
        directory.add("12B", "Alice Smith");

        let found = directory.lookup("12b", "  alice   SMITH ").await.unwrap();
        assert!(found.exists);

        let wrong_apartment = directory.lookup("12C", "Alice Smith").await.unwrap();
        assert!(!wrong_apartment.exists);

        let wrong_name = directory.lookup("12B", "Bob").await.unwrap();
        assert!(!wrong_name.exists);
    }

    #[tokio::test]
    async fn test_from_entries() {
        let entries = vec![
            ResidentEntry {
                apartment: "4C".to_string(),
                name: "Carol".to_string(),
            },
            ResidentEntry {
                apartment: "4C".to_string(),
                name: "Dan".to_string(),
            },
        ];
        let directory = StaticResidentDirectory::from_entries(&entries);
        assert_eq!(directory.len(), 2);
        assert!(directory.lookup("4C", "Dan").await.unwrap().exists);
        assert!(!directory.lookup("4C", "NoSuchPerson").await.unwrap().exists);
    }

    #[tokio::test]
    async fn test_http_unreachable_is_unavailable() {
        // Nothing listens on port 9 locally
        let directory = HttpResidentDirectory::new("http://127.0.0.1:9/residents", 500).unwrap();
        let err = directory.lookup("12B", "Alice").await.unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Unavailable(_) | DirectoryError::Timeout(_)
        ));
    }
}
