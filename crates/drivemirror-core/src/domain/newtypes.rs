//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// UUID-based ID types
// ============================================================================

/// Identifier for a [`FileRecord`](super::file_record::FileRecord)
///
/// Opaque and immutable for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random RecordId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a RecordId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Create a nil (all zeros) RecordId
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid UUID: {e}")))
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Blob store addressing
// ============================================================================

/// Relative path of a blob inside the local blob store
///
/// Assigned when content enters the system and reassigned (never mutated in
/// place) when content is replaced. Always a plain relative path: no leading
/// slash, no empty or dot segments, no traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Create a new StorageKey
    ///
    /// # Errors
    /// Returns error if the key is empty, absolute, or contains traversal
    /// or otherwise unsafe segments
    pub fn new(key: String) -> Result<Self, DomainError> {
        if key.is_empty() {
            return Err(DomainError::InvalidStorageKey(
                "Storage key cannot be empty".to_string(),
            ));
        }

        if key.starts_with('/') {
            return Err(DomainError::InvalidStorageKey(format!(
                "Storage key must be relative: {key}"
            )));
        }

        if key.contains('\\') || key.contains('\0') {
            return Err(DomainError::InvalidStorageKey(format!(
                "Storage key contains invalid characters: {key}"
            )));
        }

        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(DomainError::InvalidStorageKey(format!(
                    "Storage key contains invalid segment: {key}"
                )));
            }
        }

        Ok(Self(key))
    }

    /// Generate a fresh collision-free key for a new piece of content
    ///
    /// The key is a random UUID, keeping the original file extension when it
    /// is plain ASCII alphanumeric so that on-disk blobs stay recognisable.
    /// The display name itself never becomes part of the key.
    #[must_use]
    pub fn generate(original_name: &str) -> Self {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

        let key = match ext {
            Some(e) => format!("{}.{e}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        Self(key)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StorageKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for StorageKey {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

// ============================================================================
// Remote backend types
// ============================================================================

/// Google Drive file ID (URL-safe identifier)
///
/// Format: URL-safe string, typically like "1vQ5ab_X9yZ3cD4eF5gH6iJ7kL8mN9oP"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteFileId(String);

impl RemoteFileId {
    /// Create a new RemoteFileId
    ///
    /// # Errors
    /// Returns error if the ID format is invalid
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteFileId(
                "Remote file ID cannot be empty".to_string(),
            ));
        }

        // Drive IDs are URL-safe: letters, digits, hyphen, underscore
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidRemoteFileId(format!(
                "Remote file ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteFileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteFileId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteFileId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteFileId> for String {
    fn from(id: RemoteFileId) -> Self {
        id.0
    }
}

// ============================================================================
// Content metadata
// ============================================================================

/// An IANA-style media type, e.g. "application/pdf"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MimeType(String);

impl MimeType {
    /// Create a new MimeType
    ///
    /// # Errors
    /// Returns error if the value is not a `type/subtype` pair
    pub fn new(mime: String) -> Result<Self, DomainError> {
        if mime.is_empty() {
            return Err(DomainError::InvalidMimeType(
                "Mime type cannot be empty".to_string(),
            ));
        }

        let parts: Vec<&str> = mime.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(DomainError::InvalidMimeType(format!(
                "Mime type must be 'type/subtype': {mime}"
            )));
        }

        if mime.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidMimeType(format!(
                "Mime type contains whitespace or control characters: {mime}"
            )));
        }

        Ok(Self(mime))
    }

    /// The fallback type for content of unknown shape
    #[must_use]
    pub fn octet_stream() -> Self {
        Self("application/octet-stream".to_string())
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MimeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MimeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for MimeType {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MimeType> for String {
    fn from(mime: MimeType) -> Self {
        mime.0
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod record_id_tests {
        use super::*;

        #[test]
        fn test_new_creates_unique_ids() {
            let id1 = RecordId::new();
            let id2 = RecordId::new();
            assert_ne!(id1, id2);
        }

        #[test]
        fn test_display() {
            let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
            let id = RecordId::from_uuid(uuid);
            assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn test_from_str_valid() {
            let id: RecordId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
            assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        }

        #[test]
        fn test_from_str_invalid() {
            let result: Result<RecordId, _> = "not-a-uuid".parse();
            assert!(result.is_err());
        }

        #[test]
        fn test_nil() {
            assert_eq!(RecordId::nil().as_uuid(), &Uuid::nil());
        }

        #[test]
        fn test_serde_roundtrip() {
            let id = RecordId::new();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: RecordId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }
    }

    mod storage_key_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let key = StorageKey::new("abc123.pdf".to_string()).unwrap();
            assert_eq!(key.as_str(), "abc123.pdf");
        }

        #[test]
        fn test_nested_valid() {
            let key = StorageKey::new("2026/08/abc123.pdf".to_string()).unwrap();
            assert_eq!(key.as_str(), "2026/08/abc123.pdf");
        }

        #[test]
        fn test_empty_fails() {
            assert!(StorageKey::new(String::new()).is_err());
        }

        #[test]
        fn test_absolute_fails() {
            assert!(StorageKey::new("/etc/passwd".to_string()).is_err());
        }

        #[test]
        fn test_traversal_fails() {
            assert!(StorageKey::new("../outside".to_string()).is_err());
            assert!(StorageKey::new("a/../b".to_string()).is_err());
        }

        #[test]
        fn test_empty_segment_fails() {
            assert!(StorageKey::new("a//b".to_string()).is_err());
        }

        #[test]
        fn test_backslash_fails() {
            assert!(StorageKey::new("a\\b".to_string()).is_err());
        }

        #[test]
        fn test_generate_keeps_extension() {
            let key = StorageKey::generate("report.pdf");
            assert!(key.as_str().ends_with(".pdf"));
            // 36 UUID chars + ".pdf"
            assert_eq!(key.as_str().len(), 40);
        }

        #[test]
        fn test_generate_without_extension() {
            let key = StorageKey::generate("README");
            assert_eq!(key.as_str().len(), 36);
        }

        #[test]
        fn test_generate_drops_suspicious_extension() {
            let key = StorageKey::generate("weird.t x t");
            assert!(!key.as_str().contains(' '));
        }

        #[test]
        fn test_generate_unique() {
            let k1 = StorageKey::generate("a.txt");
            let k2 = StorageKey::generate("a.txt");
            assert_ne!(k1, k2);
        }

        #[test]
        fn test_serde_rejects_invalid() {
            let result: Result<StorageKey, _> = serde_json::from_str("\"../escape\"");
            assert!(result.is_err());
        }
    }

    mod remote_file_id_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let id = RemoteFileId::new("1vQ5ab_X9yZ3cD4eF5gH6iJ7kL8mN9oP".to_string()).unwrap();
            assert_eq!(id.as_str(), "1vQ5ab_X9yZ3cD4eF5gH6iJ7kL8mN9oP");
        }

        #[test]
        fn test_empty_fails() {
            assert!(RemoteFileId::new(String::new()).is_err());
        }

        #[test]
        fn test_invalid_characters_fail() {
            assert!(RemoteFileId::new("id with spaces".to_string()).is_err());
            assert!(RemoteFileId::new("id/slash".to_string()).is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let id = RemoteFileId::new("drive-file-001".to_string()).unwrap();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: RemoteFileId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }
    }

    mod mime_type_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let mime = MimeType::new("application/pdf".to_string()).unwrap();
            assert_eq!(mime.as_str(), "application/pdf");
        }

        #[test]
        fn test_missing_subtype_fails() {
            assert!(MimeType::new("application".to_string()).is_err());
            assert!(MimeType::new("application/".to_string()).is_err());
        }

        #[test]
        fn test_extra_slash_fails() {
            assert!(MimeType::new("a/b/c".to_string()).is_err());
        }

        #[test]
        fn test_whitespace_fails() {
            assert!(MimeType::new("text/ plain".to_string()).is_err());
        }

        #[test]
        fn test_octet_stream() {
            assert_eq!(
                MimeType::octet_stream().as_str(),
                "application/octet-stream"
            );
        }

        #[test]
        fn test_with_parameters() {
            // Parameterised types are out of scope; the plus suffix is fine
            let mime = MimeType::new("image/svg+xml".to_string()).unwrap();
            assert_eq!(mime.as_str(), "image/svg+xml");
        }
    }
}
