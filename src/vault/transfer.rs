//! Encrypted whole-vault export and import.
//!
//! An export file is plain text with this layout:
//!
//! ```text
//! base64( [12-byte nonce][AES-256-GCM(payload JSON) + 16-byte tag] )
//! ```
//!
//! There is no header byte in front of the base64 text.  The version
//! lives inside the encrypted payload instead:
//!
//! ```text
//! {"format":"passvault-export","version":1,"entries":[ StoredEntry, ... ]}
//! ```
//!
//! Each entry still carries its original password/notes ciphertext, so
//! an export can only be imported into a vault unlocked with the same
//! master key.  A bare JSON array of entries (no envelope) is accepted
//! on import as well.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::entry::StoredEntry;
use super::records::parse_timestamp;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::MasterKey;
use crate::errors::{Result, VaultError};

/// Format tag written into every export payload.
pub const EXPORT_FORMAT: &str = "passvault-export";

/// Current export payload version.
pub const EXPORT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ExportDocumentRef<'a> {
    format: &'a str,
    version: u32,
    entries: &'a [StoredEntry],
}

#[derive(Deserialize)]
struct ExportDocument {
    format: String,
    version: u32,
    entries: Vec<StoredEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportPayload {
    Versioned(ExportDocument),
    Bare(Vec<StoredEntry>),
}

/// Serialize `entries`, encrypt them as one blob and base64-encode it.
pub fn seal_export(key: &MasterKey, entries: &[StoredEntry]) -> Result<String> {
    let document = ExportDocumentRef {
        format: EXPORT_FORMAT,
        version: EXPORT_VERSION,
        entries,
    };
    let payload = serde_json::to_vec(&document)
        .map_err(|e| VaultError::Serialization(format!("export payload: {e}")))?;

    let blob = encrypt(key.as_bytes(), &payload)?;
    Ok(BASE64.encode(blob))
}

/// Reverse `seal_export`.
///
/// Every decoding, decryption or parsing failure is an `InvalidVaultFile`,
/// and so is an entry the store would refuse or could not list back.
pub fn open_export(key: &MasterKey, contents: &str) -> Result<Vec<StoredEntry>> {
    let blob = BASE64
        .decode(contents.trim())
        .map_err(|e| VaultError::InvalidVaultFile(format!("not valid base64: {e}")))?;

    let payload = decrypt(key.as_bytes(), &blob).map_err(|_| {
        VaultError::InvalidVaultFile(
            "cannot decrypt — exported under a different master password, or corrupted".into(),
        )
    })?;

    let parsed: ExportPayload = serde_json::from_slice(&payload)
        .map_err(|e| VaultError::InvalidVaultFile(format!("payload JSON: {e}")))?;

    let entries = match parsed {
        ExportPayload::Versioned(doc) => {
            if doc.format != EXPORT_FORMAT {
                return Err(VaultError::InvalidVaultFile(format!(
                    "unknown format '{}'",
                    doc.format
                )));
            }
            if doc.version != EXPORT_VERSION {
                return Err(VaultError::InvalidVaultFile(format!(
                    "unsupported version {}, expected {EXPORT_VERSION}",
                    doc.version
                )));
            }
            doc.entries
        }
        ExportPayload::Bare(entries) => entries,
    };

    for (index, entry) in entries.iter().enumerate() {
        check_entry(index, entry)?;
    }
    Ok(entries)
}

fn check_entry(index: usize, entry: &StoredEntry) -> Result<()> {
    let invalid = |what: String| VaultError::InvalidVaultFile(format!("entry {index}: {what}"));

    if entry.title.trim().is_empty() {
        return Err(invalid("empty title".into()));
    }
    if entry.password.is_empty() {
        return Err(invalid("missing password ciphertext".into()));
    }
    for (field, value) in [("created_at", &entry.created_at), ("updated_at", &entry.updated_at)] {
        parse_timestamp(value).map_err(|_| invalid(format!("bad {field} '{value}'")))?;
    }
    Ok(())
}

/// Write an export file **atomically** with owner-only permissions.
///
/// The contents go to a temp file in the same directory which is then
/// renamed over `path`, so readers never see a half-written export.
/// On Unix the temp file is created 0600.  It is removed if any step fails.
pub fn write_export_file(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let written = write_private(&tmp_path, contents.as_bytes())
        .and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // `mode` only applies when the file is created; tighten a leftover temp file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(data)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded blob fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn base64_encode_opt<S>(
    data: &Option<Vec<u8>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match data {
        Some(bytes) => serializer.serialize_some(&BASE64.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn base64_decode_opt<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.is_empty() => BASE64
            .decode(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(title: &str) -> StoredEntry {
        StoredEntry {
            id: 7,
            title: title.to_string(),
            url: "https://example.com".into(),
            username: "alice".into(),
            category: "web".into(),
            password: vec![1, 2, 3, 4],
            notes: None,
            created_at: "2024-01-02T03:04:05.678Z".into(),
            updated_at: "2024-01-02T03:04:05.678Z".into(),
        }
    }

    #[test]
    fn sealed_export_opens_with_same_key() {
        let key = MasterKey::new([0x42u8; 32]);
        let entries = vec![sample_entry("GitHub"), sample_entry("Mail")];

        let sealed = seal_export(&key, &entries).unwrap();
        let opened = open_export(&key, &sealed).unwrap();
        assert_eq!(opened, entries);
    }

    #[test]
    fn export_text_is_printable_base64() {
        let key = MasterKey::new([0x01u8; 32]);
        let sealed = seal_export(&key, &[sample_entry("A")]).unwrap();
        assert!(sealed.bytes().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn open_export_with_other_key_is_invalid_file() {
        let key = MasterKey::new([0x42u8; 32]);
        let other = MasterKey::new([0x43u8; 32]);
        let sealed = seal_export(&key, &[sample_entry("A")]).unwrap();

        let err = open_export(&other, &sealed).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }

    #[test]
    fn open_export_rejects_garbage() {
        let key = MasterKey::new([0x42u8; 32]);
        let err = open_export(&key, "this is not base64 !!!").unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }

    #[test]
    fn open_export_accepts_bare_entry_list() {
        let key = MasterKey::new([0x42u8; 32]);
        let payload = serde_json::to_vec(&vec![sample_entry("Legacy")]).unwrap();
        let blob = encrypt(key.as_bytes(), &payload).unwrap();

        let opened = open_export(&key, &BASE64.encode(blob)).unwrap();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].title, "Legacy");
    }

    #[test]
    fn open_export_rejects_unknown_version() {
        let key = MasterKey::new([0x42u8; 32]);
        let payload = br#"{"format":"passvault-export","version":99,"entries":[]}"#;
        let blob = encrypt(key.as_bytes(), payload).unwrap();

        let err = open_export(&key, &BASE64.encode(blob)).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }

    #[test]
    fn notes_blob_survives_serialization() {
        let mut entry = sample_entry("Notes");
        entry.notes = Some(vec![9, 8, 7]);

        let json = serde_json::to_string(&entry).unwrap();
        let back: StoredEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.notes, Some(vec![9, 8, 7]));
    }

    #[test]
    fn write_export_file_replaces_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("backup.pvx");

        write_export_file(&path, "first").unwrap();
        write_export_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join(".backup.pvx.tmp").exists());
    }

    #[test]
    fn failed_export_write_leaves_no_temp_file() {
        let dir = tempfile::TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a rename.
        let path = dir.path().join("backup.pvx");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_export_file(&path, "contents").is_err());
        assert!(!dir.path().join(".backup.pvx.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn stale_temp_file_is_tightened_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let tmp = dir.path().join(".backup.pvx.tmp");
        fs::write(&tmp, "stale").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

        let path = dir.path().join("backup.pvx");
        write_export_file(&path, "fresh").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    fn seal_raw(key: &MasterKey, entries: &[StoredEntry]) -> String {
        let payload = serde_json::to_vec(&entries).unwrap();
        BASE64.encode(encrypt(key.as_bytes(), &payload).unwrap())
    }

    #[test]
    fn open_export_rejects_unparseable_timestamp() {
        let key = MasterKey::new([0x42u8; 32]);
        let mut entry = sample_entry("Dated");
        entry.created_at = "yesterday".into();

        let sealed = seal_export(&key, &[sample_entry("Fine"), entry]).unwrap();
        let err = open_export(&key, &sealed).unwrap_err();
        match err {
            VaultError::InvalidVaultFile(msg) => {
                assert!(msg.contains("entry 1"));
                assert!(msg.contains("created_at"));
            }
            other => panic!("expected InvalidVaultFile, got {other:?}"),
        }

        let mut entry = sample_entry("Dated");
        entry.updated_at = "2024-01-02 03:04:05".into();
        let err = open_export(&key, &seal_raw(&key, &[entry])).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }

    #[test]
    fn open_export_rejects_empty_title() {
        let key = MasterKey::new([0x42u8; 32]);
        let sealed = seal_export(&key, &[sample_entry("   ")]).unwrap();

        let err = open_export(&key, &sealed).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }

    #[test]
    fn open_export_rejects_missing_password_blob() {
        let key = MasterKey::new([0x42u8; 32]);
        let mut entry = sample_entry("Empty");
        entry.password.clear();

        let err = open_export(&key, &seal_raw(&key, &[entry])).unwrap_err();
        assert!(matches!(err, VaultError::InvalidVaultFile(_)));
    }
}
