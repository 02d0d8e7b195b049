// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Launchbench Developers

//! Per-user secrets store resolution.
//!
//! Projects that declare a user-secrets identifier get a signing key
//! injected into the subject's environment. A declared identifier with no
//! store on disk is a hard error (the run cannot reproduce the deployment
//! it is meant to measure); a store without the signing key is not - the
//! key is optional even when the store exists.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SecretsError;

/// Environment variable receiving the resolved signing key.
pub const JWT_SIGNING_KEY_VAR: &str = "JWT_SIGNING_KEY";

/// JSON key holding the signing-key records inside the store.
const SIGNING_KEYS_KEY: &str = "Authentication:Schemes:Bearer:SigningKeys";

/// Issuer whose record carries the key we inject.
const SIGNING_KEY_ISSUER: &str = "dotnet-user-jwts";

/// Project-file element declaring the secrets identifier.
const SECRETS_ID_TAG: &str = "UserSecretsId";

#[derive(Debug, Deserialize)]
struct SigningKeyRecord {
    #[serde(rename = "Issuer")]
    issuer: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Default per-user secrets store root (`~/.microsoft/usersecrets`).
/// Falls back to a relative location when no home directory is known.
pub fn default_store_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".microsoft")
        .join("usersecrets")
}

/// Path of the secrets file for one identifier under a store root.
pub fn store_path(store_root: &Path, id: &str) -> PathBuf {
    store_root.join(id).join("secrets.json")
}

/// Resolve the environment binding for a project's secrets identifier.
///
/// Returns `Ok(None)` when no identifier is declared, or when the store
/// exists but holds no record issued by `dotnet-user-jwts`.
///
/// # Errors
/// `SecretsError::StoreMissing` when an identifier is declared but the
/// store file is absent (the error names the remediation command), and
/// `SecretsError::StoreParse` on malformed stores.
pub fn resolve(
    store_root: &Path,
    id: Option<&str>,
) -> Result<Option<(String, String)>, SecretsError> {
    let Some(id) = id else {
        return Ok(None);
    };

    let path = store_path(store_root, id);
    if !path.is_file() {
        return Err(SecretsError::StoreMissing {
            id: id.to_string(),
            path,
        });
    }

    let content = std::fs::read_to_string(&path).map_err(|e| SecretsError::StoreRead {
        path: path.clone(),
        source: e,
    })?;

    let store: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| SecretsError::StoreParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

    let Some(keys) = store.get(SIGNING_KEYS_KEY) else {
        tracing::debug!(id = %id, "Secrets store has no signing keys; nothing to inject");
        return Ok(None);
    };

    let records: Vec<SigningKeyRecord> =
        serde_json::from_value(keys.clone()).map_err(|e| SecretsError::StoreParse {
            path,
            message: format!("malformed '{}' entry: {}", SIGNING_KEYS_KEY, e),
        })?;

    let binding = records
        .into_iter()
        .find(|r| r.issuer == SIGNING_KEY_ISSUER)
        .map(|r| (JWT_SIGNING_KEY_VAR.to_string(), r.value));

    if binding.is_some() {
        tracing::debug!(id = %id, "Resolved signing key from user secrets store");
    }

    Ok(binding)
}

/// Read the `<UserSecretsId>` declared by a project file, if any.
///
/// The project file is treated as a simple structured-file input; only the
/// one element matters here.
pub fn user_secrets_id(project_file: &Path) -> Result<Option<String>, SecretsError> {
    if !project_file.is_file() {
        return Ok(None);
    }

    let content =
        std::fs::read_to_string(project_file).map_err(|e| SecretsError::ProjectFileRead {
            path: project_file.to_path_buf(),
            source: e,
        })?;

    let open = format!("<{}>", SECRETS_ID_TAG);
    let close = format!("</{}>", SECRETS_ID_TAG);

    let Some(start) = content.find(&open) else {
        return Ok(None);
    };
    let rest = &content[start + open.len()..];
    let Some(end) = rest.find(&close) else {
        return Ok(None);
    };

    let id = rest[..end].trim();
    if id.is_empty() {
        Ok(None)
    } else {
        Ok(Some(id.to_string()))
    }
}
