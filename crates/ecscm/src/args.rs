// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argument value types.

use std::str::FromStr;

use ecscm_core::types::CredentialType;

/// `name=value`; the value may be empty and may contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn into_pair(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl FromStr for KeyValue {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing name in '{raw}'"));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// `id=kind:user` for a credential row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialArg {
    pub id: String,
    pub kind: CredentialType,
    pub user_name: String,
}

impl FromStr for CredentialArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let KeyValue { key, value } = raw.parse()?;
        let (kind, user) = value
            .split_once(':')
            .ok_or_else(|| format!("expected ID=KIND:USER, got '{raw}'"))?;
        let kind = CredentialType::from_str(kind.trim()).map_err(|_| {
            format!("unknown credential kind '{kind}' (expected password, key or choose)")
        })?;
        Ok(Self {
            id: key,
            kind,
            user_name: user.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_splits_on_first_equals() {
        let kv: KeyValue = "filter=a=b".parse().unwrap();
        assert_eq!(kv.into_pair(), ("filter".to_string(), "a=b".to_string()));

        let empty: KeyValue = "desc=".parse().unwrap();
        assert_eq!(empty.value, "");
    }

    #[test]
    fn key_value_requires_a_name() {
        assert!("novalue".parse::<KeyValue>().is_err());
        assert!("=x".parse::<KeyValue>().is_err());
    }

    #[test]
    fn credential_arg_parses_kind_and_user() {
        let arg: CredentialArg = "credential=key:git".parse().unwrap();
        assert_eq!(arg.id, "credential");
        assert_eq!(arg.kind, CredentialType::Key);
        assert_eq!(arg.user_name, "git");
    }

    #[test]
    fn credential_arg_rejects_unknown_kind() {
        let err = "credential=token:git".parse::<CredentialArg>().unwrap_err();
        assert!(err.contains("unknown credential kind 'token'"), "{err}");
        assert!("credential=git".parse::<CredentialArg>().is_err());
    }
}
