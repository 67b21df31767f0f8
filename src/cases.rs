// src/cases.rs
use serde::Deserialize;
use std::path::Path;

use crate::config::AppConfig;
use crate::errors::{Result, SubmitError};

/// One labelled payload to submit. The label is the URL the payload encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub label: String,
    pub payload: Vec<u8>,
}

impl TestCase {
    /// Decodes a hex payload. Empty and malformed payloads are rejected.
    pub fn from_hex(label: impl Into<String>, hex_payload: &str) -> Result<Self> {
        let label = label.into();
        let payload = hex::decode(hex_payload.trim()).map_err(|e| SubmitError::InvalidCase {
            label: label.clone(),
            reason: format!("payload is not valid hex: {}", e),
        })?;

        if payload.is_empty() {
            return Err(SubmitError::InvalidCase {
                label,
                reason: "payload is empty".to_string(),
            });
        }

        Ok(Self { label, payload })
    }
}

/// A case as written in a TOML case file.
#[derive(Deserialize, Debug, Clone)]
pub struct CaseEntry {
    /// Label shown in the report
    pub name: String,

    /// Instruction data, hex encoded
    pub hex: String,
}

#[derive(Deserialize, Debug)]
struct CaseFile {
    #[serde(default, rename = "case")]
    cases: Vec<CaseEntry>,
}

/// URL payloads produced by the prefix/suffix table encoder.
const BUILTIN_SUITE: &[(&str, &str)] = &[
    ("http://localhost:3000", "026c6f63616c686f73743a33303030"),
    (
        "http://subdomain.localhost:3000",
        "02737562646f6d61696e2e6c6f63616c686f73743a33303030",
    ),
    ("https://localhost.net", "016c6f63616c686f737405"),
    ("https://google.com", "01676f6f676c6503"),
    ("https://a.a", "01612e61"),
    ("https://a.com", "016103"),
    (
        "https://git@github.com:username/repo.git",
        "0167697440676974687562033a757365726e616d652f7265706f07",
    ),
    (
        "https://a-really-long-url-that-probably-would-be-so-hard-to-actually-use-but-whatever.com",
        "01612d7265616c6c792d6c6f6e672d75726c2d746861742d70726f6261626c792d776f756c642d62652d736f2d686172642d746f2d61637475616c6c792d7573652d6275742d776861746576657203",
    ),
    ("https://🦝👀🍹🌏.net", "01f09fa69df09f9180f09f8db9f09f8c8f05"),
    (
        "https://something.yourcooldomain.com?query_param=123&val=true",
        "01736f6d657468696e672e796f7572636f6f6c646f6d61696e033f71756572795f706172616d3d3132332676616c3d74727565",
    ),
];

pub fn builtin_suite() -> Result<Vec<TestCase>> {
    BUILTIN_SUITE
        .iter()
        .map(|(name, hex)| TestCase::from_hex(*name, hex))
        .collect()
}

/// Parses a TOML document of `[[case]]` tables.
pub fn parse_case_file(contents: &str) -> Result<Vec<TestCase>> {
    let file: CaseFile = toml::from_str(contents)?;

    if file.cases.is_empty() {
        return Err(SubmitError::Config("Case file defines no [[case]] entries".to_string()));
    }

    file.cases
        .iter()
        .map(|entry| TestCase::from_hex(entry.name.clone(), &entry.hex))
        .collect()
}

pub fn load_case_file(path: &Path) -> Result<Vec<TestCase>> {
    let contents = std::fs::read_to_string(path)?;
    parse_case_file(&contents)
}

/// The case list for this run: the configured file, or the built-in suite.
pub fn load_cases(config: &AppConfig) -> Result<Vec<TestCase>> {
    match &config.cases_file {
        Some(path) => {
            log::info!("Loading test cases from {}", path.display());
            load_case_file(path)
        }
        None => builtin_suite(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_suite_decodes() {
        let suite = builtin_suite().unwrap();
        assert_eq!(suite.len(), 10);
        assert_eq!(suite[4].label, "https://a.a");
        assert_eq!(suite[4].payload, vec![0x01, 0x61, 0x2e, 0x61]);
        assert!(suite.iter().all(|case| !case.payload.is_empty()));
    }

    #[test]
    fn test_parse_case_file_keeps_order() {
        let contents = r#"
            [[case]]
            name = "https://google.com"
            hex = "01676f6f676c6503"

            [[case]]
            name = "https://a.com"
            hex = "016103"
        "#;

        let cases = parse_case_file(contents).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].label, "https://google.com");
        assert_eq!(cases[1].payload, vec![0x01, 0x61, 0x03]);
    }

    #[test]
    fn test_invalid_hex_is_rejected() {
        let err = TestCase::from_hex("bad", "0g").unwrap_err();
        assert!(matches!(err, SubmitError::InvalidCase { .. }));

        let odd = TestCase::from_hex("odd", "016").unwrap_err();
        assert!(odd.to_string().contains("odd"));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = TestCase::from_hex("empty", "").unwrap_err();
        assert!(err.to_string().contains("payload is empty"));
    }

    #[test]
    fn test_case_file_without_cases() {
        assert!(matches!(parse_case_file(""), Err(SubmitError::Config(_))));
        assert!(matches!(
            parse_case_file("[[case]]\nname = 1"),
            Err(SubmitError::TomlParse(_))
        ));
    }
}
