//! Serde models for the loldrivers.io driver dataset.
//!
//! Based on the JSON schema published at
//! <https://github.com/magicsword-io/LOLDrivers/blob/validate/bin/spec/drivers.spec.json>.
//! Several fields in that schema are loosely typed: a value may arrive as a
//! single string or as an array, and `Commands` may arrive as a bare string
//! or as a structured object. All of that is normalized at deserialization
//! time so the rest of the program only ever sees lists.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry from the loldrivers.io dataset describing a known vulnerable
/// or known malicious driver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Created")]
    pub created: String,
    #[serde(rename = "MitreID")]
    pub mitre_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Verified")]
    pub verified: String,
    #[serde(rename = "Commands", deserialize_with = "commands_or_string")]
    pub commands: Vec<Command>,
    #[serde(rename = "Resources")]
    pub resources: Vec<String>,
    #[serde(rename = "Acknowledgement")]
    pub acknowledgement: Acknowledgement,
    #[serde(rename = "Detection")]
    pub detection: Vec<Detection>,
    #[serde(rename = "KnownVulnerableSamples")]
    pub known_vulnerable_samples: Vec<KnownSample>,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
}

/// Abuse instructions attached to a driver record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Usecase")]
    pub usecase: String,
    #[serde(rename = "Privileges")]
    pub privileges: String,
    #[serde(rename = "OperatingSystem")]
    pub operating_system: String,
}

/// Attribution for a driver record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Acknowledgement {
    #[serde(rename = "Person", deserialize_with = "string_or_seq")]
    pub person: Vec<String>,
    #[serde(rename = "Handle")]
    pub handle: String,
}

/// A detection resource (YARA/Sigma rule link) for a driver record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Detection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "value")]
    pub value: String,
}

/// One known-bad file sample: a filename plus up to three checksums.
///
/// An absent hash is represented by omission, an empty string, or the
/// dataset's literal `-` placeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownSample {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "MD5")]
    pub md5: Option<String>,
    #[serde(rename = "SHA1")]
    pub sha1: Option<String>,
    #[serde(rename = "SHA256")]
    pub sha256: Option<String>,
}

/// Filter out the dataset's "no value" markers (empty string and `-`).
pub fn sample_digest(value: &Option<String>) -> Option<&str> {
    match value.as_deref() {
        Some("") | Some("-") | None => None,
        Some(digest) => Some(digest),
    }
}

/// Deserialize a field that may be a single string, an array of strings,
/// null, or absent, into a plain list.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Flexible>::deserialize(deserializer)? {
        Some(Flexible::One(value)) => vec![value],
        Some(Flexible::Many(values)) => values,
        None => Vec::new(),
    })
}

/// Deserialize `Commands`, which may be a bare command string, a single
/// structured object, an array of objects, null, or absent.
fn commands_or_string<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        Full(Command),
        One(String),
        Many(Vec<Command>),
    }

    Ok(match Option::<Flexible>::deserialize(deserializer)? {
        Some(Flexible::Full(command)) => vec![command],
        Some(Flexible::One(value)) => vec![Command {
            command: value,
            ..Command::default()
        }],
        Some(Flexible::Many(commands)) => commands,
        None => Vec::new(),
    })
}
