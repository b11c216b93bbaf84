//! Fixture loading and management.

use serde::{Deserialize, Serialize};

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Engine entry point being tested (`print` or `scan`).
    pub function: String,
    /// Contract section the case exercises.
    pub spec_section: String,
    /// Input parameters (see [`crate::conformance`] for the schema).
    pub inputs: serde_json::Value,
    /// Expected canonical output.
    pub expected_output: String,
    /// Engine mode this case applies to: `tolerant`, `strict`, or `both`.
    pub mode: String,
}

/// A collection of fixture cases for one engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Family name (e.g. `stdio/print`).
    pub family: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    /// Individual test cases.
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        Ok(set)
    }

    /// Load every `*.json` fixture set in `dir`, sorted by file name.
    pub fn load_dir(dir: &std::path::Path) -> Result<Vec<Self>, Box<dyn std::error::Error>> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths.iter().map(|p| Self::from_file(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_set_roundtrips_through_json() {
        let set = FixtureSet {
            version: "v1".into(),
            family: "stdio/print".into(),
            captured_at: "2026-10-17T00:00:00Z".into(),
            cases: vec![FixtureCase {
                name: "int".into(),
                function: "print".into(),
                spec_section: "print/integer".into(),
                inputs: serde_json::json!({"format": "%d", "args": [{"int": 1}]}),
                expected_output: "1:1".into(),
                mode: "both".into(),
            }],
        };
        let json = set.to_json().unwrap();
        let back = FixtureSet::from_json(&json).unwrap();
        assert_eq!(back.cases.len(), 1);
        assert_eq!(back.cases[0].expected_output, "1:1");
        assert_eq!(back.family, "stdio/print");
    }
}
