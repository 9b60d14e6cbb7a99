//! Options for validation and example generation.

use serde::{Deserialize, Serialize};

/// Options for example synthesis.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `required-only`, `max-depth`),
/// matching the other option structs of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExampleOptions {
    /// Emit only the properties listed in `required`.
    pub required_only: bool,
    /// Maximum object/array nesting before containers collapse to empty
    /// placeholders. Guards against self-referential schemas that survived
    /// upstream dereferencing.
    pub max_depth: usize,
}

impl Default for ExampleOptions {
    fn default() -> Self {
        Self {
            required_only: false,
            max_depth: 8,
        }
    }
}

/// Options for payload validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidateOptions {
    /// Maximum nesting the validator descends into. Anything deeper is skipped
    /// (and logged) rather than risking stack exhaustion.
    pub max_depth: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_options_serde_round_trip() {
        let opts = ExampleOptions {
            required_only: true,
            max_depth: 3,
        };

        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"required-only\""));
        assert!(json.contains("\"max-depth\""));

        let deserialized: ExampleOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, opts);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let opts: ExampleOptions = serde_json::from_str(r#"{"required-only": true}"#).unwrap();
        assert!(opts.required_only);
        assert_eq!(opts.max_depth, ExampleOptions::default().max_depth);

        let opts: ValidateOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.max_depth, 64);
    }
}
