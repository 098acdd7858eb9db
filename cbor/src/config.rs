pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits and options applied when decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Maximum nesting of containers and tags before decoding fails
    #[cfg_attr(feature = "serde", serde(rename = "max-depth"))]
    pub max_depth: usize,

    /// Fold tag 2/3 bignums into `Value::Integer` when they fit an `i128` but
    /// not the native -2^64..2^64-1 range, which is how the encoder writes
    /// such integers. Smaller bignums always stay tagged.
    #[cfg_attr(feature = "serde", serde(rename = "decode-bignums"))]
    pub decode_bignums: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            decode_bignums: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_depth, 256);
        assert!(config.decode_bignums);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"max-depth": 8}"#).unwrap();
        assert_eq!(config.max_depth, 8);
        assert!(config.decode_bignums);

        let config: Config = serde_json::from_str(r#"{"decode-bignums": false}"#).unwrap();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!config.decode_bignums);
    }
}
