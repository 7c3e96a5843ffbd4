use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hintln;

/// Container for detecting and warning user about unused config values
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unused(BTreeMap<String, toml::Value>);

impl Unused {
    /// Keys that were present in the config but not recognized
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn check(&self) {
        for key in self.keys() {
            hintln!("Warning", "config `{}` is unused", key);
        }
    }

    pub fn check_prefixed(&self, prefix: &str) {
        for key in self.keys() {
            hintln!("Warning", "config `{}.{}` is unused", prefix, key);
        }
    }
}
