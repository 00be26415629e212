use regex::Regex;

use crate::errors::{RastersetError, Result};

pub const DEFAULT_NAME_PATTERN: &str = r"_\d+_\d+";
pub const DEFAULT_TARGET_PREFIX: &str = "mask";
pub const DEFAULT_EXTENSION: &str = "tif";

/// Fallback file name for channels that name tiles differently,
/// e.g. `tile_12_34.tif` -> `mask_12_34.tif`.
///
/// The positional suffix is whatever `pattern` matches in the sample name,
/// it must match exactly once.
#[derive(Debug, Clone)]
pub struct TargetRename {
    pattern: Regex,
    prefix: String,
    extension: String,
}

impl TargetRename {
    pub fn new(
        pattern: &str,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            prefix: prefix.into(),
            extension: extension.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn rename(&self, name: &str) -> Result<String> {
        let mut matches = self.pattern.find_iter(name);
        match (matches.next(), matches.count()) {
            (Some(suffix), 0) => Ok(format!(
                "{}{}.{}",
                self.prefix,
                suffix.as_str(),
                self.extension
            )),
            (first, rest) => Err(RastersetError::Naming {
                name: name.into(),
                pattern: self.pattern().into(),
                matches: usize::from(first.is_some()) + rest,
            }),
        }
    }
}
