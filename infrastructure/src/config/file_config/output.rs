//! `[output]` section: how results are printed
//!
//! ```toml
//! [output]
//! format = "full"   # full | summary | json
//! color = false
//! ```

use serde::{Deserialize, Serialize};
use witness_domain::OutputFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Preferred format; `--output` overrides it
    pub format: Option<OutputFormat>,
    /// ANSI colors in console output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// The format to print with: the command-line choice, then this
    /// section, then [`OutputFormat::Summary`].
    pub fn resolve_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }
}
