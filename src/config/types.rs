use adsync_playhead::{EmitterConfig, NormalizerConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub emitter: EmitterConfig,

    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// Stop at the first malformed trace line instead of skipping it
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Print playhead samples whose normalized value differs from raw
    #[serde(default)]
    pub show_corrections: bool,
}

fn default_strict() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            show_corrections: false,
        }
    }
}
