mod breaking;
mod macro_topic;
mod routine;
mod world_news;

use serde::Deserialize;

/// Optional overrides for a routine run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoutineRequest {
    /// Cover this symbol instead of the scheduler's pick
    #[serde(default)]
    pub symbol: Option<String>,
    /// Publish as breaking, bypassing the daily cap
    #[serde(default)]
    pub is_breaking: Option<bool>,
}

/// Optional topic for a macro run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroRequest {
    #[serde(default)]
    pub topic: Option<String>,
}
