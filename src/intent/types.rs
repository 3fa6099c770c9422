use serde::{Deserialize, Serialize};
use std::fmt;

/// The purpose of a single command. Selects which handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AnalyzeScreen,
    RememberInfo,
    RecallInfo,
    ExportManual,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AnalyzeScreen => "analyze_screen",
            Intent::RememberInfo => "remember_info",
            Intent::RecallInfo => "recall_info",
            Intent::ExportManual => "export_manual",
            Intent::GeneralQuery => "general_query",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
