//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - human-optimized rich formatting
    #[default]
    Pretty,
    /// Table format - machine-parseable, one row per entry
    Table,
    /// JSON format - structured for scripts/APIs
    Json,
}

/// Sections of the airport detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DetailTab {
    /// Codes, city and country
    General,
    /// Coordinates and map link
    Location,
    /// Time zone, GMT offset and local time
    Timezone,
    /// Every section
    #[default]
    All,
}

impl DetailTab {
    pub fn shows(self, tab: DetailTab) -> bool {
        self == DetailTab::All || self == tab
    }
}
