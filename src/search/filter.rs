//! Profile URL filter

use crate::config::{FinderSettings, PatternSet};

/// Accepts URLs that point at a member profile page
#[derive(Debug, Clone)]
pub struct ProfileUrlFilter {
    marker: String,
    excluded: Vec<String>,
}

impl ProfileUrlFilter {
    pub fn new(settings: &FinderSettings, patterns: &PatternSet) -> Self {
        Self {
            marker: settings.profile_marker().to_lowercase(),
            excluded: patterns
                .excluded_paths
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// True when the URL holds the profile marker and no excluded fragment
    pub fn accepts(&self, url: &str) -> bool {
        let url = url.to_lowercase();
        url.contains(&self.marker) && !self.excluded.iter().any(|p| url.contains(p.as_str()))
    }
}
