use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{GitHubUser, Repository};

/// One entry of the aggregated language distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub language: String,
    pub bytes: u64,
    /// Share of all analyzed bytes, rounded to one decimal place.
    pub percentage: f64,
    pub color: String,
    pub is_markup: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiversityTier {
    Polyglot,
    Versatile,
    MultiLanguage,
    Bilingual,
    Focused,
}

impl DiversityTier {
    pub fn from_language_count(count: usize) -> Self {
        match count {
            c if c >= 8 => DiversityTier::Polyglot,
            c if c >= 5 => DiversityTier::Versatile,
            c if c >= 3 => DiversityTier::MultiLanguage,
            2 => DiversityTier::Bilingual,
            _ => DiversityTier::Focused,
        }
    }
}

impl std::fmt::Display for DiversityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiversityTier::Polyglot => write!(f, "polyglot"),
            DiversityTier::Versatile => write!(f, "versatile"),
            DiversityTier::MultiLanguage => write!(f, "multi-language"),
            DiversityTier::Bilingual => write!(f, "bilingual"),
            DiversityTier::Focused => write!(f, "focused"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountAge {
    pub years: u32,
    pub months: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoProfile {
    pub own_repo_count: u32,
    pub forked_repo_count: u32,
    /// Stars across every listed repository, forks included.
    pub total_stars: u32,
    pub total_forks: u32,
    /// Stars on non-fork repositories only.
    pub starred_by_others: u32,
    pub most_starred_repo: Option<Repository>,
    pub has_popular_repo: bool,
    pub zero_star_repos: u32,
    pub active_repos_90d: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevOpsSignal {
    pub detected: bool,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user: GitHubUser,
    pub repos: Vec<Repository>,
    pub languages: Vec<LanguageStat>,
    pub top_language: Option<String>,
    pub least_used_language: Option<String>,
    pub language_count: usize,
    pub diversity: DiversityTier,
    pub account_age: AccountAge,
    pub recently_active: bool,
    pub most_active_year: Option<i32>,
    pub repo_profile: RepoProfile,
    pub devops: DevOpsSignal,
    pub generated_at: DateTime<Utc>,
}
