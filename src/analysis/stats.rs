use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{
    AccountAge, DevOpsSignal, DiversityTier, GitHubUser, LanguageStat, RepoProfile, Repository,
    UserStats,
};
use crate::taxonomy::languages::{devops_keyword, is_devops_language};

/// Stars the most starred own repository needs to count as popular.
pub const POPULAR_REPO_STARS: u32 = 50;
pub const RECENT_ACTIVITY_DAYS: i64 = 30;
pub const ACTIVE_REPO_DAYS: i64 = 90;

pub fn derive_stats(
    user: GitHubUser,
    repos: Vec<Repository>,
    languages: Vec<LanguageStat>,
    now: DateTime<Utc>,
) -> UserStats {
    let account_age = account_age(user.created_at, now);
    let language_count = programming_language_count(&languages);

    UserStats {
        top_language: top_language(&languages).map(str::to_string),
        least_used_language: least_used_language(&languages).map(str::to_string),
        language_count,
        diversity: DiversityTier::from_language_count(language_count),
        account_age,
        recently_active: recently_active(&repos, now),
        most_active_year: most_active_year(&repos),
        repo_profile: repo_profile(&repos, now),
        devops: devops_signal(&languages, &repos),
        generated_at: now,
        user,
        repos,
        languages,
    }
}

/// Calendar-month difference between `created_at` and `now`, ignoring the day.
pub fn account_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> AccountAge {
    let now_months = now.year() as i64 * 12 + now.month() as i64;
    let created_months = created_at.year() as i64 * 12 + created_at.month() as i64;
    let total = (now_months - created_months).max(0) as u32;

    AccountAge {
        years: total / 12,
        months: total % 12,
    }
}

pub fn recently_active(repos: &[Repository], now: DateTime<Utc>) -> bool {
    let cutoff = now - Duration::days(RECENT_ACTIVITY_DAYS);
    repos
        .iter()
        .filter_map(|repo| repo.pushed_at)
        .any(|pushed| pushed >= cutoff)
}

/// Creation year with the most repositories. Ties go to the earliest year.
pub fn most_active_year(repos: &[Repository]) -> Option<i32> {
    let mut per_year: BTreeMap<i32, u32> = BTreeMap::new();
    for repo in repos {
        *per_year.entry(repo.created_at.year()).or_default() += 1;
    }

    let mut best: Option<(i32, u32)> = None;
    for (year, count) in per_year {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((year, count)),
        }
    }
    best.map(|(year, _)| year)
}

pub fn programming_language_count(languages: &[LanguageStat]) -> usize {
    languages.iter().filter(|l| !l.is_markup).count()
}

/// First non-markup language, else the first language of any kind.
pub fn top_language(languages: &[LanguageStat]) -> Option<&str> {
    languages
        .iter()
        .find(|l| !l.is_markup)
        .or_else(|| languages.first())
        .map(|l| l.language.as_str())
}

pub fn least_used_language(languages: &[LanguageStat]) -> Option<&str> {
    languages
        .iter()
        .rev()
        .find(|l| !l.is_markup)
        .map(|l| l.language.as_str())
}

pub fn repo_profile(repos: &[Repository], now: DateTime<Utc>) -> RepoProfile {
    let own: Vec<&Repository> = repos.iter().filter(|r| !r.fork).collect();
    let active_cutoff = now - Duration::days(ACTIVE_REPO_DAYS);

    let mut most_starred: Option<&Repository> = None;
    for &repo in &own {
        match most_starred {
            Some(best) if repo.stargazers_count <= best.stargazers_count => {}
            _ => most_starred = Some(repo),
        }
    }

    RepoProfile {
        own_repo_count: own.len() as u32,
        forked_repo_count: (repos.len() - own.len()) as u32,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        total_forks: repos.iter().map(|r| r.forks_count).sum(),
        starred_by_others: own.iter().map(|r| r.stargazers_count).sum(),
        has_popular_repo: most_starred
            .map(|r| r.stargazers_count >= POPULAR_REPO_STARS)
            .unwrap_or(false),
        most_starred_repo: most_starred.cloned(),
        zero_star_repos: own.iter().filter(|r| r.stargazers_count == 0).count() as u32,
        active_repos_90d: own
            .iter()
            .filter(|r| r.pushed_at.map(|p| p >= active_cutoff).unwrap_or(false))
            .count() as u32,
    }
}

pub fn devops_signal(languages: &[LanguageStat], repos: &[Repository]) -> DevOpsSignal {
    let mut signals: BTreeSet<String> = languages
        .iter()
        .filter(|l| is_devops_language(&l.language))
        .map(|l| l.language.clone())
        .collect();

    for repo in repos.iter().filter(|r| !r.fork) {
        let texts = std::iter::once(&repo.name).chain(repo.topics.iter());
        signals.extend(texts.filter_map(|t| devops_keyword(t)).map(str::to_string));
    }

    DevOpsSignal {
        detected: !signals.is_empty(),
        signals: signals.into_iter().collect(),
    }
}

/// Own repositories whose languages are worth fetching, most recently pushed
/// first.
pub fn select_language_repos(repos: &[Repository], limit: usize) -> Vec<&Repository> {
    let mut own: Vec<&Repository> = repos.iter().filter(|r| !r.fork).collect();
    own.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    own.truncate(limit);
    own
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::LanguageByteMap;

    use crate::analysis::languages::calculate_language_stats;

    fn stats_of(entries: &[(&str, u64)]) -> Vec<LanguageStat> {
        let map: LanguageByteMap = entries.iter().map(|(l, b)| (l.to_string(), *b)).collect();
        calculate_language_stats(&[map])
    }

    #[test]
    fn test_account_age_calendar_months() {
        let now = at(2026, 10, 18);
        assert_eq!(account_age(at(2026, 10, 18), now), AccountAge { years: 0, months: 0 });
        assert_eq!(account_age(at(2021, 10, 18), now), AccountAge { years: 5, months: 0 });
        assert_eq!(account_age(at(2024, 3, 30), now), AccountAge { years: 2, months: 7 });
        // Day of month is ignored.
        assert_eq!(account_age(at(2025, 10, 31), now).years, 1);
        // Clock skew never produces a negative age.
        assert_eq!(account_age(at(2027, 1, 1), now), AccountAge::default());
    }

    #[test]
    fn test_account_age_monotonic() {
        let created = at(2019, 6, 15);
        let mut previous = 0;
        for month_offset in 0..120 {
            let year = 2019 + (5 + month_offset) / 12;
            let month = (5 + month_offset) % 12 + 1;
            let years = account_age(created, at(year as i32, month as u32, 1)).years;
            assert!(years >= previous);
            previous = years;
        }
    }

    #[test]
    fn test_recently_active() {
        let now = at(2026, 10, 18);
        let stale = repo("old", 0, at(2025, 1, 1));
        let mut fresh = repo("new", 0, at(2025, 1, 1));
        fresh.pushed_at = Some(at(2026, 10, 1));

        assert!(!recently_active(&[stale.clone()], now));
        assert!(recently_active(&[stale, fresh], now));
    }

    #[test]
    fn test_most_active_year_tie_goes_to_earliest() {
        let repos = vec![
            repo("a", 0, at(2022, 1, 1)),
            repo("b", 0, at(2020, 1, 1)),
            repo("c", 0, at(2022, 5, 1)),
            repo("d", 0, at(2020, 5, 1)),
        ];
        assert_eq!(most_active_year(&repos), Some(2020));

        let repos = vec![
            repo("a", 0, at(2021, 1, 1)),
            repo("b", 0, at(2023, 1, 1)),
            repo("c", 0, at(2023, 2, 1)),
        ];
        assert_eq!(most_active_year(&repos), Some(2023));
        assert_eq!(most_active_year(&[]), None);
    }

    #[test]
    fn test_top_language_skips_markup() {
        let languages = stats_of(&[("HTML", 9000), ("Go", 1000)]);
        assert_eq!(top_language(&languages), Some("Go"));

        let markup_only = stats_of(&[("HTML", 9000), ("CSS", 1000)]);
        assert_eq!(top_language(&markup_only), Some("HTML"));
        assert_eq!(least_used_language(&markup_only), None);

        assert_eq!(top_language(&[]), None);
    }

    #[test]
    fn test_repo_profile_excludes_fork_stars_from_own_metrics() {
        let now = at(2026, 10, 18);
        let mut fork = repo("upstream-fork", 900, at(2020, 1, 1));
        fork.fork = true;
        let repos = vec![
            repo("small", 12, at(2020, 1, 1)),
            repo("empty", 0, at(2021, 1, 1)),
            fork,
        ];

        let profile = repo_profile(&repos, now);
        assert_eq!(profile.total_stars, 912);
        assert_eq!(profile.starred_by_others, 12);
        assert_eq!(profile.own_repo_count, 2);
        assert_eq!(profile.forked_repo_count, 1);
        assert_eq!(profile.zero_star_repos, 1);
        assert_eq!(profile.most_starred_repo.unwrap().name, "small");
        assert!(!profile.has_popular_repo);
    }

    #[test]
    fn test_popular_repo_threshold() {
        let now = at(2026, 10, 18);
        let profile = repo_profile(&[repo("hit", 50, at(2020, 1, 1))], now);
        assert!(profile.has_popular_repo);
    }

    #[test]
    fn test_devops_signal() {
        let mut infra = repo("platform", 0, at(2020, 1, 1));
        infra.topics = vec!["kubernetes".to_string()];
        let languages = stats_of(&[("Go", 9000), ("Dockerfile", 800)]);

        let signal = devops_signal(&languages, &[infra]);
        assert!(signal.detected);
        assert_eq!(signal.signals, vec!["Dockerfile", "kubernetes"]);

        let quiet = devops_signal(&stats_of(&[("Rust", 10)]), &[repo("cli", 0, at(2020, 1, 1))]);
        assert!(!quiet.detected);
    }

    #[test]
    fn test_select_language_repos() {
        let mut repos: Vec<_> = (0..25)
            .map(|i| {
                let mut r = repo(&format!("r{}", i), 0, at(2020, 1, 1));
                r.pushed_at = Some(at(2020 + i / 12, (i % 12 + 1) as u32, 1));
                r
            })
            .collect();
        repos[3].fork = true;

        let selected = select_language_repos(&repos, 20);
        assert_eq!(selected.len(), 20);
        assert_eq!(selected[0].name, "r24");
        assert!(selected.iter().all(|r| !r.fork));
    }

    #[test]
    fn test_derive_stats() {
        let now = at(2026, 10, 18);
        let stats = derive_stats(
            user("octocat", at(2021, 10, 18)),
            vec![repo("cli", 3, at(2022, 1, 1))],
            stats_of(&[("Rust", 800), ("Python", 150), ("HTML", 50)]),
            now,
        );

        assert_eq!(stats.account_age.years, 5);
        assert_eq!(stats.top_language.as_deref(), Some("Rust"));
        assert_eq!(stats.least_used_language.as_deref(), Some("Python"));
        assert_eq!(stats.language_count, 2);
        assert_eq!(stats.diversity, DiversityTier::Bilingual);
        assert_eq!(stats.most_active_year, Some(2022));
    }
}
