use chrono::{DateTime, Duration, Utc};

use crate::analysis::languages::{calculate_language_stats, language_maps_from_primary};
use crate::analysis::stats::{
    account_age, least_used_language, programming_language_count, top_language, ACTIVE_REPO_DAYS,
};
use crate::models::{
    Ability, Attack, CardRepo, DiversityTier, EvolutionStage, GitHubUser, LanguageStat,
    PokemonCardData, Repository, UserStats, REPO_DESCRIPTION_MAX_CHARS, TOP_REPO_SLOTS,
};
use crate::text::truncate;

pub const BIO_MAX_CHARS: usize = 80;
pub const LOCATION_MAX_CHARS: usize = 30;
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;
pub const REPO_NAME_MAX_CHARS: usize = 22;
pub const ZERO_STAR_DISPLAY_CAP: u32 = 4;

pub const PLACEHOLDER_REPO_NAME: &str = "Side Project";
pub const PLACEHOLDER_REPO_DESCRIPTION: &str = "Work in progress";
pub const NO_LANGUAGE: &str = "None";

const MIN_HP: u32 = 30;
const MAX_HP: u32 = 340;
const MAX_DAMAGE: u32 = 300;
const MAX_ATTACK_COST: u32 = 4;

/// Everything the card needs, whichever path produced it.
struct CardInputs<'a> {
    user: &'a GitHubUser,
    repos: &'a [Repository],
    languages: &'a [LanguageStat],
    account_years: u32,
    own_repos: u32,
    own_stars: u32,
    zero_star_repos: u32,
    active_repos_90d: u32,
    language_count: usize,
    diversity: DiversityTier,
}

/// Full-fidelity card built from already derived stats.
pub fn build_card_data(stats: &UserStats) -> PokemonCardData {
    assemble(CardInputs {
        user: &stats.user,
        repos: &stats.repos,
        languages: &stats.languages,
        account_years: stats.account_age.years,
        own_repos: stats.repo_profile.own_repo_count,
        own_stars: stats.repo_profile.starred_by_others,
        zero_star_repos: stats.repo_profile.zero_star_repos,
        active_repos_90d: stats.repo_profile.active_repos_90d,
        language_count: stats.language_count,
        diversity: stats.diversity,
    })
}

/// Card built straight from the user and repo list, without per-repository
/// language fetches. Languages are weighted by primary-language repo counts.
pub fn build_light_card_data(
    user: &GitHubUser,
    repos: &[Repository],
    now: DateTime<Utc>,
) -> PokemonCardData {
    let languages = calculate_language_stats(&language_maps_from_primary(repos));
    let language_count = programming_language_count(&languages);
    let active_cutoff = now - Duration::days(ACTIVE_REPO_DAYS);
    let own: Vec<&Repository> = repos.iter().filter(|r| !r.fork).collect();

    assemble(CardInputs {
        user,
        repos,
        languages: &languages,
        account_years: account_age(user.created_at, now).years,
        own_repos: own.len() as u32,
        own_stars: own.iter().map(|r| r.stargazers_count).sum(),
        zero_star_repos: own.iter().filter(|r| r.stargazers_count == 0).count() as u32,
        active_repos_90d: own
            .iter()
            .filter(|r| r.pushed_at.map(|p| p >= active_cutoff).unwrap_or(false))
            .count() as u32,
        language_count,
        diversity: DiversityTier::from_language_count(language_count),
    })
}

fn assemble(inputs: CardInputs<'_>) -> PokemonCardData {
    let user = inputs.user;
    let top = top_language(inputs.languages).unwrap_or(NO_LANGUAGE).to_string();
    let least = least_used_language(inputs.languages)
        .unwrap_or(NO_LANGUAGE)
        .to_string();
    let resistance = inputs
        .languages
        .iter()
        .filter(|l| !l.is_markup)
        .nth(1)
        .map(|l| l.language.clone())
        .unwrap_or_else(|| top.clone());

    let top_repos = pad_top_repos(select_top_repos(inputs.repos, &top), &top);
    let attacks = top_repos.iter().map(attack_for).collect();

    PokemonCardData {
        username: user.login.clone(),
        display_name: truncate(user.display_name(), DISPLAY_NAME_MAX_CHARS),
        avatar_url: user.avatar_url.clone(),
        bio: truncate(user.bio.as_deref().unwrap_or_default(), BIO_MAX_CHARS),
        location: truncate(user.location.as_deref().unwrap_or_default(), LOCATION_MAX_CHARS),
        evolution_stage: EvolutionStage::from_account_years(inputs.account_years),
        least_used_language: least,
        resistance_language: resistance,
        account_age_years: inputs.account_years,
        zero_star_repos: inputs.zero_star_repos.min(ZERO_STAR_DISPLAY_CAP),
        language_count: inputs.language_count,
        hp: hit_points(inputs.own_repos, user.followers, inputs.own_stars),
        xp: experience(inputs.own_stars, inputs.own_repos, user.followers, inputs.account_years),
        velocity: velocity(inputs.active_repos_90d, inputs.own_repos),
        retreat_cost: inputs.zero_star_repos.clamp(1, ZERO_STAR_DISPLAY_CAP),
        ability: ability_for(inputs.diversity, inputs.language_count, &top),
        attacks,
        top_repos,
        top_language: top,
        followers: user.followers,
        own_stars: inputs.own_stars,
    }
}

/// Own repositories by stars, most starred first. Equal counts keep list order.
fn select_top_repos(repos: &[Repository], top_language: &str) -> Vec<CardRepo> {
    let mut own: Vec<&Repository> = repos.iter().filter(|r| !r.fork).collect();
    own.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));

    own.into_iter()
        .take(TOP_REPO_SLOTS)
        .map(|repo| CardRepo {
            name: truncate(&repo.name, REPO_NAME_MAX_CHARS),
            description: truncate(
                repo.description.as_deref().unwrap_or_default(),
                REPO_DESCRIPTION_MAX_CHARS,
            ),
            stars: repo.stargazers_count,
            language: repo
                .language
                .clone()
                .unwrap_or_else(|| top_language.to_string()),
        })
        .collect()
}

/// Fills the list with placeholder repos until it has exactly
/// [`TOP_REPO_SLOTS`] entries.
pub fn pad_top_repos(mut repos: Vec<CardRepo>, top_language: &str) -> Vec<CardRepo> {
    repos.truncate(TOP_REPO_SLOTS);
    while repos.len() < TOP_REPO_SLOTS {
        repos.push(CardRepo {
            name: PLACEHOLDER_REPO_NAME.to_string(),
            description: PLACEHOLDER_REPO_DESCRIPTION.to_string(),
            stars: 0,
            language: top_language.to_string(),
        });
    }
    repos
}

fn round_to_ten(value: u64) -> u64 {
    (value + 5) / 10 * 10
}

fn hit_points(own_repos: u32, followers: u32, stars: u32) -> u32 {
    let raw = 40 + own_repos as u64 * 2 + followers as u64 / 5 + stars as u64 / 2;
    round_to_ten(raw).clamp(MIN_HP as u64, MAX_HP as u64) as u32
}

fn experience(stars: u32, own_repos: u32, followers: u32, years: u32) -> u64 {
    stars as u64 * 10 + own_repos as u64 * 25 + followers as u64 * 5 + years as u64 * 100
}

fn velocity(active_repos: u32, own_repos: u32) -> u32 {
    if own_repos == 0 {
        return 0;
    }
    ((active_repos as f64 * 100.0 / own_repos as f64).round() as u32).min(100)
}

fn attack_for(repo: &CardRepo) -> Attack {
    let damage = round_to_ten(10 + repo.stars as u64 * 10).clamp(10, MAX_DAMAGE as u64) as u32;
    let description = if repo.description.is_empty() {
        format!("A {} project.", repo.language)
    } else {
        repo.description.clone()
    };

    Attack {
        name: repo.name.clone(),
        description,
        damage,
        energy_cost: 1 + (repo.stars / 25).min(MAX_ATTACK_COST - 1),
    }
}

fn ability_for(tier: DiversityTier, language_count: usize, top_language: &str) -> Ability {
    let (name, description) = match tier {
        DiversityTier::Polyglot => (
            "Polyglot Mastery",
            format!(
                "Fluent in {} languages. Draw a card for every language in play.",
                language_count
            ),
        ),
        DiversityTier::Versatile => (
            "Versatile Coder",
            format!("Adapts to any of {} stacks. Heal 20 damage.", language_count),
        ),
        DiversityTier::MultiLanguage => (
            "Code Switch",
            "Once per turn, swap the active language.".to_string(),
        ),
        DiversityTier::Bilingual => (
            "Dual Wield",
            format!("Attacks with {} and a trusted sidekick.", top_language),
        ),
        DiversityTier::Focused => (
            "Deep Focus",
            format!(
                "Masters {} above all else. Prevent all effects of other languages.",
                top_language
            ),
        ),
    };

    Ability {
        name: name.to_string(),
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::derive_stats;
    use crate::analysis::stats::fixtures::{at, repo, user};
    use crate::models::LanguageByteMap;

    fn languages(entries: &[(&str, u64)]) -> Vec<LanguageStat> {
        let map: LanguageByteMap = entries.iter().map(|(l, b)| (l.to_string(), *b)).collect();
        calculate_language_stats(&[map])
    }

    #[test]
    fn test_always_two_top_repos() {
        let now = at(2026, 10, 18);
        for count in [0usize, 1, 2, 7] {
            let repos: Vec<_> = (0..count)
                .map(|i| repo(&format!("repo{}", i), i as u32, at(2022, 1, 1)))
                .collect();
            let card = build_light_card_data(&user("octocat", at(2020, 1, 1)), &repos, now);
            assert_eq!(card.top_repos.len(), 2, "with {} repos", count);
            assert_eq!(card.attacks.len(), 2, "with {} repos", count);
        }
    }

    #[test]
    fn test_placeholder_uses_top_language() {
        let now = at(2026, 10, 18);
        let stats = derive_stats(
            user("octocat", at(2020, 1, 1)),
            vec![repo("solo", 9, at(2022, 1, 1))],
            languages(&[("Go", 900), ("HTML", 100)]),
            now,
        );
        let card = build_card_data(&stats);

        assert_eq!(card.top_repos[0].name, "solo");
        assert_eq!(card.top_repos[1].name, PLACEHOLDER_REPO_NAME);
        assert_eq!(card.top_repos[1].stars, 0);
        assert_eq!(card.top_repos[1].language, "Go");
        assert_eq!(card.top_language, "Go");
    }

    #[test]
    fn test_top_repos_by_stars_excluding_forks() {
        let now = at(2026, 10, 18);
        let mut fork = repo("famous-fork", 5000, at(2022, 1, 1));
        fork.fork = true;
        let repos = vec![
            repo("low", 1, at(2022, 1, 1)),
            fork,
            repo("high", 80, at(2022, 1, 1)),
            repo("mid", 10, at(2022, 1, 1)),
        ];
        let card = build_light_card_data(&user("octocat", at(2020, 1, 1)), &repos, now);
        let names: Vec<_> = card.top_repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid"]);
        assert_eq!(card.attacks[0].energy_cost, 4);
        assert_eq!(card.attacks[0].damage, 300);
    }

    #[test]
    fn test_card_stars_exclude_forks() {
        let now = at(2026, 10, 18);
        let mut fork = repo("popular-fork", 900, at(2022, 1, 1));
        fork.fork = true;
        let repos = vec![repo("tool", 30, at(2022, 1, 1)), fork, repo("lib", 12, at(2022, 1, 1))];

        let stats = derive_stats(
            user("octocat", at(2020, 1, 1)),
            repos.clone(),
            languages(&[("Rust", 100)]),
            now,
        );
        assert_eq!(stats.repo_profile.total_stars, 942);

        let card = build_card_data(&stats);
        assert_eq!(card.own_stars, 42);
        assert_eq!(card.own_stars, stats.repo_profile.starred_by_others);

        let light = build_light_card_data(&stats.user, &repos, now);
        assert_eq!(light.own_stars, 42);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["ownStars"], 42);
        assert!(json.get("totalStars").is_none());
    }

    #[test]
    fn test_evolution_stage_from_account_age() {
        let now = at(2026, 10, 18);
        let stage = |created| build_light_card_data(&user("octocat", created), &[], now).evolution_stage;

        assert_eq!(stage(at(2021, 10, 18)), EvolutionStage::Stage2);
        assert_eq!(stage(at(2025, 10, 18)), EvolutionStage::Basic);
        assert_eq!(stage(at(2024, 10, 18)), EvolutionStage::Stage1);
        assert_eq!(stage(at(2022, 10, 18)), EvolutionStage::Stage1);
    }

    #[test]
    fn test_truncates_free_text() {
        let now = at(2026, 10, 18);
        let mut u = user("octocat", at(2020, 1, 1));
        u.bio = Some("b".repeat(200));
        u.location = Some("l".repeat(50));
        let mut r = repo("verbose", 3, at(2022, 1, 1));
        r.description = Some("d".repeat(120));

        let card = build_light_card_data(&u, &[r], now);
        assert_eq!(card.bio.chars().count(), BIO_MAX_CHARS);
        assert!(card.bio.ends_with("..."));
        assert_eq!(card.location.chars().count(), LOCATION_MAX_CHARS);
        assert!(card.top_repos[0].description.ends_with("..."));
        assert!(card.top_repos[0].description.chars().count() <= REPO_DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_zero_star_cap_and_retreat_cost() {
        let now = at(2026, 10, 18);
        let repos: Vec<_> = (0..9)
            .map(|i| repo(&format!("empty{}", i), 0, at(2022, 1, 1)))
            .collect();
        let card = build_light_card_data(&user("octocat", at(2020, 1, 1)), &repos, now);
        assert_eq!(card.zero_star_repos, 4);
        assert_eq!(card.retreat_cost, 4);

        let card = build_light_card_data(&user("octocat", at(2020, 1, 1)), &[], now);
        assert_eq!(card.zero_star_repos, 0);
        assert_eq!(card.retreat_cost, 1);
    }

    #[test]
    fn test_empty_profile_defaults() {
        let now = at(2026, 10, 18);
        let mut u = user("newbie", now);
        u.bio = None;
        u.location = None;
        u.name = None;

        let card = build_light_card_data(&u, &[], now);
        assert_eq!(card.display_name, "newbie");
        assert_eq!(card.bio, "");
        assert_eq!(card.top_language, NO_LANGUAGE);
        assert_eq!(card.least_used_language, NO_LANGUAGE);
        assert_eq!(card.velocity, 0);
        assert_eq!(card.evolution_stage, EvolutionStage::Basic);
        assert!(card.hp >= MIN_HP && card.hp <= MAX_HP);
    }

    #[test]
    fn test_flavor_numbers_are_deterministic_and_clamped() {
        let now = at(2026, 10, 18);
        let mut u = user("star", at(2010, 1, 1));
        u.followers = 1_000_000;
        let repos = vec![repo("mega", 4_000_000, at(2012, 1, 1))];

        let a = build_light_card_data(&u, &repos, now);
        let b = build_light_card_data(&u, &repos, now);
        assert_eq!(a, b);
        assert_eq!(a.hp, MAX_HP);
        assert!(a.velocity <= 100);
        assert!(a.attacks.iter().all(|atk| atk.energy_cost <= MAX_ATTACK_COST));
    }

    #[test]
    fn test_ability_reflects_diversity() {
        let now = at(2026, 10, 18);
        let stats = derive_stats(
            user("octocat", at(2020, 1, 1)),
            Vec::new(),
            languages(&[
                ("Rust", 100),
                ("Go", 100),
                ("Python", 100),
                ("C", 100),
                ("Java", 100),
                ("Ruby", 100),
                ("Lua", 100),
                ("Zig", 100),
            ]),
            now,
        );
        let card = build_card_data(&stats);
        assert_eq!(card.ability.name, "Polyglot Mastery");
        assert!(card.ability.description.contains("8 languages"));
        assert_eq!(card.language_count, 8);
    }
}
