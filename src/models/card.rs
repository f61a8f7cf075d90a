use serde::{Deserialize, Serialize};

/// Number of repo slots ("attacks") on every card.
pub const TOP_REPO_SLOTS: usize = 2;
/// Longest repository description carried on a card and drawn under an attack.
pub const REPO_DESCRIPTION_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionStage {
    #[serde(rename = "BASIC")]
    Basic,
    #[serde(rename = "STAGE 1")]
    Stage1,
    #[serde(rename = "STAGE 2")]
    Stage2,
}

impl EvolutionStage {
    pub fn from_account_years(years: u32) -> Self {
        if years >= 5 {
            EvolutionStage::Stage2
        } else if years >= 2 {
            EvolutionStage::Stage1
        } else {
            EvolutionStage::Basic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvolutionStage::Basic => "BASIC",
            EvolutionStage::Stage1 => "STAGE 1",
            EvolutionStage::Stage2 => "STAGE 2",
        }
    }
}

impl std::fmt::Display for EvolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRepo {
    pub name: String,
    pub description: String,
    pub stars: u32,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub name: String,
    pub description: String,
    pub damage: u32,
    pub energy_cost: u32,
}

/// Render-ready projection of a user's stats. Built once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonCardData {
    pub username: String,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: String,
    pub location: String,
    pub evolution_stage: EvolutionStage,
    pub top_language: String,
    pub least_used_language: String,
    pub resistance_language: String,
    pub account_age_years: u32,
    pub top_repos: Vec<CardRepo>,
    pub zero_star_repos: u32,
    pub language_count: usize,
    pub hp: u32,
    pub xp: u64,
    pub velocity: u32,
    pub retreat_cost: u32,
    pub ability: Ability,
    pub attacks: Vec<Attack>,
    pub followers: u32,
    /// Stars on the user's own non-fork repositories.
    pub own_stars: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolution_stage_boundaries() {
        assert_eq!(EvolutionStage::from_account_years(0), EvolutionStage::Basic);
        assert_eq!(EvolutionStage::from_account_years(1), EvolutionStage::Basic);
        assert_eq!(EvolutionStage::from_account_years(2), EvolutionStage::Stage1);
        assert_eq!(EvolutionStage::from_account_years(4), EvolutionStage::Stage1);
        assert_eq!(EvolutionStage::from_account_years(5), EvolutionStage::Stage2);
        assert_eq!(EvolutionStage::from_account_years(12), EvolutionStage::Stage2);
    }

    #[test]
    fn test_evolution_stage_wire_format() {
        assert_eq!(
            serde_json::to_string(&EvolutionStage::Stage1).unwrap(),
            "\"STAGE 1\""
        );
        let parsed: EvolutionStage = serde_json::from_str("\"STAGE 2\"").unwrap();
        assert_eq!(parsed, EvolutionStage::Stage2);
    }
}
