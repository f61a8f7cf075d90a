use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Languages counted as markup rather than programming languages.
pub const MARKUP_LANGUAGES: &[&str] = &["HTML", "CSS", "Markdown", "SCSS", "Less"];

/// Color used for languages missing from the palette.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#8b949e";

/// Languages whose presence counts as DevOps tooling.
pub const DEVOPS_LANGUAGES: &[&str] = &[
    "Dockerfile",
    "HCL",
    "Shell",
    "Nix",
    "PowerShell",
    "Makefile",
    "Jsonnet",
];

/// Repo topic/name fragments that count as DevOps tooling.
pub const DEVOPS_KEYWORDS: &[&str] = &[
    "docker",
    "kubernetes",
    "k8s",
    "terraform",
    "ansible",
    "helm",
    "devops",
    "ci-cd",
    "github-actions",
];

static LANGUAGE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Rust", "#dea584"),
        ("Python", "#3572A5"),
        ("JavaScript", "#f1e05a"),
        ("TypeScript", "#3178c6"),
        ("Go", "#00ADD8"),
        ("Java", "#b07219"),
        ("Kotlin", "#A97BFF"),
        ("Scala", "#c22d40"),
        ("Clojure", "#db5855"),
        ("C", "#555555"),
        ("C++", "#f34b7d"),
        ("C#", "#178600"),
        ("Swift", "#F05138"),
        ("Objective-C", "#438eff"),
        ("Ruby", "#701516"),
        ("PHP", "#4F5D95"),
        ("Elixir", "#6e4a7e"),
        ("Erlang", "#B83998"),
        ("Haskell", "#5e5086"),
        ("OCaml", "#ef7a08"),
        ("F#", "#b845fc"),
        ("Shell", "#89e051"),
        ("PowerShell", "#012456"),
        ("HTML", "#e34c26"),
        ("CSS", "#563d7c"),
        ("SCSS", "#c6538c"),
        ("Less", "#1d365d"),
        ("Markdown", "#083fa1"),
        ("Vue", "#41b883"),
        ("Svelte", "#ff3e00"),
        ("Dart", "#00B4AB"),
        ("Lua", "#000080"),
        ("R", "#198CE7"),
        ("Perl", "#0298c3"),
        ("Julia", "#a270ba"),
        ("Zig", "#ec915c"),
        ("Nim", "#ffc200"),
        ("Solidity", "#AA6746"),
        ("Dockerfile", "#384d54"),
        ("HCL", "#844FBA"),
        ("Nix", "#7e7eff"),
        ("Makefile", "#427819"),
        ("Jsonnet", "#0064bd"),
        ("Jupyter Notebook", "#DA5B0B"),
        ("TeX", "#3D6117"),
        ("Vim Script", "#199f4b"),
    ]
    .into_iter()
    .collect()
});

pub fn is_markup(language: &str) -> bool {
    MARKUP_LANGUAGES.contains(&language)
}

/// Name the bytes of `language` are credited to. Notebook bytes are mostly
/// JSON, markdown and cell output, so they count as Python.
pub fn reclassify(language: &str) -> &str {
    match language {
        "Jupyter Notebook" => "Python",
        other => other,
    }
}

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .get(language)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

pub fn is_devops_language(language: &str) -> bool {
    DEVOPS_LANGUAGES.contains(&language)
}

/// DevOps keyword contained in `text`, if any.
pub fn devops_keyword(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    DEVOPS_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lower.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reclassify() {
        assert_eq!(reclassify("Jupyter Notebook"), "Python");
        assert_eq!(reclassify("Rust"), "Rust");
    }

    #[test]
    fn test_markup() {
        assert!(is_markup("HTML"));
        assert!(is_markup("SCSS"));
        assert!(!is_markup("JavaScript"));
        assert!(!is_markup("html"));
    }

    #[test]
    fn test_language_color() {
        assert_eq!(language_color("Rust"), "#dea584");
        assert_eq!(language_color("Brainfuck"), DEFAULT_LANGUAGE_COLOR);
    }

    #[test]
    fn test_devops_keyword() {
        assert_eq!(devops_keyword("my-Terraform-modules"), Some("terraform"));
        assert_eq!(devops_keyword("k8s-manifests"), Some("k8s"));
        assert_eq!(devops_keyword("dotfiles"), None);
    }
}
