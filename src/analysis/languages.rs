use std::collections::HashMap;

use crate::models::{LanguageByteMap, LanguageStat, Repository};
use crate::taxonomy::{is_markup, language_color, reclassify};

/// Languages under this share of the total (in tenths of a percent) are dropped.
const MIN_SHARE_TENTHS: u128 = 5;

/// Merges per-repository byte maps into one distribution.
///
/// Output is sorted by bytes descending (ties keep first-seen order) and
/// omits anything under 0.5%. Percentages are rounded to one decimal and
/// never sum past 100.
pub fn calculate_language_stats(byte_maps: &[LanguageByteMap]) -> Vec<LanguageStat> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for map in byte_maps {
        // Maps are unordered; walk them by name so first-seen order is stable.
        let mut entries: Vec<(&String, &u64)> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (language, bytes) in entries {
            let name = reclassify(language);
            match index.get(name) {
                Some(&slot) => totals[slot].1 += bytes,
                None => {
                    index.insert(name.to_string(), totals.len());
                    totals.push((name.to_string(), *bytes));
                }
            }
        }
    }

    let total: u64 = totals.iter().map(|(_, bytes)| bytes).sum();
    if total == 0 {
        return Vec::new();
    }

    // Stable, so equal byte counts keep insertion order.
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let total = total as u128;
    let mut kept: Vec<(String, u64, u64, i128)> = totals
        .into_iter()
        .filter(|(_, bytes)| (*bytes as u128) * 1000 >= MIN_SHARE_TENTHS * total)
        .map(|(language, bytes)| {
            let scaled = bytes as u128 * 1000;
            let tenths = ((scaled * 2 + total) / (total * 2)) as u64;
            // How far rounding moved the value up, in units of 1/total tenths.
            let residual = (tenths as i128) * total as i128 - scaled as i128;
            (language, bytes, tenths, residual)
        })
        .collect();

    let mut sum: u64 = kept.iter().map(|(_, _, tenths, _)| tenths).sum();
    while sum > 1000 {
        let Some(worst) = kept
            .iter_mut()
            .filter(|entry| entry.2 > 0)
            .max_by(|a, b| a.3.cmp(&b.3))
        else {
            break;
        };
        worst.2 -= 1;
        worst.3 -= total as i128;
        sum -= 1;
    }

    kept.into_iter()
        .map(|(language, bytes, tenths, _)| LanguageStat {
            color: language_color(&language).to_string(),
            is_markup: is_markup(&language),
            percentage: tenths as f64 / 10.0,
            language,
            bytes,
        })
        .collect()
}

/// Pseudo byte maps weighting each own repository's primary language once.
/// Used when per-repository language breakdowns are not fetched.
pub fn language_maps_from_primary(repos: &[Repository]) -> Vec<LanguageByteMap> {
    repos
        .iter()
        .filter(|repo| !repo.fork)
        .filter_map(|repo| repo.language.as_ref())
        .map(|language| LanguageByteMap::from([(language.clone(), 1)]))
        .collect()
}
