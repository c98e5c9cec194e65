use anyhow::{Result, bail};
use std::collections::HashSet;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse `--seeds`. Negative numbers are folded onto their magnitude and
/// repeats are dropped, keeping the first occurrence.
pub fn resolve_seeds(raw: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(raw) {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            bail!("invalid seed '{token}': expected an integer");
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    let mut seen = HashSet::new();
    seeds.retain(|seed| seen.insert(*seed));
    Ok(seeds)
}
