use super::ClusterRule;
use crate::{
    config::ClusterConfiguration,
    model::{District, Layer},
};

/// labels every district with a cluster. all districts start at the default
/// label, then each rule is applied in list order and overwrites the label of
/// every district it matches, so the last matching rule wins. prefixes may
/// overlap ("大内" and "大内町"), which is why this is not a map lookup.
pub fn classify(districts: &Layer<District>, config: &ClusterConfiguration) -> Layer<District> {
    let rows = districts
        .iter()
        .map(|d| District {
            cluster: resolve_cluster(&d.name, &config.rules, &config.default_label).to_string(),
            ..d.clone()
        })
        .collect::<Vec<_>>();
    log::info!(
        "classified {} districts with {} cluster rules",
        rows.len(),
        config.rules.len()
    );
    Layer::new(districts.crs, rows)
}

/// the label of a single district name: the label of the last rule whose
/// prefix matches, or `default_label` when none does.
pub fn resolve_cluster<'a>(name: &str, rules: &'a [ClusterRule], default_label: &'a str) -> &'a str {
    rules
        .iter()
        .rev()
        .find(|r| r.matches(name))
        .map(|r| r.label.as_str())
        .unwrap_or(default_label)
}
