use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use asset_core::domain::{models::Rating, RatingAggregator};

/// A rating for a direct category, or per-sub-category ratings.
///
/// Nested keys stay strings: untagged buffering loses serde_json's integer
/// map-key parsing.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Answer {
    Direct(Rating),
    Nested(BTreeMap<String, Rating>),
}

/// `{"4": 5, "1": {"101": 2.5, "102": 0}}`
pub type Answers = BTreeMap<i64, Answer>;

pub fn load(path: &Path) -> Result<Answers> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers at {}", path.display()))?;
    parse(&raw).with_context(|| format!("Failed to parse answers at {}", path.display()))
}

pub fn parse(raw: &str) -> Result<Answers> {
    Ok(serde_json::from_str(raw)?)
}

pub fn apply(aggregator: &mut RatingAggregator, answers: &Answers) -> Result<()> {
    for (category_id, answer) in answers {
        match answer {
            Answer::Direct(rating) => aggregator.rate_category(*category_id, *rating)?,
            Answer::Nested(subs) => {
                for (sub_id, rating) in subs {
                    let sub_id: i64 = sub_id
                        .parse()
                        .with_context(|| format!("Invalid sub-category id {:?}", sub_id))?;
                    aggregator.rate_sub_category(*category_id, sub_id, *rating)?;
                }
            }
        }
    }
    Ok(())
}
