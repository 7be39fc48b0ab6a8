use std::collections::BTreeSet;

use crate::error::{PipelineError, Result};
use crate::models::Offer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Skills,
    Category,
}

impl TagField {
    pub fn raw(self, offer: &Offer) -> &str {
        match self {
            TagField::Skills => &offer.skills,
            TagField::Category => &offer.category,
        }
    }
}

/// Splits a serialized list such as `['Python', 'SQL']` into its tags.
///
/// Order and duplicates are kept. Input that is not wrapped in brackets, or a
/// piece with an opening quote but no matching closing quote, is rejected
/// rather than guessed at.
pub fn extract_tags(raw: &str) -> Result<Vec<String>> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed(raw, "expected a bracket-delimited list"))?;

    let mut tags = Vec::new();
    for piece in inner.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if !quotes_balanced(piece) {
            return Err(malformed(raw, "unbalanced quotes"));
        }

        let tag = piece.trim_matches(|c| c == '\'' || c == '"').trim();
        if !tag.is_empty() {
            tags.push(tag.to_string());
        }
    }

    Ok(tags)
}

fn quotes_balanced(piece: &str) -> bool {
    let is_quote = |c: char| c == '\'' || c == '"';
    let first = piece.chars().next();
    let last = piece.chars().next_back();

    match (first, last) {
        (Some(open), Some(close)) if is_quote(open) || is_quote(close) => {
            open == close && piece.len() >= 2
        }
        _ => true,
    }
}

fn malformed(raw: &str, reason: &'static str) -> PipelineError {
    PipelineError::MalformedTagList {
        raw: raw.to_string(),
        reason,
    }
}

/// Every tag of `field` across `offers`, one entry per occurrence.
pub fn collect_tags(offers: &[&Offer], field: TagField) -> Result<Vec<String>> {
    let mut tags = Vec::new();
    for offer in offers {
        tags.extend(extract_tags(field.raw(offer))?);
    }
    tracing::debug!(?field, offers = offers.len(), tags = tags.len(), "extracted tags");
    Ok(tags)
}

pub fn distinct_tags(offers: &[&Offer], field: TagField) -> Result<BTreeSet<String>> {
    Ok(collect_tags(offers, field)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_with_skills(skills: &str) -> Offer {
        Offer {
            title: "Backend Developer".to_string(),
            skills: skills.to_string(),
            category: "['backend']".to_string(),
            level: "mid".to_string(),
            company: "Acme".to_string(),
            date: 20220620,
            min_salary: 10000.0,
            max_salary: 20000.0,
        }
    }

    #[test]
    fn empty_list_yields_no_tags() {
        assert!(extract_tags("[]").unwrap().is_empty());
        assert!(extract_tags("  [ ]  ").unwrap().is_empty());
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let tags = extract_tags("['a', 'b', 'a']").unwrap();
        assert_eq!(tags, vec!["a", "b", "a"]);
    }

    #[test]
    fn strips_whitespace_and_quotes() {
        let tags = extract_tags("[ 'Spring Boot' ,\"Node.js\", '' ]").unwrap();
        assert_eq!(tags, vec!["Spring Boot", "Node.js"]);
    }

    #[test]
    fn rejects_missing_brackets() {
        let err = extract_tags("'Python', 'SQL'").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTagList { .. }));
        assert!(extract_tags("['Python'").is_err());
    }

    #[test]
    fn rejects_unbalanced_quotes() {
        assert!(extract_tags("['Python, 'SQL']").is_err());
        assert!(extract_tags("[']").is_err());
        assert!(extract_tags("['Python\"]").is_err());
    }

    #[test]
    fn distinct_tags_are_sorted_and_unique() {
        let a = offer_with_skills("['SQL', 'Python']");
        let b = offer_with_skills("['Python', 'Go']");
        let offers = vec![&a, &b];

        let all = collect_tags(&offers, TagField::Skills).unwrap();
        assert_eq!(all.len(), 4);

        let distinct: Vec<String> = distinct_tags(&offers, TagField::Skills)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(distinct, vec!["Go", "Python", "SQL"]);
    }
}
