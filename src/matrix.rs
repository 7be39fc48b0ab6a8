use std::collections::HashSet;

use clap::ValueEnum;

use crate::error::Result;
use crate::models::{Level, Offer, SkillLevelCell};
use crate::salary::mean;
use crate::tags::extract_tags;

/// Placeholder average for a (skill, level) pair with no offers.
pub const DEFAULT_SENTINEL: f64 = 100.0;

/// How a skill filter is compared against an offer.
///
/// `Substring` reproduces a raw `LIKE '%x%'` scan, which lets `Go` match an
/// offer tagged `Django`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    Exact,
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixSettings {
    pub sentinel: f64,
    pub match_mode: MatchMode,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            match_mode: MatchMode::Exact,
        }
    }
}

struct IndexedOffer<'a> {
    offer: &'a Offer,
    tags: HashSet<String>,
}

impl IndexedOffer<'_> {
    fn has_skill(&self, skill: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Exact => self.tags.contains(skill),
            MatchMode::Substring => self.offer.skills.contains(skill),
        }
    }
}

/// Levels are often embedded in free text (`"Mid / Senior"`), so this is a
/// case-insensitive substring test.
pub fn level_matches(raw: &str, level: Level) -> bool {
    raw.to_ascii_lowercase().contains(level.label())
}

/// Average salary for every `skills` x [`Level::ordered`] pair over `offers`.
///
/// Offers are grouped by level once, so each skill only scans its level's
/// bucket. Pairs without offers carry `settings.sentinel`.
pub fn skill_level_matrix(
    offers: &[&Offer],
    skills: &[String],
    settings: MatrixSettings,
) -> Result<Vec<SkillLevelCell>> {
    let mut indexed = Vec::with_capacity(offers.len());
    for &offer in offers {
        indexed.push(IndexedOffer {
            offer,
            tags: extract_tags(&offer.skills)?.into_iter().collect(),
        });
    }

    let by_level: Vec<(Level, Vec<&IndexedOffer>)> = Level::ordered()
        .into_iter()
        .map(|level| {
            let bucket = indexed
                .iter()
                .filter(|entry| level_matches(&entry.offer.level, level))
                .collect();
            (level, bucket)
        })
        .collect();

    let mut cells = Vec::with_capacity(skills.len() * by_level.len());
    for skill in skills {
        for (level, bucket) in &by_level {
            let salaries: Vec<f64> = bucket
                .iter()
                .filter(|entry| entry.has_skill(skill, settings.match_mode))
                .map(|entry| entry.offer.salary())
                .collect();

            let average_salary = if salaries.is_empty() {
                settings.sentinel
            } else {
                mean(&salaries)
            };

            cells.push(SkillLevelCell {
                skill: skill.clone(),
                level: *level,
                average_salary,
                offer_count: salaries.len(),
            });
        }
    }

    tracing::debug!(
        skills = skills.len(),
        offers = offers.len(),
        cells = cells.len(),
        "built skill/level matrix"
    );

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(skills: &str, level: &str, salary: f64) -> Offer {
        Offer {
            title: "Developer".to_string(),
            skills: skills.to_string(),
            category: "[]".to_string(),
            level: level.to_string(),
            company: "Acme".to_string(),
            date: 20220620,
            min_salary: salary,
            max_salary: salary,
        }
    }

    fn cell<'a>(cells: &'a [SkillLevelCell], skill: &str, level: Level) -> &'a SkillLevelCell {
        cells
            .iter()
            .find(|cell| cell.skill == skill && cell.level == level)
            .expect("pair present")
    }

    #[test]
    fn every_pair_appears_once_with_sentinel_for_gaps() {
        let a = offer("['Python', 'SQL']", "senior", 20000.0);
        let b = offer("['Python']", "senior", 30000.0);
        let c = offer("['SQL']", "junior", 8000.0);
        let offers = vec![&a, &b, &c];
        let skills = vec!["Python".to_string(), "SQL".to_string()];

        let cells = skill_level_matrix(&offers, &skills, MatrixSettings::default()).unwrap();
        assert_eq!(cells.len(), skills.len() * Level::ordered().len());

        let python_senior = cell(&cells, "Python", Level::Senior);
        assert!((python_senior.average_salary - 25000.0).abs() < 1e-9);
        assert_eq!(python_senior.offer_count, 2);

        let sql_junior = cell(&cells, "SQL", Level::Junior);
        assert!((sql_junior.average_salary - 8000.0).abs() < 1e-9);

        let python_expert = cell(&cells, "Python", Level::Expert);
        assert_eq!(python_expert.average_salary, DEFAULT_SENTINEL);
        assert_eq!(python_expert.offer_count, 0);
    }

    #[test]
    fn substring_mode_over_matches_similar_names() {
        let django = offer("['Django']", "mid", 15000.0);
        let offers = vec![&django];
        let skills = vec!["Go".to_string()];

        let exact = skill_level_matrix(&offers, &skills, MatrixSettings::default()).unwrap();
        assert_eq!(cell(&exact, "Go", Level::Mid).offer_count, 0);

        let substring = skill_level_matrix(
            &offers,
            &skills,
            MatrixSettings {
                sentinel: DEFAULT_SENTINEL,
                match_mode: MatchMode::Substring,
            },
        )
        .unwrap();
        assert_eq!(cell(&substring, "Go", Level::Mid).offer_count, 1);
    }

    #[test]
    fn level_matching_ignores_case_and_surrounding_text() {
        assert!(level_matches(" Senior ", Level::Senior));
        assert!(level_matches("Mid / Senior", Level::Mid));
        assert!(level_matches("Mid / Senior", Level::Senior));
        assert!(!level_matches("Mid / Senior", Level::Junior));
    }

    #[test]
    fn embedded_mixed_case_level_counts_for_each_level_named() {
        let both = offer("['Python']", "Mid / Senior", 18000.0);
        let offers = vec![&both];
        let skills = vec!["Python".to_string()];

        for mode in [MatchMode::Exact, MatchMode::Substring] {
            let cells = skill_level_matrix(
                &offers,
                &skills,
                MatrixSettings {
                    sentinel: DEFAULT_SENTINEL,
                    match_mode: mode,
                },
            )
            .unwrap();

            for level in [Level::Mid, Level::Senior] {
                let matched = cell(&cells, "Python", level);
                assert_eq!(matched.offer_count, 1);
                assert!((matched.average_salary - 18000.0).abs() < 1e-9);
            }
            assert_eq!(cell(&cells, "Python", Level::Junior).offer_count, 0);
        }
    }

    #[test]
    fn custom_sentinel_is_used() {
        let skills = vec!["Rust".to_string()];
        let cells = skill_level_matrix(
            &[],
            &skills,
            MatrixSettings {
                sentinel: -1.0,
                match_mode: MatchMode::Exact,
            },
        )
        .unwrap();
        assert!(cells.iter().all(|cell| cell.average_salary == -1.0));
    }

    #[test]
    fn malformed_skills_are_reported() {
        let broken = offer("Python, SQL", "mid", 1.0);
        let skills = vec!["Python".to_string()];
        assert!(skill_level_matrix(&[&broken], &skills, MatrixSettings::default()).is_err());
    }
}
