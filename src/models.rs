use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scraped posting as stored in the `offers` relation.
///
/// `skills` and `category` keep their upstream serialization (`"['Python', 'SQL']"`);
/// use [`crate::tags::extract_tags`] to read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    pub skills: String,
    pub category: String,
    pub level: String,
    pub company: String,
    pub date: i64,
    pub min_salary: f64,
    pub max_salary: f64,
}

impl Offer {
    pub fn salary(&self) -> f64 {
        (self.min_salary + self.max_salary) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedOffer {
    #[serde(flatten)]
    pub offer: Offer,
    pub salary: f64,
}

impl From<&Offer> for AugmentedOffer {
    fn from(offer: &Offer) -> Self {
        Self {
            salary: offer.salary(),
            offer: offer.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trainee,
    Junior,
    Mid,
    Senior,
    Expert,
}

impl Level {
    pub fn ordered() -> [Level; 5] {
        [
            Level::Trainee,
            Level::Junior,
            Level::Mid,
            Level::Senior,
            Level::Expert,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Trainee => "trainee",
            Level::Junior => "junior",
            Level::Mid => "mid",
            Level::Senior => "senior",
            Level::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub threshold: usize,
    pub total: usize,
    pub entries: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySample {
    pub date: NaiveDate,
    pub cutoff: f64,
    pub values: Vec<f64>,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub min_salary: f64,
    pub salary: f64,
    pub max_salary: f64,
    pub offer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillLevelCell {
    pub skill: String,
    pub level: Level,
    pub average_salary: f64,
    pub offer_count: usize,
}

/// Every artifact derived for one selected date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selected_date: NaiveDate,
    pub latest_date: NaiveDate,
    pub offers: Vec<AugmentedOffer>,
    pub salary_sample: SalarySample,
    pub skills: FrequencyTable,
    pub categories: FrequencyTable,
    pub trend: Vec<TrendPoint>,
    pub skill_levels: Vec<SkillLevelCell>,
}
