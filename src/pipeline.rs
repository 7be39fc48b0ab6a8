use chrono::NaiveDate;

use crate::date::{decode_date, encode_date, validate_selection};
use crate::db::OfferSource;
use crate::error::{PipelineError, Result};
use crate::frequency::frequency_table;
use crate::matrix::{skill_level_matrix, MatrixSettings};
use crate::models::{AugmentedOffer, Dashboard, Offer};
use crate::salary::{daily_trend, salary_sample, Aggregate, CutoffField};
use crate::tags::{collect_tags, distinct_tags, TagField};

pub const DEFAULT_SALARY_CUTOFF: f64 = 75_000.0;
pub const DEFAULT_HISTOGRAM_BINS: usize = 100;
pub const DEFAULT_TAIL_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub cutoff: f64,
    pub cutoff_field: CutoffField,
    pub bins: usize,
    pub tail_threshold: usize,
    pub aggregate: Aggregate,
    pub matrix: MatrixSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_SALARY_CUTOFF,
            cutoff_field: CutoffField::Salary,
            bins: DEFAULT_HISTOGRAM_BINS,
            tail_threshold: DEFAULT_TAIL_THRESHOLD,
            aggregate: Aggregate::Mean,
            matrix: MatrixSettings::default(),
        }
    }
}

/// Most recent posting date in a snapshot.
pub fn latest_date(offers: &[Offer]) -> Result<NaiveDate> {
    let max = offers
        .iter()
        .map(|offer| offer.date)
        .max()
        .ok_or(PipelineError::EmptyResultSet { what: "offers" })?;
    decode_date(max)
}

/// Runs every transformation for `selected` over one snapshot.
pub fn build_dashboard(
    offers: &[Offer],
    selected: NaiveDate,
    settings: &PipelineSettings,
) -> Result<Dashboard> {
    let latest = latest_date(offers)?;
    let target = encode_date(selected);
    let on_date: Vec<&Offer> = offers.iter().filter(|offer| offer.date == target).collect();

    if on_date.is_empty() {
        tracing::warn!(date = %selected, "no offers posted on selected date");
    } else {
        tracing::debug!(date = %selected, offers = on_date.len(), "filtered offers");
    }

    let skill_tags = collect_tags(&on_date, TagField::Skills)?;
    let category_tags = collect_tags(&on_date, TagField::Category)?;
    let skills: Vec<String> = distinct_tags(&on_date, TagField::Skills)?
        .into_iter()
        .collect();

    Ok(Dashboard {
        selected_date: selected,
        latest_date: latest,
        offers: offers.iter().map(AugmentedOffer::from).collect(),
        salary_sample: salary_sample(
            offers,
            selected,
            settings.cutoff,
            settings.cutoff_field,
            settings.bins,
        ),
        skills: frequency_table(skill_tags, settings.tail_threshold),
        categories: frequency_table(category_tags, settings.tail_threshold),
        trend: daily_trend(offers, settings.aggregate)?,
        skill_levels: skill_level_matrix(&on_date, &skills, settings.matrix)?,
    })
}

/// Re-reads the store and rebuilds the dashboard, defaulting to the latest date.
pub async fn refresh(
    source: &OfferSource,
    selection: Option<NaiveDate>,
    settings: &PipelineSettings,
) -> Result<Dashboard> {
    let offers = source.fetch_offers().await?;
    let latest = latest_date(&offers)?;
    let selected = match selection {
        Some(date) => validate_selection(date, latest)?,
        None => latest,
    };

    tracing::info!(offers = offers.len(), date = %selected, %latest, "building dashboard");
    build_dashboard(&offers, selected, settings)
}
