use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;

use crate::date::{decode_date, encode_date};
use crate::error::Result;
use crate::models::{HistogramBin, Offer, SalarySample, TrendPoint};

/// Which salary figure the outlier cutoff applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CutoffField {
    Salary,
    MaxSalary,
}

impl CutoffField {
    fn value(self, offer: &Offer) -> f64 {
        match self {
            CutoffField::Salary => offer.salary(),
            CutoffField::MaxSalary => offer.max_salary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Aggregate {
    Mean,
    Median,
}

impl Aggregate {
    pub fn apply(self, values: &mut [f64]) -> f64 {
        match self {
            Aggregate::Mean => mean(values),
            Aggregate::Median => median(values),
        }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Mean salaries of the offers posted on `date` whose `field` is below `cutoff`.
pub fn salary_sample(
    offers: &[Offer],
    date: NaiveDate,
    cutoff: f64,
    field: CutoffField,
    bins: usize,
) -> SalarySample {
    let target = encode_date(date);
    let values: Vec<f64> = offers
        .iter()
        .filter(|offer| offer.date == target && field.value(offer) < cutoff)
        .map(Offer::salary)
        .collect();

    if values.is_empty() {
        tracing::warn!(%date, cutoff, "no offers left for salary sample");
    }

    SalarySample {
        date,
        cutoff,
        histogram: histogram(&values, bins),
        values,
    }
}

/// Equal-width bins spanning the sample's range; the last bin is closed.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if low == high {
        return vec![HistogramBin {
            lower: low,
            upper: high,
            count: values.len(),
        }];
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let index = (((value - low) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: low + width * index as f64,
            upper: if index + 1 == bins {
                high
            } else {
                low + width * (index + 1) as f64
            },
            count,
        })
        .collect()
}

/// One aggregate row per posting date across the whole history, oldest first.
pub fn daily_trend(offers: &[Offer], aggregate: Aggregate) -> Result<Vec<TrendPoint>> {
    let mut by_date: BTreeMap<i64, (Vec<f64>, Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for offer in offers {
        let entry = by_date.entry(offer.date).or_default();
        entry.0.push(offer.min_salary);
        entry.1.push(offer.salary());
        entry.2.push(offer.max_salary);
    }

    by_date
        .into_iter()
        .map(|(date, (mut mins, mut salaries, mut maxes))| -> Result<TrendPoint> {
            Ok(TrendPoint {
                date: decode_date(date)?,
                offer_count: salaries.len(),
                min_salary: aggregate.apply(&mut mins),
                salary: aggregate.apply(&mut salaries),
                max_salary: aggregate.apply(&mut maxes),
            })
        })
        .collect()
}
