use std::io::Read;
use std::path::PathBuf;

use sqlx::{PgPool, Row};

use crate::error::Result;
use crate::models::Offer;

const OFFERS_QUERY: &str = "SELECT COALESCE(title, '') AS title, \
     COALESCE(skills, '[]') AS skills, \
     COALESCE(category, '[]') AS category, \
     COALESCE(level, '') AS level, \
     COALESCE(company, '') AS company, \
     date::BIGINT AS date, \
     min_salary::DOUBLE PRECISION AS min_salary, \
     max_salary::DOUBLE PRECISION AS max_salary \
     FROM offers \
     WHERE date IS NOT NULL AND min_salary IS NOT NULL AND max_salary IS NOT NULL";

/// Read-only handle to wherever the `offers` relation lives.
pub enum OfferSource {
    Postgres(PgPool),
    Csv(PathBuf),
}

impl OfferSource {
    pub async fn fetch_offers(&self) -> Result<Vec<Offer>> {
        let offers = match self {
            OfferSource::Postgres(pool) => fetch_offers(pool).await?,
            OfferSource::Csv(path) => {
                let file = std::fs::File::open(path).map_err(csv::Error::from)?;
                read_offers_csv(file)?
            }
        };
        tracing::debug!(offers = offers.len(), "fetched offer snapshot");
        Ok(offers)
    }
}

pub async fn fetch_offers(pool: &PgPool) -> Result<Vec<Offer>> {
    let rows = sqlx::query(OFFERS_QUERY).fetch_all(pool).await?;
    let mut offers = Vec::with_capacity(rows.len());

    for row in rows {
        offers.push(Offer {
            title: row.try_get("title")?,
            skills: row.try_get("skills")?,
            category: row.try_get("category")?,
            level: row.try_get("level")?,
            company: row.try_get("company")?,
            date: row.try_get("date")?,
            min_salary: row.try_get("min_salary")?,
            max_salary: row.try_get("max_salary")?,
        });
    }

    Ok(offers)
}

/// Reads an exported snapshot with the same columns as the `offers` table.
pub fn read_offers_csv<R: Read>(source: R) -> Result<Vec<Offer>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut offers = Vec::new();

    for result in reader.deserialize::<Offer>() {
        offers.push(result?);
    }

    Ok(offers)
}
