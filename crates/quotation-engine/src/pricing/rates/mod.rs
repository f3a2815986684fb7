mod normalizer;
mod parser;

pub use parser::RateRow;

use normalizer::{band_key, developer_key, location_key, parse_amount, service_key, ParsedAmount};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RateLoadError {
    #[error("failed to read rate card: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate card CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// A loaded rate. Immutable once the table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRecord {
    pub developer_type: String,
    pub location: String,
    pub plot_area_band: String,
    pub service: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRate {
    pub name: String,
    pub amount: u64,
}

/// Counters collected while loading, surfaced for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLoadStats {
    pub rows_read: usize,
    pub loaded: usize,
    pub duplicates: usize,
    pub placeholders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RateKey {
    developer_type: String,
    location: String,
    band: String,
    service: String,
}

impl RateKey {
    fn new(developer_type: &str, location: &str, band: &str, service: &str) -> Self {
        Self {
            developer_type: developer_key(developer_type),
            location: location_key(location),
            band: band_key(band),
            service: service_key(service),
        }
    }
}

/// In-memory rate card keyed by (developer type, location, plot-area band,
/// service). Built once and read-only afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    records: Vec<RateRecord>,
    index: HashMap<RateKey, usize>,
    stats: RateLoadStats,
}

impl RateTable {
    /// Builds the table from raw rows. Placeholder amounts load as zero and
    /// the first row seen for a key wins over later duplicates.
    pub fn load<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RateRow>,
    {
        let mut table = Self::default();

        for row in rows {
            table.stats.rows_read += 1;
            let key = RateKey::new(
                &row.developer_type,
                &row.location,
                &row.plot_area_band,
                &row.service,
            );

            if table.index.contains_key(&key) {
                table.stats.duplicates += 1;
                warn!(
                    developer_type = %row.developer_type,
                    location = %row.location,
                    plot_area_band = %row.plot_area_band,
                    service = %row.service,
                    "duplicate rate row ignored; first occurrence kept"
                );
                continue;
            }

            let amount = match row.amount.as_deref().map(parse_amount) {
                Some(ParsedAmount::Value(amount)) => amount,
                Some(ParsedAmount::Placeholder) | None => {
                    table.stats.placeholders += 1;
                    debug!(
                        service = %row.service,
                        raw = row.amount.as_deref().unwrap_or(""),
                        "placeholder rate amount loaded as zero"
                    );
                    0
                }
            };

            table.index.insert(key, table.records.len());
            table.records.push(RateRecord {
                developer_type: row.developer_type.trim().to_string(),
                location: row.location.trim().to_string(),
                plot_area_band: row.plot_area_band.trim().to_string(),
                service: service_key(&row.service),
                amount,
            });
        }

        table.stats.loaded = table.records.len();
        if table.stats.placeholders > 0 {
            warn!(
                placeholders = table.stats.placeholders,
                "rate card contains non-numeric amounts; priced as zero"
            );
        }
        info!(
            rows = table.stats.rows_read,
            loaded = table.stats.loaded,
            duplicates = table.stats.duplicates,
            "rate card loaded"
        );

        table
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RateLoadError> {
        Ok(Self::load(parser::parse_rows(reader)?))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RateLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Loads the rate card, falling back to an empty table on failure. The
    /// error is handed back so the caller can report the degraded state.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> (Self, Option<RateLoadError>) {
        match Self::from_path(path) {
            Ok(table) => (table, None),
            Err(err) => {
                warn!(error = %err, "rate card unavailable; every lookup will miss");
                (Self::default(), Some(err))
            }
        }
    }

    pub fn lookup(
        &self,
        developer_type: &str,
        location: &str,
        plot_area_band: &str,
        service: &str,
    ) -> Option<u64> {
        let key = RateKey::new(developer_type, location, plot_area_band, service);
        self.index
            .get(&key)
            .map(|position| self.records[*position].amount)
    }

    /// Every service priced for the given triple, in rate-card order.
    pub fn services_for(
        &self,
        developer_type: &str,
        location: &str,
        plot_area_band: &str,
    ) -> Vec<ServiceRate> {
        let developer = developer_key(developer_type);
        let location = location_key(location);
        let band = band_key(plot_area_band);

        self.records
            .iter()
            .filter(|record| {
                developer_key(&record.developer_type) == developer
                    && location_key(&record.location) == location
                    && band_key(&record.plot_area_band) == band
            })
            .map(|record| ServiceRate {
                name: record.service.clone(),
                amount: record.amount,
            })
            .collect()
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    pub fn stats(&self) -> RateLoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_rows() -> Vec<RateRow> {
        vec![
            RateRow::new(
                "cat1",
                "Mumbai Suburban",
                "1001-1500",
                "PROJECT REGISTRATION SERVICES",
                "10000",
            ),
            RateRow::new(
                "Category 1",
                "Mumbai Suburban",
                "1001-1500",
                "LEGAL CONSULTATION",
                "8,000",
            ),
            RateRow::new(
                "cat1",
                "Mumbai Suburban",
                "1001-1500",
                "Project Closure",
                "Not Applicable",
            ),
            RateRow::new(
                "cat1",
                "Mumbai Suburban",
                "1001-1500",
                "PROJECT REGISTRATION SERVICES",
                "99999",
            ),
            RateRow::new("cat2", "ROM", "0-500", "PROJECT REGISTRATION SERVICES", "4000"),
        ]
    }

    #[test]
    fn lookup_returns_loaded_amount() {
        let table = RateTable::load(sample_rows());
        assert_eq!(
            table.lookup("cat1", "Mumbai Suburban", "1001-1500", "PROJECT REGISTRATION SERVICES"),
            Some(10000)
        );
        assert_eq!(
            table.lookup("Category 1", "mumbai suburban", "1001-1500", "  LEGAL CONSULTATION "),
            Some(8000)
        );
        assert_eq!(
            table.lookup("cat1", "Mumbai Suburban", "1001-1500", "Change of Promoter"),
            None
        );
        assert_eq!(
            table.lookup("cat1", "Mumbai City", "1001-1500", "PROJECT REGISTRATION SERVICES"),
            None
        );
    }

    #[test]
    fn first_duplicate_wins_and_is_counted() {
        let table = RateTable::load(sample_rows());
        assert_eq!(table.len(), 4);
        let stats = table.stats();
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.placeholders, 1);
    }

    #[test]
    fn placeholder_amounts_load_as_zero() {
        let table = RateTable::load(sample_rows());
        assert_eq!(
            table.lookup("cat1", "Mumbai Suburban", "1001-1500", "Project Closure"),
            Some(0)
        );
    }

    #[test]
    fn services_for_filters_by_triple_in_load_order() {
        let table = RateTable::load(sample_rows());
        let services = table.services_for("cat1", "Mumbai Suburban", "1001-1500");
        let names: Vec<_> = services.iter().map(|rate| rate.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "PROJECT REGISTRATION SERVICES",
                "LEGAL CONSULTATION",
                "Project Closure"
            ]
        );
        assert!(table.services_for("cat3", "Pune", "0-500").is_empty());
    }

    #[test]
    fn from_reader_parses_csv() {
        let csv = "Developer Type,Location,Plot Area Band,Service,Amount\n\
cat1,Pune,501-1000,Project Closure,\"12,500\"\n";
        let table = RateTable::from_reader(Cursor::new(csv)).expect("table loads");
        assert_eq!(table.lookup("cat1", "Pune", "500-1000", "Project Closure"), Some(12500));
    }

    #[test]
    fn missing_file_degrades_to_empty_table() {
        let (table, error) = RateTable::load_or_empty("/nonexistent/rate_card.csv");
        assert!(table.is_empty());
        assert!(matches!(error, Some(RateLoadError::Io(_))));
        assert_eq!(table.lookup("cat1", "ROM", "0-500", "Project Closure"), None);
    }
}
