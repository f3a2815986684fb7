use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One raw rate-card row as exported from the pricing sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateRow {
    #[serde(rename = "Developer Type")]
    pub developer_type: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Plot Area Band")]
    pub plot_area_band: String,
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Amount", default, deserialize_with = "empty_string_as_none")]
    pub amount: Option<String>,
}

impl RateRow {
    pub fn new(
        developer_type: impl Into<String>,
        location: impl Into<String>,
        plot_area_band: impl Into<String>,
        service: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            developer_type: developer_type.into(),
            location: location.into(),
            plot_area_band: plot_area_band.into(),
            service: service.into(),
            amount: Some(amount.into()),
        }
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RateRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RateRow>() {
        rows.push(record?);
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
