use crate::{error::Error, laterality::Laterality};
use std::str::FromStr;

/// Navigation parameters that open the graph directly on one reading.
///
/// Parsed from a query string such as `reading_id=5&laterality=LEFT_ARM`;
/// a leading `?` and unrelated parameters are ignored.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DeepLink {
    pub reading_id: i64,
    pub laterality: Laterality,
}

impl DeepLink {
    pub fn new(reading_id: i64, laterality: Laterality) -> Self {
        Self {
            reading_id,
            laterality,
        }
    }
}

impl FromStr for DeepLink {
    type Err = Error;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        let mut reading_id = None;
        let mut laterality = None;
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => continue,
            };
            match key {
                "reading_id" => {
                    let id = value.trim().parse::<i64>().map_err(|_| {
                        Error::InvalidDeepLink(format!("reading_id {:?} is not an integer", value))
                    })?;
                    reading_id = Some(id);
                }
                "laterality" => laterality = Some(value.parse::<Laterality>()?),
                _ => {}
            }
        }
        match (reading_id, laterality) {
            (Some(reading_id), Some(laterality)) => Ok(DeepLink {
                reading_id,
                laterality,
            }),
            _ => Err(Error::InvalidDeepLink(format!(
                "expected reading_id and laterality in {:?}",
                query
            ))),
        }
    }
}
