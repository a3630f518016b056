use crate::Result;
use crate::log::ParsedRecord;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Request times grouped by URL
///
/// URLs keep the order in which they first appeared, and each series keeps
/// the order in which its times arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlTimings {
    series: Vec<(String, Vec<Decimal>)>,
    index: HashMap<String, usize>,
}

impl UrlTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain a record stream into a new grouping, stopping at the first error
    pub fn collect_from<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<ParsedRecord>>,
    {
        tracing::debug!("Grouping request times by URL");

        let mut timings = Self::new();
        for record in records {
            let record = record?;
            timings.push(record.url, record.request_time);
        }

        tracing::debug!(
            "Grouped {} requests into {} URLs",
            timings.total_requests(),
            timings.len()
        );

        Ok(timings)
    }

    pub fn push(&mut self, url: String, request_time: Decimal) {
        match self.index.get(&url) {
            Some(&idx) => self.series[idx].1.push(request_time),
            None => {
                self.index.insert(url.clone(), self.series.len());
                self.series.push((url, vec![request_time]));
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&[Decimal]> {
        self.index
            .get(url)
            .map(|&idx| self.series[idx].1.as_slice())
    }

    /// Number of distinct URLs
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn total_requests(&self) -> usize {
        self.series.iter().map(|(_, times)| times.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Decimal])> {
        self.series
            .iter()
            .map(|(url, times)| (url.as_str(), times.as_slice()))
    }
}

impl IntoIterator for UrlTimings {
    type Item = (String, Vec<Decimal>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Decimal>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.into_iter()
    }
}
