//! Job text metrics.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::HttpClient;

/// Counts for one metric category (e.g. `TOTAL`, `NO_MATCH`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Metric {
    pub white_spaces: u64,
    pub segments: u64,
    pub words: u64,
    pub characters: u64,
}

impl Metric {
    /// True when every count is zero.
    pub fn is_empty(&self) -> bool {
        *self == Metric::default()
    }
}

impl Add for Metric {
    type Output = Metric;

    fn add(self, rhs: Metric) -> Metric {
        Metric {
            white_spaces: self.white_spaces + rhs.white_spaces,
            segments: self.segments + rhs.segments,
            words: self.words + rhs.words,
            characters: self.characters + rhs.characters,
        }
    }
}

impl AddAssign for Metric {
    fn add_assign(&mut self, rhs: Metric) {
        *self = *self + rhs;
    }
}

impl Sum for Metric {
    fn sum<I: Iterator<Item = Metric>>(iter: I) -> Metric {
        iter.fold(Metric::default(), Add::add)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "white spaces {} | segments {} | words {} | characters {}",
            self.white_spaces, self.segments, self.words, self.characters
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct MetricsRecord {
    #[serde(default)]
    values: BTreeMap<String, Metric>,
}

/// GET `<item_path>/metrics`. Empty when the server has none.
pub(crate) fn fetch_metrics(http: &HttpClient, item_path: &str) -> Result<BTreeMap<String, Metric>> {
    match http.get_json::<Option<MetricsRecord>>(&format!("{item_path}/metrics")) {
        Ok(record) => Ok(record.unwrap_or_default().values),
        Err(e) if e.is_not_found() => Ok(BTreeMap::new()),
        Err(e) => Err(e),
    }
}
