//! Calendar-month aggregation key.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One calendar month, ordered by `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

/// A metric value per period, iterated in chronological order.
pub type Series = BTreeMap<Period, f64>;

impl Period {
    /// Create a new period.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<(i32, u32)> for Period {
    fn from((year, month): (i32, u32)) -> Self {
        Self { year, month }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (year, month) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got {:?}", s))?;
        let year = year
            .parse()
            .map_err(|_| format!("invalid year in {:?}", s))?;
        let month = month
            .parse()
            .map_err(|_| format!("invalid month in {:?}", s))?;
        Ok(Self { year, month })
    }
}

// Serialized as "YYYY-MM" so a `Series` maps onto a JSON object.
impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PeriodVisitor;

        impl Visitor<'_> for PeriodVisitor {
            type Value = Period;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a period formatted as YYYY-MM")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Period, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PeriodVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let mut periods = vec![
            Period::new(2024, 1),
            Period::new(2023, 12),
            Period::new(2023, 2),
        ];
        periods.sort();
        assert_eq!(
            periods,
            vec![
                Period::new(2023, 2),
                Period::new(2023, 12),
                Period::new(2024, 1)
            ]
        );
    }

    #[test]
    fn test_display_and_parse() {
        let period = Period::new(2024, 3);
        assert_eq!(period.to_string(), "2024-03");
        assert_eq!("2024-03".parse::<Period>().unwrap(), period);
        assert!("2024".parse::<Period>().is_err());
    }

    #[test]
    fn test_series_json_keys() {
        let mut series = Series::new();
        series.insert(Period::new(2024, 2), 1.5);
        series.insert(Period::new(2023, 11), 2.0);

        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"{"2023-11":2.0,"2024-02":1.5}"#);

        let parsed: Series = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, series);
    }
}
