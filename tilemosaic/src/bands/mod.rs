//! Band naming for multi-dimensional selectors.
//!
//! A selector fixes some dimensions of a variable to one coordinate and lets
//! others range over a list. Each combination of listed coordinates is drawn
//! as its own band:
//!
//! ```
//! use tilemosaic::bands::{get_bands, Selector, SelectorValue};
//!
//! let selector = Selector::new()
//!     .with("band", SelectorValue::many(["tavg", "prec"]))
//!     .with("month", SelectorValue::many([1, 2]));
//!
//! assert_eq!(
//!     get_bands("climate", &selector),
//!     vec!["tavg_month_1", "tavg_month_2", "prec_month_1", "prec_month_2"]
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// One coordinate value along a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Text(s) => f.write_str(s),
            Coordinate::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Coordinate {
    fn from(s: &str) -> Self {
        Coordinate::Text(s.to_string())
    }
}

impl From<String> for Coordinate {
    fn from(s: String) -> Self {
        Coordinate::Text(s)
    }
}

impl From<i64> for Coordinate {
    fn from(n: i64) -> Self {
        Coordinate::Number(n.into())
    }
}

impl From<i32> for Coordinate {
    fn from(n: i32) -> Self {
        Coordinate::Number(i64::from(n).into())
    }
}

/// Selection along one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorValue {
    /// Every listed coordinate becomes a band.
    Many(Vec<Coordinate>),
    /// Fixed to a single coordinate.
    One(Coordinate),
}

impl SelectorValue {
    /// A fixed coordinate.
    pub fn one(value: impl Into<Coordinate>) -> Self {
        SelectorValue::One(value.into())
    }

    /// A list of coordinates, one band each.
    pub fn many<I, C>(values: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Coordinate>,
    {
        SelectorValue::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Dimension selections, in the order the dimensions were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    dimensions: Vec<(String, SelectorValue)>,
}

impl Selector {
    /// An empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the selection for `dimension`.
    pub fn with(mut self, dimension: impl Into<String>, value: SelectorValue) -> Self {
        let dimension = dimension.into();
        match self.dimensions.iter_mut().find(|(d, _)| *d == dimension) {
            Some(entry) => entry.1 = value,
            None => self.dimensions.push((dimension, value)),
        }
        self
    }

    /// True when no dimension is selected.
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Selections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectorValue)> {
        self.dimensions.iter().map(|(d, v)| (d.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, SelectorValue)> for Selector {
    fn from_iter<I: IntoIterator<Item = (K, SelectorValue)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Selector::new(), |selector, (d, v)| selector.with(d, v))
    }
}

/// A band and the coordinate it takes along each listed dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandInfo {
    pub name: String,
    pub selection: Vec<(String, Coordinate)>,
}

/// Every band the selector produces, in Cartesian-product order.
///
/// Earlier dimensions vary slowest. Text coordinates label themselves;
/// numeric ones are labelled `{dimension}_{value}`. Labels of several
/// dimensions are joined with `_`.
pub fn band_information(selector: &Selector) -> Vec<BandInfo> {
    let listed = selector.iter().filter_map(|(dimension, value)| match value {
        SelectorValue::Many(values) => Some((dimension, values)),
        SelectorValue::One(_) => None,
    });

    let mut bands: Vec<BandInfo> = Vec::new();
    for (dimension, values) in listed {
        let labelled: Vec<(String, &Coordinate)> = values
            .iter()
            .map(|value| (band_label(dimension, value), value))
            .collect();

        bands = if bands.is_empty() {
            labelled
                .into_iter()
                .map(|(label, value)| BandInfo {
                    name: label,
                    selection: vec![(dimension.to_string(), value.clone())],
                })
                .collect()
        } else {
            bands
                .iter()
                .flat_map(|band| {
                    labelled.iter().map(move |(label, value)| {
                        let mut selection = band.selection.clone();
                        selection.push((dimension.to_string(), (*value).clone()));
                        BandInfo {
                            name: format!("{}_{}", band.name, label),
                            selection,
                        }
                    })
                })
                .collect()
        };
    }

    bands
}

/// Band names for `variable` under `selector`.
///
/// Falls back to the variable name alone when nothing is listed.
pub fn get_bands(variable: &str, selector: &Selector) -> Vec<String> {
    let names: Vec<String> = band_information(selector)
        .into_iter()
        .map(|band| band.name)
        .collect();

    if names.is_empty() {
        vec![variable.to_string()]
    } else {
        names
    }
}

fn band_label(dimension: &str, value: &Coordinate) -> String {
    match value {
        Coordinate::Text(text) => text.clone(),
        Coordinate::Number(n) => format!("{}_{}", dimension, n),
    }
}
