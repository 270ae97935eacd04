//! Column-major sample storage.
//!
//! A [`SampleSet`] is the ephemeral product of one sampling pass: one
//! column of draws per variable, all columns the same length. It is
//! produced and consumed within a single engine call and only escapes to
//! callers through the explicit raw-sampling entry points.

use serde::{Deserialize, Serialize};

/// An ordered set of Monte Carlo draws, one column per variable.
///
/// Row `i` across all columns forms one joint (correlated) scenario draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    /// Variable names, in request order.
    names: Vec<String>,
    /// One column of draws per variable, all equal length.
    columns: Vec<Vec<f64>>,
}

impl SampleSet {
    /// Assembles a sample set from names and columns.
    ///
    /// # Panics
    ///
    /// Panics (debug builds) if the column count differs from the name
    /// count or the columns are ragged.
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { names, columns }
    }

    /// Returns the number of iterations (rows).
    pub fn iterations(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Returns the number of variables (columns).
    pub fn variable_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the variable names in request order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns all columns in request order.
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// Returns the column index of a variable name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns the draws for a variable by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|i| self.columns[i].as_slice())
    }
}
