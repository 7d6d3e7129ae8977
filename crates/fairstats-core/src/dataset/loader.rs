//! CSV loading for [`Dataset`].
//!
//! Layout: a header row with column names, one row per observation.
//! Column types are inferred from the cells:
//!
//! - every cell parses as an integer → `Int`
//! - every cell parses as a float or is empty → `Float` (empty = NaN)
//! - anything else → `Text`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::{Column, Dataset};
use crate::error::Result;

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading dataset from {}", path.display());
        Self::from_csv_reader(File::open(path)?)
    }

    /// Load a dataset from any CSV source.
    ///
    /// # Errors
    /// * `Csv` - malformed CSV, including rows with the wrong number of fields
    /// * `DuplicateColumn` - the header repeats a name
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in reader.records() {
            let record = record?;
            for (column, value) in cells.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
        }

        let columns: Vec<Column> = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| infer_column(name, values))
            .collect();

        let dataset = Dataset::new(columns)?;
        debug!(
            "loaded {} rows × {} columns",
            dataset.n_rows(),
            dataset.n_cols()
        );
        Ok(dataset)
    }
}

fn infer_column(name: String, cells: Vec<String>) -> Column {
    if !cells.is_empty() {
        let ints: std::result::Result<Vec<i64>, _> =
            cells.iter().map(|c| c.parse::<i64>()).collect();
        if let Ok(values) = ints {
            return Column::int(name, values);
        }
    }

    let floats: Option<Vec<f64>> = cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Some(f64::NAN)
            } else {
                c.parse::<f64>().ok()
            }
        })
        .collect();

    match floats {
        Some(values) => Column::float(name, values),
        None => Column::text(name, cells),
    }
}
