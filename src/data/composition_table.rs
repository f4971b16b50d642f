//! Labelled table of compositions.

use crate::error::{GeometryError, Result};
use crate::normalize::closure;
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A dense table of compositions.
///
/// Rows represent samples (points), columns represent parts. This is the
/// point-per-row layout used throughout the geometry functions.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionTable {
    /// Dense matrix (samples × parts)
    data: DMatrix<f64>,
    /// Sample identifiers (row names)
    sample_ids: Vec<String>,
    /// Part identifiers (column names)
    part_ids: Vec<String>,
}

impl CompositionTable {
    /// Create a new table from a matrix and identifiers.
    pub fn new(data: DMatrix<f64>, sample_ids: Vec<String>, part_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != sample_ids.len() {
            return Err(GeometryError::ShapeMismatch {
                expected: nrows,
                actual: sample_ids.len(),
            });
        }
        if ncols != part_ids.len() {
            return Err(GeometryError::ShapeMismatch {
                expected: ncols,
                actual: part_ids.len(),
            });
        }
        Ok(Self {
            data,
            sample_ids,
            part_ids,
        })
    }

    /// Load a table from a TSV file.
    ///
    /// Expected format:
    /// - First row: header with part IDs (first column is the sample ID header)
    /// - Subsequent rows: sample ID followed by numeric parts
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Load a table from any TSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(GeometryError::EmptyData(
                "TSV must have at least one part column".to_string(),
            ));
        }
        let part_ids: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();
        let n_parts = part_ids.len();

        let mut sample_ids = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let mut fields = record.iter();
            let sample_id = fields.next().unwrap_or_default();
            sample_ids.push(sample_id.to_string());

            for (col_idx, value_str) in fields.enumerate() {
                let value: f64 = value_str.trim().parse().map_err(|_| GeometryError::InvalidValue {
                    value: value_str.to_string(),
                    row: row_idx,
                    col: col_idx,
                })?;
                values.push(value);
            }
        }

        if sample_ids.is_empty() {
            return Err(GeometryError::EmptyData("No samples in TSV".to_string()));
        }

        let data = DMatrix::from_row_slice(sample_ids.len(), n_parts, &values);
        Self::new(data, sample_ids, part_ids)
    }

    /// Write the table to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_tsv(File::create(path)?)
    }

    /// Write the table as TSV to any sink.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);

        let mut header = vec!["sample_id".to_string()];
        header.extend(self.part_ids.iter().cloned());
        writer.write_record(&header)?;

        for (i, sample_id) in self.sample_ids.iter().enumerate() {
            let mut record = vec![sample_id.clone()];
            record.extend(self.data.row(i).iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Replace the values, keeping sample IDs, with new part labels.
    ///
    /// Used when a transform changes the number of columns (e.g. ALR).
    pub fn with_data(&self, data: DMatrix<f64>, part_ids: Vec<String>) -> Result<Self> {
        Self::new(data, self.sample_ids.clone(), part_ids)
    }

    /// A copy with every row closed to sum 1.
    pub fn closed(&self) -> Result<Self> {
        let mut data = self.data.clone();
        for i in 0..self.n_samples() {
            let row: Vec<f64> = self.data.row(i).iter().copied().collect();
            let closed = closure(&row).map_err(|e| match e {
                GeometryError::Domain(msg) => {
                    GeometryError::Domain(format!("sample {}: {}", self.sample_ids[i], msg))
                }
                other => other,
            })?;
            data.set_row(i, &closed.transpose());
        }
        self.with_data(data, self.part_ids.clone())
    }

    /// Get the value for a sample and part.
    #[inline]
    pub fn get(&self, sample: usize, part: usize) -> f64 {
        self.data[(sample, part)]
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of parts (columns).
    #[inline]
    pub fn n_parts(&self) -> usize {
        self.data.ncols()
    }

    /// Get a sample as a vector.
    pub fn row(&self, sample: usize) -> Vec<f64> {
        self.data.row(sample).iter().cloned().collect()
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Part identifiers.
    #[inline]
    pub fn part_ids(&self) -> &[String] {
        &self.part_ids
    }

    /// Get reference to the underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}
