pub mod flux_list;
pub mod models;

use crate::analysis::dilution::DilutionResult;
use crate::error::Error;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use flux_list::parse_flux_list;
use models::SystemRecord;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column names the pipeline reads from and writes to.
#[derive(Debug, Clone, Copy)]
pub struct Columns<'a> {
    pub id: &'a str,
    pub flux: &'a str,
    pub flux_err: &'a str,
}

/// A delimited survey table held in memory.
///
/// Every original cell is kept verbatim so that writing the table back only
/// changes the derived columns.
#[derive(Debug, Clone)]
pub struct SystemTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    delimiter: u8,
}

impl SystemTable {
    pub fn read<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Reading table {}", path.display());
        let file = fs::File::open(path)?;
        Self::from_reader(file, delimiter)
    }

    pub fn from_reader<R: io::Read>(reader: R, delimiter: u8) -> Result<Self, Error> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            headers,
            rows,
            delimiter,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, Error> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column).ok()?;
        self.rows.get(row)?.get(col)
    }

    /// Decode every row into a [`SystemRecord`], failing on the first
    /// malformed cell.
    pub fn records(&self, columns: Columns<'_>) -> Result<Vec<SystemRecord>, Error> {
        let id_idx = self.column_index(columns.id)?;
        let flux_idx = self.column_index(columns.flux)?;
        let err_idx = self.column_index(columns.flux_err)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let kic = cell_at(record, row, id_idx, columns.id)?.trim().to_string();
                let fluxes = list_at(record, row, flux_idx, columns.flux)?;
                let flux_errors = list_at(record, row, err_idx, columns.flux_err)?;

                if fluxes.len() != flux_errors.len() {
                    return Err(Error::MalformedRecord {
                        row,
                        column: columns.flux_err.to_string(),
                        reason: format!(
                            "{} error values for {} flux values",
                            flux_errors.len(),
                            fluxes.len()
                        ),
                    });
                }

                Ok(SystemRecord {
                    row,
                    kic,
                    fluxes,
                    flux_errors,
                })
            })
            .collect()
    }

    /// Return a copy of the table with the two derived columns set from
    /// `results`, one entry per row in row order. Existing derived columns are
    /// overwritten in place, otherwise they are appended. `None` is written
    /// as `NaN`.
    pub fn augment(
        &self,
        dilution_column: &str,
        dilution_err_column: &str,
        results: &[Option<DilutionResult>],
    ) -> Result<SystemTable, Error> {
        if results.len() != self.rows.len() {
            return Err(Error::Other(format!(
                "{} results for {} table rows",
                results.len(),
                self.rows.len()
            )));
        }

        let mut headers = self.headers.clone();
        let dil_idx = ensure_column(&mut headers, dilution_column);
        let err_idx = ensure_column(&mut headers, dilution_err_column);
        let width = headers.len();

        let rows = self
            .rows
            .iter()
            .zip(results)
            .map(|(record, result)| {
                let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
                cells.resize(width, String::new());
                let (dil, err) = match result {
                    Some(r) => (r.dilution_percent, r.dilution_error_percent),
                    None => (f64::NAN, f64::NAN),
                };
                cells[dil_idx] = dil.to_string();
                cells[err_idx] = err.to_string();
                StringRecord::from(cells)
            })
            .collect();

        Ok(SystemTable {
            headers,
            rows,
            delimiter: self.delimiter,
        })
    }

    /// Overwrite `path` with this table. The data is written to a sibling
    /// file first and renamed into place.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let tmp_path = sibling_tmp_path(path);
        debug!("Writing table to {}", tmp_path.display());

        let file = fs::File::create(&tmp_path)?;
        if let Err(e) = self.to_writer(file) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(&self.headers)?;
        for record in &self.rows {
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn cell_at<'r>(
    record: &'r StringRecord,
    row: usize,
    idx: usize,
    column: &str,
) -> Result<&'r str, Error> {
    record.get(idx).ok_or_else(|| Error::MalformedRecord {
        row,
        column: column.to_string(),
        reason: "missing cell".to_string(),
    })
}

fn list_at(record: &StringRecord, row: usize, idx: usize, column: &str) -> Result<Vec<f64>, Error> {
    parse_flux_list(cell_at(record, row, idx, column)?).map_err(|e| Error::MalformedRecord {
        row,
        column: column.to_string(),
        reason: e.to_string(),
    })
}

fn ensure_column(headers: &mut StringRecord, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(idx) => idx,
        None => {
            headers.push_field(name);
            headers.len() - 1
        }
    }
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
