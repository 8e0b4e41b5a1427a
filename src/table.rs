//! Column-oriented delimited tables of numbers.
//!
//! Columns are identified by position; header names, when present,
//! are kept only for diagnostics.
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{FieldError, Result};

/// A table of numeric columns, all of the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnTable {
    source: PathBuf,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ColumnTable {
    /// Read a table from a file.
    ///
    /// # Errors
    /// * `Io` if the file cannot be opened
    /// * `Parse` for ragged rows or fields that are not numbers
    pub fn read(path: &Path, delimiter: u8, has_header: bool) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| FieldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, path, delimiter, has_header)?;
        trace!(
            "Read {} columns x {} rows from {}",
            table.ncols(),
            table.nrows(),
            path.display()
        );
        Ok(table)
    }

    /// Read a table from any reader. `source` names it in error messages.
    pub fn from_reader<R: Read>(
        reader: R,
        source: &Path,
        delimiter: u8,
        has_header: bool,
    ) -> Result<Self> {
        let parse_err = |line: usize, message: String| FieldError::Parse {
            path: source.to_path_buf(),
            line,
            message,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_header)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut names: Vec<String> = Vec::new();
        if has_header {
            let headers = rdr
                .headers()
                .map_err(|e| parse_err(csv_line(&e), e.to_string()))?;
            names = headers.iter().map(str::to_owned).collect();
        }

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
        for record in rdr.records() {
            let record = record.map_err(|e| parse_err(csv_line(&e), e.to_string()))?;
            let line = record.position().map_or(0, |p| p.line() as usize);

            if columns.is_empty() {
                columns = vec![Vec::new(); record.len()];
            }
            if record.len() != columns.len() {
                return Err(parse_err(
                    line,
                    format!("expected {} fields, found {}", columns.len(), record.len()),
                ));
            }

            for (col, field) in columns.iter_mut().zip(record.iter()) {
                let v: f64 = field
                    .parse()
                    .map_err(|_| parse_err(line, format!("`{field}` is not a number")))?;
                col.push(v);
            }
        }

        if names.is_empty() {
            names = (0..columns.len()).map(|i| format!("column{i}")).collect();
        }

        Ok(Self {
            source: source.to_path_buf(),
            names,
            columns,
        })
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, i: usize) -> Option<&[f64]> {
        self.columns.get(i).map(Vec::as_slice)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Take ownership of the column data.
    pub fn into_columns(self) -> Vec<Vec<f64>> {
        self.columns
    }

    /// # Errors
    /// * `FormatMismatch` if the table does not have exactly `expected` columns
    pub fn expect_columns(&self, expected: usize) -> Result<()> {
        if self.ncols() != expected {
            return Err(FieldError::FormatMismatch {
                file: self.source.display().to_string(),
                expected,
                found: self.ncols(),
            });
        }
        Ok(())
    }
}

fn csv_line(e: &csv::Error) -> usize {
    e.position().map_or(0, |p| p.line() as usize)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &str, delimiter: u8, has_header: bool) -> Result<ColumnTable> {
        ColumnTable::from_reader(text.as_bytes(), Path::new("mem.csv"), delimiter, has_header)
    }

    #[test]
    fn test_read_with_header() {
        let table = parse("x,y,t\n0,0,0\n1, 5,10\n2,0,0\n", b',', true).unwrap();
        assert_eq!(table.names(), &["x", "y", "t"]);
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.column(0).unwrap(), &[0.0, 1.0, 2.0]);
        assert_eq!(table.column(1).unwrap(), &[0.0, 5.0, 0.0]);
        assert!(table.column(3).is_none());
    }

    #[test]
    fn test_read_without_header() {
        let table = parse("1.5;2\n3;4e-1\n", b';', false).unwrap();
        assert_eq!(table.names(), &["column0", "column1"]);
        assert_eq!(table.into_columns(), vec![vec![1.5, 3.0], vec![2.0, 0.4]]);
    }

    #[test]
    fn test_rejects_non_numeric() {
        let result = parse("u\n1.0\nabc\n", b',', true);
        match result {
            Err(FieldError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = parse("a,b\n1,2\n3\n", b',', true);
        assert!(matches!(result, Err(FieldError::Parse { .. })));
    }

    #[test]
    fn test_expect_columns() {
        let table = parse("a,b\n1,2\n", b',', true).unwrap();
        table.expect_columns(2).unwrap();
        match table.expect_columns(3) {
            Err(FieldError::FormatMismatch {
                file,
                expected,
                found,
            }) => {
                assert_eq!(file, "mem.csv");
                assert_eq!((expected, found), (3, 2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = ColumnTable::read(Path::new("/nonexistent/gridfield/u.csv"), b',', true);
        assert!(matches!(result, Err(FieldError::Io { .. })));
    }
}
