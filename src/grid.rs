//! Numeric grids
//!
//! A [Grid] is the rectangular, row-major table of `f64` values read from a
//! comma separated file with no header row.

use std::{
    fmt,
    fs::File,
    io::{self, Read},
    num::ParseFloatError,
    path::Path,
};

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("failed to read the CSV file")]
    Io(#[from] io::Error),
    #[error("failed to read the CSV records")]
    Csv(#[source] csv::Error),
    #[error("line {line}: found {found} values, expected {expected}")]
    Ragged { line: u64, expected: u64, found: u64 },
    #[error("line {line}, column {column}: {token:?} is not a number")]
    Token {
        line: u64,
        column: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("no numeric rows found")]
    Empty,
}
impl From<csv::Error> for GridError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(_) => Self::Io(error.into()),
            _ => Self::Csv(error),
        }
    }
}
type Result<T> = std::result::Result<T, GridError>;

/// Rectangular grid of values, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f64>,
    n_row: usize,
    n_col: usize,
}
impl Grid {
    /// Builds a grid from a list of rows, all of the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_col = rows.first().map(|row| row.len()).ok_or(GridError::Empty)?;
        if n_col == 0 {
            return Err(GridError::Empty);
        }
        let n_row = rows.len();
        let mut data = Vec::with_capacity(n_row * n_col);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_col {
                return Err(GridError::Ragged {
                    line: i as u64 + 1,
                    expected: n_col as u64,
                    found: row.len() as u64,
                });
            }
            data.extend(row);
        }
        Ok(Self { data, n_row, n_col })
    }
    /// Loads the grid from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
    /// Parses the grid from comma separated text
    ///
    /// Fields are trimmed, blank or whitespace only lines and lines starting
    /// with `#` are skipped. Every row must have the same number of values.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut data = Vec::new();
        let mut n_col = 0;
        for result in rdr.records() {
            let record = result?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            if n_col == 0 {
                n_col = record.len();
            } else if record.len() != n_col {
                return Err(GridError::Ragged {
                    line,
                    expected: n_col as u64,
                    found: record.len() as u64,
                });
            }
            for (k, token) in record.iter().enumerate() {
                let value = token.parse::<f64>().map_err(|source| GridError::Token {
                    line,
                    column: k + 1,
                    token: token.to_string(),
                    source,
                })?;
                data.push(value);
            }
        }
        if data.is_empty() {
            return Err(GridError::Empty);
        }
        let n_row = data.len() / n_col;
        log::debug!("parsed a {}x{} grid", n_row, n_col);
        Ok(Self { data, n_row, n_col })
    }
    /// Returns the number of rows and columns
    pub fn shape(&self) -> (usize, usize) {
        (self.n_row, self.n_col)
    }
    pub fn n_row(&self) -> usize {
        self.n_row
    }
    pub fn n_col(&self) -> usize {
        self.n_col
    }
    /// Returns the value at (`row`,`col`)
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.n_row && col < self.n_col {
            Some(self.data[row * self.n_col + col])
        } else {
            None
        }
    }
    /// Iterator over the rows
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.n_col)
    }
    /// Iterator over all the values
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().cloned()
    }
    /// Minimum and maximum of the finite values, `None` if there are none
    pub fn minmax(&self) -> Option<(f64, f64)> {
        self.values()
            .filter(|x| x.is_finite())
            .fold(None, |acc, x| match acc {
                None => Some((x, x)),
                Some((min, max)) => Some((min.min(x), max.max(x))),
            })
    }
    pub fn summary(&self) -> Summary {
        let finite: Vec<f64> = self.values().filter(|x| x.is_finite()).collect();
        let mean = if finite.is_empty() {
            None
        } else {
            Some(finite.iter().sum::<f64>() / finite.len() as f64)
        };
        Summary {
            shape: self.shape(),
            minmax: self.minmax(),
            mean,
            non_finite: self.data.len() - finite.len(),
        }
    }
}

/// Grid statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub shape: (usize, usize),
    pub minmax: Option<(f64, f64)>,
    pub mean: Option<f64>,
    pub non_finite: usize,
}
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SUMMARY:")?;
        writeln!(f, " - shape: {}x{}", self.shape.0, self.shape.1)?;
        match (self.minmax, self.mean) {
            (Some((min, max)), Some(mean)) => {
                writeln!(f, " - range: [{:.6e}, {:.6e}]", min, max)?;
                writeln!(f, " - mean: {:.6e}", mean)?;
            }
            _ => writeln!(f, " - range: no finite values")?,
        }
        write!(f, " - non-finite cells: {}", self.non_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_square() {
        let grid = Grid::from_reader("1,2\n3,4".as_bytes()).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.get(0, 1), Some(2.));
        assert_eq!(grid.get(1, 0), Some(3.));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.minmax(), Some((1., 4.)));
    }

    #[test]
    fn parse_whitespace_comments_and_blank_lines() {
        let csv = "# solution\n 1.5 , -2e3\n\n0.25,7\n";
        let grid = Grid::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows[0], &[1.5, -2e3][..]);
        assert_eq!(rows[1], &[0.25, 7.][..]);
    }

    #[test]
    fn single_row_and_single_column() {
        let row = Grid::from_reader("1,2,3".as_bytes()).unwrap();
        assert_eq!(row.shape(), (1, 3));
        let col = Grid::from_reader("1\n2\n3\n".as_bytes()).unwrap();
        assert_eq!(col.shape(), (3, 1));
    }

    #[test]
    fn whitespace_only_lines_are_blank() {
        let grid = Grid::from_reader("1,2\n   \n3,4\n\t\n".as_bytes()).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.get(1, 1), Some(4.));
    }

    #[test]
    fn read_failure_is_an_io_error() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "device lost"))
            }
        }
        let err = Grid::from_reader("1,2\n3,4\n".as_bytes().chain(Failing)).unwrap_err();
        assert!(matches!(err, GridError::Io(_)), "{err:?}");
    }

    #[test]
    fn ragged_rows() {
        let err = Grid::from_reader("1,2\n3\n".as_bytes()).unwrap_err();
        match err {
            GridError::Ragged {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_token() {
        let err = Grid::from_reader("1,2\n3,x\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            GridError::Token { line: 2, column: 2, ref token, .. } if token == "x"
        ));
    }

    #[test]
    fn trailing_comma_is_an_empty_field() {
        let err = Grid::from_reader("1,2,\n3,4,\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GridError::Token { column: 3, .. }));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            Grid::from_reader("".as_bytes()),
            Err(GridError::Empty)
        ));
        assert!(matches!(
            Grid::from_reader("# nothing here\n".as_bytes()),
            Err(GridError::Empty)
        ));
    }

    #[test]
    fn non_finite_values() {
        let grid = Grid::from_reader("nan,1\n-inf,3".as_bytes()).unwrap();
        assert_eq!(grid.minmax(), Some((1., 3.)));
        let summary = grid.summary();
        assert_eq!(summary.non_finite, 2);
        assert_eq!(summary.mean, Some(2.));
    }

    #[test]
    fn from_rows() {
        let grid = Grid::from_rows(vec![vec![0., 1.], vec![2., 3.]]).unwrap();
        assert_eq!(grid, Grid::from_reader("0,1\n2,3".as_bytes()).unwrap());
        assert!(matches!(
            Grid::from_rows(vec![vec![0., 1.], vec![2.]]),
            Err(GridError::Ragged { line: 2, .. })
        ));
        assert!(matches!(Grid::from_rows(vec![]), Err(GridError::Empty)));
    }
}
