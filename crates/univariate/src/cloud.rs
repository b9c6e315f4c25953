use super::*;
use uot_core::Coordinate;

/// An `[n, d]` point cloud, stored slice by slice.
///
/// Univariate transport only ever reads one coordinate at a time, so the
/// points are kept column-major: `column(k)` is the contiguous list of the
/// k-th coordinate of every point.
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    points: usize,
    columns: Vec<Vec<Coordinate>>,
}

impl Cloud {
    /// Builds a cloud from its coordinate slices. All slices must have equal length.
    pub fn from_columns(columns: Vec<Vec<Coordinate>>) -> Result<Self> {
        let points = columns.first().map(Vec::len).unwrap_or(0);
        match columns.iter().position(|c| c.len() != points) {
            Some(k) => Err(Error::Ragged {
                index: k,
                expected: points,
                found: columns[k].len(),
            }),
            None => Ok(Self { points, columns }),
        }
    }
    /// Number of points `n`.
    pub fn len(&self) -> usize {
        self.points
    }
    pub fn is_empty(&self) -> bool {
        self.points == 0
    }
    /// Number of coordinate slices `d`.
    pub fn dims(&self) -> usize {
        self.columns.len()
    }
    /// The k-th coordinate of every point.
    pub fn column(&self, k: usize) -> &[Coordinate] {
        &self.columns[k]
    }
    pub fn columns(&self) -> impl Iterator<Item = &[Coordinate]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }
    /// Coordinates of the i-th point.
    pub fn row(&self, i: usize) -> Vec<Coordinate> {
        self.columns.iter().map(|c| c[i]).collect()
    }
    /// New cloud made of the given points, repeats allowed.
    pub fn gather(&self, rows: &[usize]) -> Self {
        Self {
            points: rows.len(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }
}

/// A one-dimensional cloud.
impl From<Vec<Coordinate>> for Cloud {
    fn from(points: Vec<Coordinate>) -> Self {
        Self {
            points: points.len(),
            columns: vec![points],
        }
    }
}

/// Row-major construction; every row is one point.
impl<'a> TryFrom<&'a [Vec<Coordinate>]> for Cloud {
    type Error = Error;
    fn try_from(rows: &'a [Vec<Coordinate>]) -> Result<Self> {
        let dims = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = rows.iter().position(|r| r.len() != dims) {
            return Err(Error::Ragged {
                index: i,
                expected: dims,
                found: rows[i].len(),
            });
        }
        Ok(Self {
            points: rows.len(),
            columns: (0..dims)
                .map(|k| rows.iter().map(|r| r[k]).collect())
                .collect(),
        })
    }
}
