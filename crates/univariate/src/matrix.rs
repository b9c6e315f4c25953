use uot_core::Probability;

/// Dense `[n, m]` transport matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Probability>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.; rows * cols],
        }
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn get(&self, i: usize, j: usize) -> Probability {
        self.data[i * self.cols + j]
    }
    /// Overwrites one cell.
    pub fn set(&mut self, i: usize, j: usize, mass: Probability) {
        self.data[i * self.cols + j] = mass;
    }
    /// Accumulates into one cell.
    pub fn add(&mut self, i: usize, j: usize, mass: Probability) {
        self.data[i * self.cols + j] += mass;
    }
    pub fn row(&self, i: usize) -> &[Probability] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }
    /// Mass leaving each source point.
    pub fn row_sums(&self) -> Vec<Probability> {
        (0..self.rows).map(|i| self.row(i).iter().sum()).collect()
    }
    /// Mass arriving at each target point.
    pub fn col_sums(&self) -> Vec<Probability> {
        (0..self.cols)
            .map(|j| (0..self.rows).map(|i| self.get(i, j)).sum())
            .collect()
    }
    pub fn total(&self) -> Probability {
        self.data.iter().sum()
    }
    /// Elementwise `self += other · scale`.
    pub fn axpy(&mut self, scale: Probability, other: &Self) {
        debug_assert!(self.shape() == other.shape(), "matrix shapes differ");
        self.data
            .iter_mut()
            .zip(other.data.iter())
            .for_each(|(x, y)| *x += scale * y);
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = Probability;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols + j]
    }
}
