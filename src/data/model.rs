use std::fmt;

// ---------------------------------------------------------------------------
// Axis – one spatial component
// ---------------------------------------------------------------------------

/// One of the three spatial axes a vector quantity was measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in file-discovery order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Lowercase token used in component file names (`p_x_…`).
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Components – one value per axis
// ---------------------------------------------------------------------------

/// A value for each of the x, y and z components.
#[derive(Debug, Clone, PartialEq)]
pub struct Components<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Components<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Components { x, y, z }
    }

    /// Build each component from its axis.
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Components {
            x: f(Axis::X),
            y: f(Axis::Y),
            z: f(Axis::Z),
        }
    }

    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Iterate as `(axis, value)` pairs in x, y, z order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    pub fn as_ref(&self) -> Components<&T> {
        Components::new(&self.x, &self.y, &self.z)
    }

    pub fn map<U>(self, mut f: impl FnMut(Axis, T) -> U) -> Components<U> {
        Components {
            x: f(Axis::X, self.x),
            y: f(Axis::Y, self.y),
            z: f(Axis::Z, self.z),
        }
    }

    /// Like [`Components::map`], stopping at the first error (x first).
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(Axis, T) -> Result<U, E>,
    ) -> Result<Components<U>, E> {
        Ok(Components {
            x: f(Axis::X, self.x)?,
            y: f(Axis::Y, self.y)?,
            z: f(Axis::Z, self.z)?,
        })
    }
}

// ---------------------------------------------------------------------------
// PowerMatrix – frequency × time-bin power values
// ---------------------------------------------------------------------------

/// Dense row-major matrix of power values; one row per frequency, one
/// column per time bin.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PowerMatrix {
    /// Wrap row-major `values`. Returns `None` if `values.len() != rows * cols`.
    pub fn from_row_major(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == rows * cols).then_some(PowerMatrix { rows, cols, values })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        PowerMatrix {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Append one row.
    ///
    /// # Panics
    ///
    /// If `row.len()` differs from `cols()`.
    pub fn push_row(&mut self, row: &[f64]) {
        assert_eq!(row.len(), self.cols, "row length must match column count");
        self.values.extend_from_slice(row);
        self.rows += 1;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// Spectrogram – one loaded (or combined) spectrogram table
// ---------------------------------------------------------------------------

/// A spectrogram table as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    /// Bin header exactly as it is written back out (no `#`, no whitespace).
    pub bins_text: String,
    /// Parsed time-bin values from the header.
    pub bins: Vec<f64>,
    /// Frequency axis (first column) – same length as `power.rows()`.
    pub frequencies: Vec<f64>,
    pub power: PowerMatrix,
}
