use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    InvalidCellSize {
        width: f32,
        height: f32,
    },
    InvalidBounds {
        width: f32,
        height: f32,
    },
    TooManyCells {
        cols: f64,
        rows: f64,
    },
    CoarseCellTooSmall {
        cell_width: f32,
        cell_height: f32,
        coarse_width: f32,
        coarse_height: f32,
    },
    ElementNotFound {
        id: u32,
        col: u32,
        row: u32,
    },
}

pub type GridResult<T> = Result<T, GridError>;

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidCellSize { width, height } => {
                write!(
                    f,
                    "cell width/height must be finite and positive (width: {}, height: {})",
                    width, height
                )
            }
            GridError::InvalidBounds { width, height } => {
                write!(
                    f,
                    "grid bounds must be finite and positive (width: {}, height: {})",
                    width, height
                )
            }
            GridError::TooManyCells { cols, rows } => {
                write!(
                    f,
                    "grid needs too many cells to be addressed (cols: {}, rows: {})",
                    cols, rows
                )
            }
            GridError::CoarseCellTooSmall {
                cell_width,
                cell_height,
                coarse_width,
                coarse_height,
            } => {
                write!(
                    f,
                    "coarse cells must be larger than fine cells (cell: {}x{}, coarse: {}x{})",
                    cell_width, cell_height, coarse_width, coarse_height
                )
            }
            GridError::ElementNotFound { id, col, row } => {
                write!(
                    f,
                    "element {} not found in cell (col: {}, row: {})",
                    id, col, row
                )
            }
        }
    }
}

impl std::error::Error for GridError {}
