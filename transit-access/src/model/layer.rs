use super::{AccessError, Crs, Projector};

/// a table of rows sharing one coordinate reference system.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer<T> {
    pub crs: Crs,
    pub rows: Vec<T>,
}

/// rows whose geometry can be moved between coordinate reference systems.
pub trait Reproject: Sized {
    fn reproject(&self, projector: &Projector) -> Result<Self, AccessError>;
}

impl<T> Layer<T> {
    pub fn new(crs: Crs, rows: Vec<T>) -> Layer<T> {
        Layer { crs, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// fails if this layer is not in the expected reference system.
    pub fn require_crs(&self, expected: Crs) -> Result<(), AccessError> {
        if self.crs == expected {
            Ok(())
        } else {
            Err(AccessError::CrsMismatch {
                expected,
                found: self.crs,
            })
        }
    }
}

impl<T: Reproject + Clone> Layer<T> {
    /// returns a copy of this layer in the target reference system.
    pub fn reprojected(&self, target: Crs) -> Result<Layer<T>, AccessError> {
        if self.crs == target {
            return Ok(self.clone());
        }
        let projector = Projector::new(self.crs, target)?;
        let rows = self
            .rows
            .iter()
            .map(|row| row.reproject(&projector))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Layer::new(target, rows))
    }
}
