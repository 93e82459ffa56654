//! Reference descriptor database
//!
//! Every entry carries its own identifier, so the ranking never depends on
//! the order in which reference files happen to be listed on disk.

use crate::Descriptor;
use serde::{Deserialize, Serialize};
use shapefind_core::{Error, Result, Vector3d};

/// One reference mesh: its identifier and precomputed descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseEntry {
    pub id: String,
    pub descriptor: Descriptor,
}

impl DatabaseEntry {
    pub fn new(id: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            id: id.into(),
            descriptor,
        }
    }
}

/// Serialised form of a [`DatabaseEntry`]; the tensor is stored row-major
/// and its shape is only checked when converting into an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    pub id: String,
    pub inertia: Vec<Vec<f64>>,
    pub average_distance: f64,
    pub distance_variance: f64,
}

impl DescriptorRecord {
    pub fn from_descriptor(id: impl Into<String>, descriptor: &Descriptor) -> Self {
        Self {
            id: id.into(),
            inertia: descriptor
                .inertia_rows()
                .iter()
                .map(|row| row.to_vec())
                .collect(),
            average_distance: descriptor.average_distance,
            distance_variance: descriptor.distance_variance,
        }
    }

    /// Convert into an entry; `index` is the record's position, used for error reporting.
    pub fn into_entry(self, index: usize) -> Result<DatabaseEntry> {
        let descriptor = Descriptor::from_rows(&self.inertia, self.average_distance, self.distance_variance)
            .map_err(|reason| Error::invalid_entry(index, self.id.clone(), reason))?;
        Ok(DatabaseEntry::new(self.id, descriptor))
    }
}

/// Serialised form of a whole [`DescriptorDatabase`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseFile {
    /// Axis the descriptors were computed against, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 3]>,
    pub entries: Vec<DescriptorRecord>,
}

/// Ordered, read-only collection of reference descriptors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorDatabase {
    entries: Vec<DatabaseEntry>,
    axis: Option<Vector3d>,
}

impl DescriptorDatabase {
    pub fn new(entries: Vec<DatabaseEntry>) -> Self {
        Self { entries, axis: None }
    }

    /// Record the axis the entries were built with
    pub fn with_axis(mut self, axis: Vector3d) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Validate and convert a deserialised database file.
    ///
    /// A recorded axis that is zero or non-finite makes the whole file
    /// unusable ([`Error::DatabaseUnavailable`]).
    pub fn from_file(file: DatabaseFile) -> Result<Self> {
        let axis = file.axis.map(Vector3d::from);
        if let Some(axis) = &axis {
            if !axis.iter().all(|c| c.is_finite()) || axis.norm() <= f64::EPSILON {
                return Err(Error::DatabaseUnavailable(format!(
                    "recorded axis {:?} is not a usable direction",
                    axis.as_slice()
                )));
            }
        }
        let entries = file
            .entries
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_entry(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries, axis })
    }

    pub fn entries(&self) -> &[DatabaseEntry] {
        &self.entries
    }

    pub fn axis(&self) -> Option<&Vector3d> {
        self.axis.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatabaseEntry> {
        self.entries.iter()
    }
}

impl FromIterator<DatabaseEntry> for DescriptorDatabase {
    fn from_iter<I: IntoIterator<Item = DatabaseEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DescriptorDatabase {
    type Item = &'a DatabaseEntry;
    type IntoIter = std::slice::Iter<'a, DatabaseEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
