//! Proximity grouping of triangle corners.
//!
//! Corners are grouped by a quantized position key instead of float
//! equality, so corners that were separate vertices in the source (UV seams,
//! sub-mesh borders, unwelded copies) still find each other.

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

use crate::MeshBuffer;
use crate::params::DEFAULT_POSITION_TOLERANCE;

/// Quantized position used as a grouping key.
///
/// Each coordinate is divided by the tolerance and rounded to the nearest
/// integer. Two positions closer than about one tolerance step along every
/// axis usually share a key; positions straddling a rounding boundary do not.
/// The key is never converted back into a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    x: i64,
    y: i64,
    z: i64,
}

impl VertexKey {
    /// Quantize a position with the given tolerance step.
    #[inline]
    pub fn new(position: &Point3<f64>, tolerance: f64) -> Self {
        Self {
            x: (position.x / tolerance).round() as i64,
            y: (position.y / tolerance).round() as i64,
            z: (position.z / tolerance).round() as i64,
        }
    }

    /// The quantized coordinates.
    #[inline]
    pub fn coords(&self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

/// One corner occurrence in a flattened mesh.
///
/// `triangle` is local to its sub-mesh; `vertex` indexes the flattened
/// vertex arrays. Entries only point into the buffer, they own nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexEntry {
    /// Sub-mesh the corner belongs to.
    pub sub_mesh: u32,
    /// Triangle index within the sub-mesh.
    pub triangle: u32,
    /// Flattened vertex index of the corner.
    pub vertex: u32,
}

/// Corner entries partitioned into proximity groups.
///
/// Entries are stored contiguously per group (one arena plus group offsets).
/// Groups appear in the order their first corner was visited.
#[derive(Debug, Clone, Default)]
pub struct VertexGroups {
    entries: Vec<VertexEntry>,
    offsets: Vec<usize>,
}

impl VertexGroups {
    /// Number of groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Total number of entries across groups.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries of one group.
    ///
    /// # Panics
    ///
    /// Panics if `group >= group_count()`.
    #[inline]
    pub fn group(&self, group: usize) -> &[VertexEntry] {
        &self.entries[self.offsets[group]..self.offsets[group + 1]]
    }

    /// Iterate over all groups.
    pub fn iter(&self) -> impl Iterator<Item = &[VertexEntry]> + '_ {
        self.offsets
            .windows(2)
            .map(|w| &self.entries[w[0]..w[1]])
    }

    /// Size of the largest group.
    pub fn max_group_size(&self) -> usize {
        self.iter().map(<[VertexEntry]>::len).max().unwrap_or(0)
    }
}

/// Groups the corners of a mesh by quantized position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityVertexGrouper {
    tolerance: f64,
}

impl Default for ProximityVertexGrouper {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION_TOLERANCE)
    }
}

impl ProximityVertexGrouper {
    /// Create a grouper with the given quantization step.
    ///
    /// The tolerance must be positive and finite; see
    /// [`SmoothingParams::validate`](crate::SmoothingParams::validate).
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// The quantization step.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Key of a position under this grouper's tolerance.
    #[inline]
    pub fn key(&self, position: &Point3<f64>) -> VertexKey {
        VertexKey::new(position, self.tolerance)
    }

    /// Group every triangle corner of `mesh`.
    ///
    /// Intended for unwelded meshes but works on any valid buffer: each
    /// corner becomes one entry pointing at the vertex index it uses.
    pub fn group(&self, mesh: &MeshBuffer) -> VertexGroups {
        let corner_count = mesh.index_count();

        let mut key_to_group: HashMap<VertexKey, usize> = HashMap::with_capacity(corner_count);
        let mut corners: Vec<(usize, VertexEntry)> = Vec::with_capacity(corner_count);

        for (sub_mesh, list) in mesh.sub_meshes.iter().enumerate() {
            for (triangle, tri) in list.chunks_exact(3).enumerate() {
                for &vertex in tri {
                    let key = self.key(&mesh.positions[vertex as usize]);
                    let next = key_to_group.len();
                    let group = *key_to_group.entry(key).or_insert(next);

                    corners.push((
                        group,
                        VertexEntry {
                            sub_mesh: sub_mesh as u32,
                            triangle: triangle as u32,
                            vertex,
                        },
                    ));
                }
            }
        }

        // Counting sort by group id keeps visit order inside each group.
        let group_count = key_to_group.len();
        let mut offsets = vec![0usize; group_count + 1];
        for &(group, _) in &corners {
            offsets[group + 1] += 1;
        }
        for i in 0..group_count {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets.clone();
        let mut entries = vec![
            VertexEntry {
                sub_mesh: 0,
                triangle: 0,
                vertex: 0,
            };
            corners.len()
        ];
        for (group, entry) in corners {
            entries[cursor[group]] = entry;
            cursor[group] += 1;
        }

        let groups = VertexGroups { entries, offsets };

        debug!(
            corners = groups.entry_count(),
            groups = groups.group_count(),
            largest = groups.max_group_size(),
            tolerance = self.tolerance,
            "Grouped corners by position"
        );

        groups
    }
}
