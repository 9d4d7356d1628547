//! Query results, sort modes and the result buffer pool

use core::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::LayerError;
use crate::prop::{PropId, SharedProp};

/// Order in which gathered results are dispatched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Keep gather order
    None,
    #[default]
    PriorityAscending,
    PriorityDescending,
    XAscending,
    XDescending,
    YAscending,
    YDescending,
    /// Position projected on the sort scale axis, plus weighted priority
    VectorAscending,
    VectorDescending,
}

impl SortMode {
    pub const ALL: [SortMode; 9] = [
        Self::None,
        Self::PriorityAscending,
        Self::PriorityDescending,
        Self::XAscending,
        Self::XDescending,
        Self::YAscending,
        Self::YDescending,
        Self::VectorAscending,
        Self::VectorDescending,
    ];

    /// Stable integer code
    pub fn raw(self) -> u32 {
        self as u32
    }

    pub fn is_descending(self) -> bool {
        matches!(
            self,
            Self::PriorityDescending | Self::XDescending | Self::YDescending | Self::VectorDescending
        )
    }
}

impl TryFrom<u32> for SortMode {
    type Error = LayerError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(LayerError::InvalidSortMode(raw))
    }
}

/// Weights for the vector sort modes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SortScale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub priority: f32,
}

impl SortScale {
    pub const fn new(x: f32, y: f32, z: f32, priority: f32) -> Self {
        Self { x, y, z, priority }
    }

    pub fn axis(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.priority]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl Default for SortScale {
    /// Priority only
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// One gathered sub-primitive
#[derive(Clone)]
pub struct PartitionResult {
    pub prop: SharedProp,
    pub prop_id: PropId,
    pub sub_prim_id: u32,
    pub priority: i32,
    pub location: Vec3,
    /// Sort key computed by `prepare_results`
    pub key: f64,
}

impl fmt::Debug for PartitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionResult")
            .field("prop_id", &self.prop_id)
            .field("sub_prim_id", &self.sub_prim_id)
            .field("priority", &self.priority)
            .field("location", &self.location)
            .field("key", &self.key)
            .finish()
    }
}

/// Results of one partition query
#[derive(Debug, Default)]
pub struct PartitionResultBuffer {
    results: Vec<PartitionResult>,
}

impl PartitionResultBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: PartitionResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    pub fn results(&self) -> &[PartitionResult] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartitionResult> {
        self.results.iter()
    }

    /// Compute sort keys and order the results in place.
    ///
    /// With `stable` set, results with equal keys keep gather order.
    /// Returns the number of results.
    pub fn prepare_results(
        &mut self,
        mode: SortMode,
        stable: bool,
        x_scale: f32,
        y_scale: f32,
        z_scale: f32,
        priority_scale: f32,
    ) -> usize {
        if mode == SortMode::None || self.results.is_empty() {
            return self.results.len();
        }

        let axis = Vec3::new(x_scale, y_scale, z_scale);
        let sign = if mode.is_descending() { -1.0 } else { 1.0 };

        // f64 holds every i32 priority exactly
        for result in &mut self.results {
            let key = match mode {
                SortMode::PriorityAscending | SortMode::PriorityDescending => f64::from(result.priority),
                SortMode::XAscending | SortMode::XDescending => f64::from(result.location.x),
                SortMode::YAscending | SortMode::YDescending => f64::from(result.location.y),
                SortMode::VectorAscending | SortMode::VectorDescending => {
                    f64::from(result.location.dot(axis))
                        + f64::from(priority_scale) * f64::from(result.priority)
                }
                SortMode::None => 0.0,
            };
            result.key = key * sign;
        }

        let compare = |a: &PartitionResult, b: &PartitionResult| a.key.total_cmp(&b.key);
        if stable {
            self.results.sort_by(compare);
        } else {
            self.results.sort_unstable_by(compare);
        }

        self.results.len()
    }
}

/// Recycles result buffers across draws and nested layers
#[derive(Debug, Default)]
pub struct PartitionResultPool {
    free: Vec<PartitionResultBuffer>,
    in_use: usize,
}

impl PartitionResultPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer, reused when one is available
    pub fn acquire(&mut self) -> PartitionResultBuffer {
        self.in_use += 1;
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, mut buffer: PartitionResultBuffer) {
        buffer.clear();
        self.in_use = self.in_use.saturating_sub(1);
        self.free.push(buffer);
    }

    /// Buffers acquired and not yet released
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop::{share_prop, BasicProp, Prop};

    fn result(priority: i32, location: Vec3) -> PartitionResult {
        let prop = share_prop(BasicProp::square(location, 1.0).with_priority(priority));
        let prop_id = prop.read().id();
        PartitionResult {
            prop,
            prop_id,
            sub_prim_id: 0,
            priority,
            location,
            key: 0.0,
        }
    }

    fn buffer(items: &[(i32, f32, f32)]) -> PartitionResultBuffer {
        let mut buffer = PartitionResultBuffer::new();
        for &(priority, x, y) in items {
            buffer.push(result(priority, Vec3::new(x, y, 0.0)));
        }
        buffer
    }

    fn priorities(buffer: &PartitionResultBuffer) -> Vec<i32> {
        buffer.iter().map(|r| r.priority).collect()
    }

    #[test]
    fn test_raw_codes() {
        for (i, mode) in SortMode::ALL.iter().enumerate() {
            assert_eq!(mode.raw(), i as u32);
            assert_eq!(SortMode::try_from(i as u32).unwrap(), *mode);
        }
        assert!(matches!(SortMode::try_from(9), Err(LayerError::InvalidSortMode(9))));
    }

    #[test]
    fn test_sort_mode_serde_by_name() {
        let json = serde_json::to_string(&SortMode::VectorDescending).unwrap();
        assert_eq!(json, "\"vector_descending\"");
    }

    #[test]
    fn test_default_sort_scale() {
        assert_eq!(SortScale::default().to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_priority_sorts() {
        let mut b = buffer(&[(3, 0.0, 0.0), (1, 0.0, 0.0), (2, 0.0, 0.0)]);
        assert_eq!(b.prepare_results(SortMode::PriorityAscending, true, 0.0, 0.0, 0.0, 1.0), 3);
        assert_eq!(priorities(&b), vec![1, 2, 3]);

        b.prepare_results(SortMode::PriorityDescending, true, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(priorities(&b), vec![3, 2, 1]);
    }

    #[test]
    fn test_large_priorities_keep_their_order() {
        let top = i32::MAX;
        let mut b = buffer(&[(top, 0.0, 0.0), (top - 1, 0.0, 0.0), (top - 2, 0.0, 0.0)]);

        b.prepare_results(SortMode::PriorityAscending, true, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(priorities(&b), vec![top - 2, top - 1, top]);

        b.prepare_results(SortMode::PriorityDescending, true, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(priorities(&b), vec![top, top - 1, top - 2]);
    }

    #[test]
    fn test_none_keeps_gather_order() {
        let mut b = buffer(&[(3, 0.0, 0.0), (1, 0.0, 0.0), (2, 0.0, 0.0)]);
        b.prepare_results(SortMode::None, true, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(priorities(&b), vec![3, 1, 2]);
    }

    #[test]
    fn test_stable_keeps_ties_in_gather_order() {
        let mut b = buffer(&[(1, 5.0, 0.0), (2, 1.0, 0.0), (3, 5.0, 0.0), (4, 1.0, 0.0)]);
        b.prepare_results(SortMode::XAscending, true, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(priorities(&b), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_axis_sorts() {
        let mut b = buffer(&[(0, 2.0, 30.0), (1, 3.0, 10.0), (2, 1.0, 20.0)]);

        b.prepare_results(SortMode::XDescending, true, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(priorities(&b), vec![1, 0, 2]);

        b.prepare_results(SortMode::YAscending, true, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(priorities(&b), vec![1, 2, 0]);

        b.prepare_results(SortMode::YDescending, true, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(priorities(&b), vec![0, 2, 1]);
    }

    #[test]
    fn test_vector_sort_mixes_position_and_priority() {
        // key = x + 10 * priority
        let mut b = buffer(&[(0, 50.0, 0.0), (1, 0.0, 0.0), (0, 5.0, 0.0)]);
        b.prepare_results(SortMode::VectorAscending, true, 1.0, 0.0, 0.0, 10.0);

        let keys: Vec<f64> = b.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![5.0, 10.0, 50.0]);

        b.prepare_results(SortMode::VectorDescending, true, 1.0, 0.0, 0.0, 10.0);
        let xs: Vec<f32> = b.iter().map(|r| r.location.x).collect();
        assert_eq!(xs, vec![50.0, 0.0, 5.0]);
    }

    #[test]
    fn test_pool_recycles_buffers() {
        let mut pool = PartitionResultPool::new();
        let mut outer = pool.acquire();
        outer.push(result(0, Vec3::ZERO));

        let inner = pool.acquire();
        assert_eq!(pool.in_use(), 2);
        pool.release(inner);
        pool.release(outer);

        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.available(), 2);

        let again = pool.acquire();
        assert!(again.is_empty());
    }
}
