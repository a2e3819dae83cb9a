//! Fixed-shape tensor representation for neural network input.
//!
//! Positions are encoded as `(channels, height, width)` f32 tensors,
//! stored flat in row-major order.

use serde::{Deserialize, Serialize};

/// A `(channels, height, width)` tensor of f32 values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: Vec<f32>,
    shape: [usize; 3],
}

impl Tensor {
    /// Create a zero-filled tensor with the given shape.
    #[must_use]
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            data: vec![0.0; shape.iter().product()],
            shape,
        }
    }

    /// The tensor shape as `(channels, height, width)`.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn offset(&self, channel: usize, row: usize, col: usize) -> usize {
        debug_assert!(channel < self.shape[0] && row < self.shape[1] && col < self.shape[2]);
        (channel * self.shape[1] + row) * self.shape[2] + col
    }

    /// Get the value at `(channel, row, col)`.
    #[must_use]
    pub fn get(&self, channel: usize, row: usize, col: usize) -> f32 {
        self.data[self.offset(channel, row, col)]
    }

    /// Set the value at `(channel, row, col)`.
    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: f32) {
        let i = self.offset(channel, row, col);
        self.data[i] = value;
    }

    /// Fill an entire channel with one value (used for broadcast indicator
    /// planes such as side to move).
    pub fn fill_channel(&mut self, channel: usize, value: f32) {
        let plane = self.shape[1] * self.shape[2];
        let start = channel * plane;
        self.data[start..start + plane].fill(value);
    }

    /// The flattened data in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros([3, 4, 5]);
        assert_eq!(t.len(), 60);
        assert!(t.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_get_set() {
        let mut t = Tensor::zeros([2, 3, 3]);
        t.set(1, 2, 0, 0.5);
        assert_eq!(t.get(1, 2, 0), 0.5);
        assert_eq!(t.get(0, 2, 0), 0.0);
        // Flat layout: channel 1, row 2, col 0 = 9 + 6.
        assert_eq!(t.as_slice()[15], 0.5);
    }

    #[test]
    fn test_fill_channel() {
        let mut t = Tensor::zeros([2, 2, 2]);
        t.fill_channel(1, 1.0);
        assert_eq!(t.as_slice(), &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_serialization() {
        let mut t = Tensor::zeros([1, 2, 2]);
        t.set(0, 0, 1, 2.5);
        let json = serde_json::to_string(&t).unwrap();
        let back: Tensor = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
