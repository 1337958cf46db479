//! Elevation samples: a headerless little-endian `u16` grid

use crate::source::ResourceSource;
use relief_core::{ReliefError, Result};
use tracing::info;

/// Row-major elevation samples over the decimated grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationSamples {
    samples: Vec<u16>,
}

impl ElevationSamples {
    pub fn from_vec(samples: Vec<u16>) -> Self {
        Self { samples }
    }

    /// Decode little-endian `u16` pairs. An odd byte count is rejected, never truncated.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(ReliefError::DataShape(format!(
                "elevation data must hold 2 bytes per sample, got {} bytes",
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }

    /// Encode as little-endian `u16` pairs (the on-disk layout)
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.samples
    }

    /// Widen to `f32` for vertex buffer upload
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32).collect()
    }

    /// Fail unless there is exactly one sample per expected vertex
    pub fn expect_len(&self, expected: usize) -> Result<()> {
        if self.samples.len() != expected {
            return Err(ReliefError::DataShape(format!(
                "expected {} elevation samples, got {}",
                expected,
                self.samples.len()
            )));
        }
        Ok(())
    }

    /// Lowest and highest sample, if any
    pub fn range(&self) -> Option<(u16, u16)> {
        let min = *self.samples.iter().min()?;
        let max = *self.samples.iter().max()?;
        Some((min, max))
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: u64 = self.samples.iter().map(|&s| s as u64).sum();
        Some(sum as f64 / self.samples.len() as f64)
    }
}

/// Fetch and decode the elevation binary named by a descriptor
pub fn load_elevations<S: ResourceSource + ?Sized>(
    source: &S,
    filename: &str,
) -> Result<ElevationSamples> {
    let bytes = source.fetch(filename)?;
    let samples = ElevationSamples::from_le_bytes(&bytes)?;
    info!(filename, samples = samples.len(), "loaded elevation samples");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pairs() {
        let bytes = [0x00, 0x00, 0x64, 0x00, 0xff, 0xff, 0x34, 0x12];
        let samples = ElevationSamples::from_le_bytes(&bytes).unwrap();
        assert_eq!(samples.as_slice(), &[0, 100, 65535, 0x1234]);
    }

    #[test]
    fn encode_then_decode_reproduces_values() {
        let original = ElevationSamples::from_vec(vec![0, 1, 255, 256, 4095, 32768, 65535]);
        let decoded = ElevationSamples::from_le_bytes(&original.to_le_bytes()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn sample_count_is_half_byte_count() {
        let bytes = vec![7u8; 2 * 4 * 5];
        let samples = ElevationSamples::from_le_bytes(&bytes).unwrap();
        assert_eq!(samples.len(), 20);
    }

    #[test]
    fn odd_byte_count_is_data_shape_error() {
        let bytes = vec![0u8; 2 * 9 - 1];
        let err = ElevationSamples::from_le_bytes(&bytes).unwrap_err();
        assert!(err.is_data_shape());
    }

    #[test]
    fn empty_buffer_decodes_to_no_samples() {
        let samples = ElevationSamples::from_le_bytes(&[]).unwrap();
        assert!(samples.is_empty());
        assert_eq!(samples.range(), None);
        assert_eq!(samples.mean(), None);
    }

    #[test]
    fn expect_len_checks_vertex_count() {
        let samples = ElevationSamples::from_vec(vec![1, 2, 3, 4]);
        assert!(samples.expect_len(4).is_ok());
        assert!(samples.expect_len(9).unwrap_err().is_data_shape());
    }

    #[test]
    fn statistics() {
        let samples = ElevationSamples::from_vec(vec![10, 30, 20, 40]);
        assert_eq!(samples.range(), Some((10, 40)));
        assert_eq!(samples.mean(), Some(25.0));
        assert_eq!(samples.to_f32(), vec![10.0, 30.0, 20.0, 40.0]);
    }
}
