//! Block-energy downsampling of a track into seek bar heights
//!
//! A track of N mono samples is reduced to one value per visual bar: the sum
//! of absolute amplitudes over a fixed-size block, normalized so the loudest
//! bar is 1.0. Samples past the last whole block are ignored.

use std::sync::Arc;
use std::time::Instant;

use ripple_core::SampleBuffer;

/// How many (buffer, bar count) results the cache keeps
const CACHE_CAPACITY: usize = 4;

/// Normalized bar heights for one canvas geometry
#[derive(Debug, Clone, PartialEq)]
pub struct BarSample {
    /// One value per bar, in [0, 1] when downsampled
    pub values: Vec<f32>,
    /// False when every block is silent; the seek bar then stays a line
    pub worth_rendering: bool,
}

impl BarSample {
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            worth_rendering: false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reduce `buffer` to `target_count` bars
///
/// When the buffer has no more samples than bars it is returned verbatim.
/// An empty buffer or a zero bar count yields an empty, not-worth-rendering
/// sample.
pub fn sample(buffer: &[f32], target_count: usize) -> BarSample {
    if buffer.is_empty() || target_count == 0 {
        return BarSample::empty();
    }

    if target_count >= buffer.len() {
        return BarSample {
            values: buffer.to_vec(),
            worth_rendering: true,
        };
    }

    let block_size = buffer.len() / target_count;
    let mut values: Vec<f32> = buffer
        .chunks_exact(block_size)
        .take(target_count)
        .map(|block| block.iter().map(|s| s.abs()).sum())
        .collect();

    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max == 0.0 {
        return BarSample {
            values,
            worth_rendering: false,
        };
    }

    for value in &mut values {
        *value /= max;
    }

    BarSample {
        values,
        worth_rendering: true,
    }
}

/// Memo of recent sampler results keyed by `(buffer id, bar count)`
///
/// Resizing back and forth or re-rendering the same track must not rescan
/// millions of samples.
#[derive(Debug, Default)]
pub struct SamplerCache {
    /// Most recently used last
    entries: Vec<((u64, usize), Arc<BarSample>)>,
}

impl SamplerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result, computing and storing it on a miss
    pub fn get_or_sample(&mut self, buffer: &SampleBuffer, target_count: usize) -> Arc<BarSample> {
        let key = (buffer.id(), target_count);

        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            let entry = self.entries.remove(index);
            let result = Arc::clone(&entry.1);
            self.entries.push(entry);
            return result;
        }

        let start = Instant::now();
        let result = Arc::new(sample(buffer, target_count));
        log::debug!(
            "Sampled {} samples into {} bars in {:?}",
            buffer.len(),
            target_count,
            start.elapsed()
        );

        if self.entries.len() >= CACHE_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push((key, Arc::clone(&result)));
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let buffer: Vec<f32> = (0..1000).map(|i| ((i * 7919) % 200) as f32 / 100.0 - 1.0).collect();
        assert_eq!(sample(&buffer, 37), sample(&buffer, 37));
    }

    #[test]
    fn test_normalized_to_one() {
        let buffer: Vec<f32> = (0..400).map(|i| (i as f32 / 400.0) - 0.5).collect();
        let result = sample(&buffer, 20);
        assert!(result.worth_rendering);
        assert_eq!(result.len(), 20);
        let max = result.values.iter().copied().fold(0.0f32, f32::max);
        assert_eq!(max, 1.0);
        assert!(result.values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_all_zero_not_worth_rendering() {
        let result = sample(&[0.0; 500], 50);
        assert!(!result.worth_rendering);
        assert_eq!(result.values, vec![0.0; 50]);
    }

    #[test]
    fn test_trailing_samples_dropped() {
        // 1005 samples into 100 bars: block size 10, last 5 samples ignored
        let mut buffer = vec![0.1f32; 1000];
        buffer[0] = 0.5;
        buffer.extend_from_slice(&[1000.0; 5]);

        let result = sample(&buffer, 100);
        assert_eq!(result.len(), 100);
        assert!(result.worth_rendering);
        // Bar 0 sums to 1.4 and is the loudest; the outlier tail never counts
        assert_eq!(result.values[0], 1.0);
        for value in &result.values[1..] {
            assert!((value - 1.0 / 1.4).abs() < 1e-5, "unexpected bar {}", value);
        }
    }

    #[test]
    fn test_identity_when_bars_outnumber_samples() {
        let buffer = [0.25, -0.5, 0.75];
        let result = sample(&buffer, 3);
        assert_eq!(result.values, buffer.to_vec());
        assert!(result.worth_rendering);

        let result = sample(&buffer, 10);
        assert_eq!(result.values, buffer.to_vec());
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(sample(&[], 10), BarSample::empty());
        assert_eq!(sample(&[0.5, 0.5], 0), BarSample::empty());
    }

    #[test]
    fn test_half_silent_track() {
        // 2 s at 44.1 kHz: silent first second, full-scale square wave second
        let mut buffer = vec![0.0f32; 44100];
        buffer.extend((0..44100).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }));
        assert_eq!(buffer.len(), 88200);

        let result = sample(&buffer, 2);
        assert_eq!(result.values, vec![0.0, 1.0]);
        assert!(result.worth_rendering);
    }

    #[test]
    fn test_cache_hits_and_eviction() {
        let mut cache = SamplerCache::new();
        let buffer = SampleBuffer::new(vec![0.5; 100], 44100);

        let first = cache.get_or_sample(&buffer, 10);
        let again = cache.get_or_sample(&buffer, 10);
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 1);

        for count in 11..11 + CACHE_CAPACITY {
            cache.get_or_sample(&buffer, count);
        }
        assert_eq!(cache.len(), CACHE_CAPACITY);
        // Oldest entry was evicted and is recomputed
        let recomputed = cache.get_or_sample(&buffer, 10);
        assert!(!Arc::ptr_eq(&first, &recomputed));
        assert_eq!(*first, *recomputed);
    }

    #[test]
    fn test_cache_keys_on_buffer_identity() {
        let mut cache = SamplerCache::new();
        let a = SampleBuffer::new(vec![0.5; 100], 44100);
        let b = SampleBuffer::new(vec![0.5; 100], 44100);
        let from_a = cache.get_or_sample(&a, 10);
        let from_b = cache.get_or_sample(&b, 10);
        assert!(!Arc::ptr_eq(&from_a, &from_b));
        assert_eq!(cache.len(), 2);
    }
}
