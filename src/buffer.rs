//! Append-only sample storage.
//!
//! [`SampleBuffer`] is the single store behind the viewer: the generator
//! appends to it, persistence replaces it wholesale, and the rendering
//! surface reads it through short-lived [`Snapshot`]s. Bounds are tracked
//! incrementally so auto-fit never rescans the data.

use crate::geom::Point;
use crate::view::{Range, Viewport};

/// One sample of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// X value, a running index assigned by the generator.
    pub x: f64,
    /// Y value, drawn from the configured interval.
    pub y: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The sample as a data-space point.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Errors raised when installing externally supplied samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A sample carried a non-finite coordinate.
    #[error("invalid data: non-finite sample at index {index}")]
    InvalidData {
        /// Position of the offending sample in the input sequence.
        index: usize,
    },
}

/// Append-only store of samples with incremental bounds tracking.
#[derive(Debug, Clone, Default)]
pub struct SampleBuffer {
    samples: Vec<Sample>,
    bounds: Option<Viewport>,
    generation: u64,
}

impl SampleBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single sample.
    pub fn append(&mut self, x: f64, y: f64) {
        let sample = Sample::new(x, y);
        self.samples.push(sample);
        self.update_bounds(sample);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Append a batch of samples in the caller-given order.
    ///
    /// The whole batch lands under one generation bump, so a reader either
    /// sees none of it or all of it.
    pub fn append_batch<I>(&mut self, samples: I) -> usize
    where
        I: IntoIterator<Item = Sample>,
    {
        let samples = samples.into_iter();
        let (reserve, _) = samples.size_hint();
        self.samples.reserve(reserve);

        let start_len = self.samples.len();
        for sample in samples {
            self.samples.push(sample);
            self.update_bounds(sample);
        }
        let appended = self.samples.len() - start_len;
        if appended > 0 {
            self.generation = self.generation.wrapping_add(1);
        }
        appended
    }

    /// Empty the buffer.
    ///
    /// A no-op on an already empty buffer.
    pub fn clear(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        self.samples.clear();
        self.bounds = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Replace the whole contents with an externally supplied sequence.
    ///
    /// Every sample is validated before anything is mutated; on error the
    /// previous contents remain observable. Returns the new length.
    pub fn replace_all(&mut self, samples: Vec<Sample>) -> Result<usize, BufferError> {
        if let Some(index) = samples.iter().position(|sample| !sample.is_finite()) {
            return Err(BufferError::InvalidData { index });
        }

        self.bounds = None;
        self.samples = samples;
        for index in 0..self.samples.len() {
            let sample = self.samples[index];
            self.update_bounds(sample);
        }
        self.generation = self.generation.wrapping_add(1);
        Ok(self.samples.len())
    }

    /// A read-only, point-in-time view of the contents.
    ///
    /// The borrow ends at the next mutating call; a snapshot cannot be
    /// retained across mutations.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            samples: &self.samples,
            generation: self.generation,
        }
    }

    /// Number of samples stored.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Bounds of all samples on both axes.
    pub fn bounds(&self) -> Option<Viewport> {
        self.bounds
    }

    /// Mutation counter, bumped on every observable change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn update_bounds(&mut self, sample: Sample) {
        match self.bounds {
            None => {
                self.bounds = Some(Viewport::new(
                    Range::new(sample.x, sample.x),
                    Range::new(sample.y, sample.y),
                ));
            }
            Some(mut bounds) => {
                bounds.x.expand_to_include(sample.x);
                bounds.y.expand_to_include(sample.y);
                self.bounds = Some(bounds);
            }
        }
    }
}

/// Read-only view of a [`SampleBuffer`] at one generation.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    samples: &'a [Sample],
    generation: u64,
}

impl<'a> Snapshot<'a> {
    /// All samples in buffer order.
    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    /// Random access to a single sample.
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    /// Number of samples in the snapshot.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Generation of the buffer when the snapshot was taken.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
