//! Destinations for flushed timeline samples.

use std::convert::Infallible;
use std::io::{Seek, Write};

use mallet_wav::{WavError, WavWriter};

/// Receives finished samples from the timeline, in order.
///
/// Every call continues where the previous one stopped. Samples are mono and
/// normalized; a sink with more channels decides how to spread them.
pub trait SampleSink {
    /// Error produced when the samples cannot be stored.
    type Error;

    /// Appends `samples` to the output.
    fn flush_samples(&mut self, samples: &[f64]) -> Result<(), Self::Error>;
}

/// In-memory sink.
impl SampleSink for Vec<f64> {
    type Error = Infallible;

    fn flush_samples(&mut self, samples: &[f64]) -> Result<(), Self::Error> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

/// Writes each mono sample to every channel of the file.
impl<W: Write + Seek> SampleSink for WavWriter<W> {
    type Error = WavError;

    fn flush_samples(&mut self, samples: &[f64]) -> Result<(), Self::Error> {
        let channels = self.format().channels as usize;
        if channels == 1 {
            return self.write_samples(samples);
        }

        let frames: Vec<f64> = samples
            .iter()
            .flat_map(|&sample| std::iter::repeat(sample).take(channels))
            .collect();
        self.write_samples(&frames)
    }
}
