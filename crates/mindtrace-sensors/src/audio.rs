//! Ambient audio level
//!
//! Capture is delegated to an [`AudioProbe`]. With the `microphone` feature,
//! [`MicrophoneSampler`] records a short window from the default input device
//! through `cpal`. Otherwise the default probe reports nothing and the
//! `audio_level` key is left out of the snapshot.

#[cfg(feature = "microphone")]
pub use microphone::MicrophoneSampler;

/// Source of an ambient audio level on the 0-100 scale of [`rms_to_level`]
pub trait AudioProbe: Send {
    /// Take a short sample; `None` if the device is missing or failed
    fn sample_level(&mut self) -> Option<f64>;
}

/// Probe for hosts without audio capture
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProbe;

impl AudioProbe for SilentProbe {
    fn sample_level(&mut self) -> Option<f64> {
        None
    }
}

impl<F> AudioProbe for F
where
    F: FnMut() -> Option<f64> + Send,
{
    fn sample_level(&mut self) -> Option<f64> {
        self()
    }
}

/// Convert PCM samples in `[-1.0, 1.0]` to a dB-like level in `[0, 100]`
///
/// `20 * log10(rms * 1000)`, clamped. Silence and empty input map to 0.
pub fn rms_to_level(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mean_square = samples
        .iter()
        .map(|&s| f64::from(s) * f64::from(s))
        .sum::<f64>()
        / samples.len() as f64;
    let rms = mean_square.sqrt();

    if rms > 0.0 {
        (20.0 * (rms * 1000.0).log10()).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Level of a captured window; `None` when nothing was recorded
pub fn level_from_samples(samples: &[f32]) -> Option<f64> {
    (!samples.is_empty()).then(|| rms_to_level(samples))
}

#[cfg(feature = "microphone")]
mod microphone {
    use super::{level_from_samples, AudioProbe};
    use crate::SensorError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, SampleFormat, Stream, StreamConfig};
    use std::sync::mpsc::{self, Sender};
    use std::time::Duration;
    use tracing::debug;

    /// Samples the default input device for a fixed window
    #[derive(Debug, Clone, Copy)]
    pub struct MicrophoneSampler {
        window: Duration,
    }

    impl MicrophoneSampler {
        pub fn new(window: Duration) -> Self {
            Self { window }
        }

        /// Record one window of interleaved samples scaled to `[-1, 1]`
        fn record(&self) -> Result<Vec<f32>, SensorError> {
            let device = cpal::default_host()
                .default_input_device()
                .ok_or_else(|| unavailable("no default input device"))?;
            let supported = device.default_input_config().map_err(unavailable)?;
            let format = supported.sample_format();
            let config: StreamConfig = supported.into();

            let (tx, rx) = mpsc::channel();
            let stream = match format {
                SampleFormat::F32 => input_stream(&device, &config, tx, |s: f32| s)?,
                SampleFormat::I16 => {
                    input_stream(&device, &config, tx, |s: i16| f32::from(s) / f32::from(i16::MAX))?
                }
                SampleFormat::U16 => input_stream(&device, &config, tx, |s: u16| {
                    (f32::from(s) - 32768.0) / 32768.0
                })?,
                other => return Err(unavailable(format!("unsupported sample format {other}"))),
            };

            stream.play().map_err(unavailable)?;
            std::thread::sleep(self.window);
            drop(stream);

            Ok(rx.try_iter().flatten().collect())
        }
    }

    impl AudioProbe for MicrophoneSampler {
        fn sample_level(&mut self) -> Option<f64> {
            match self.record() {
                Ok(samples) => level_from_samples(&samples),
                Err(e) => {
                    debug!("audio capture failed: {e}");
                    None
                }
            }
        }
    }

    fn input_stream<T>(
        device: &Device,
        config: &StreamConfig,
        tx: Sender<Vec<f32>>,
        scale: fn(T) -> f32,
    ) -> Result<Stream, SensorError>
    where
        T: cpal::SizedSample,
    {
        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    // Receiver is gone once the window closes
                    let _ = tx.send(data.iter().map(|&s| scale(s)).collect());
                },
                |e| debug!("audio stream error: {e}"),
                None,
            )
            .map_err(unavailable)
    }

    fn unavailable(reason: impl ToString) -> SensorError {
        SensorError::Unavailable {
            category: "audio",
            reason: reason.to_string(),
        }
    }
}
