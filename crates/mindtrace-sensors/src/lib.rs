//! Host telemetry for mindtrace
//!
//! A [`SensorSnapshot`] is a flat, sorted mapping from metric name to an
//! optional number. Consumers must tolerate any subset of keys, including
//! an empty snapshot. [`SensorArray`] fills snapshots from the host via
//! `sysinfo`; anything implementing [`SensorSource`] can stand in for it.
//!
//! # Categories
//!
//! - `system` - CPU, memory, disk and network counters
//! - `power` - battery and thermal pressure (battery null without the
//!   `battery` feature or on hosts with no battery)
//! - `temporal` - local time of day, weekday, uptime, Unix timestamp
//! - `process` - process counts
//! - `audio` - ambient level from a pluggable [`AudioProbe`]; the
//!   `microphone` feature samples the default input device
//!
//! A category that cannot be measured degrades to missing keys or to a
//! single `<category>_error` key; collection as a whole never fails.
//!
//! # Example
//!
//! ```no_run
//! use mindtrace_config::SensorConfig;
//! use mindtrace_sensors::{SensorArray, SensorSource};
//!
//! let mut sensors = SensorArray::new(&SensorConfig::default());
//! let snapshot = sensors.snapshot();
//! println!("{}", snapshot.describe());
//! ```

pub mod audio;
pub mod battery;
pub mod snapshot;

#[cfg(feature = "system")]
pub mod array;

pub use audio::{level_from_samples, rms_to_level, AudioProbe, SilentProbe};
pub use battery::{battery_readings, read_battery, BatteryReading};

#[cfg(feature = "microphone")]
pub use audio::MicrophoneSampler;
pub use snapshot::{temporal_readings, SensorSnapshot};

#[cfg(feature = "system")]
pub use array::SensorArray;

/// Errors raised while sampling a sensor category
///
/// These never escape [`SensorSource::snapshot`]; they are turned into
/// `<category>_error` keys and a warning.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("{0} sensors are not supported on this platform")]
    Unsupported(&'static str),
    #[error("{category} sensors unavailable: {reason}")]
    Unavailable {
        category: &'static str,
        reason: String,
    },
}

/// Anything that can produce a sensor snapshot on demand
pub trait SensorSource {
    /// Sample every category and return the merged mapping
    fn snapshot(&mut self) -> SensorSnapshot;
}

/// A fixed snapshot is its own source; useful for replay and tests
impl SensorSource for SensorSnapshot {
    fn snapshot(&mut self) -> SensorSnapshot {
        self.clone()
    }
}
