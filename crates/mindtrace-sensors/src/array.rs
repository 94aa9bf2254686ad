//! Host sensor array backed by `sysinfo`

use crate::audio::AudioProbe;
use crate::battery::{battery_readings, read_battery};
use crate::snapshot::{temporal_readings, SensorSnapshot};
use crate::{SensorError, SensorSource};
use chrono::Local;
use mindtrace_config::SensorConfig;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::{debug, warn};

/// Binary unit conversion: bytes to GB
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Binary unit conversion: bytes to MB
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Processes using more than this share of a CPU count as active
pub const ACTIVE_PROCESS_CPU_THRESHOLD: f32 = 0.1;

/// Samples host metrics on demand
pub struct SensorArray {
    system: System,
    started: Instant,
    cpu_sample_interval: Duration,
    collect_processes: bool,
    disk_mount_point: PathBuf,
    audio: Box<dyn AudioProbe>,
}

impl SensorArray {
    /// Create a sensor array and take the baseline CPU reading
    pub fn new(config: &SensorConfig) -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        if config.collect_processes {
            system.refresh_processes(ProcessesToUpdate::All, true);
        }
        debug!(cpus = system.cpus().len(), "sensor array initialised");

        Self {
            system,
            started: Instant::now(),
            cpu_sample_interval: Duration::from_millis(config.cpu_sample_interval_ms),
            collect_processes: config.collect_processes,
            disk_mount_point: config.disk_mount_point.clone(),
            audio: default_audio_probe(config),
        }
    }

    /// Replace the audio probe
    pub fn with_audio_probe(mut self, probe: impl AudioProbe + 'static) -> Self {
        self.audio = Box::new(probe);
        self
    }

    /// Time since the array was created
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    fn system_sensors(&mut self) -> Result<SensorSnapshot, SensorError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SensorError::Unsupported("system"));
        }

        // CPU usage is a delta between two refreshes
        let interval = self
            .cpu_sample_interval
            .max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        std::thread::sleep(interval);
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        let total_memory = self.system.total_memory();
        if total_memory == 0 {
            return Err(SensorError::Unavailable {
                category: "system",
                reason: "total memory reported as zero".to_string(),
            });
        }
        let available = self.system.available_memory();

        let mut snapshot = SensorSnapshot::new();
        snapshot.insert("cpu_percent", f64::from(self.system.global_cpu_usage()));
        snapshot.insert(
            "memory_percent",
            (total_memory.saturating_sub(available)) as f64 / total_memory as f64 * 100.0,
        );
        snapshot.insert("memory_available_gb", available as f64 / BYTES_PER_GB);

        let disks = Disks::new_with_refreshed_list();
        match disk_usage_percent(&disks, &self.disk_mount_point) {
            Some(percent) => snapshot.insert("disk_usage_percent", percent),
            None => debug!(mount = %self.disk_mount_point.display(), "no disk usage available"),
        }

        let networks = Networks::new_with_refreshed_list();
        let (sent, received) = networks.list().values().fold((0u64, 0u64), |(tx, rx), data| {
            (
                tx.saturating_add(data.total_transmitted()),
                rx.saturating_add(data.total_received()),
            )
        });
        snapshot.insert("network_sent_mb", sent as f64 / BYTES_PER_MB);
        snapshot.insert("network_recv_mb", received as f64 / BYTES_PER_MB);

        Ok(snapshot)
    }

    fn power_sensors(&self) -> Result<SensorSnapshot, SensorError> {
        let mut snapshot = battery_readings(read_battery()?);

        let cpu_count = self.system.cpus().len();
        let load = System::load_average().one;
        snapshot.insert_opt("thermal_pressure", thermal_pressure(load, cpu_count));
        Ok(snapshot)
    }

    fn process_sensors(&mut self) -> Result<SensorSnapshot, SensorError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SensorError::Unsupported("process"));
        }

        self.system.refresh_processes(ProcessesToUpdate::All, true);
        let processes = self.system.processes();
        let total = processes.len();
        let active = processes
            .values()
            .filter(|p| p.cpu_usage() > ACTIVE_PROCESS_CPU_THRESHOLD)
            .count();

        let mut snapshot = SensorSnapshot::new();
        snapshot.insert("total_processes", total as f64);
        snapshot.insert("active_processes", active as f64);
        snapshot.insert(
            "process_ratio",
            if total > 0 {
                active as f64 / total as f64
            } else {
                0.0
            },
        );
        Ok(snapshot)
    }
}

impl SensorSource for SensorArray {
    fn snapshot(&mut self) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::new();

        let system = self.system_sensors();
        merge_category(&mut snapshot, "system", system);

        let power = self.power_sensors();
        merge_category(&mut snapshot, "power", power);

        snapshot.merge(temporal_readings(Local::now(), self.uptime()));

        if self.collect_processes {
            let process = self.process_sensors();
            merge_category(&mut snapshot, "process", process);
        }

        if let Some(level) = self.audio.sample_level() {
            snapshot.insert("audio_level", level);
        }

        snapshot
    }
}

#[cfg(feature = "microphone")]
fn default_audio_probe(config: &SensorConfig) -> Box<dyn AudioProbe> {
    Box::new(crate::audio::MicrophoneSampler::new(Duration::from_millis(
        config.audio_window_ms,
    )))
}

#[cfg(not(feature = "microphone"))]
fn default_audio_probe(_config: &SensorConfig) -> Box<dyn AudioProbe> {
    Box::new(crate::audio::SilentProbe)
}

/// Merge a category's readings, or mark it with `<category>_error`
fn merge_category(
    snapshot: &mut SensorSnapshot,
    category: &str,
    readings: Result<SensorSnapshot, SensorError>,
) {
    match readings {
        Ok(readings) => snapshot.merge(readings),
        Err(e) => {
            warn!("{category} sensors degraded: {e}");
            snapshot.insert(format!("{category}_error"), 1.0);
        }
    }
}

/// Disk usage for the disk mounted at `mount_point`, else the largest disk
fn disk_usage_percent(disks: &Disks, mount_point: &Path) -> Option<f64> {
    let list = disks.list();
    let disk = list
        .iter()
        .find(|d| d.mount_point() == mount_point)
        .or_else(|| list.iter().max_by_key(|d| d.total_space()))?;

    let total = disk.total_space();
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(disk.available_space());
    Some(used as f64 / total as f64 * 100.0)
}

/// One-minute load average per CPU, capped at 1.0
pub fn thermal_pressure(load_one: f64, cpu_count: usize) -> Option<f64> {
    if cpu_count == 0 || !load_one.is_finite() {
        return None;
    }
    Some((load_one / cpu_count as f64).min(1.0))
}
