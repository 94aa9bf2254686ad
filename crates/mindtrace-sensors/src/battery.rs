//! Battery charge and mains state
//!
//! Built with the `battery` feature, readings come from the first battery
//! reported by `starship-battery`. Without it, or on hosts with no battery,
//! both keys are present and null.

use crate::snapshot::SensorSnapshot;
use crate::SensorError;

/// Charge and plug state of the host's battery
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryReading {
    /// State of charge, 0-100
    pub percent: Option<f64>,
    /// Whether the host is drawing mains power
    pub plugged: Option<bool>,
}

/// `battery_percent` and `power_plugged` for a reading; nulls when absent
pub fn battery_readings(reading: Option<BatteryReading>) -> SensorSnapshot {
    let reading = reading.unwrap_or_default();
    let mut snapshot = SensorSnapshot::new();
    snapshot.insert_opt("battery_percent", reading.percent);
    snapshot.insert_opt(
        "power_plugged",
        reading.plugged.map(|p| if p { 1.0 } else { 0.0 }),
    );
    snapshot
}

/// Read the first battery, `None` if the host has none
#[cfg(feature = "battery")]
pub fn read_battery() -> Result<Option<BatteryReading>, SensorError> {
    let manager = starship_battery::Manager::new().map_err(unavailable)?;
    let Some(battery) = manager.batteries().map_err(unavailable)?.next() else {
        return Ok(None);
    };
    let battery = battery.map_err(unavailable)?;

    let charge = f64::from(battery.state_of_charge().value);
    Ok(Some(BatteryReading {
        percent: Some((charge * 100.0).clamp(0.0, 100.0)),
        plugged: plugged_from_state(battery.state()),
    }))
}

/// Without the `battery` feature there is never a reading
#[cfg(not(feature = "battery"))]
pub fn read_battery() -> Result<Option<BatteryReading>, SensorError> {
    Ok(None)
}

#[cfg(feature = "battery")]
fn unavailable(e: starship_battery::Error) -> SensorError {
    SensorError::Unavailable {
        category: "power",
        reason: e.to_string(),
    }
}

#[cfg(feature = "battery")]
fn plugged_from_state(state: starship_battery::State) -> Option<bool> {
    use starship_battery::State;

    match state {
        State::Charging | State::Full => Some(true),
        State::Discharging | State::Empty => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_battery_reads_as_nulls() {
        let snapshot = battery_readings(None);
        assert!(snapshot.contains_key("battery_percent"));
        assert!(snapshot.contains_key("power_plugged"));
        assert_eq!(snapshot.get("battery_percent"), None);
        assert_eq!(snapshot.get("power_plugged"), None);
    }

    #[test]
    fn plugged_state_maps_to_one_or_zero() {
        let on_mains = battery_readings(Some(BatteryReading {
            percent: Some(81.5),
            plugged: Some(true),
        }));
        assert_eq!(on_mains.get("battery_percent"), Some(81.5));
        assert_eq!(on_mains.get("power_plugged"), Some(1.0));

        let on_battery = battery_readings(Some(BatteryReading {
            percent: Some(12.0),
            plugged: Some(false),
        }));
        assert_eq!(on_battery.get("power_plugged"), Some(0.0));
    }

    #[test]
    fn unknown_plug_state_stays_null() {
        let snapshot = battery_readings(Some(BatteryReading {
            percent: Some(50.0),
            plugged: None,
        }));
        assert_eq!(snapshot.get("battery_percent"), Some(50.0));
        assert!(snapshot.contains_key("power_plugged"));
        assert_eq!(snapshot.get("power_plugged"), None);
    }

    #[cfg(not(feature = "battery"))]
    #[test]
    fn no_reading_without_battery_support() {
        assert_eq!(read_battery().unwrap(), None);
    }

    #[cfg(feature = "battery")]
    #[test]
    fn charge_states_map_to_plugged() {
        use starship_battery::State;

        assert_eq!(plugged_from_state(State::Charging), Some(true));
        assert_eq!(plugged_from_state(State::Full), Some(true));
        assert_eq!(plugged_from_state(State::Discharging), Some(false));
        assert_eq!(plugged_from_state(State::Empty), Some(false));
        assert_eq!(plugged_from_state(State::Unknown), None);
    }
}
