//! Sensor abstraction: the normalized reading, the closed set of sensor
//! variants, and the factory that selects one from an identifier.

pub mod disk;

use std::fmt;

use chrono::Local;
use growlab_hw::{BoschSensor, Chip};
use tracing::warn;

/// One normalized sensor reading. Produced fresh each poll cycle and
/// consumed once by the renderer; measurements the selected sensor cannot
/// supply are `None`.
#[derive(Debug, Clone)]
pub struct Reading {
    /// Local wall-clock time, regenerated every cycle.
    pub time: String,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Percent relative humidity.
    pub humidity: Option<f64>,
    /// Hectopascals.
    pub pressure: Option<f64>,
}

impl Reading {
    fn empty() -> Self {
        Self {
            time: timestamp(),
            temperature: None,
            humidity: None,
            pressure: None,
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// The sensor variant chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Bme280,
    Bmp280,
    None,
}

impl SensorKind {
    /// Selects a variant from a configuration identifier.
    ///
    /// Anything other than the three recognized identifiers falls back to
    /// the full environmental sensor rather than failing startup.
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "bme280" => SensorKind::Bme280,
            "bmp280" => SensorKind::Bmp280,
            "none" => SensorKind::None,
            other => {
                warn!("unrecognized sensor type {:?}, defaulting to bme280", other);
                SensorKind::Bme280
            }
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Bme280 => write!(f, "bme280"),
            SensorKind::Bmp280 => write!(f, "bmp280"),
            SensorKind::None => write!(f, "none"),
        }
    }
}

/// The closed set of sensor implementations.
pub enum EnvSensor {
    /// Full environmental sensor: temperature, humidity, pressure.
    Bme280(BoschSensor),
    /// Partial sensor: temperature and pressure only.
    Bmp280(BoschSensor),
    /// No hardware attached; every measurement is absent.
    None,
}

impl EnvSensor {
    /// Opens the hardware for the selected variant.
    pub fn open(kind: SensorKind, bus: &str) -> growlab_hw::Result<Self> {
        match kind {
            SensorKind::Bme280 => Ok(EnvSensor::Bme280(BoschSensor::open(bus, Chip::Bme280)?)),
            SensorKind::Bmp280 => Ok(EnvSensor::Bmp280(BoschSensor::open(bus, Chip::Bmp280)?)),
            SensorKind::None => Ok(EnvSensor::None),
        }
    }

    /// Returns the variant this sensor was constructed as.
    pub fn kind(&self) -> SensorKind {
        match self {
            EnvSensor::Bme280(_) => SensorKind::Bme280,
            EnvSensor::Bmp280(_) => SensorKind::Bmp280,
            EnvSensor::None => SensorKind::None,
        }
    }

    /// Produces a reading for the current cycle.
    ///
    /// Never fails: a transport error on a single read is logged and the
    /// affected measurements come back as `None`, so one bad cycle shows
    /// up as placeholders on the display instead of ending the process.
    pub fn read(&mut self) -> Reading {
        let mut reading = Reading::empty();
        let sensor = match self {
            EnvSensor::Bme280(sensor) | EnvSensor::Bmp280(sensor) => sensor,
            EnvSensor::None => return reading,
        };
        match sensor.measure() {
            Ok(measurements) => {
                reading.temperature = Some(measurements.temperature);
                reading.pressure = Some(measurements.pressure);
                reading.humidity = measurements.humidity;
            }
            Err(e) => {
                warn!("sensor read failed: {}", e);
            }
        }
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_recognized_identifiers() {
        assert_eq!(SensorKind::from_identifier("bme280"), SensorKind::Bme280);
        assert_eq!(SensorKind::from_identifier("bmp280"), SensorKind::Bmp280);
        assert_eq!(SensorKind::from_identifier("none"), SensorKind::None);
    }

    #[test]
    fn test_factory_falls_back_to_default() {
        assert_eq!(
            SensorKind::from_identifier("unknown-value"),
            SensorKind::from_identifier("bme280")
        );
        assert_eq!(SensorKind::from_identifier(""), SensorKind::Bme280);
    }

    #[test]
    fn test_stub_sensor_reading() {
        let mut sensor = EnvSensor::open(SensorKind::None, "auto").unwrap();
        assert_eq!(sensor.kind(), SensorKind::None);

        let reading = sensor.read();
        assert!(!reading.time.is_empty());
        assert!(reading.temperature.is_none());
        assert!(reading.humidity.is_none());
        assert!(reading.pressure.is_none());
    }
}
