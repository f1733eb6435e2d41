//! Bosch sensor communication via Linux I2C.

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use tracing::{debug, info};

use crate::{bus_candidates, Error, Result};

use super::calibration::{Calibration, TRIM_H_LEN, TRIM_TP_LEN};
use super::{Chip, Measurements};

/// I2C addresses at which the sensor can be strapped.
pub const SENSOR_ADDRESSES: [u16; 2] = [0x76, 0x77];

const REG_ID: u8 = 0xD0;
const REG_CTRL_HUM: u8 = 0xF2;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_DATA: u8 = 0xF7;
const REG_TRIM_TP: u8 = 0x88;
const REG_TRIM_H: u8 = 0xE1;

/// osrs_t x1, osrs_p x1, normal mode.
const CTRL_MEAS_NORMAL: u8 = 0x27;
/// osrs_h x1.
const CTRL_HUM_X1: u8 = 0x01;
/// 1000 ms standby, filter off.
const CONFIG_STANDBY_1S: u8 = 0xA0;

/// BMP280/BME280 sensor handle.
pub struct BoschSensor {
    i2c: LinuxI2CDevice,
    chip: Chip,
    calibration: Calibration,
}

impl BoschSensor {
    /// Opens a sensor of the given chip type on the I2C bus, probing both
    /// strap addresses. `bus` may be `"auto"` to probe the usual buses.
    pub fn open(bus: &str, chip: Chip) -> Result<Self> {
        for candidate in bus_candidates(bus) {
            for addr in SENSOR_ADDRESSES {
                match Self::open_at(&candidate, addr, chip) {
                    Ok(sensor) => {
                        info!("{} sensor opened on {} at {:#04x}", chip, candidate, addr);
                        return Ok(sensor);
                    }
                    Err(e) => {
                        debug!("no {} on {} at {:#04x}: {}", chip, candidate, addr, e);
                    }
                }
            }
        }
        Err(Error::SensorNotFound {
            chip,
            bus: bus.to_string(),
        })
    }

    fn open_at(bus: &str, addr: u16, chip: Chip) -> Result<Self> {
        let mut i2c = LinuxI2CDevice::new(bus, addr)?;

        let id = i2c.smbus_read_byte_data(REG_ID)?;
        if id != chip.id() {
            return Err(Error::UnexpectedChipId {
                expected: chip.id(),
                actual: id,
            });
        }

        let trim_tp = read_block(&mut i2c, REG_TRIM_TP, TRIM_TP_LEN)?;
        let trim_tp: [u8; TRIM_TP_LEN] = trim_tp.try_into().unwrap_or([0; TRIM_TP_LEN]);
        let calibration = if chip.has_humidity() {
            let trim_h = read_block(&mut i2c, REG_TRIM_H, TRIM_H_LEN)?;
            let trim_h: [u8; TRIM_H_LEN] = trim_h.try_into().unwrap_or([0; TRIM_H_LEN]);
            Calibration::parse(&trim_tp, Some(&trim_h))
        } else {
            Calibration::parse(&trim_tp, None)
        };

        // ctrl_hum must be written before ctrl_meas to take effect
        if chip.has_humidity() {
            i2c.smbus_write_byte_data(REG_CTRL_HUM, CTRL_HUM_X1)?;
        }
        i2c.smbus_write_byte_data(REG_CONFIG, CONFIG_STANDBY_1S)?;
        i2c.smbus_write_byte_data(REG_CTRL_MEAS, CTRL_MEAS_NORMAL)?;

        Ok(Self {
            i2c,
            chip,
            calibration,
        })
    }

    /// Returns the chip this handle is driving.
    pub fn chip(&self) -> Chip {
        self.chip
    }

    /// Reads and compensates one measurement set.
    pub fn measure(&mut self) -> Result<Measurements> {
        let len = if self.chip.has_humidity() { 8 } else { 6 };
        let data = read_block(&mut self.i2c, REG_DATA, len)?;

        let adc_p = ((data[0] as u32) << 12) | ((data[1] as u32) << 4) | (data[2] as u32 >> 4);
        let adc_t = ((data[3] as u32) << 12) | ((data[4] as u32) << 4) | (data[5] as u32 >> 4);

        let (temperature, t_fine) = self.calibration.compensate_temperature(adc_t);
        let pressure = self.calibration.compensate_pressure(adc_p, t_fine) / 100.0;
        let humidity = if self.chip.has_humidity() {
            let adc_h = ((data[6] as u16) << 8) | data[7] as u16;
            Some(self.calibration.compensate_humidity(adc_h, t_fine))
        } else {
            None
        };

        Ok(Measurements {
            temperature,
            pressure,
            humidity,
        })
    }
}

fn read_block(i2c: &mut LinuxI2CDevice, register: u8, len: usize) -> Result<Vec<u8>> {
    let data = i2c.smbus_read_i2c_block_data(register, len as u8)?;
    if data.len() < len {
        return Err(Error::ShortRead {
            expected: len,
            actual: data.len(),
        });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Hardware tests are skipped by default
    #[test]
    #[ignore]
    fn test_sensor_open() {
        let sensor = BoschSensor::open("auto", Chip::Bme280);
        assert!(sensor.is_ok());
    }
}
