//! Trim-register parsing and measurement compensation.
//!
//! Raw ADC values from the BMP280/BME280 are meaningless without the
//! per-device trim parameters burned into registers 0x88..0xA1 and (on
//! the BME280) 0xE1..0xE7. The compensation below follows the
//! double-precision reference formulas from the Bosch datasheets.

/// Length of the temperature/pressure trim block at 0x88.
pub const TRIM_TP_LEN: usize = 26;

/// Length of the humidity trim block at 0xE1 (BME280 only).
pub const TRIM_H_LEN: usize = 7;

/// Per-device trim parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calibration {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
    dig_p1: u16,
    dig_p2: i16,
    dig_p3: i16,
    dig_p4: i16,
    dig_p5: i16,
    dig_p6: i16,
    dig_p7: i16,
    dig_p8: i16,
    dig_p9: i16,
    dig_h1: u8,
    dig_h2: i16,
    dig_h3: u8,
    dig_h4: i16,
    dig_h5: i16,
    dig_h6: i8,
}

fn u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn i16_le(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}

impl Calibration {
    /// Parses the trim blocks. `trim_h` is the humidity block read from a
    /// BME280; pass `None` for a BMP280, leaving the humidity trim zeroed.
    pub fn parse(trim_tp: &[u8; TRIM_TP_LEN], trim_h: Option<&[u8; TRIM_H_LEN]>) -> Self {
        let mut calib = Self {
            dig_t1: u16_le(trim_tp, 0),
            dig_t2: i16_le(trim_tp, 2),
            dig_t3: i16_le(trim_tp, 4),
            dig_p1: u16_le(trim_tp, 6),
            dig_p2: i16_le(trim_tp, 8),
            dig_p3: i16_le(trim_tp, 10),
            dig_p4: i16_le(trim_tp, 12),
            dig_p5: i16_le(trim_tp, 14),
            dig_p6: i16_le(trim_tp, 16),
            dig_p7: i16_le(trim_tp, 18),
            dig_p8: i16_le(trim_tp, 20),
            dig_p9: i16_le(trim_tp, 22),
            // trim_tp[24] is a reserved register; dig_h1 sits at 0xA1
            dig_h1: trim_tp[25],
            ..Self::default()
        };

        if let Some(h) = trim_h {
            calib.dig_h2 = i16_le(h, 0);
            calib.dig_h3 = h[2];
            // dig_h4 and dig_h5 share the nibbles of 0xE5
            calib.dig_h4 = ((h[3] as i8 as i16) << 4) | (h[4] & 0x0F) as i16;
            calib.dig_h5 = ((h[5] as i8 as i16) << 4) | (h[4] >> 4) as i16;
            calib.dig_h6 = h[6] as i8;
        }

        calib
    }

    /// Compensates a raw temperature reading.
    ///
    /// Returns the temperature in degrees Celsius together with `t_fine`,
    /// the intermediate needed by the pressure and humidity formulas.
    pub fn compensate_temperature(&self, adc_t: u32) -> (f64, f64) {
        let adc_t = adc_t as f64;
        let var1 = (adc_t / 16384.0 - self.dig_t1 as f64 / 1024.0) * self.dig_t2 as f64;
        let var2 = (adc_t / 131072.0 - self.dig_t1 as f64 / 8192.0)
            * (adc_t / 131072.0 - self.dig_t1 as f64 / 8192.0)
            * self.dig_t3 as f64;
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Compensates a raw pressure reading. Returns pascals.
    pub fn compensate_pressure(&self, adc_p: u32, t_fine: f64) -> f64 {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.dig_p6 as f64 / 32768.0;
        var2 += var1 * self.dig_p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.dig_p4 as f64 * 65536.0;
        var1 = (self.dig_p3 as f64 * var1 * var1 / 524288.0 + self.dig_p2 as f64 * var1)
            / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.dig_p1 as f64;
        if var1 == 0.0 {
            return 0.0;
        }
        let mut p = 1048576.0 - adc_p as f64;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        var1 = self.dig_p9 as f64 * p * p / 2147483648.0;
        var2 = p * self.dig_p8 as f64 / 32768.0;
        p + (var1 + var2 + self.dig_p7 as f64) / 16.0
    }

    /// Compensates a raw humidity reading. Returns percent relative
    /// humidity, clamped to the sensor's 0..100 output range.
    pub fn compensate_humidity(&self, adc_h: u16, t_fine: f64) -> f64 {
        let var_h = t_fine - 76800.0;
        let h = (adc_h as f64 - (self.dig_h4 as f64 * 64.0 + self.dig_h5 as f64 / 16384.0 * var_h))
            * (self.dig_h2 as f64 / 65536.0
                * (1.0
                    + self.dig_h6 as f64 / 67108864.0
                        * var_h
                        * (1.0 + self.dig_h3 as f64 / 67108864.0 * var_h)));
        let h = h * (1.0 - self.dig_h1 as f64 * h / 524288.0);
        h.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trim values and raw readings from the BMP280 datasheet's worked
    // compensation example (section 3.12).
    fn datasheet_calibration() -> Calibration {
        Calibration {
            dig_t1: 27504,
            dig_t2: 26435,
            dig_t3: -1000,
            dig_p1: 36477,
            dig_p2: -10685,
            dig_p3: 3024,
            dig_p4: 2855,
            dig_p5: 140,
            dig_p6: -7,
            dig_p7: 15500,
            dig_p8: -14600,
            dig_p9: 6000,
            ..Calibration::default()
        }
    }

    #[test]
    fn test_datasheet_temperature() {
        let calib = datasheet_calibration();
        let (t, _) = calib.compensate_temperature(519888);
        assert!((t - 25.08).abs() < 0.01, "got {t}");
    }

    #[test]
    fn test_datasheet_pressure() {
        let calib = datasheet_calibration();
        let (_, t_fine) = calib.compensate_temperature(519888);
        let p = calib.compensate_pressure(415148, t_fine);
        assert!((p - 100653.27).abs() < 1.0, "got {p}");
    }

    #[test]
    fn test_humidity_clamped() {
        let calib = Calibration {
            dig_h1: 75,
            dig_h2: 360,
            dig_h3: 0,
            dig_h4: 320,
            dig_h5: 50,
            dig_h6: 30,
            ..datasheet_calibration()
        };
        let (_, t_fine) = calib.compensate_temperature(519888);
        for adc_h in [0u16, 0x4000, 0xFFFF] {
            let h = calib.compensate_humidity(adc_h, t_fine);
            assert!((0.0..=100.0).contains(&h), "adc {adc_h} gave {h}");
        }
    }

    #[test]
    fn test_parse_trim_blocks() {
        let mut tp = [0u8; TRIM_TP_LEN];
        tp[0] = 0x70; // dig_t1 = 27504
        tp[1] = 0x6B;
        tp[2] = 0x43; // dig_t2 = 26435
        tp[3] = 0x67;
        tp[25] = 75; // dig_h1
        let mut h = [0u8; TRIM_H_LEN];
        h[0] = 0x68; // dig_h2 = 360
        h[1] = 0x01;
        h[3] = 0x14; // dig_h4 = 0x14 << 4 | 0x02 = 322
        h[4] = 0x32; // low nibble -> h4, high nibble -> h5
        h[5] = 0x03; // dig_h5 = 0x03 << 4 | 0x03 = 51

        let calib = Calibration::parse(&tp, Some(&h));
        assert_eq!(calib.dig_t1, 27504);
        assert_eq!(calib.dig_t2, 26435);
        assert_eq!(calib.dig_h1, 75);
        assert_eq!(calib.dig_h2, 360);
        assert_eq!(calib.dig_h4, 322);
        assert_eq!(calib.dig_h5, 51);

        let calib = Calibration::parse(&tp, None);
        assert_eq!(calib.dig_h2, 0);
    }
}
