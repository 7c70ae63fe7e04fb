//! HTU21D temperature/humidity sensor over I²C.
//!
//! Uses the no-hold measurement commands: trigger, wait out the conversion,
//! then read two data bytes plus CRC. The two low bits of the result are
//! status flags and are masked off before conversion.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::ClimateSensor;
use crate::config::HTU21D_I2C_ADDR;
use crate::error::Error;

const CMD_TEMPERATURE: u8 = 0xF3;
const CMD_HUMIDITY: u8 = 0xF5;

/// Worst-case conversion times at full resolution (ms).
const TEMPERATURE_WAIT_MS: u32 = 50;
const HUMIDITY_WAIT_MS: u32 = 16;

const STATUS_MASK: u16 = 0xFFFC;

/// Convert a raw temperature word to degrees Celsius.
pub fn celsius_from_raw(raw: u16) -> f32 {
    -46.85 + 175.72 * (raw & STATUS_MASK) as f32 / 65536.0
}

/// Convert a raw humidity word to %RH, clamped to `0..=100`.
pub fn humidity_from_raw(raw: u16) -> f32 {
    let rh = -6.0 + 125.0 * (raw & STATUS_MASK) as f32 / 65536.0;
    rh.clamp(0.0, 100.0)
}

pub struct Htu21d<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Htu21d<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: HTU21D_I2C_ADDR,
        }
    }

    fn measure(&mut self, command: u8, wait_ms: u32) -> Result<u16, Error> {
        self.i2c
            .write(self.address, &[command])
            .map_err(|_| Error::Sensor)?;
        self.delay.delay_ms(wait_ms);

        let mut data = [0u8; 3];
        self.i2c
            .read(self.address, &mut data)
            .map_err(|_| Error::Sensor)?;
        Ok(u16::from_be_bytes([data[0], data[1]]))
    }

    pub fn temperature(&mut self) -> Result<f32, Error> {
        self.measure(CMD_TEMPERATURE, TEMPERATURE_WAIT_MS)
            .map(celsius_from_raw)
    }

    pub fn humidity(&mut self) -> Result<f32, Error> {
        self.measure(CMD_HUMIDITY, HUMIDITY_WAIT_MS)
            .map(humidity_from_raw)
    }
}

impl<I2C: I2c, D: DelayNs> ClimateSensor for Htu21d<I2C, D> {
    fn read_temperature(&mut self) -> Option<f32> {
        self.temperature()
            .inspect_err(|e| warn!("htu21d: temperature read failed: {}", e))
            .ok()
    }

    fn read_humidity(&mut self) -> Option<f32> {
        self.humidity()
            .inspect_err(|e| warn!("htu21d: humidity read failed: {}", e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Answers every read with `reply`, or fails every transaction.
    struct FakeBus {
        reply: [u8; 3],
        fail: bool,
        commands: Vec<u8>,
    }

    impl FakeBus {
        fn replying(reply: [u8; 3]) -> Self {
            Self {
                reply,
                fail: false,
                commands: Vec::new(),
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            assert_eq!(address, HTU21D_I2C_ADDR);
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.commands.extend_from_slice(bytes),
                    Operation::Read(buf) => buf.copy_from_slice(&self.reply[..buf.len()]),
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn temperature_masks_status_bits_and_waits() {
        let mut sensor = Htu21d::new(FakeBus::replying([0x66, 0x4E, 0x00]), CountingDelay::default());
        let t = sensor.read_temperature().unwrap();
        assert!((t - 23.367).abs() < 0.01, "got {t}");
        assert_eq!(sensor.i2c.commands, vec![CMD_TEMPERATURE]);
        assert!(sensor.delay.total_ns >= 50_000_000);
    }

    #[test]
    fn humidity_converts_and_clamps() {
        let mut sensor = Htu21d::new(FakeBus::replying([0x7C, 0x82, 0x00]), CountingDelay::default());
        let rh = sensor.read_humidity().unwrap();
        assert!((rh - 54.79).abs() < 0.01, "got {rh}");
        assert_eq!(sensor.i2c.commands, vec![CMD_HUMIDITY]);

        assert_eq!(humidity_from_raw(0xFFFF), 100.0);
        assert_eq!(humidity_from_raw(0x0000), 0.0);
    }

    #[test]
    fn bus_errors_become_missing_readings() {
        let mut bus = FakeBus::replying([0; 3]);
        bus.fail = true;
        let mut sensor = Htu21d::new(bus, CountingDelay::default());
        assert_eq!(sensor.read_temperature(), None);
        assert_eq!(sensor.read_humidity(), None);
        assert_eq!(sensor.temperature(), Err(Error::Sensor));
    }
}
