//! Environment readings - indoor climate sensor and outdoor weather.
//!
//! Both collaborators are best-effort: any failure becomes `None` and the
//! screen shows a `--` placeholder until the next scheduled refresh.

pub mod htu21d;

/// Indoor temperature/humidity source.
pub trait ClimateSensor {
    /// Degrees Celsius.
    fn read_temperature(&mut self) -> Option<f32>;
    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Option<f32>;
}

/// Stand-in when no sensor answered at boot.
pub struct NoSensor;

impl ClimateSensor for NoSensor {
    fn read_temperature(&mut self) -> Option<f32> {
        None
    }

    fn read_humidity(&mut self) -> Option<f32> {
        None
    }
}

/// Coarse weather category, as reported in the provider's main condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Other,
}

impl Condition {
    /// Parse the provider's condition name (`"Rain"`, `"Clear"`, ...).
    pub fn from_main(name: &str) -> Self {
        match name {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Snow" => Condition::Snow,
            "Mist" | "Fog" | "Haze" => Condition::Mist,
            _ => Condition::Other,
        }
    }

    /// Short on-screen name.
    pub fn label(self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Cloud",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drzl",
            Condition::Thunderstorm => "Storm",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Other => "?",
        }
    }

    /// Conditions that get the rain overlay.
    pub fn is_wet(self) -> bool {
        matches!(
            self,
            Condition::Rain | Condition::Drizzle | Condition::Thunderstorm
        )
    }
}

/// One weather report. Fields may be individually missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Conditions {
    pub temp_c: Option<f32>,
    pub humidity: Option<f32>,
    pub condition: Option<Condition>,
}

/// Outdoor weather provider.
pub trait WeatherSource {
    /// `false` skips the weather tick entirely.
    fn is_online(&self) -> bool;
    /// Fetch current conditions; `None` on any failure. May block for the
    /// duration of one bounded request.
    fn fetch(&mut self) -> Option<Conditions>;
    /// Current Unix time (s) from the same link, if it provides one.
    /// Polled on the weather tick.
    fn unix_time(&mut self) -> Option<u64> {
        None
    }
}

/// Weather source for builds without a network link.
pub struct OfflineWeather;

impl WeatherSource for OfflineWeather {
    fn is_online(&self) -> bool {
        false
    }

    fn fetch(&mut self) -> Option<Conditions> {
        None
    }
}

/// Latest cached readings shown on the idle screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Readings {
    pub indoor_c: Option<f32>,
    pub indoor_rh: Option<f32>,
    pub outdoor: Conditions,
}

impl Readings {
    pub fn refresh_indoor(&mut self, sensor: &mut impl ClimateSensor) {
        self.indoor_c = sensor.read_temperature();
        self.indoor_rh = sensor
            .read_humidity()
            .map(|rh| rh.clamp(0.0, 100.0));
        if self.indoor_c.is_none() {
            debug!("sensor: no indoor reading");
        }
    }

    pub fn refresh_outdoor(&mut self, weather: &mut impl WeatherSource) {
        self.outdoor = match weather.fetch() {
            Some(conditions) => conditions,
            None => {
                warn!("weather: fetch failed");
                Conditions::default()
            }
        };
    }

    pub fn is_raining(&self) -> bool {
        self.outdoor.condition.is_some_and(Condition::is_wet)
    }
}

/// Celsius to Fahrenheit.
pub fn c_to_f(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor(Option<f32>, Option<f32>);

    impl ClimateSensor for FixedSensor {
        fn read_temperature(&mut self) -> Option<f32> {
            self.0
        }

        fn read_humidity(&mut self) -> Option<f32> {
            self.1
        }
    }

    struct Flaky {
        reports: [Option<Conditions>; 2],
        calls: usize,
    }

    impl WeatherSource for Flaky {
        fn is_online(&self) -> bool {
            true
        }

        fn fetch(&mut self) -> Option<Conditions> {
            let r = self.reports[self.calls % 2];
            self.calls += 1;
            r
        }
    }

    #[test]
    fn condition_parsing_and_rain() {
        assert_eq!(Condition::from_main("Rain"), Condition::Rain);
        assert_eq!(Condition::from_main("Haze"), Condition::Mist);
        assert_eq!(Condition::from_main("Tornado"), Condition::Other);
        assert!(Condition::Drizzle.is_wet());
        assert!(Condition::Thunderstorm.is_wet());
        assert!(!Condition::Clouds.is_wet());
    }

    #[test]
    fn indoor_refresh_clamps_humidity_and_keeps_missing_as_none() {
        let mut r = Readings::default();
        r.refresh_indoor(&mut FixedSensor(Some(21.5), Some(104.0)));
        assert_eq!(r.indoor_c, Some(21.5));
        assert_eq!(r.indoor_rh, Some(100.0));

        r.refresh_indoor(&mut NoSensor);
        assert_eq!(r.indoor_c, None);
        assert_eq!(r.indoor_rh, None);
    }

    #[test]
    fn failed_fetch_clears_stale_outdoor_data() {
        let rainy = Conditions {
            temp_c: Some(12.0),
            humidity: Some(90.0),
            condition: Some(Condition::Rain),
        };
        let mut source = Flaky {
            reports: [Some(rainy), None],
            calls: 0,
        };
        let mut r = Readings::default();
        r.refresh_outdoor(&mut source);
        assert!(r.is_raining());
        r.refresh_outdoor(&mut source);
        assert_eq!(r.outdoor, Conditions::default());
        assert!(!r.is_raining());
    }

    #[test]
    fn fahrenheit_conversion() {
        assert_eq!(c_to_f(0.0), 32.0);
        assert_eq!(c_to_f(100.0), 212.0);
    }
}
