//! Climate Advisory
//!
//! Pure mapping from a weather reading to advisory text. Each field is
//! checked against fixed high/low thresholds independently; triggered
//! sentences are joined with a single space in field order (temperature,
//! humidity, rainfall). Nothing triggered means an empty string.

use serde::Deserialize;

/// Current weather at the requester's location.
///
/// Optional on a chat request as a whole; all fields required when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
    pub rainfall: f64,
}

// ============================================================================
// Advisory Thresholds
// ============================================================================

/// Above this, crops need extra irrigation and shade (°C).
pub const HIGH_TEMPERATURE_C: f64 = 30.0;

/// Below this, frost protection is worth raising (°C).
pub const LOW_TEMPERATURE_C: f64 = 15.0;

/// Above this, fungal disease pressure rises (%).
pub const HIGH_HUMIDITY_PCT: f64 = 80.0;

/// Below this, plants dry out and benefit from mulching (%).
pub const LOW_HUMIDITY_PCT: f64 = 40.0;

/// Above this, drainage needs watching (mm).
pub const HIGH_RAINFALL_MM: f64 = 10.0;

/// Below this, irrigation becomes the limiting factor (mm).
pub const LOW_RAINFALL_MM: f64 = 1.0;

/// Build climate-specific farming advice for a weather reading.
pub fn climate_advice(weather: &WeatherReading) -> String {
    let mut advice = Vec::new();

    // Temperature
    if weather.temperature > HIGH_TEMPERATURE_C {
        advice.push(
            "Due to high temperatures, ensure adequate irrigation and consider shade protection for sensitive crops.",
        );
    } else if weather.temperature < LOW_TEMPERATURE_C {
        advice.push(
            "With cooler temperatures, protect crops from frost and consider using row covers.",
        );
    }

    // Humidity
    if weather.humidity > HIGH_HUMIDITY_PCT {
        advice.push(
            "High humidity may increase disease risk. Ensure good air circulation and monitor for fungal diseases.",
        );
    } else if weather.humidity < LOW_HUMIDITY_PCT {
        advice.push("Low humidity may stress plants. Consider mulching and regular watering.");
    }

    // Rainfall
    if weather.rainfall > HIGH_RAINFALL_MM {
        advice.push("Recent rainfall is good but monitor drainage to prevent waterlogging.");
    } else if weather.rainfall < LOW_RAINFALL_MM {
        advice.push(
            "Low rainfall means irrigation will be crucial. Consider drip irrigation for water efficiency.",
        );
    }

    advice.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(temperature: f64, humidity: f64, rainfall: f64) -> WeatherReading {
        WeatherReading {
            temperature,
            humidity,
            description: "test".to_string(),
            rainfall,
        }
    }

    #[test]
    fn all_extremes_trigger_in_field_order() {
        let advice = climate_advice(&weather(32.0, 85.0, 0.5));

        let temp_pos = advice.find("Due to high temperatures").unwrap();
        let humidity_pos = advice.find("High humidity").unwrap();
        let rainfall_pos = advice.find("Low rainfall").unwrap();

        assert!(temp_pos < humidity_pos);
        assert!(humidity_pos < rainfall_pos);
        // Sentences joined by exactly one space, nothing else added.
        assert_eq!(advice.matches("  ").count(), 0);
    }

    #[test]
    fn normal_conditions_yield_empty_advice() {
        assert_eq!(climate_advice(&weather(20.0, 60.0, 5.0)), "");
    }

    #[test]
    fn thresholds_are_strict() {
        // Boundary values sit inside the "normal" band.
        assert_eq!(climate_advice(&weather(30.0, 80.0, 10.0)), "");
        assert_eq!(climate_advice(&weather(15.0, 40.0, 1.0)), "");
    }

    #[test]
    fn cold_and_dry_combination() {
        let advice = climate_advice(&weather(10.0, 30.0, 0.0));
        assert!(advice.contains("frost"));
        assert!(advice.contains("mulching"));
        assert!(advice.contains("drip irrigation"));
    }
}
