//! Publish sink abstraction and state-topic formatting.
//!
//! The pipeline hands fully formed modules and batteries to a publish sink
//! as plain `(topic, payload)` pairs. The real MQTT backend lives in
//! [`mqtt`] behind the `mqtt` feature; tests substitute a recording fake.

#[cfg(feature = "mqtt")]
pub mod mqtt;

use crate::battery::Battery;
use crate::module::Module;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors produced while publishing.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("publish transport error: {0}")]
    Transport(String),
}

/// Capability to publish a payload to a topic.
pub trait PublishSink: Send {
    fn publish(
        &mut self,
        topic: String,
        payload: String,
        retain: bool,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + '_>>;
}

/// State topics and payloads for one module.
///
/// Topics are `battery/modules/<serial>/<property>`. Energy counters are
/// published in Wh (`Ah * V`). The `0` time sentinels are published as
/// numbers here; only the battery-level formatting maps them to a label.
pub fn module_states(module: &Module) -> Vec<(String, String)> {
    let states = [
        ("amperage", format!("{:.2}", module.amperage)),
        ("cycleNumber", format!("{}", module.cycle_number)),
        ("energy", format!("{:.2}", module.energy)),
        (
            "energy_capacity",
            format!("{:.2}", module.energy_capacity * module.voltage),
        ),
        (
            "energy_remaining",
            format!("{:.2}", module.energy_remaining * module.voltage),
        ),
        ("power", format!("{:.3}", module.power)),
        ("time_to_empty", format!("{:.2}", module.time_to_empty)),
        ("time_to_full", format!("{:.2}", module.time_to_full)),
        ("voltage", format!("{:.1}", module.voltage)),
    ];
    states
        .into_iter()
        .map(|(property, value)| {
            (
                format!("battery/modules/{}/{property}", module.serial),
                value,
            )
        })
        .collect()
}

/// State topics and payloads for the aggregate battery.
///
/// Topics are `battery/battery/<id>/<property>`. A `0` time estimate means
/// "not charging" or "not discharging"; at this boundary it becomes the
/// human-facing `unavailable` label.
pub fn battery_states(battery: &Battery) -> Vec<(String, String)> {
    let states = [
        ("amperage", format!("{:.2}", battery.amperage)),
        ("cycleNumber", format!("{:.2}", battery.cycle_number)),
        ("energy", format!("{:.2}", battery.energy)),
        (
            "energy_capacity",
            format!("{:.3}", battery.energy_capacity * battery.voltage),
        ),
        (
            "energy_remaining",
            format!("{:.3}", battery.energy_remaining * battery.voltage),
        ),
        ("power", format!("{:.2}", battery.power)),
        ("time_to_empty", time_estimate(battery.time_to_empty)),
        ("time_to_full", time_estimate(battery.time_to_full)),
        ("voltage", format!("{:.1}", battery.voltage)),
    ];
    states
        .into_iter()
        .map(|(property, value)| {
            (
                format!("battery/battery/{}/{property}", battery.serial),
                value,
            )
        })
        .collect()
}

fn time_estimate(hours: f64) -> String {
    if hours != 0.0 {
        format!("{hours:.2}")
    } else {
        "unavailable".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battery::Battery;
    use crate::test_utils::sample_module;

    fn charging_battery() -> Battery {
        let modules = [
            sample_module("AAA", 10.0, 50.0, 80.0, 100.0, 5.0),
            sample_module("BBB", 10.0, 48.0, 90.0, 100.0, 7.0),
        ];
        Battery::aggregate(&modules).unwrap()
    }

    #[test]
    fn test_module_states_topics_and_formatting() {
        let module = sample_module("AAA", 10.0, 50.0, 80.0, 100.0, 5.0);
        let states = module_states(&module);

        let lookup = |property: &str| {
            states
                .iter()
                .find(|(topic, _)| topic == &format!("battery/modules/AAA/{property}"))
                .map(|(_, payload)| payload.as_str())
        };

        assert_eq!(states.len(), 9);
        assert_eq!(lookup("amperage"), Some("10.00"));
        assert_eq!(lookup("cycleNumber"), Some("5"));
        assert_eq!(lookup("energy"), Some("80.00"));
        assert_eq!(lookup("energy_capacity"), Some("5000.00")); // 100 Ah * 50 V
        assert_eq!(lookup("energy_remaining"), Some("4000.00"));
        assert_eq!(lookup("power"), Some("500.000"));
        assert_eq!(lookup("voltage"), Some("50.0"));
    }

    #[test]
    fn test_module_time_sentinels_stay_numeric() {
        let idle = sample_module("AAA", 0.0, 50.0, 80.0, 100.0, 5.0);
        let states = module_states(&idle);
        assert!(
            states
                .iter()
                .any(|(topic, payload)| topic.ends_with("/time_to_empty") && payload == "0.00")
        );
        assert!(
            states
                .iter()
                .any(|(topic, payload)| topic.ends_with("/time_to_full") && payload == "0.00")
        );
    }

    #[test]
    fn test_battery_states_topics_and_formatting() {
        let battery = charging_battery();
        let states = battery_states(&battery);

        let prefix = format!("battery/battery/{}/", battery.serial);
        assert!(states.iter().all(|(topic, _)| topic.starts_with(&prefix)));

        let lookup = |property: &str| {
            states
                .iter()
                .find(|(topic, _)| topic == &format!("{prefix}{property}"))
                .map(|(_, payload)| payload.as_str())
        };

        assert_eq!(lookup("amperage"), Some("20.00"));
        assert_eq!(lookup("voltage"), Some("49.0"));
        assert_eq!(lookup("cycleNumber"), Some("6.00"));
        assert_eq!(lookup("energy_capacity"), Some("9800.000")); // 200 Ah * 49 V
        // Both modules are charging, so time_to_full is a number...
        assert_eq!(lookup("time_to_full"), Some("1.50"));
        // ...and the discharge estimate is the sentinel, published as a label.
        assert_eq!(lookup("time_to_empty"), Some("unavailable"));
    }

    #[test]
    fn test_time_estimate_label() {
        assert_eq!(time_estimate(0.0), "unavailable");
        assert_eq!(time_estimate(2.5), "2.50");
    }
}
