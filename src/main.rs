use battery_bridge::app::{self, Options, RunError};
use battery_bridge::sink::mqtt::MqttSink;
use battery_bridge::source::modbus::ModbusSource;
use clap::Parser;
use std::panic::{self, PanicHookInfo};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_PANIC: i32 = 2;

/// Connect the transports and hand control to the poll loop.
///
/// # Errors
/// Returns `RunError` if the Modbus gateway is unreachable or a poll cycle
/// hits a configuration or publish error.
async fn run(options: Options) -> Result<(), RunError> {
    info!(
        host = %options.modbus_host,
        port = options.modbus_port,
        "connecting to MODBUS"
    );
    let mut source = ModbusSource::connect(&options.modbus_host, options.modbus_port).await?;
    info!("connected to MODBUS");

    info!(
        broker = %options.mqtt_broker,
        port = options.mqtt_port,
        "connecting to MQTT"
    );
    let mut sink = MqttSink::connect(
        &options.mqtt_broker,
        options.mqtt_port,
        &options.mqtt_client_id,
    );

    app::run(&options, &mut source, &mut sink).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up panic hook to ensure clean exit codes for process managers
    // (e.g., systemd) that monitor exit status
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse();

    match run(options).await {
        Ok(_) => std::process::exit(EXIT_SUCCESS),
        Err(why) => {
            eprintln!("error: {}", why);
            std::process::exit(EXIT_ERROR);
        }
    }
}
