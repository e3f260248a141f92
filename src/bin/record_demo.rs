use anyhow::Result;
use sensorlog::hal::mock::SimulatedSensor;
use sensorlog::hal::ChannelKind;
use sensorlog::{AcquisitionSession, SessionConfig};
use tokio::time::{sleep, Duration};

const RECORD_FOR: Duration = Duration::from_secs(2);
const OUTPUT: &str = "recording.tsv";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional JSON session file as first argument
    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path).await?,
        None => SessionConfig::with_channels(ChannelKind::ALL),
    };

    println!("Sensor Recorder Demo");
    println!("====================\n");

    let sensor = SimulatedSensor::new().with_read_delay(Duration::from_millis(10));
    let mut session = AcquisitionSession::new(sensor, config);

    let stop = session.stop_handle();
    tokio::spawn(async move {
        sleep(RECORD_FOR).await;
        stop.stop();
    });

    let log = session.run(OUTPUT).await?;

    println!("Recorded {} rows to {}", log.rows().len(), OUTPUT);
    println!("Columns: {}\n", log.header().join(" "));
    println!("{}", session.monitor().generate_report());

    Ok(())
}
