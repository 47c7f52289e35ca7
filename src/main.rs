//! Demo driver: feeds a scripted telemetry stream through the engine and
//! prints the resulting snapshot as JSON.
//!
//! Run with `RUST_LOG=debug` to watch the per-event processing.

use trackside::engine::TelemetryEngine;
use trackside::notify::sink::ConsoleSink;
use trackside::processing::normalizer::RawEvent;
use trackside::utils::EngineConfig;

fn main() {
    env_logger::init();

    let config = EngineConfig::default();
    let mut engine = match TelemetryEngine::new(config, Box::new(ConsoleSink)) {
        Ok(engine) => engine,
        Err(error) => {
            eprintln!("Configuration rejected: {}", error);
            std::process::exit(1);
        }
    };

    // A short session: two cars lapping, one distress raised and cleared,
    // plus a couple of malformed payloads the engine must survive.
    let stream = [
        r#"{"event":"locationUpdate","data":{"carId":44,"latitude":52.0786,"longitude":-1.0169}}"#,
        r#"{"event":"locationUpdate","data":{"carId":44,"latitude":52.0791,"longitude":-1.0158}}"#,
        r#"{"event":"locationUpdate","data":{"carId":"16","latitude":"52.0713","longitude":"-1.0142"}}"#,
        r#"{"event":"locationUpdate","data":{"carId":16,"latitude":95.0,"longitude":-1.0142}}"#,
        r#"{"event":"sos","data":{"carId":44,"message":"gearbox failure"}}"#,
        r#"{"event":"locationUpdate","data":{"carId":44,"latitude":52.0794,"longitude":-1.0151}}"#,
        r#"{"event":"sos-clear","data":{"carId":44}}"#,
        r#"{"event":"sos","data":{"carId":16}}"#,
    ];

    for line in stream {
        let raw: RawEvent = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(error) => {
                eprintln!("Unreadable payload: {}", error);
                continue;
            }
        };
        if let Err(reason) = engine.apply_raw(&raw) {
            eprintln!("Rejected: {}", reason);
        }
    }

    let snapshot = engine.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("Snapshot serialization failed: {}", error),
    }

    let stats = engine.stats();
    println!(
        "applied={} rejected={} alerts_raised={} alerts_cleared={}",
        stats.positions_applied, stats.events_rejected, stats.alerts_raised, stats.alerts_cleared
    );
}
