use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use hogwatch::config::WatchConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "HOGWATCH_CONFIG",
        "HOGWATCH_SOURCE",
        "HOGWATCH_SNAPSHOT",
        "HOGWATCH_HIT_THRESHOLD",
        "HOGWATCH_LEVELS",
        "HOGWATCH_FRAME_INTERVAL_MS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = WatchConfig::load().expect("load config");

    assert_eq!(cfg.source, "synthetic://sensor0");
    assert_eq!(cfg.snapshot_path.to_str().unwrap(), "person.jpg");
    assert_eq!(cfg.frame_interval, Duration::ZERO);
    assert_eq!(cfg.engine.levels, 13);
    assert_eq!(cfg.engine.win_size, (48, 96));
    assert_eq!(cfg.engine.input_size, (640, 480));
    assert!((cfg.engine.scale_factor - 1.1).abs() < 1e-9);

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "source": "synthetic://bench",
        "snapshot_path": "/var/lib/hogwatch/person.jpg",
        "frame_interval_ms": 33,
        "detector": {
            "levels": 8,
            "scale_factor": 1.2,
            "hit_threshold": 0.5,
            "group_threshold": 3,
            "input_width": 320,
            "input_height": 240
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("HOGWATCH_CONFIG", file.path());
    std::env::set_var("HOGWATCH_LEVELS", "5");
    std::env::set_var("HOGWATCH_SNAPSHOT", "/tmp/override.jpg");

    let cfg = WatchConfig::load().expect("load config");

    assert_eq!(cfg.source, "synthetic://bench");
    // Env beats file.
    assert_eq!(cfg.snapshot_path.to_str().unwrap(), "/tmp/override.jpg");
    assert_eq!(cfg.engine.levels, 5);
    assert_eq!(cfg.frame_interval, Duration::from_millis(33));
    assert!((cfg.engine.scale_factor - 1.2).abs() < 1e-9);
    assert!((cfg.engine.hit_threshold - 0.5).abs() < 1e-6);
    assert_eq!(cfg.engine.group_threshold, 3);
    assert_eq!(cfg.engine.input_size, (320, 240));
    // Scan geometry is not file-tunable.
    assert_eq!(cfg.engine.win_size, (48, 96));

    clear_env();
}

#[test]
fn rejects_malformed_env_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("HOGWATCH_HIT_THRESHOLD", "not-a-number");
    let err = WatchConfig::load().unwrap_err();
    assert!(format!("{}", err).contains("HOGWATCH_HIT_THRESHOLD"));

    clear_env();
}

#[test]
fn rejects_invalid_detector_geometry() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{ "detector": { "levels": 0 } }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    std::env::set_var("HOGWATCH_CONFIG", file.path());

    assert!(WatchConfig::load().is_err());

    clear_env();
}
