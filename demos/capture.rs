//! Headless capture walkthrough: generate for a second, save the buffer to
//! CSV, reload it, and confirm the round trip.

use std::time::{Duration, Instant};

use livetrace::{Generator, GeneratorConfig, SampleBuffer, persist};

fn main() {
    env_logger::init();

    let mut buffer = SampleBuffer::new();
    let mut generator = Generator::from_seed(42);

    let config = GeneratorConfig {
        count: 100,
        min: 0,
        max: 1000,
        interval_ms: 20,
    };
    generator
        .start(config, 0, Instant::now())
        .expect("valid config");

    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(1) {
        generator.poll(Instant::now(), &mut buffer);
        std::thread::sleep(Duration::from_millis(2));
    }
    generator.stop();
    println!("generated {} samples", buffer.len());

    let path = std::env::temp_dir().join("livetrace-capture.csv");
    persist::save(&buffer, &path).expect("save capture");
    println!("saved to {}", path.display());

    let loaded = persist::load(&path).expect("load capture");
    assert_eq!(loaded, buffer.snapshot().samples());
    println!("round trip verified: {} samples", loaded.len());
}
