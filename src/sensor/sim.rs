use anyhow::Result;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use super::{GyroSample, SampleCallback, SensorProvider, SensorRate};

/// Synthetic gyroscope for dry runs and local development
///
/// Generates sinusoidal motion bursts separated by near-still lulls, so the
/// idle detector has realistic edges to find without any hardware attached.
pub struct SimulatedSensor {
    /// How long each motion burst lasts
    pub burst: Duration,
    /// How long the device sits still between bursts
    pub lull: Duration,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedSensor {
    pub fn new(burst: Duration, lull: Duration) -> Self {
        Self {
            burst,
            lull,
            handle: None,
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(1))
    }
}

impl SensorProvider for SimulatedSensor {
    fn start(&mut self, rate: SensorRate, on_sample: SampleCallback) -> Result<()> {
        self.stop();

        let hz = rate.hz().max(1);
        let period = Duration::from_micros(1_000_000 / hz as u64);
        let burst = self.burst;
        let lull = self.lull;

        info!("simulated gyroscope starting at {} Hz", hz);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let start = tokio::time::Instant::now();
            let mut n: u64 = 0;

            loop {
                ticker.tick().await;

                let elapsed = start.elapsed();
                let cycle_ms = (burst + lull).as_millis().max(1);
                let in_burst = elapsed.as_millis() % cycle_ms < burst.as_millis();

                let t = n as f32 / hz as f32;
                let sample = if in_burst {
                    GyroSample {
                        x: 0.4 * (t * 6.0).sin(),
                        y: 0.3 * (t * 4.2).cos(),
                        z: 0.1 * (t * 9.1).sin(),
                        timestamp_ns: elapsed.as_nanos() as i64,
                    }
                } else {
                    // sensor noise floor, well under any sane idle threshold
                    GyroSample {
                        x: 0.001,
                        y: -0.001,
                        z: 0.0,
                        timestamp_ns: elapsed.as_nanos() as i64,
                    }
                };

                on_sample(sample);
                n += 1;
            }
        }));

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("simulated gyroscope stopped");
        }
    }
}
