use anyhow::Result;

use crate::adc::{AdcReader, ADC_MAX};

const VOLTAGE_MAX_MV: f32 = 25000.0;
const ADC_REF_VOLTS: f32 = 3.3;

// ACS712, 5A model
const CURRENT_BIAS_VOLTS: f32 = 2.5;
const CURRENT_SENSITIVITY: f32 = 0.185;
const CURRENT_SAMPLES: u32 = 10;

/// Panel voltage and current, recomputed on the telemetry timer.
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySample {
    pub volts: f32,
    pub amps: f32,
}

/// Rescale a raw sample from the voltage divider to volts.
pub fn volts_from_raw(raw: u16) -> f32 {
    raw as f32 * VOLTAGE_MAX_MV / ADC_MAX as f32 / 1000.0
}

/// Convert an averaged raw current-sensor sample to amperes.
pub fn amps_from_average(avg_raw: f32) -> f32 {
    let sensed_volts = avg_raw * ADC_REF_VOLTS / ADC_MAX as f32;
    (sensed_volts - CURRENT_BIAS_VOLTS) / CURRENT_SENSITIVITY
}

pub struct PowerMonitor {
    voltage_channel: u8,
    current_channel: u8,
}

impl PowerMonitor {
    pub fn new(voltage_channel: u8, current_channel: u8) -> Self {
        PowerMonitor {
            voltage_channel,
            current_channel,
        }
    }

    pub fn sample(&self, adc: &mut AdcReader) -> Result<TelemetrySample> {
        let raw = adc.read_channel(self.voltage_channel)?;
        let volts = volts_from_raw(raw);

        let mut total: u32 = 0;
        for _ in 0..CURRENT_SAMPLES {
            total += adc.read_channel(self.current_channel)? as u32;
        }
        let amps = amps_from_average(total as f32 / CURRENT_SAMPLES as f32);

        Ok(TelemetrySample { volts, amps })
    }
}
