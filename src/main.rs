mod adc;
mod display;
mod power;
mod servo;
mod timer;
mod tracker;

use adc::AdcReader;
use display::TelemetryScreen;
use power::PowerMonitor;
use servo::Servo;
use timer::RenderGate;
use tracker::{LightReading, PanTilt};

use anyhow::Result;
use rppal::gpio::Gpio;
use std::thread;
use std::time::{Duration, Instant};

const PAN_SERVO_PIN: u8 = 12;
const TILT_SERVO_PIN: u8 = 14;

// MCP3208 channel assignments
const LDR_TOP_LEFT: u8 = 0;
const LDR_BOTTOM_LEFT: u8 = 1;
const LDR_BOTTOM_RIGHT: u8 = 2;
const LDR_TOP_RIGHT: u8 = 3;
const VOLTAGE_CHANNEL: u8 = 4;
const CURRENT_CHANNEL: u8 = 5;

const LDR_SCALE: u16 = 100;
const LOOP_DELAY_MS: u64 = 20;
const TELEMETRY_INTERVAL_MS: u64 = 2000;

fn read_light(adc: &mut AdcReader) -> Result<LightReading> {
    Ok(LightReading {
        top_left: adc.read_channel(LDR_TOP_LEFT)? / LDR_SCALE,
        bottom_left: adc.read_channel(LDR_BOTTOM_LEFT)? / LDR_SCALE,
        bottom_right: adc.read_channel(LDR_BOTTOM_RIGHT)? / LDR_SCALE,
        top_right: adc.read_channel(LDR_TOP_RIGHT)? / LDR_SCALE,
    })
}

fn main() -> Result<()> {
    println!("Starting solar tracker");

    let gpio = Gpio::new()?;
    let mut pan_servo = Servo::attach(&gpio, PAN_SERVO_PIN)?;
    let mut tilt_servo = Servo::attach(&gpio, TILT_SERVO_PIN)?;

    // A missing OLED at boot is fatal, no retry.
    let mut screen = match TelemetryScreen::new() {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("OLED not found: {}", e);
            return Err(e.context("SSD1306 OLED not found"));
        }
    };

    let mut adc = AdcReader::new()?;
    let monitor = PowerMonitor::new(VOLTAGE_CHANNEL, CURRENT_CHANNEL);

    let mut position = PanTilt::startup();
    pan_servo.write(position.pan)?;
    tilt_servo.write(position.tilt)?;

    let mut telemetry_gate = RenderGate::new(
        Duration::from_millis(TELEMETRY_INTERVAL_MS),
        Instant::now(),
    );

    loop {
        let reading = read_light(&mut adc)?;
        let update = position.step(&reading);

        if update.pan_update {
            pan_servo.write(position.pan)?;
        }
        if update.tilt_update {
            tilt_servo.write(position.tilt)?;
        }

        if telemetry_gate.ready(Instant::now()) {
            let sample = monitor.sample(&mut adc)?;
            println!(
                "VOLTAGE {:.2}V CURRENT {:.2}A PAN {} TILT {}",
                sample.volts, sample.amps, position.pan, position.tilt
            );
            screen.render(&sample, &position)?;
        }

        thread::sleep(Duration::from_millis(LOOP_DELAY_MS));
    }
}
