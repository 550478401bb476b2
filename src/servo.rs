use anyhow::Result;
use rppal::gpio::{Gpio, OutputPin};
use std::time::Duration;

const PWM_PERIOD_MS: u64 = 20;
const PULSE_MIN_US: u64 = 500;
const PULSE_MAX_US: u64 = 2500;
const ANGLE_MAX: u16 = 180;

/// Map an absolute angle to a pulse width within the 20ms servo frame.
pub fn pulse_width_us(angle: u16) -> u64 {
    let angle = angle.min(ANGLE_MAX) as u64;
    PULSE_MIN_US + angle * (PULSE_MAX_US - PULSE_MIN_US) / ANGLE_MAX as u64
}

pub struct Servo {
    pin: OutputPin,
}

impl Servo {
    /// Claim a GPIO pin as a software-PWM servo output.
    pub fn attach(gpio: &Gpio, pin_number: u8) -> Result<Self> {
        let pin = gpio.get(pin_number)?.into_output();
        println!("Servo attached on GPIO {}", pin_number);
        Ok(Servo { pin })
    }

    /// Drive the servo to an absolute angle in degrees.
    pub fn write(&mut self, angle: u16) -> Result<()> {
        self.pin.set_pwm(
            Duration::from_millis(PWM_PERIOD_MS),
            Duration::from_micros(pulse_width_us(angle)),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_endpoints_match_servo_range() {
        assert_eq!(pulse_width_us(0), 500);
        assert_eq!(pulse_width_us(180), 2500);
    }

    #[test]
    fn pulse_center_is_neutral() {
        assert_eq!(pulse_width_us(90), 1500);
    }

    #[test]
    fn pulse_clamps_past_full_deflection() {
        assert_eq!(pulse_width_us(300), 2500);
    }
}
