use anyhow::Result;
use rppal::i2c::I2c;

use crate::power::TelemetrySample;
use crate::tracker::PanTilt;

const I2C_BUS: u8 = 1;
const I2C_ADDRESS: u16 = 0x3C;

pub struct DisplayBuffer {
    buffer: [u8; 1024],
}

impl DisplayBuffer {
    fn new() -> Self {
        DisplayBuffer {
            buffer: [0u8; 1024],
        }
    }

    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        if x >= 128 || y >= 64 {
            return;
        }
        let byte_index = (y / 8) as usize * 128 + x as usize;
        let bit_index = y % 8;

        if on {
            self.buffer[byte_index] |= 1 << bit_index;
        } else {
            self.buffer[byte_index] &= !(1 << bit_index);
        }
    }

    fn draw_char(&mut self, x: u8, y: u8, c: char) {
        let font = get_font_data(c);
        for dx in 0..5u8 {
            let column = font[dx as usize];
            for dy in 0..8u8 {
                if (column >> dy) & 1 == 1 {
                    self.set_pixel(x + dx, y + dy, true);
                }
            }
        }
    }

    fn draw_text(&mut self, x: u8, y: u8, text: &str) {
        for (i, c) in text.to_uppercase().chars().enumerate() {
            self.draw_char(x + (i as u8 * 6), y, c);
        }
    }
}

struct Ssd1306 {
    i2c: I2c,
}

impl Ssd1306 {
    fn new() -> Result<Self> {
        let mut i2c = I2c::with_bus(I2C_BUS)?;
        i2c.set_slave_address(I2C_ADDRESS)?;

        let mut display = Ssd1306 { i2c };
        display.init()?;

        println!(
            "SSD1306 OLED initialized on I2C bus {}, address 0x{:02X}",
            I2C_BUS, I2C_ADDRESS
        );
        Ok(display)
    }

    fn init(&mut self) -> Result<()> {
        let init_commands = [
            0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40,
            0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8, 0xDA, 0x12,
            0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF,
        ];

        for &cmd in &init_commands {
            self.send_command(cmd)?;
        }

        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<()> {
        self.i2c.write(&[0x00, cmd])?;
        Ok(())
    }

    fn show(&mut self, buffer: &DisplayBuffer) -> Result<()> {
        self.send_command(0x21)?;
        self.send_command(0)?;
        self.send_command(127)?;
        self.send_command(0x22)?;
        self.send_command(0)?;
        self.send_command(7)?;

        for chunk in buffer.buffer.chunks(16) {
            let mut data = vec![0x40];
            data.extend_from_slice(chunk);
            self.i2c.write(&data)?;
        }

        Ok(())
    }
}

fn get_font_data(c: char) -> [u8; 5] {
    match c {
        '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => [0x62, 0x51, 0x49, 0x49, 0x46],
        '3' => [0x22, 0x41, 0x49, 0x49, 0x36],
        '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
        'A' => [0x7C, 0x12, 0x11, 0x12, 0x7C],
        'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7F, 0x41, 0x41, 0x41, 0x3E],
        'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
        'G' => [0x3E, 0x41, 0x49, 0x49, 0x3A],
        'H' => [0x7F, 0x04, 0x04, 0x04, 0x7F],
        'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
        'J' => [0x41, 0x41, 0x3F, 0x01, 0x01],
        'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
        'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
        'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
        'N' => [0x7F, 0x02, 0x04, 0x08, 0x7F],
        'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
        'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
        'Q' => [0x3E, 0x41, 0x51, 0x61, 0x7E],
        'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x26, 0x49, 0x49, 0x49, 0x32],
        'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
        'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
        'V' => [0x07, 0x18, 0x60, 0x18, 0x07],
        'W' => [0x7F, 0x80, 0x7C, 0x80, 0x7F],
        'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
        'Y' => [0x03, 0x0C, 0x70, 0x0C, 0x03],
        'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
        ':' => [0x00, 0x36, 0x36, 0x00, 0x00],
        '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
        '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
        _ => [0x7F, 0x41, 0x41, 0x41, 0x7F],
    }
}

/// The four-line power/position readout.
pub struct TelemetryScreen {
    oled: Ssd1306,
    buffer: DisplayBuffer,
}

impl TelemetryScreen {
    /// Initialize the OLED and commit a blank frame.
    pub fn new() -> Result<Self> {
        let oled = Ssd1306::new()?;
        let mut screen = TelemetryScreen {
            oled,
            buffer: DisplayBuffer::new(),
        };
        screen.buffer.clear();
        screen.oled.show(&screen.buffer)?;
        Ok(screen)
    }

    pub fn render(&mut self, sample: &TelemetrySample, position: &PanTilt) -> Result<()> {
        self.buffer.clear();

        let voltage_text = format!("VOLTAGE: {:.2}V", sample.volts);
        self.buffer.draw_text(0, 0, &voltage_text);

        let current_text = format!("CURRENT: {:.2}A", sample.amps);
        self.buffer.draw_text(0, 10, &current_text);

        let pan_text = format!("Servo 1: {} deg", position.pan);
        self.buffer.draw_text(0, 20, &pan_text);

        let tilt_text = format!("Servo 2: {} deg", position.tilt);
        self.buffer.draw_text(0, 30, &tilt_text);

        self.oled.show(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_at_origin_fills_first_columns_of_page_zero() {
        let mut buffer = DisplayBuffer::new();
        buffer.draw_char(0, 0, 'V');

        assert_eq!(buffer.buffer[0..5], get_font_data('V'));
        assert_eq!(buffer.buffer[5], 0);
    }

    #[test]
    fn text_advances_six_pixels_per_char() {
        let mut buffer = DisplayBuffer::new();
        buffer.draw_text(0, 0, "AB");

        assert_eq!(buffer.buffer[0..5], get_font_data('A'));
        assert_eq!(buffer.buffer[6..11], get_font_data('B'));
    }

    #[test]
    fn text_is_uppercased_before_lookup() {
        let mut upper = DisplayBuffer::new();
        let mut lower = DisplayBuffer::new();
        upper.draw_text(0, 0, "DEG");
        lower.draw_text(0, 0, "deg");

        assert_eq!(upper.buffer, lower.buffer);
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut buffer = DisplayBuffer::new();
        buffer.set_pixel(128, 0, true);
        buffer.set_pixel(0, 64, true);

        assert!(buffer.buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_lands_on_its_page() {
        let mut buffer = DisplayBuffer::new();
        buffer.set_pixel(3, 10, true);

        // y=10 is page 1, bit 2.
        assert_eq!(buffer.buffer[128 + 3], 1 << 2);
    }

    #[test]
    fn clear_zeroes_the_frame() {
        let mut buffer = DisplayBuffer::new();
        buffer.draw_text(0, 0, "VOLTAGE: 12.34V");
        buffer.clear();

        assert!(buffer.buffer.iter().all(|&b| b == 0));
    }
}
