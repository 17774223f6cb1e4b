//! DS18B20 digital thermometer protocol.
//!
//! Conversions are started for every probe at once (Skip ROM + Convert T)
//! and results are read per probe (Match ROM + Read Scratchpad). The
//! 9-byte scratchpad ends in a Dallas CRC-8; the first two bytes are the
//! temperature as a signed 12.4 fixed-point value.

use crate::drivers::onewire::{OneWireBus, RomCode, crc8};
use crate::error::ProbeError;

/// ROM family code of the DS18B20.
pub const FAMILY_CODE: u8 = 0x28;

pub const CONVERT_T: u8 = 0x44;
pub const WRITE_SCRATCHPAD: u8 = 0x4E;
pub const READ_SCRATCHPAD: u8 = 0xBE;

/// Default alarm registers written alongside the configuration byte.
const ALARM_HIGH: u8 = 0x4B;
const ALARM_LOW: u8 = 0x46;

/// Conversion resolution (configuration register values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Resolution {
    Bits9 = 0x1F,  // 0.5 °C
    Bits10 = 0x3F, // 0.25 °C
    Bits11 = 0x5F, // 0.125 °C
    Bits12 = 0x7F, // 0.0625 °C
}

impl Resolution {
    /// Worst-case conversion time from the datasheet.
    pub const fn conversion_time_ms(self) -> u32 {
        match self {
            Self::Bits9 => 94,
            Self::Bits10 => 188,
            Self::Bits11 => 375,
            Self::Bits12 => 750,
        }
    }

    /// Finest resolution whose conversion fits in `budget_ms`.
    pub fn for_budget(budget_ms: u32) -> Self {
        [Self::Bits12, Self::Bits11, Self::Bits10]
            .into_iter()
            .find(|r| r.conversion_time_ms() <= budget_ms)
            .unwrap_or(Self::Bits9)
    }
}

/// True if `rom` belongs to a DS18B20.
pub fn is_ds18b20(rom: &RomCode) -> bool {
    rom[0] == FAMILY_CODE
}

/// Start a temperature conversion on every device on the bus.
pub fn start_conversion_all<B: OneWireBus + ?Sized>(bus: &mut B) -> Result<(), ProbeError> {
    bus.skip_rom()?;
    bus.write_byte(CONVERT_T)
}

/// Read and CRC-check one device's scratchpad.
pub fn read_scratchpad<B: OneWireBus + ?Sized>(
    bus: &mut B,
    rom: &RomCode,
) -> Result<[u8; 9], ProbeError> {
    bus.select(rom)?;
    bus.write_byte(READ_SCRATCHPAD)?;
    let mut pad = [0u8; 9];
    bus.read_bytes(&mut pad)?;

    // An all-zero scratchpad passes the CRC but means the line is stuck low.
    if pad.iter().all(|&b| b == 0) || crc8(&pad) != 0 {
        return Err(ProbeError::CrcMismatch);
    }
    Ok(pad)
}

/// Convert the first two scratchpad bytes to Celsius.
pub fn decode_celsius(lsb: u8, msb: u8) -> f32 {
    f32::from(i16::from_le_bytes([lsb, msb])) / 16.0
}

/// Read the result of the last conversion from one device.
pub fn read_celsius<B: OneWireBus + ?Sized>(bus: &mut B, rom: &RomCode) -> Result<f32, ProbeError> {
    let pad = read_scratchpad(bus, rom)?;
    Ok(decode_celsius(pad[0], pad[1]))
}

/// Write the configuration register and read it back.
pub fn set_resolution<B: OneWireBus + ?Sized>(
    bus: &mut B,
    rom: &RomCode,
    resolution: Resolution,
) -> Result<(), ProbeError> {
    bus.select(rom)?;
    bus.write_bytes(&[WRITE_SCRATCHPAD, ALARM_HIGH, ALARM_LOW, resolution as u8])?;

    let pad = read_scratchpad(bus, rom)?;
    if pad[4] & 0x60 == resolution as u8 & 0x60 {
        Ok(())
    } else {
        Err(ProbeError::ConfigMismatch)
    }
}
