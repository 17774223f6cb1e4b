//! Bit-banged 1-Wire bus master.
//!
//! Standard-speed timings from the Maxim application note for a host-driven
//! master on an open-drain line with an external 4.7 kΩ pull-up:
//!
//! ```text
//!  reset   : low 480 µs → release → sample at 70 µs → wait 410 µs
//!  write 1 : low   6 µs → release → wait 64 µs
//!  write 0 : low  60 µs → release → wait 10 µs
//!  read    : low   6 µs → release → sample at 9 µs → wait 55 µs
//! ```
//!
//! The timing-critical part of every slot runs inside a critical section so
//! an interrupt cannot stretch it. The recovery waits run with interrupts
//! enabled.
//!
//! Generic over `embedded-hal` 1.0 pin and delay traits, so the same code
//! drives an `esp-idf-hal` `PinDriver` on target and a fake pin in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::ProbeError;

/// ROM command: enumerate devices.
pub const SEARCH_ROM: u8 = 0xF0;
/// ROM command: address one device by ROM code.
pub const MATCH_ROM: u8 = 0x55;
/// ROM command: address every device at once.
pub const SKIP_ROM: u8 = 0xCC;

/// A 64-bit device ROM code: family, 48-bit serial, CRC.
pub type RomCode = [u8; 8];

// ---------------------------------------------------------------------------
// Bus abstraction
// ---------------------------------------------------------------------------

/// Bit-level access to a 1-Wire bus. Byte helpers go LSB first.
pub trait OneWireBus {
    /// Issue a reset pulse. Returns `true` if any device answered with a
    /// presence pulse.
    fn reset(&mut self) -> Result<bool, ProbeError>;

    fn write_bit(&mut self, bit: bool) -> Result<(), ProbeError>;

    fn read_bit(&mut self) -> Result<bool, ProbeError>;

    fn write_byte(&mut self, byte: u8) -> Result<(), ProbeError> {
        for i in 0..8 {
            self.write_bit((byte >> i) & 1 == 1)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, ProbeError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ProbeError> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ProbeError> {
        for slot in buf.iter_mut() {
            *slot = self.read_byte()?;
        }
        Ok(())
    }

    /// Reset, failing with [`ProbeError::NoPresence`] if nobody answers.
    fn reset_expect_presence(&mut self) -> Result<(), ProbeError> {
        if self.reset()? {
            Ok(())
        } else {
            Err(ProbeError::NoPresence)
        }
    }

    /// Reset and address one device.
    fn select(&mut self, rom: &RomCode) -> Result<(), ProbeError> {
        self.reset_expect_presence()?;
        self.write_byte(MATCH_ROM)?;
        self.write_bytes(rom)
    }

    /// Reset and address every device.
    fn skip_rom(&mut self) -> Result<(), ProbeError> {
        self.reset_expect_presence()?;
        self.write_byte(SKIP_ROM)
    }
}

// ---------------------------------------------------------------------------
// CRC
// ---------------------------------------------------------------------------

/// Dallas/Maxim CRC-8 (polynomial x⁸ + x⁵ + x⁴ + 1, reflected 0x8C).
/// Running it over data plus its trailing CRC byte yields 0.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

// ---------------------------------------------------------------------------
// ROM search
// ---------------------------------------------------------------------------

/// Enumerate up to `N` device ROM codes, in search order.
///
/// Each pass walks the 64 ROM bits; where devices disagree (both the bit
/// and its complement read 0) the pass takes the 0 branch unless it is
/// replaying the last discrepancy, in which case it takes the 1 branch.
/// The search ends when a pass finishes without a new 0-branch discrepancy.
pub fn search_roms<B: OneWireBus + ?Sized, const N: usize>(
    bus: &mut B,
) -> Result<heapless::Vec<RomCode, N>, ProbeError> {
    let mut found = heapless::Vec::new();
    let mut rom: RomCode = [0; 8];
    let mut last_discrepancy = 0u8;

    loop {
        bus.reset_expect_presence()?;
        bus.write_byte(SEARCH_ROM)?;

        let mut last_zero = 0u8;
        for bit_number in 1..=64u8 {
            let idx = usize::from(bit_number - 1);
            let (byte, mask) = (idx / 8, 1u8 << (idx % 8));

            let id_bit = bus.read_bit()?;
            let cmp_bit = bus.read_bit()?;
            let direction = match (id_bit, cmp_bit) {
                (true, true) => return Err(ProbeError::SearchCollision),
                (false, false) => {
                    let take_one = if bit_number < last_discrepancy {
                        rom[byte] & mask != 0
                    } else {
                        bit_number == last_discrepancy
                    };
                    if !take_one {
                        last_zero = bit_number;
                    }
                    take_one
                }
                (bit, _) => bit,
            };

            if direction {
                rom[byte] |= mask;
            } else {
                rom[byte] &= !mask;
            }
            bus.write_bit(direction)?;
        }

        if crc8(&rom[..7]) != rom[7] {
            return Err(ProbeError::CrcMismatch);
        }
        if found.push(rom).is_err() {
            break;
        }

        last_discrepancy = last_zero;
        if last_discrepancy == 0 {
            break;
        }
    }

    Ok(found)
}

// ---------------------------------------------------------------------------
// Bit-banged master
// ---------------------------------------------------------------------------

const RESET_LOW_US: u32 = 480;
const PRESENCE_SAMPLE_US: u32 = 70;
const RESET_RECOVERY_US: u32 = 410;
const WRITE_ONE_LOW_US: u32 = 6;
const WRITE_ONE_RECOVERY_US: u32 = 64;
const WRITE_ZERO_LOW_US: u32 = 60;
const WRITE_ZERO_RECOVERY_US: u32 = 10;
const READ_LOW_US: u32 = 6;
const READ_SAMPLE_US: u32 = 9;
const READ_RECOVERY_US: u32 = 55;

/// 1-Wire master on one open-drain GPIO.
pub struct BitBangOneWire<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> BitBangOneWire<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// Take the pin and release the line (high-Z, pulled up).
    pub fn new(mut pin: P, delay: D) -> Result<Self, ProbeError> {
        pin.set_high().map_err(|_| ProbeError::Bus)?;
        Ok(Self { pin, delay })
    }

    /// Give the pin and delay back.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> OneWireBus for BitBangOneWire<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn reset(&mut self) -> Result<bool, ProbeError> {
        let Self { pin, delay } = self;

        pin.set_low().map_err(|_| ProbeError::Bus)?;
        delay.delay_us(RESET_LOW_US);
        let presence = critical_section::with(|_| {
            pin.set_high()?;
            delay.delay_us(PRESENCE_SAMPLE_US);
            pin.is_low()
        })
        .map_err(|_| ProbeError::Bus)?;
        delay.delay_us(RESET_RECOVERY_US);

        Ok(presence)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), ProbeError> {
        let Self { pin, delay } = self;
        let (low_us, recovery_us) = if bit {
            (WRITE_ONE_LOW_US, WRITE_ONE_RECOVERY_US)
        } else {
            (WRITE_ZERO_LOW_US, WRITE_ZERO_RECOVERY_US)
        };

        critical_section::with(|_| {
            pin.set_low()?;
            delay.delay_us(low_us);
            pin.set_high()
        })
        .map_err(|_| ProbeError::Bus)?;
        delay.delay_us(recovery_us);
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, ProbeError> {
        let Self { pin, delay } = self;

        let bit = critical_section::with(|_| {
            pin.set_low()?;
            delay.delay_us(READ_LOW_US);
            pin.set_high()?;
            delay.delay_us(READ_SAMPLE_US);
            pin.is_high()
        })
        .map_err(|_| ProbeError::Bus)?;
        delay.delay_us(READ_RECOVERY_US);
        Ok(bit)
    }
}
