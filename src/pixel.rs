use std::fmt;

const RED_SHIFT: u32 = 0;
const GREEN_SHIFT: u32 = 8;
const BLUE_SHIFT: u32 = 16;
const ALPHA_SHIFT: u32 = 24;

const RED_CLEAR: u32 = 0xFFFF_FF00;
const GREEN_CLEAR: u32 = 0xFFFF_00FF;
const BLUE_CLEAR: u32 = 0xFF00_FFFF;
const ALPHA_CLEAR: u32 = 0x00FF_FFFF;

/// One of the four 8 bit channels of a [`Pixel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    /// All channels in the order they are laid out in memory
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

    const fn shift(self) -> u32 {
        match self {
            Channel::Red => RED_SHIFT,
            Channel::Green => GREEN_SHIFT,
            Channel::Blue => BLUE_SHIFT,
            Channel::Alpha => ALPHA_SHIFT,
        }
    }

    const fn clear_mask(self) -> u32 {
        match self {
            Channel::Red => RED_CLEAR,
            Channel::Green => GREEN_CLEAR,
            Channel::Blue => BLUE_CLEAR,
            Channel::Alpha => ALPHA_CLEAR,
        }
    }
}

/// A single RGBA pixel packed into a `u32`
///
/// Red lives in the lowest byte, alpha in the highest. Stored in memory as
/// little endian this gives the byte sequence `[r, g, b, a]`, which is what
/// the host bitmap layout expects (byte order big, alpha last).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Pixel {
    value: u32,
}

impl Pixel {
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self::from_bytes([red, green, blue, alpha])
    }

    /// Read a pixel from its in-memory byte representation `[r, g, b, a]`
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            value: u32::from_le_bytes(bytes),
        }
    }

    /// Byte representation `[r, g, b, a]`, independent of the host's endianness
    pub const fn to_bytes(self) -> [u8; 4] {
        self.value.to_le_bytes()
    }

    pub const fn value(self) -> u32 {
        self.value
    }

    #[inline]
    pub const fn red(self) -> u8 {
        self.channel(Channel::Red)
    }

    #[inline]
    pub const fn green(self) -> u8 {
        self.channel(Channel::Green)
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.channel(Channel::Blue)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        self.channel(Channel::Alpha)
    }

    #[inline]
    pub fn set_red(&mut self, red: u8) {
        self.set_channel(Channel::Red, red);
    }

    #[inline]
    pub fn set_green(&mut self, green: u8) {
        self.set_channel(Channel::Green, green);
    }

    #[inline]
    pub fn set_blue(&mut self, blue: u8) {
        self.set_channel(Channel::Blue, blue);
    }

    #[inline]
    pub fn set_alpha(&mut self, alpha: u8) {
        self.set_channel(Channel::Alpha, alpha);
    }

    #[inline]
    pub const fn channel(self, channel: Channel) -> u8 {
        ((self.value >> channel.shift()) & 0xFF) as u8
    }

    /// Overwrite a single channel, the other three stay bit-for-bit the same
    #[inline]
    pub fn set_channel(&mut self, channel: Channel, v: u8) {
        self.value = ((v as u32) << channel.shift()) | (self.value & channel.clear_mask());
    }
}

impl From<u32> for Pixel {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        pixel.value
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel({:#010X})", self.value)
    }
}
