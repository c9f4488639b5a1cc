//! Weight response status flags
//!
//! The weight response carries a 4-character flags field. The last three
//! characters are a hex number whose low 11 bits are independent indicators.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Indicator bits reported alongside a weight reading
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u16 {
        /// Reading is at zero
        const ZERO = 0x001;
        /// A tare is present
        const TARE = 0x002;
        /// Reading is stable
        const STABLE = 0x004;
        /// Display shows net weight
        const NET = 0x008;
        /// Tare was entered as a preset rather than measured
        const PRESET_TARE_MODE = 0x010;
        const HIGH_RESOLUTION = 0x020;
        /// Initial zero setting is active
        const INITIAL_ZERO = 0x040;
        const OVERLOAD = 0x080;
        const NEGATIVE = 0x100;
        /// Second weighing range
        const RANGE_2 = 0x200;
        /// A preset tare value is active
        const PRESET_TARE = 0x400;
    }
}

/// How the current tare was established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TareMode {
    Normal,
    Preset,
}

impl StatusFlags {
    /// Parse the 4-character flags field of a weight response
    ///
    /// The first character is a type marker and is skipped. A field that
    /// does not hold hex digits yields no flags at all.
    pub fn from_field(field: &str) -> Self {
        field
            .get(1..)
            .and_then(|digits| u16::from_str_radix(digits.trim(), 16).ok())
            .map(Self::from_bits_truncate)
            .unwrap_or_else(Self::empty)
    }

    pub fn tare_mode(self) -> TareMode {
        if self.contains(Self::PRESET_TARE_MODE) {
            TareMode::Preset
        } else {
            TareMode::Normal
        }
    }

    /// Active weighing range (1 or 2)
    pub fn range(self) -> u8 {
        if self.contains(Self::RANGE_2) { 2 } else { 1 }
    }
}

/// Wire view of [`StatusFlags`] as exposed to API clients
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagsView {
    zero: bool,
    tare: bool,
    stable: bool,
    net: bool,
    tare_mode: TareMode,
    high_resolution: bool,
    initial_zero: bool,
    overload: bool,
    negative: bool,
    range: u8,
    preset_tare: bool,
}

impl From<StatusFlags> for FlagsView {
    fn from(flags: StatusFlags) -> Self {
        Self {
            zero: flags.contains(StatusFlags::ZERO),
            tare: flags.contains(StatusFlags::TARE),
            stable: flags.contains(StatusFlags::STABLE),
            net: flags.contains(StatusFlags::NET),
            tare_mode: flags.tare_mode(),
            high_resolution: flags.contains(StatusFlags::HIGH_RESOLUTION),
            initial_zero: flags.contains(StatusFlags::INITIAL_ZERO),
            overload: flags.contains(StatusFlags::OVERLOAD),
            negative: flags.contains(StatusFlags::NEGATIVE),
            range: flags.range(),
            preset_tare: flags.contains(StatusFlags::PRESET_TARE),
        }
    }
}

impl From<FlagsView> for StatusFlags {
    fn from(view: FlagsView) -> Self {
        let mut flags = StatusFlags::empty();
        flags.set(StatusFlags::ZERO, view.zero);
        flags.set(StatusFlags::TARE, view.tare);
        flags.set(StatusFlags::STABLE, view.stable);
        flags.set(StatusFlags::NET, view.net);
        flags.set(StatusFlags::PRESET_TARE_MODE, view.tare_mode == TareMode::Preset);
        flags.set(StatusFlags::HIGH_RESOLUTION, view.high_resolution);
        flags.set(StatusFlags::INITIAL_ZERO, view.initial_zero);
        flags.set(StatusFlags::OVERLOAD, view.overload);
        flags.set(StatusFlags::NEGATIVE, view.negative);
        flags.set(StatusFlags::RANGE_2, view.range == 2);
        flags.set(StatusFlags::PRESET_TARE, view.preset_tare);
        flags
    }
}

impl Serialize for StatusFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlagsView::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatusFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FlagsView::deserialize(deserializer).map(Self::from)
    }
}
