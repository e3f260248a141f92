use serde::{Deserialize, Serialize};
use std::fmt;

pub const GYRO_ACCEL_DATA_UUID: &str = "6a806050-b5a3-f393-e0a9-e50e24dcca9e";
pub const TEMP_PRESSURE_DATA_UUID: &str = "6a80b280-b5a3-f393-e0a9-e50e24dcca9e";
pub const AMBIENT_LIGHT_DATA_UUID: &str = "6a803216-b5a3-f393-e0a9-e50e24dcca9e";

/// Sample-interval control characteristic
pub const SAMPLE_INTERVAL_UUID: &str = "6a80ff0c-b5a3-f393-e0a9-e50e24dcca9e";

/// Fixed sample-interval value written at session start (0x0064)
pub const SAMPLE_INTERVAL_VALUE: [u8; 2] = [0x00, 0x64];

// Counts -> physical units
pub const ACCEL_SCALE: f64 = 2.0 / 32768.0; // g
pub const GYRO_SCALE: f64 = 250.0 / 32768.0; // deg/s
pub const TEMP_SCALE: f64 = 1.0 / 5120.0; // degC
pub const LIGHT_SCALE: f64 = 0.35; // lux

/// Sensor modality exposed by the module
///
/// Declaration order is the fixed channel order used for every composite row
/// and every log header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    GyroAccel,
    TempPressure,
    AmbientLight,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::GyroAccel,
        ChannelKind::TempPressure,
        ChannelKind::AmbientLight,
    ];

    /// Position in the fixed channel order
    pub fn index(self) -> usize {
        match self {
            Self::GyroAccel => 0,
            Self::TempPressure => 1,
            Self::AmbientLight => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::GyroAccel => "gyro_accel",
            Self::TempPressure => "temp_pressure",
            Self::AmbientLight => "ambient_light",
        }
    }

    /// Data characteristic the transport reads for this channel
    pub fn data_uuid(self) -> &'static str {
        match self {
            Self::GyroAccel => GYRO_ACCEL_DATA_UUID,
            Self::TempPressure => TEMP_PRESSURE_DATA_UUID,
            Self::AmbientLight => AMBIENT_LIGHT_DATA_UUID,
        }
    }

    /// Exact raw payload length in bytes
    pub fn payload_len(self) -> usize {
        match self {
            Self::GyroAccel => 12,
            Self::TempPressure => 8,
            Self::AmbientLight => 2,
        }
    }

    /// Log column names, in emission order
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::GyroAccel => &["g_x", "g_y", "g_z", "a_x", "a_y", "a_z"],
            Self::TempPressure => &["t", "p"],
            Self::AmbientLight => &["l"],
        }
    }

    pub fn width(self) -> usize {
        self.columns().len()
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interpretation of the temperature/pressure payload
///
/// The module firmware has shipped with two layouts; neither is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureProfile {
    /// u24 temperature at bytes 1..4, u32 raw pressure counts at 4..8
    #[default]
    Unsigned,
    /// i32 temperature at bytes 0..4, i32 pressure in 1/100 units at 4..8
    Signed,
}

impl PressureProfile {
    pub fn pressure_scale(self) -> f64 {
        match self {
            Self::Unsigned => 1.0,
            Self::Signed => 1.0 / 100.0,
        }
    }
}

/// Immutable payload read for one channel at one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReading {
    bytes: Vec<u8>,
}

impl RawReading {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for RawReading {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for RawReading {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl AsRef<[u8]> for RawReading {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
