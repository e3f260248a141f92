use serde::{Deserialize, Serialize};

use crate::hal::ChannelKind;

/// Decoded physical values for one channel at one poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhysicalSample {
    GyroAccel {
        /// deg/s, x y z
        gyro: [f64; 3],
        /// g, x y z
        accel: [f64; 3],
    },
    TempPressure {
        /// degC
        temperature: f64,
        pressure: f64,
    },
    AmbientLight {
        lux: f64,
    },
}

impl PhysicalSample {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::GyroAccel { .. } => ChannelKind::GyroAccel,
            Self::TempPressure { .. } => ChannelKind::TempPressure,
            Self::AmbientLight { .. } => ChannelKind::AmbientLight,
        }
    }

    /// Append values in the channel's column order
    pub fn extend_into(&self, values: &mut Vec<f64>) {
        match *self {
            Self::GyroAccel { gyro, accel } => {
                values.extend_from_slice(&gyro);
                values.extend_from_slice(&accel);
            }
            Self::TempPressure { temperature, pressure } => {
                values.push(temperature);
                values.push(pressure);
            }
            Self::AmbientLight { lux } => values.push(lux),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.kind().width());
        self.extend_into(&mut values);
        values
    }
}

/// One timestamped record combining every enabled channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRow {
    /// Milliseconds since recording started
    pub elapsed_ms: f64,

    /// Channel values concatenated in fixed channel order
    pub values: Vec<f64>,
}

impl CompositeRow {
    pub fn new(elapsed_ms: f64, values: Vec<f64>) -> Self {
        Self { elapsed_ms, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gyro_before_accel() {
        let sample = PhysicalSample::GyroAccel {
            gyro: [1.0, 2.0, 3.0],
            accel: [4.0, 5.0, 6.0],
        };
        assert_eq!(sample.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(sample.kind(), ChannelKind::GyroAccel);
    }

    #[test]
    fn test_width_matches_columns() {
        let samples = [
            PhysicalSample::GyroAccel { gyro: [0.0; 3], accel: [0.0; 3] },
            PhysicalSample::TempPressure { temperature: 20.0, pressure: 1000.0 },
            PhysicalSample::AmbientLight { lux: 1.0 },
        ];
        for sample in samples {
            assert_eq!(sample.values().len(), sample.kind().width());
        }
    }
}
