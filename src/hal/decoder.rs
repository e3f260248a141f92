use crate::core::{DecodeError, PhysicalSample};
use crate::hal::types::{
    ChannelKind, PressureProfile, ACCEL_SCALE, GYRO_SCALE, LIGHT_SCALE, TEMP_SCALE,
};

/// Read one big-endian integer from a fixed field of 1..=8 bytes
///
/// Signed values are sign-extended from the top bit of the first byte. Only
/// called on slices of an already length-checked payload.
fn read_be(bytes: &[u8], signed: bool) -> i64 {
    let raw = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
    let bits = bytes.len() * 8;

    if signed && bits < 64 {
        // Shift the sign bit into position 63 and back
        let shift = 64 - bits;
        ((raw << shift) as i64) >> shift
    } else {
        raw as i64
    }
}

/// Decode successive 2-byte big-endian counts and scale them
pub fn decode(bytes: &[u8], scale: f64, signed: bool) -> Result<Vec<f64>, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::Misaligned {
            actual: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| read_be(pair, signed) as f64 * scale)
        .collect())
}

fn check_len(kind: ChannelKind, bytes: &[u8]) -> Result<(), DecodeError> {
    let expected = kind.payload_len();
    if bytes.len() != expected {
        return Err(DecodeError::LengthMismatch {
            kind,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// 12 bytes: accel x y z at 0..6, gyro x y z at 6..12, all i16 BE
pub fn decode_gyro_accel(bytes: &[u8]) -> Result<PhysicalSample, DecodeError> {
    check_len(ChannelKind::GyroAccel, bytes)?;

    let accel = decode(&bytes[0..6], ACCEL_SCALE, true)?;
    let gyro = decode(&bytes[6..12], GYRO_SCALE, true)?;

    Ok(PhysicalSample::GyroAccel {
        gyro: [gyro[0], gyro[1], gyro[2]],
        accel: [accel[0], accel[1], accel[2]],
    })
}

pub fn decode_temp_pressure(
    bytes: &[u8],
    profile: PressureProfile,
) -> Result<PhysicalSample, DecodeError> {
    check_len(ChannelKind::TempPressure, bytes)?;

    let (temp_counts, pressure_counts) = match profile {
        PressureProfile::Unsigned => (read_be(&bytes[1..4], false), read_be(&bytes[4..8], false)),
        PressureProfile::Signed => (read_be(&bytes[0..4], true), read_be(&bytes[4..8], true)),
    };

    Ok(PhysicalSample::TempPressure {
        temperature: temp_counts as f64 * TEMP_SCALE,
        pressure: pressure_counts as f64 * profile.pressure_scale(),
    })
}

pub fn decode_ambient_light(bytes: &[u8]) -> Result<PhysicalSample, DecodeError> {
    check_len(ChannelKind::AmbientLight, bytes)?;

    Ok(PhysicalSample::AmbientLight {
        lux: read_be(bytes, false) as f64 * LIGHT_SCALE,
    })
}

/// Dispatch to the decoder for `kind`
pub fn decode_channel(
    kind: ChannelKind,
    bytes: &[u8],
    profile: PressureProfile,
) -> Result<PhysicalSample, DecodeError> {
    match kind {
        ChannelKind::GyroAccel => decode_gyro_accel(bytes),
        ChannelKind::TempPressure => decode_temp_pressure(bytes, profile),
        ChannelKind::AmbientLight => decode_ambient_light(bytes),
    }
}
