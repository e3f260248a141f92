use sensorlog::core::{DecodeError, PhysicalSample};
use sensorlog::hal::decoder::{decode_ambient_light, decode_channel, decode_gyro_accel};
use sensorlog::hal::{ChannelKind, ChannelState, PressureProfile, RawReading, SensorChannel};

#[test]
fn test_accel_z_decodes_to_one_g() {
    // accel X=0, Y=0, Z=0x4000 followed by all-zero gyro
    let mut bytes = vec![0x00, 0x00, 0x00, 0x00, 0x40, 0x00];
    bytes.extend_from_slice(&[0u8; 6]);

    let sample = decode_gyro_accel(&bytes).unwrap();
    assert_eq!(
        sample,
        PhysicalSample::GyroAccel {
            gyro: [0.0, 0.0, 0.0],
            accel: [0.0, 0.0, 16384.0 * 2.0 / 32768.0],
        }
    );
}

#[test]
fn test_negative_gyro_counts() {
    let mut bytes = vec![0u8; 6];
    bytes.extend_from_slice(&(-32768i16).to_be_bytes());
    bytes.extend_from_slice(&(-1i16).to_be_bytes());
    bytes.extend_from_slice(&32767i16.to_be_bytes());

    match decode_gyro_accel(&bytes).unwrap() {
        PhysicalSample::GyroAccel { gyro, .. } => {
            assert_eq!(gyro[0], -250.0);
            assert!((gyro[1] + 250.0 / 32768.0).abs() < 1e-12);
            assert!((gyro[2] - 32767.0 * 250.0 / 32768.0).abs() < 1e-9);
        }
        other => panic!("unexpected sample {:?}", other),
    }
}

#[test]
fn test_ambient_light_999_95_lux() {
    match decode_ambient_light(&[0x0B, 0x29]).unwrap() {
        PhysicalSample::AmbientLight { lux } => assert!((lux - 999.95).abs() < 1e-9),
        other => panic!("unexpected sample {:?}", other),
    }
}

#[test]
fn test_profiles_disagree_on_same_payload() {
    let bytes = [0x00, 0x01, 0x90, 0x00, 0x00, 0x01, 0x8B, 0xCD];

    let unsigned = decode_channel(ChannelKind::TempPressure, &bytes, PressureProfile::Unsigned)
        .unwrap()
        .values();
    let signed = decode_channel(ChannelKind::TempPressure, &bytes, PressureProfile::Signed)
        .unwrap()
        .values();

    // Same temperature counts here, pressure differs by the 1/100 scale
    assert!((unsigned[0] - 20.0).abs() < 1e-9);
    assert!((signed[0] - 20.0).abs() < 1e-9);
    assert_eq!(unsigned[1], 101_325.0);
    assert!((signed[1] - 1013.25).abs() < 1e-9);
}

#[test]
fn test_wrong_length_never_yields_sample() {
    for kind in ChannelKind::ALL {
        let mut channel = SensorChannel::new(kind);
        channel.enable().unwrap();

        let short = RawReading::new(vec![0u8; kind.payload_len() - 1]);
        let err = channel.poll(&short).unwrap_err();
        assert!(matches!(err, DecodeError::LengthMismatch { .. }));
        assert!(channel.last_sample().is_none());
        assert_eq!(channel.state(), ChannelState::Enabled);
    }
}

#[test]
fn test_disabled_channel_rejects_valid_payload() {
    let mut channel = SensorChannel::new(ChannelKind::AmbientLight);
    channel.enable().unwrap();
    channel.disable().unwrap();

    let err = channel.poll(&RawReading::new(vec![0x0B, 0x29])).unwrap_err();
    assert_eq!(err, DecodeError::InvalidState { kind: ChannelKind::AmbientLight });
}
