use crate::hal::ChannelKind;

/// Ordered list of active channels, built once per session
///
/// Both the acquisition loop and the log writer walk this list, so row values
/// and header columns cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    channels: Vec<ChannelKind>,
}

impl ColumnLayout {
    pub const TIME_COLUMN: &'static str = "time";

    /// Sorts into fixed channel order and drops duplicates
    pub fn new(channels: impl IntoIterator<Item = ChannelKind>) -> Self {
        let mut channels: Vec<ChannelKind> = channels.into_iter().collect();
        channels.sort();
        channels.dedup();
        Self { channels }
    }

    pub fn channels(&self) -> &[ChannelKind] {
        &self.channels
    }

    pub fn contains(&self, kind: ChannelKind) -> bool {
        self.channels.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of value columns, excluding time
    pub fn width(&self) -> usize {
        self.channels.iter().map(|kind| kind.width()).sum()
    }

    /// Full header: time, then each channel's columns
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = Vec::with_capacity(self.width() + 1);
        header.push(Self::TIME_COLUMN);
        for kind in &self.channels {
            header.extend_from_slice(kind.columns());
        }
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gyro_and_light_layout() {
        let layout = ColumnLayout::new([ChannelKind::AmbientLight, ChannelKind::GyroAccel]);

        assert_eq!(layout.width(), 7);
        assert_eq!(
            layout.header(),
            vec!["time", "g_x", "g_y", "g_z", "a_x", "a_y", "a_z", "l"]
        );
        assert!(!layout.contains(ChannelKind::TempPressure));
    }

    #[test]
    fn test_duplicates_collapse() {
        let layout = ColumnLayout::new([ChannelKind::TempPressure, ChannelKind::TempPressure]);
        assert_eq!(layout.channels(), &[ChannelKind::TempPressure]);
        assert_eq!(layout.header(), vec!["time", "t", "p"]);
    }
}
