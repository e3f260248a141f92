use crate::core::{ColumnLayout, CompositeRow};
use super::RecordingLog;

/// In-memory row buffer for one session
///
/// `append` never touches I/O. The buffer is handed over exactly once by
/// `finalize`, which consumes the sink.
#[derive(Debug)]
pub struct RecordingSink {
    layout: ColumnLayout,
    rows: Vec<CompositeRow>,
}

impl RecordingSink {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn append(&mut self, elapsed_ms: f64, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.layout.width());
        self.rows.push(CompositeRow::new(elapsed_ms, values));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finalize(self) -> RecordingLog {
        RecordingLog::new(self.layout, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::ChannelKind;

    #[test]
    fn test_append_then_finalize() {
        let mut sink = RecordingSink::new(ColumnLayout::new([ChannelKind::AmbientLight]));
        assert!(sink.is_empty());

        sink.append(0.5, vec![1.0]);
        sink.append(1.5, vec![2.0]);
        assert_eq!(sink.len(), 2);

        let log = sink.finalize();
        assert_eq!(log.rows().len(), 2);
        assert_eq!(log.rows()[1], CompositeRow::new(1.5, vec![2.0]));
    }
}
