// Document ID Generator - Snowflake-like IDs rendered as opaque strings
// 64-bit ID format: [timestamp:42][node_id:10][sequence:12]

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Generates unique, time-ordered document ids for one node.
/// Allows 1024 nodes and 4096 IDs per millisecond per node.
#[derive(Debug)]
pub struct DocumentIdGenerator {
    node_id: u16,
    // (last_timestamp_ms, next_sequence)
    state: Mutex<(u64, u64)>,
}

impl DocumentIdGenerator {
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id: node_id & 0x3FF,
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate next unique ID
    pub fn next_id(&self) -> i64 {
        loop {
            let now = current_time_millis();
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            let (last_ts, next_seq) = *state;

            let (timestamp, sequence) = if now > last_ts {
                (now, 0)
            } else if next_seq < 4096 {
                // Same millisecond or clock went backwards: stay on the last timestamp
                (last_ts, next_seq)
            } else {
                // Sequence overflow - wait for next millisecond
                drop(state);
                std::thread::sleep(Duration::from_millis(1));
                continue;
            };
            *state = (timestamp, sequence + 1);

            let id = ((timestamp & 0x3FF_FFFF_FFFF) << 22)
                | ((self.node_id as u64) << 12)
                | (sequence & 0xFFF);
            return id as i64;
        }
    }

    /// Next id in the string form stored in documents
    pub fn next_document_id(&self) -> String {
        self.next_id().to_string()
    }
}

fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let generator = DocumentIdGenerator::new(7);
        let ids: Vec<i64> = (0..5000).map(|_| generator.next_id()).collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_node_bits_are_embedded() {
        let generator = DocumentIdGenerator::new(500);
        let id = generator.next_id() as u64;

        assert_eq!((id >> 12) & 0x3FF, 500);
        assert!(id >> 22 > 0);
    }

    #[test]
    fn test_document_id_is_decimal() {
        let generator = DocumentIdGenerator::new(1);
        let id = generator.next_document_id();
        assert!(id.parse::<i64>().is_ok());
    }
}
