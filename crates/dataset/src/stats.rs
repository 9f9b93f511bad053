use serde::{Deserialize, Serialize};

use crate::{ChatRecord, DatasetError, EmptyCause, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub total_samples: usize,
    pub total_messages: usize,
    pub avg_messages_per_sample: f64,   // one decimal, rounded on the exact stored value
    pub samples_with_system_message: usize,
}

/// Aggregate counts over validated records. Empty input is an error.
pub fn statistics(records: &[ChatRecord]) -> Result<DatasetStatistics> {
    if records.is_empty() {
        return Err(DatasetError::NoValidSamples {
            operation: "statistics",
            cause: EmptyCause::EmptyInput,
        });
    }

    let total_messages: usize = records.iter().map(|r| r.messages.len()).sum();
    let avg = total_messages as f64 / records.len() as f64;
    let samples_with_system_message = records.iter().filter(|r| r.has_system_message()).count();

    Ok(DatasetStatistics {
        total_samples: records.len(),
        total_messages,
        avg_messages_per_sample: round1(avg),
        samples_with_system_message,
    })
}

/// Precision formatting rounds the exact binary value (ties to even), so
/// 21/20 (stored just above 1.05) gives 1.1 and 23/20 (just below 1.15) gives 1.1.
fn round1(x: f64) -> f64 {
    format!("{x:.1}").parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;

    fn rec(roles: &[&str]) -> ChatRecord {
        ChatRecord {
            messages: roles
                .iter()
                .map(|r| Message { role: r.to_string(), content: "c".into() })
                .collect(),
        }
    }

    #[test]
    fn test_counts() {
        let rs = vec![
            rec(&["system", "user", "assistant"]),
            rec(&["user", "assistant"]),
            rec(&["user"]),
        ];
        let s = statistics(&rs).unwrap();
        assert_eq!(s.total_samples, 3);
        assert_eq!(s.total_messages, 6);
        assert_eq!(s.avg_messages_per_sample, 2.0);
        assert_eq!(s.samples_with_system_message, 1);
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        // 7 / 3 = 2.333..
        let rs = vec![rec(&["user", "assistant", "user"]), rec(&["user", "assistant"]), rec(&["user", "assistant"])];
        assert_eq!(statistics(&rs).unwrap().avg_messages_per_sample, 2.3);

        // 9 / 4 = 2.25 sits on a tie
        let rs = vec![rec(&["user"; 3]), rec(&["user"; 2]), rec(&["user"; 2]), rec(&["user"; 2])];
        assert_eq!(statistics(&rs).unwrap().avg_messages_per_sample, 2.2);
    }

    fn ones_and_twos(ones: usize, twos: usize) -> Vec<ChatRecord> {
        let mut rs = vec![rec(&["user"]); ones];
        rs.extend(vec![rec(&["user", "assistant"]); twos]);
        rs
    }

    #[test]
    fn test_average_rounds_stored_value_not_scaled_value() {
        // 21 / 20: 1.05 is stored as 1.05000000000000004..
        let s = statistics(&ones_and_twos(19, 1)).unwrap();
        assert_eq!(s.total_messages, 21);
        assert_eq!(s.avg_messages_per_sample, 1.1);

        // 23 / 20: 1.15 is stored as 1.14999999999999991..
        let s = statistics(&ones_and_twos(17, 3)).unwrap();
        assert_eq!(s.total_messages, 23);
        assert_eq!(s.avg_messages_per_sample, 1.1);
    }

    #[test]
    fn test_system_counted_once_per_sample() {
        let rs = vec![rec(&["system", "system", "user"])];
        assert_eq!(statistics(&rs).unwrap().samples_with_system_message, 1);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            statistics(&[]),
            Err(DatasetError::NoValidSamples { operation: "statistics", .. })
        ));
    }
}
