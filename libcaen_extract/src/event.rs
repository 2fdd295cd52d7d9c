use ndarray::Array1;

use super::dat_file::RawRecord;
use super::dataset::Dataset;

/// One event of a [`Dataset`], as returned by [`Dataset::get`].
///
/// Amplitudes are the raw ADC counts taken as millivolts (no calibration). `x` is the
/// charge-division position `(a - b) / (a + b)` and is NaN or infinite when `a + b == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub channel: u32,
    pub amplitude_a: f64,
    pub amplitude_b: f64,
    pub ab: f64,
    pub rx: f64,
    pub x: f64,
    pub counts: f64,
}

/// Turn raw records into a Dataset.
///
/// The time words are merged as integers before dividing by the clock so no precision is
/// lost to an early float conversion. If a channel is given only records from that channel
/// are kept. Record order is preserved.
pub fn reconstruct(records: &[RawRecord], clock_hz: f64, channel: Option<u32>) -> Dataset {
    let kept: Vec<&RawRecord> = records
        .iter()
        .filter(|record| channel.map_or(true, |c| record.group as u32 == c))
        .collect();

    let time: Array1<f64> = kept
        .iter()
        .map(|record| record.ticks() as f64 / clock_hz)
        .collect();
    let channels: Array1<u32> = kept.iter().map(|record| record.group as u32).collect();
    let amplitude_a: Array1<f64> = kept
        .iter()
        .map(|record| record.amplitudes[0] as f64)
        .collect();
    let amplitude_b: Array1<f64> = kept
        .iter()
        .map(|record| record.amplitudes[1] as f64)
        .collect();

    Dataset::from_columns(time, channels, amplitude_a, amplitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_high: u32, time_low: u32, group: u8, a: u16, b: u16) -> RawRecord {
        RawRecord {
            time_high,
            time_low,
            group,
            amplitudes: [a, b, 0, 0],
            ..Default::default()
        }
    }

    #[test]
    fn test_time_merge() {
        let cases = [
            (0u32, 0u32, 1.25e8),
            (0, 200_000_000, 1.0e8),
            (1, 0, 1.25e8),
            (3, 0xffff_ffff, 1.25e8),
            (0xffff_ffff, 0xffff_ffff, 1.0),
            (12, 345, 7.5),
        ];
        for (high, low, clock) in cases {
            let dataset = reconstruct(&[record(high, low, 0, 1, 1)], clock, None);
            let expected = ((high as u64) * (1u64 << 32) + low as u64) as f64 / clock;
            assert_eq!(dataset.time[0], expected);
        }
        let dataset = reconstruct(&[record(0, 200_000_000, 0, 1, 1)], 1.0e8, None);
        assert_eq!(dataset.time[0], 2.0);
    }

    #[test]
    fn test_position() {
        let dataset = reconstruct(&[record(0, 0, 3, 30, 10)], 1.0e8, None);
        let event = dataset.get(0).unwrap();
        assert_eq!(event.channel, 3);
        assert_eq!(event.amplitude_a, 30.0);
        assert_eq!(event.amplitude_b, 10.0);
        assert_eq!(event.ab, 40.0);
        assert_eq!(event.rx, 20.0);
        assert_eq!(event.x, 0.5);
        assert_eq!(event.counts, 1.0);
    }

    #[test]
    fn test_zero_amplitude_sum_is_not_finite() {
        let dataset = reconstruct(&[record(0, 0, 0, 0, 0)], 1.0e8, None);
        assert_eq!(dataset.len(), 1);
        assert!(dataset.x[0].is_nan());
    }

    #[test]
    fn test_reconstruct_keeps_record_order() {
        let records = vec![
            record(0, 500, 1, 5, 9),
            record(0, 100, 2, 7, 3),
            record(1, 0, 1, 60, 40),
        ];
        let dataset = reconstruct(&records, 1.25e8, None);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.channel.to_vec(), vec![1, 2, 1]);
        assert_eq!(dataset.amplitude_a.to_vec(), vec![5.0, 7.0, 60.0]);
        assert_eq!(dataset.time[2], (1u64 << 32) as f64 / 1.25e8);
    }

    #[test]
    fn test_reconstruct_with_channel_restriction() {
        let records = vec![
            record(0, 3, 1, 5, 9),
            record(0, 2, 2, 7, 3),
            record(0, 1, 1, 60, 40),
        ];
        let dataset = reconstruct(&records, 1.0, Some(1));
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.time.to_vec(), vec![3.0, 1.0]);
        assert!(dataset.channel.iter().all(|&c| c == 1));

        let dataset = reconstruct(&records, 1.0, Some(9));
        assert!(dataset.is_empty());
    }
}
