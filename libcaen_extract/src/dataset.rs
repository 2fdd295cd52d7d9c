use ndarray::Array1;

use super::event::Event;

fn take<T: Copy>(column: &Array1<T>, indices: &[usize]) -> Array1<T> {
    indices.iter().map(|&idx| column[idx]).collect()
}

/// A collection of events stored as index-aligned coordinate arrays.
///
/// Index `i` of every array refers to the same event. `counts` is the data array, a unit
/// weight per event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub counts: Array1<f64>,
    pub x: Array1<f64>,
    pub time: Array1<f64>,
    pub channel: Array1<u32>,
    pub amplitude_a: Array1<f64>,
    pub amplitude_b: Array1<f64>,
    pub ab: Array1<f64>,
    pub rx: Array1<f64>,
}

impl Dataset {
    /// Build a Dataset from the measured columns, deriving the sum, difference and position
    pub fn from_columns(
        time: Array1<f64>,
        channel: Array1<u32>,
        amplitude_a: Array1<f64>,
        amplitude_b: Array1<f64>,
    ) -> Self {
        let ab = &amplitude_a + &amplitude_b;
        let rx = &amplitude_a - &amplitude_b;
        let x = &rx / &ab;
        Self {
            counts: Array1::ones(time.len()),
            x,
            time,
            channel,
            amplitude_a,
            amplitude_b,
            ab,
            rx,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the event at an index
    pub fn get(&self, idx: usize) -> Option<Event> {
        if idx >= self.len() {
            return None;
        }
        Some(Event {
            time: self.time[idx],
            channel: self.channel[idx],
            amplitude_a: self.amplitude_a[idx],
            amplitude_b: self.amplitude_b[idx],
            ab: self.ab[idx],
            rx: self.rx[idx],
            x: self.x[idx],
            counts: self.counts[idx],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        (0..self.len()).filter_map(|idx| self.get(idx))
    }

    /// Make a new Dataset out of the events at the given indices, in that order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            counts: take(&self.counts, indices),
            x: take(&self.x, indices),
            time: take(&self.time, indices),
            channel: take(&self.channel, indices),
            amplitude_a: take(&self.amplitude_a, indices),
            amplitude_b: take(&self.amplitude_b, indices),
            ab: take(&self.ab, indices),
            rx: take(&self.rx, indices),
        }
    }

    /// Keep only the events of one channel.
    ///
    /// With no channel every event is kept. Relative order is preserved and no matches
    /// gives an empty Dataset.
    pub fn filter_channel(&self, channel: Option<u32>) -> Self {
        match channel {
            None => self.clone(),
            Some(target) => {
                let keep: Vec<usize> = self
                    .channel
                    .iter()
                    .enumerate()
                    .filter(|(_, ch)| **ch == target)
                    .map(|(idx, _)| idx)
                    .collect();
                self.select(&keep)
            }
        }
    }

    /// Order the events by ascending time.
    ///
    /// The sort is stable, so events with equal times stay in decode order. When disabled
    /// the Dataset is returned in decode order.
    pub fn sort_by_time(self, enabled: bool) -> Self {
        if !enabled {
            return self;
        }
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| self.time[a].total_cmp(&self.time[b]));
        if order.iter().enumerate().all(|(pos, &idx)| pos == idx) {
            self
        } else {
            self.select(&order)
        }
    }
}
