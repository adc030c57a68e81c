/// Arrival times of the customers that entered the system during one
/// replication, in arrival order.
///
/// Customers are handed to servers in FIFO order by index; the most recent
/// entry can be retracted when that customer balks.
#[derive(Debug, Clone, Default)]
pub struct ArrivalRecord {
    times: Vec<f64>,
}

impl ArrivalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64) {
        // a gap that underflows the clock repeats the previous time
        debug_assert!(self.times.last().map_or(true, |&last| time >= last));
        self.times.push(time);
    }

    /// Arrival time of the `index`-th admitted customer.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.times.get(index).copied()
    }

    /// Removes the latest arrival and returns its time.
    pub fn retract_latest(&mut self) -> Option<f64> {
        self.times.pop()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
