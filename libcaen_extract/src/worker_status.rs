/// Progress message sent from an extraction worker to whoever is displaying progress
#[derive(Debug, Clone, Default)]
pub struct WorkerStatus {
    pub progress: f32,
    pub channel: u32,
    pub worker_id: usize,
}

impl WorkerStatus {
    pub fn new(progress: f32, channel: u32, worker_id: usize) -> Self {
        Self {
            progress,
            channel,
            worker_id,
        }
    }
}
