use fxhash::FxHashMap;
use std::path::Path;
use std::sync::mpsc::Sender;

use super::config::Config;
use super::dataset::Dataset;
use super::error::ProcessorError;
use super::extractor::{decode_file, extract_channel, ChannelSummary, OutputTarget};
use super::worker_status::WorkerStatus;

/// Extract a subset of the requested channels.
///
/// Sends a status before each channel and once the subset is complete.
pub fn process_subset(
    dataset: &Dataset,
    sort: bool,
    target: &OutputTarget,
    subset: &[u32],
    tx: &Sender<WorkerStatus>,
    worker_id: usize,
) -> Result<Vec<ChannelSummary>, ProcessorError> {
    let mut summaries = Vec::with_capacity(subset.len());
    for (idx, channel) in subset.iter().enumerate() {
        tx.send(WorkerStatus::new(
            idx as f32 / subset.len() as f32,
            *channel,
            worker_id,
        ))?;
        summaries.push(extract_channel(
            dataset,
            *channel,
            sort,
            &target.channel_path(*channel),
        )?);
    }
    if let Some(last) = subset.last() {
        tx.send(WorkerStatus::new(1.0, *last, worker_id))?;
    }
    Ok(summaries)
}

/// Divide the requested channels into a set of subsets (per thread/worker)
///
/// Channels are dealt out round-robin in request order. A channel requested more than once
/// always goes to the worker that got it first, so no output file is written by two
/// workers at the same time.
pub fn create_subsets(channels: &[u32], n_threads: usize) -> Vec<Vec<u32>> {
    let mut subsets: Vec<Vec<u32>> = vec![Vec::new(); n_threads.max(1)];
    let n_subsets = subsets.len();
    let mut owners: FxHashMap<u32, usize> = FxHashMap::default();

    for channel in channels {
        let next = owners.len() % n_subsets;
        let owner = *owners.entry(*channel).or_insert(next);
        subsets[owner].push(*channel);
    }

    subsets
}

/// The main loop of caen_extract.
///
/// Decodes the file once, then hands the requested channels out to `n_threads` workers.
/// Summaries come back in request order, the same as [`extract`](super::extractor::extract).
pub fn process(
    input: &Path,
    config: &Config,
    tx: Sender<WorkerStatus>,
) -> Result<Vec<ChannelSummary>, ProcessorError> {
    config.validate()?;
    let target = OutputTarget::new(input, config.output.as_deref(), &config.extension);
    let dataset = decode_file(input, config)?;
    let requested = config.channels.channels();
    let subsets = create_subsets(requested, config.n_threads as usize);

    let results: Vec<Result<Vec<ChannelSummary>, ProcessorError>> = std::thread::scope(|s| {
        let handles: Vec<_> = subsets
            .iter()
            .enumerate()
            .filter(|(_, subset)| !subset.is_empty())
            .map(|(worker_id, subset)| {
                let tx = tx.clone();
                let dataset = &dataset;
                let target = &target;
                let handle = s.spawn(move || {
                    process_subset(dataset, config.sort, target, subset, &tx, worker_id)
                });
                (worker_id, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(worker_id, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(ProcessorError::WorkerPanic(worker_id)))
            })
            .collect()
    });

    let mut by_channel: FxHashMap<u32, ChannelSummary> = FxHashMap::default();
    for result in results {
        for summary in result? {
            by_channel.insert(summary.channel, summary);
        }
    }

    Ok(requested
        .iter()
        .filter_map(|channel| by_channel.get(channel).cloned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subsets() {
        let subsets = create_subsets(&[0, 1, 2, 3, 4], 2);
        assert_eq!(subsets, vec![vec![0, 2, 4], vec![1, 3]]);

        let subsets = create_subsets(&[5, 6], 4);
        assert_eq!(subsets, vec![vec![5], vec![6], vec![], vec![]]);
    }

    #[test]
    fn test_create_subsets_keeps_duplicates_together() {
        let subsets = create_subsets(&[3, 4, 3, 5, 4], 2);
        assert_eq!(subsets, vec![vec![3, 3, 5], vec![4, 4]]);
    }

    #[test]
    fn test_create_subsets_zero_threads() {
        let subsets = create_subsets(&[1, 2], 0);
        assert_eq!(subsets, vec![vec![1, 2]]);
    }
}
