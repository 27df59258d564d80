use crate::data::{Dataset, ScheduleResult, Time};
use crate::scheduler::makespan::{self, InsertionEvaluator};
use crate::scheduler::{to_schedule_result, validate, SchedulerError};
use itertools::Itertools;
use log::{debug, trace};
use std::cmp::Reverse;

// Nawaz, Enscore, Ham (1983). Jobs enter in order of decreasing total
// processing time; each entering job is tried in every slot of the partial
// sequence and lands in the first slot with the smallest partial makespan.
pub fn find_sequence(dataset: &Dataset) -> Result<ScheduleResult, SchedulerError> {
  validate(dataset)?;

  let mut sequence: Vec<usize> = Vec::with_capacity(dataset.job_count());
  let mut candidate: Vec<usize> = Vec::with_capacity(dataset.job_count());
  for job in seed_order(dataset) {
    let mut best_slot = 0;
    let mut best_cmax = Time::max_value();
    for slot in 0..=sequence.len() {
      candidate.clear();
      candidate.extend_from_slice(&sequence[..slot]);
      candidate.push(job);
      candidate.extend_from_slice(&sequence[slot..]);
      let value = makespan::cmax(dataset, &candidate);
      if value < best_cmax {
        best_cmax = value;
        best_slot = slot;
      }
    }
    sequence.insert(best_slot, job);
    trace!(
      "job {} enters slot {} for a partial makespan of {}",
      dataset.jobs[job].id,
      best_slot,
      best_cmax
    );
  }

  #[cfg(debug_assertions)]
  assert!(crate::scheduler::is_permutation(&sequence, dataset.job_count()));

  let objective = u64::from(makespan::cmax(dataset, &sequence));
  debug!("insertion order reached makespan {}", objective);
  return Ok(to_schedule_result(dataset, &sequence, objective));
}

// Same construction on Taillard's bound: the partial sequence is loaded once
// per entering job and every slot then costs O(machines) instead of a full
// completion-matrix sweep.
pub fn find_sequence_accelerated(dataset: &Dataset) -> Result<ScheduleResult, SchedulerError> {
  let mut evaluator = InsertionEvaluator::new(dataset)?;

  let mut sequence: Vec<usize> = Vec::with_capacity(dataset.job_count());
  for job in seed_order(dataset) {
    evaluator.load(&sequence);
    let mut best_slot = 0;
    let mut best_cmax = Time::max_value();
    for slot in 0..=sequence.len() {
      let value = evaluator.insertion_cmax(job, slot);
      if value < best_cmax {
        best_cmax = value;
        best_slot = slot;
      }
    }
    sequence.insert(best_slot, job);
    trace!(
      "job {} enters slot {} for a partial makespan of {}",
      dataset.jobs[job].id,
      best_slot,
      best_cmax
    );
  }

  #[cfg(debug_assertions)]
  assert!(crate::scheduler::is_permutation(&sequence, dataset.job_count()));

  let objective = u64::from(makespan::cmax(dataset, &sequence));
  debug!("accelerated insertion order reached makespan {}", objective);
  return Ok(to_schedule_result(dataset, &sequence, objective));
}

fn seed_order(dataset: &Dataset) -> Vec<usize> {
  // sorted_by_key is stable, so equal totals keep ascending position order
  return (0..dataset.job_count())
    .sorted_by_key(|&position| Reverse(dataset.jobs[position].total_duration()))
    .collect();
}
