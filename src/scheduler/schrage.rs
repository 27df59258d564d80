use crate::data::{Dataset, ScheduleResult, Time};
use crate::scheduler::{to_schedule_result, validate, SchedulerError};
use itertools::Itertools;
use log::debug;
use std::cmp::{self, Reverse};
use std::collections::BinaryHeap;

// Schrage's rule for single-machine scheduling with release and delivery
// times: whenever the machine frees up, run the released job with the
// longest delivery tail. The objective is the latest delivered completion.
pub fn find_sequence(dataset: &Dataset) -> Result<ScheduleResult, SchedulerError> {
  validate(dataset)?;
  if dataset.machine_count != 1 {
    return Err(SchedulerError::InvalidInput(format!(
      "delivery scheduling is a single-machine model, dataset has {} machines",
      dataset.machine_count
    )));
  }

  let job_count = dataset.job_count();
  let mut preparations = Vec::with_capacity(job_count);
  let mut executions = Vec::with_capacity(job_count);
  let mut deliveries = Vec::with_capacity(job_count);
  for job in &dataset.jobs {
    let preparation = job.preparation_time.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no preparation time", job.id))
    })?;
    let delivery = job.delivery_time.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no delivery time", job.id))
    })?;
    preparations.push(preparation);
    executions.push(job.execution_time());
    deliveries.push(delivery);
  }

  // Jobs in release order; ties fall back to position for a stable scan
  let by_release: Vec<usize> = (0..job_count)
    .sorted_by_key(|&position| (preparations[position], position))
    .collect();

  // Max-heap on the delivery tail; equal tails pop the lowest position first
  let mut ready: BinaryHeap<(Time, Reverse<usize>)> = BinaryHeap::new();
  let mut sequence = Vec::with_capacity(job_count);
  let mut released = 0;
  let mut clock: u64 = 0;
  let mut objective: u64 = 0;

  while sequence.len() < job_count {
    while released < by_release.len() && u64::from(preparations[by_release[released]]) <= clock {
      let position = by_release[released];
      ready.push((deliveries[position], Reverse(position)));
      released += 1;
    }
    match ready.pop() {
      Some((delivery, Reverse(position))) => {
        sequence.push(position);
        clock += u64::from(executions[position]);
        objective = cmp::max(objective, clock + u64::from(delivery));
      }
      None => {
        // Nothing released yet, the machine idles until the next release
        clock = u64::from(preparations[by_release[released]]);
      }
    }
  }

  #[cfg(debug_assertions)]
  assert!(crate::scheduler::is_permutation(&sequence, job_count));

  debug!("delivery schedule completes at {}", objective);
  return Ok(to_schedule_result(dataset, &sequence, objective));
}
