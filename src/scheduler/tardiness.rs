use crate::data::{Dataset, Penalty};
use crate::scheduler::{validate, SchedulerError};

// Weighted tardiness of each scheduled job, in sequence order: the finish
// time accumulates execution times on the single machine, and a job past its
// due time pays (finish - due) * weight.
pub fn penalties(dataset: &Dataset, sequence: &[usize]) -> Result<Vec<Penalty>, SchedulerError> {
  validate(dataset)?;
  if dataset.machine_count != 1 {
    return Err(SchedulerError::InvalidInput(format!(
      "weighted tardiness is a single-machine objective, dataset has {} machines",
      dataset.machine_count
    )));
  }

  let mut finish: u64 = 0;
  let mut penalties = Vec::with_capacity(sequence.len());

  for &position in sequence {
    let job = &dataset.jobs[position];
    let due = job.due_time.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no due time", job.id))
    })?;
    let weight = job.penalty_weight.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no penalty weight", job.id))
    })?;

    finish += u64::from(job.execution_time());
    let tardiness = finish.saturating_sub(u64::from(due));
    penalties.push(tardiness * weight);
  }

  Ok(penalties)
}

pub fn total_penalty(dataset: &Dataset, sequence: &[usize]) -> Result<Penalty, SchedulerError> {
  let penalties = penalties(dataset, sequence)?;
  Ok(penalties.into_iter().sum())
}
