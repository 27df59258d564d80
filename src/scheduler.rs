pub mod exact_tardiness;
pub mod makespan;
pub mod neh;
pub mod schrage;
pub mod simulated_annealing;
pub mod tardiness;

use crate::data::{Dataset, ScheduleResult};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
  InvalidInput(String),
  Intractable { jobs: usize, limit: usize },
  InvalidConfiguration(String),
}

impl fmt::Display for SchedulerError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      SchedulerError::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
      SchedulerError::Intractable { jobs, limit } => write!(
        f,
        "{} jobs exceed the exact-search limit of {} jobs",
        jobs, limit
      ),
      SchedulerError::InvalidConfiguration(reason) => {
        write!(f, "invalid configuration: {}", reason)
      }
    }
  }
}

impl Error for SchedulerError {}

// Common dataset invariants, checked before any algorithm runs. Schedulers
// with extra per-variant requirements layer their own checks on top.
pub fn validate(dataset: &Dataset) -> Result<(), SchedulerError> {
  if dataset.jobs.is_empty() {
    return Err(SchedulerError::InvalidInput(
      "dataset contains no jobs".to_string(),
    ));
  }

  if dataset.machine_count == 0 {
    return Err(SchedulerError::InvalidInput(
      "dataset has no machines".to_string(),
    ));
  }

  for job in &dataset.jobs {
    if job.durations.len() != dataset.machine_count {
      return Err(SchedulerError::InvalidInput(format!(
        "job {} has {} durations but the dataset has {} machines",
        job.id,
        job.durations.len(),
        dataset.machine_count
      )));
    }
  }

  Ok(())
}

// Check:
// 1. Sequence length matches the dataset
// 2. Every scheduled id belongs to the dataset
// 3. No id is scheduled twice
pub fn verify_result(dataset: &Dataset, result: &ScheduleResult) -> Result<(), Box<dyn Error>> {
  if result.sequence.len() != dataset.job_count() {
    Err(format!(
      "Sequence has {} entries but the dataset has {} jobs",
      result.sequence.len(),
      dataset.job_count()
    ))?;
  }

  let mut seen = vec![false; dataset.job_count()];
  for &id in &result.sequence {
    let position = dataset
      .jobs
      .iter()
      .position(|job| job.id == id)
      .ok_or_else(|| format!("Sequence contains unknown job id {}", id))?;

    if seen[position] {
      Err(format!("Job {} is scheduled more than once", id))?;
    }
    seen[position] = true;
  }

  Ok(())
}

pub fn to_schedule_result(dataset: &Dataset, positions: &[usize], objective: u64) -> ScheduleResult {
  let sequence = positions
    .iter()
    .map(|&position| dataset.jobs[position].id)
    .collect();

  return ScheduleResult {
    sequence: sequence,
    objective: objective,
  };
}

pub fn is_permutation(positions: &[usize], job_count: usize) -> bool {
  if positions.len() != job_count {
    return false;
  }

  let mut seen = vec![false; job_count];
  for &position in positions {
    if position >= job_count || seen[position] {
      return false;
    }
    seen[position] = true;
  }

  return true;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Job;

  fn dataset(durations: Vec<Vec<u32>>, machine_count: usize) -> Dataset {
    let jobs = durations
      .into_iter()
      .enumerate()
      .map(|(index, row)| Job::flow_shop(index + 1, row))
      .collect();
    return Dataset::new(1, machine_count, jobs);
  }

  #[test]
  fn validate_accepts_well_formed_dataset() {
    let dataset = dataset(vec![vec![3, 2], vec![1, 4]], 2);
    assert!(validate(&dataset).is_ok());
  }

  #[test]
  fn validate_rejects_empty_dataset() {
    let dataset = Dataset::new(1, 2, Vec::new());
    match validate(&dataset) {
      Err(SchedulerError::InvalidInput(_)) => {}
      other => panic!("expected InvalidInput, got {:?}", other),
    }
  }

  #[test]
  fn validate_rejects_ragged_durations() {
    let dataset = dataset(vec![vec![3, 2], vec![1]], 2);
    match validate(&dataset) {
      Err(SchedulerError::InvalidInput(reason)) => assert!(reason.contains("job 2")),
      other => panic!("expected InvalidInput, got {:?}", other),
    }
  }

  #[test]
  fn verify_result_accepts_permutation() {
    let dataset = dataset(vec![vec![1], vec![2], vec![3]], 1);
    let result = ScheduleResult {
      sequence: vec![2, 3, 1],
      objective: 0,
    };
    assert!(verify_result(&dataset, &result).is_ok());
  }

  #[test]
  fn verify_result_rejects_duplicates_and_unknown_ids() {
    let dataset = dataset(vec![vec![1], vec![2]], 1);

    let duplicated = ScheduleResult {
      sequence: vec![1, 1],
      objective: 0,
    };
    assert!(verify_result(&dataset, &duplicated).is_err());

    let unknown = ScheduleResult {
      sequence: vec![1, 7],
      objective: 0,
    };
    assert!(verify_result(&dataset, &unknown).is_err());

    let short = ScheduleResult {
      sequence: vec![1],
      objective: 0,
    };
    assert!(verify_result(&dataset, &short).is_err());
  }

  #[test]
  fn is_permutation_checks_positions() {
    assert!(is_permutation(&[2, 0, 1], 3));
    assert!(!is_permutation(&[0, 0, 1], 3));
    assert!(!is_permutation(&[0, 1], 3));
    assert!(!is_permutation(&[0, 3, 1], 3));
  }
}
