use crate::data::{Dataset, Penalty, ScheduleResult};
use crate::scheduler::{to_schedule_result, validate, SchedulerError};
use log::debug;
use std::cmp;

// Absolute ceiling on the subset tables; past this the three 2^n tables stop
// fitting in memory no matter what the caller opts into.
pub const MAX_EXACT_JOBS: usize = 24;

pub struct Config {
  pub max_jobs: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self { max_jobs: 20 }
  }
}

// Optimal single-machine weighted-tardiness sequence via dynamic programming
// over job subsets: best_penalty[mask] is the cheapest way to have finished
// exactly the jobs in mask. O(n * 2^n) time, which is why job counts above
// the configured bound are refused rather than attempted.
pub fn find_sequence(dataset: &Dataset, config: &Config) -> Result<ScheduleResult, SchedulerError> {
  validate(dataset)?;
  if dataset.machine_count != 1 {
    return Err(SchedulerError::InvalidInput(format!(
      "weighted tardiness is a single-machine objective, dataset has {} machines",
      dataset.machine_count
    )));
  }

  let job_count = dataset.job_count();
  let limit = cmp::min(config.max_jobs, MAX_EXACT_JOBS);
  if job_count > limit {
    return Err(SchedulerError::Intractable {
      jobs: job_count,
      limit: limit,
    });
  }

  let mut durations = Vec::with_capacity(job_count);
  let mut dues = Vec::with_capacity(job_count);
  let mut weights = Vec::with_capacity(job_count);
  for job in &dataset.jobs {
    let due = job.due_time.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no due time", job.id))
    })?;
    let weight = job.penalty_weight.ok_or_else(|| {
      SchedulerError::InvalidInput(format!("job {} has no penalty weight", job.id))
    })?;
    durations.push(job.execution_time());
    dues.push(due);
    weights.push(weight);
  }

  let full_mask = (1usize << job_count) - 1;

  // On one machine the elapsed time of a scheduled subset is order
  // independent: the sum of its execution times, built up from the lowest
  // set bit of each mask.
  let mut elapsed = vec![0u64; full_mask + 1];
  for mask in 1..=full_mask {
    let lowest = mask.trailing_zeros() as usize;
    elapsed[mask] = elapsed[mask & (mask - 1)] + u64::from(durations[lowest]);
  }

  let mut best_penalty = vec![Penalty::max_value(); full_mask + 1];
  let mut last_job = vec![0usize; full_mask + 1];
  best_penalty[0] = 0;

  // Ascending mask order: every subset is final before anything is relaxed
  // from it. Strict comparison keeps the first minimal transition (lowest
  // source mask, then lowest job index) on ties.
  for mask in 0..=full_mask {
    let accumulated = best_penalty[mask];
    for job in 0..job_count {
      if mask & (1 << job) != 0 {
        continue;
      }
      let next = mask | (1 << job);
      let finish = elapsed[mask] + u64::from(durations[job]);
      let tardiness = finish.saturating_sub(u64::from(dues[job]));
      let candidate = accumulated + tardiness * weights[job];
      if candidate < best_penalty[next] {
        best_penalty[next] = candidate;
        last_job[next] = job;
      }
    }
  }

  // Unwind the recorded last job of each prefix subset, then flip back into
  // schedule order.
  let mut positions = Vec::with_capacity(job_count);
  let mut mask = full_mask;
  while mask != 0 {
    let job = last_job[mask];
    positions.push(job);
    mask &= !(1 << job);
  }
  positions.reverse();

  debug!(
    "exact search over {} subsets found penalty {}",
    full_mask + 1,
    best_penalty[full_mask]
  );

  #[cfg(debug_assertions)]
  {
    let replayed = crate::scheduler::tardiness::total_penalty(dataset, &positions)
      .expect("Verification failed");
    assert_eq!(replayed, best_penalty[full_mask]);
  }

  Ok(to_schedule_result(dataset, &positions, best_penalty[full_mask]))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Job;
  use crate::scheduler::{tardiness, verify_result};
  use itertools::Itertools;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaChaRng;

  fn dataset(jobs: Vec<(u32, u64, u32)>) -> Dataset {
    let jobs = jobs
      .into_iter()
      .enumerate()
      .map(|(index, (execution, weight, due))| Job::weighted(index + 1, execution, weight, due))
      .collect();
    return Dataset::new(1, 1, jobs);
  }

  #[test]
  fn single_job_pays_its_own_tardiness() {
    let late = dataset(vec![(5, 2, 3)]);
    let result = find_sequence(&late, &Config::default()).unwrap();
    assert_eq!(result.sequence, vec![1]);
    assert_eq!(result.objective, 4);

    let early = dataset(vec![(5, 2, 9)]);
    let result = find_sequence(&early, &Config::default()).unwrap();
    assert_eq!(result.objective, 0);
  }

  #[test]
  fn finds_the_unique_optimum_of_a_known_instance() {
    // Optima over all six orders: 10, 5, 18, 17, 8, 15 -> [1, 3, 2] wins
    let dataset = dataset(vec![(2, 3, 1), (3, 1, 4), (1, 2, 3)]);
    let result = find_sequence(&dataset, &Config::default()).unwrap();
    assert_eq!(result.objective, 5);
    assert_eq!(result.sequence, vec![1, 3, 2]);
  }

  #[test]
  fn matches_brute_force_on_small_instances() {
    for seed in 0..4 {
      let mut rng = ChaChaRng::seed_from_u64(seed);
      let jobs = (0..7)
        .map(|_| {
          (
            rng.gen_range(1, 10),
            rng.gen_range(1, 5) as u64,
            rng.gen_range(1, 40),
          )
        })
        .collect();
      let dataset = dataset(jobs);

      let result = find_sequence(&dataset, &Config::default()).unwrap();
      verify_result(&dataset, &result).unwrap();

      let brute_force = (0..dataset.job_count())
        .permutations(dataset.job_count())
        .map(|order| tardiness::total_penalty(&dataset, &order).unwrap())
        .min()
        .unwrap();
      assert_eq!(result.objective, brute_force, "seed {}", seed);

      // The reconstructed sequence must actually evaluate to the DP value
      let positions: Vec<usize> = result.sequence.iter().map(|&id| id - 1).collect();
      assert_eq!(
        tardiness::total_penalty(&dataset, &positions).unwrap(),
        result.objective
      );
    }
  }

  #[test]
  fn ties_keep_the_first_minimal_transition() {
    // Two interchangeable jobs; both orders cost zero, the first relaxation
    // (ascending mask, ascending job index) must win
    let dataset = dataset(vec![(1, 1, 10), (1, 1, 10)]);
    let result = find_sequence(&dataset, &Config::default()).unwrap();
    assert_eq!(result.sequence, vec![1, 2]);
  }

  #[test]
  fn refuses_job_counts_above_the_bound() {
    let dataset = dataset(vec![(1, 1, 1), (2, 1, 1), (3, 1, 1), (4, 1, 1)]);
    let config = Config { max_jobs: 3 };
    match find_sequence(&dataset, &config) {
      Err(SchedulerError::Intractable { jobs, limit }) => {
        assert_eq!(jobs, 4);
        assert_eq!(limit, 3);
      }
      other => panic!("expected Intractable, got {:?}", other),
    }
  }

  #[test]
  fn opting_in_past_the_ceiling_is_still_capped() {
    let config = Config {
      max_jobs: usize::max_value(),
    };
    let jobs = (0..MAX_EXACT_JOBS + 1).map(|_| (1, 1, 1)).collect();
    match find_sequence(&dataset(jobs), &config) {
      Err(SchedulerError::Intractable { limit, .. }) => assert_eq!(limit, MAX_EXACT_JOBS),
      other => panic!("expected Intractable, got {:?}", other),
    }
  }

  #[test]
  fn rejects_jobs_without_penalty_fields() {
    let plain = Dataset::new(1, 1, vec![Job::flow_shop(1, vec![5])]);
    match find_sequence(&plain, &Config::default()) {
      Err(SchedulerError::InvalidInput(_)) => {}
      other => panic!("expected InvalidInput, got {:?}", other),
    }
  }
}
