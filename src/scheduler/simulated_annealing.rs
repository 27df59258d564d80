use crate::data::{Dataset, ScheduleResult, Time};
use crate::scheduler::makespan;
use crate::scheduler::{to_schedule_result, validate, SchedulerError};
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use std::cmp;

pub struct Config {
  pub cycles: u64,
  pub initial_temperature: f64,
  pub cooling_factor: f64,
  pub seed: u64,
  pub track_best: bool,
}

// Simulated annealing over permutations with a swap neighborhood. Starts
// from the identity sequence, cools geometrically after every cycle and
// returns the sequence the walk ends on; `track_best` switches the return
// to the best sequence ever accepted instead.
pub fn find_sequence(dataset: &Dataset, config: &Config) -> Result<ScheduleResult, SchedulerError> {
  validate(dataset)?;
  validate_config(config)?;
  let job_count = dataset.job_count();
  if job_count < 2 && config.cycles > 0 {
    return Err(SchedulerError::InvalidInput(format!(
      "a swap neighborhood needs at least two jobs, dataset has {}",
      job_count
    )));
  }

  let mut rng = ChaChaRng::seed_from_u64(config.seed);

  let mut current: Vec<usize> = (0..job_count).collect();
  let mut current_cmax = makespan::cmax(dataset, &current);
  let mut best = current.clone();
  let mut best_cmax = current_cmax;
  let mut temperature = config.initial_temperature;

  info!(
    "annealing from makespan {} at temperature {}",
    current_cmax, temperature
  );

  for cycle in 0..config.cycles {
    let (first, second) = swapped_positions(job_count, &mut rng);
    current.swap(first, second);
    let candidate_cmax = makespan::cmax(dataset, &current);
    let delta = i64::from(candidate_cmax) - i64::from(current_cmax);

    // Downhill moves pass unconditionally, uphill moves pass with the
    // Metropolis probability. The draw lies in [0, 1), so a zero delta is
    // always taken.
    if delta < 0 || rng.gen_range(0.0, 1.0) < (-(delta as f64) / temperature).exp() {
      current_cmax = candidate_cmax;
      if config.track_best && current_cmax < best_cmax {
        best.copy_from_slice(&current);
        best_cmax = current_cmax;
      }
      trace!(
        "cycle {} accepts delta {} at temperature {}",
        cycle, delta, temperature
      );
      #[cfg(debug_assertions)]
      assert!(crate::scheduler::is_permutation(&current, job_count));
    } else {
      current.swap(first, second);
      trace!(
        "cycle {} rejects delta {} at temperature {}",
        cycle, delta, temperature
      );
    }

    temperature *= config.cooling_factor;
  }

  let (sequence, objective) = if config.track_best {
    (best, best_cmax)
  } else {
    (current, current_cmax)
  };
  debug!(
    "annealing finished at makespan {} after {} cycles",
    objective, config.cycles
  );
  return Ok(to_schedule_result(dataset, &sequence, u64::from(objective)));
}

// Probes the makespan landscape with random swap neighbors of the identity
// sequence. Every probe is diffed against the makespan of the previous one,
// and the smallest observed delta is floored to 1 so the derived final
// temperature stays positive.
pub fn sample_delta_extremes<R: Rng>(
  dataset: &Dataset,
  alterations: u64,
  rng: &mut R,
) -> Result<(Time, Time), SchedulerError> {
  validate(dataset)?;
  if dataset.job_count() < 2 {
    return Err(SchedulerError::InvalidInput(format!(
      "a swap neighborhood needs at least two jobs, dataset has {}",
      dataset.job_count()
    )));
  }
  if alterations == 0 {
    return Err(SchedulerError::InvalidConfiguration(
      "at least one alteration is needed to probe makespan deltas".to_string(),
    ));
  }

  let job_count = dataset.job_count();
  let identity: Vec<usize> = (0..job_count).collect();
  let mut scratch = identity.clone();
  let mut current_cmax = makespan::cmax(dataset, &identity);
  let mut max_delta: Time = 0;
  let mut min_delta = Time::max_value();

  for _ in 0..alterations {
    let (first, second) = swapped_positions(job_count, rng);
    scratch.swap(first, second);
    let next_cmax = makespan::cmax(dataset, &scratch);
    scratch.swap(first, second);

    let delta = if next_cmax > current_cmax {
      next_cmax - current_cmax
    } else {
      current_cmax - next_cmax
    };
    max_delta = cmp::max(max_delta, delta);
    min_delta = cmp::min(min_delta, delta);
    current_cmax = next_cmax;
  }

  return Ok((max_delta, cmp::max(min_delta, 1)));
}

// Initial temperature accepts the largest observed uphill step with
// probability 0.9, the final temperature accepts the smallest one with
// probability 0.1.
pub fn derive_temperatures(max_delta: Time, min_delta: Time) -> Result<(f64, f64), SchedulerError> {
  if max_delta == 0 || min_delta == 0 {
    return Err(SchedulerError::InvalidConfiguration(
      "makespan deltas must be positive to derive temperatures".to_string(),
    ));
  }
  let initial = -f64::from(max_delta) / 0.9f64.ln();
  let final_temperature = -f64::from(min_delta) / 0.1f64.ln();
  return Ok((initial, final_temperature));
}

// Geometric factor that cools from the initial to the final temperature in
// exactly the given number of cycles.
pub fn derive_cooling_factor(
  initial_temperature: f64,
  final_temperature: f64,
  cycles: u64,
) -> Result<f64, SchedulerError> {
  if cycles == 0 {
    return Err(SchedulerError::InvalidConfiguration(
      "cooling needs at least one cycle".to_string(),
    ));
  }
  if !initial_temperature.is_finite()
    || !final_temperature.is_finite()
    || initial_temperature <= 0.0
    || final_temperature <= 0.0
  {
    return Err(SchedulerError::InvalidConfiguration(format!(
      "temperatures must be positive and finite, got {} and {}",
      initial_temperature, final_temperature
    )));
  }
  return Ok((final_temperature / initial_temperature).powf(1.0 / cycles as f64));
}

fn validate_config(config: &Config) -> Result<(), SchedulerError> {
  if !config.initial_temperature.is_finite() || config.initial_temperature <= 0.0 {
    return Err(SchedulerError::InvalidConfiguration(format!(
      "initial temperature must be positive and finite, got {}",
      config.initial_temperature
    )));
  }
  if !config.cooling_factor.is_finite()
    || config.cooling_factor <= 0.0
    || config.cooling_factor >= 1.0
  {
    return Err(SchedulerError::InvalidConfiguration(format!(
      "cooling factor must lie strictly between 0 and 1, got {}",
      config.cooling_factor
    )));
  }
  return Ok(());
}

fn swapped_positions<R: Rng>(job_count: usize, rng: &mut R) -> (usize, usize) {
  let first = rng.gen_range(0, job_count);
  let mut second = rng.gen_range(0, job_count);
  while second == first {
    second = rng.gen_range(0, job_count);
  }
  return (first, second);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Job;
  use crate::scheduler::verify_result;

  fn dataset(durations: Vec<Vec<Time>>, machine_count: usize) -> Dataset {
    let jobs = durations
      .into_iter()
      .enumerate()
      .map(|(index, durations)| Job::flow_shop(index + 1, durations))
      .collect();
    return Dataset::new(1, machine_count, jobs);
  }

  fn random_dataset(job_count: usize, machine_count: usize, seed: u64) -> Dataset {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let durations = (0..job_count)
      .map(|_| (0..machine_count).map(|_| rng.gen_range(1, 21)).collect())
      .collect();
    return dataset(durations, machine_count);
  }

  fn config(cycles: u64, seed: u64) -> Config {
    return Config {
      cycles: cycles,
      initial_temperature: 50.0,
      cooling_factor: 0.999,
      seed: seed,
      track_best: false,
    };
  }

  #[test]
  fn zero_cycles_returns_the_identity_sequence() {
    let dataset = dataset(vec![vec![3, 2], vec![1, 4], vec![5, 1]], 2);
    let result = find_sequence(&dataset, &config(0, 7)).unwrap();
    assert_eq!(result.sequence, vec![1, 2, 3]);
    assert_eq!(result.objective, 10);
  }

  #[test]
  fn equal_seeds_reproduce_the_same_walk() {
    let dataset = random_dataset(8, 3, 11);
    let first = find_sequence(&dataset, &config(500, 42)).unwrap();
    let second = find_sequence(&dataset, &config(500, 42)).unwrap();
    assert_eq!(first, second);
    verify_result(&dataset, &first).unwrap();
  }

  #[test]
  fn tracking_the_best_never_ends_worse() {
    let dataset = random_dataset(10, 4, 3);
    let faithful = find_sequence(&dataset, &config(2000, 5)).unwrap();
    let mut tracked_config = config(2000, 5);
    tracked_config.track_best = true;
    let tracked = find_sequence(&dataset, &tracked_config).unwrap();

    // Same seed, same walk; the tracked run can only keep a better point of it
    assert!(tracked.objective <= faithful.objective);
    let identity: Vec<usize> = (0..dataset.job_count()).collect();
    assert!(tracked.objective <= u64::from(makespan::cmax(&dataset, &identity)));
    verify_result(&dataset, &tracked).unwrap();
  }

  #[test]
  fn derives_the_textbook_temperatures() {
    let (initial, final_temperature) = derive_temperatures(10, 2).unwrap();
    assert!((initial - 94.91221581029954).abs() < 1e-9);
    assert!((final_temperature - 0.86858896380650366).abs() < 1e-9);
  }

  #[test]
  fn cooling_factor_connects_the_two_temperatures() {
    let (initial, final_temperature) = derive_temperatures(10, 2).unwrap();
    let factor = derive_cooling_factor(initial, final_temperature, 1000).unwrap();
    assert!(factor > 0.0 && factor < 1.0);
    assert!((initial * factor.powf(1000.0) - final_temperature).abs() < 1e-6);
  }

  #[test]
  fn flat_landscapes_cannot_be_calibrated() {
    // Identical jobs: every swap keeps the makespan, so the largest delta
    // stays zero and no temperature can be derived from it
    let dataset = dataset(vec![vec![5], vec![5], vec![5]], 1);
    let mut rng = ChaChaRng::seed_from_u64(1);
    let (max_delta, min_delta) = sample_delta_extremes(&dataset, 50, &mut rng).unwrap();
    assert_eq!(max_delta, 0);
    assert_eq!(min_delta, 1);
    assert!(derive_temperatures(max_delta, min_delta).is_err());
  }

  #[test]
  fn rejects_invalid_configurations() {
    let dataset = dataset(vec![vec![3, 2], vec![1, 4]], 2);
    for (temperature, factor) in vec![
      (0.0, 0.5),
      (-3.0, 0.5),
      (f64::NAN, 0.5),
      (50.0, 0.0),
      (50.0, 1.0),
      (50.0, 1.5),
    ] {
      let broken = Config {
        cycles: 10,
        initial_temperature: temperature,
        cooling_factor: factor,
        seed: 1,
        track_best: false,
      };
      match find_sequence(&dataset, &broken) {
        Err(SchedulerError::InvalidConfiguration(_)) => {}
        other => panic!("expected InvalidConfiguration, got {:?}", other),
      }
    }
  }

  #[test]
  fn a_single_job_cannot_be_swapped() {
    let dataset = dataset(vec![vec![3, 2]], 2);
    match find_sequence(&dataset, &config(10, 1)) {
      Err(SchedulerError::InvalidInput(_)) => {}
      other => panic!("expected InvalidInput, got {:?}", other),
    }
    assert!(find_sequence(&dataset, &config(0, 1)).is_ok());
  }
}
