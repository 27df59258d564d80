use crate::data::{Dataset, Time};
use crate::scheduler::{validate, SchedulerError};
use ndarray::{s, Array1, Array2, ArrayView2};
use std::cmp;

// Completion of the last scheduled job on the last machine under the
// permutation flow-shop recurrence
//   completion[pos][m] = duration + max(completion[pos - 1][m], completion[pos][m - 1])
// with zero boundaries. Full recomputation, O(len * machines).
//
// `sequence` holds positions into `dataset.jobs` and may be a partial
// permutation; the dataset is assumed to be validated.
pub fn cmax(dataset: &Dataset, sequence: &[usize]) -> Time {
  let machine_count = dataset.machine_count;
  let mut last_completion = Array1::<Time>::from_elem(machine_count, 0);

  for &position in sequence {
    let job = &dataset.jobs[position];
    let mut completion = 0;
    for machine in 0..machine_count {
      completion = cmp::max(completion, last_completion[machine]) + job.durations[machine];
      last_completion[machine] = completion;
    }
  }

  return last_completion[machine_count - 1];
}

// The whole (positions x machines) completion table for a candidate sequence.
pub fn completion_matrix(dataset: &Dataset, sequence: &[usize]) -> Array2<Time> {
  let machine_count = dataset.machine_count;
  let mut completion = Array2::<Time>::zeros((sequence.len(), machine_count));

  for (row, &position) in sequence.iter().enumerate() {
    let job = &dataset.jobs[position];
    for machine in 0..machine_count {
      let previous_row = if row == 0 {
        0
      } else {
        completion[[row - 1, machine]]
      };
      let previous_machine = if machine == 0 {
        0
      } else {
        completion[[row, machine - 1]]
      };
      completion[[row, machine]] = cmp::max(previous_row, previous_machine) + job.durations[machine];
    }
  }

  return completion;
}

// Incremental insertion oracle over a fixed partial sequence.
//
// `forward[i][j]` is the completion time of the i-th scheduled job on machine
// j; `backward[i][j]` is the time between the start of the i-th job on
// machine j and the end of the whole partial schedule, obtained by running
// the completion recurrence with positions and machines both walked from the
// end (Taillard's acceleration for insertion heuristics). Evaluating one
// insertion slot then costs O(machines) instead of a full recomputation.
pub struct InsertionEvaluator<'a> {
  dataset: &'a Dataset,
  forward: Array2<Time>,
  backward: Array2<Time>,
  length: usize,
}

impl<'a> InsertionEvaluator<'a> {
  pub fn new(dataset: &'a Dataset) -> Result<Self, SchedulerError> {
    validate(dataset)?;

    let shape = (dataset.job_count(), dataset.machine_count);
    Ok(Self {
      dataset: dataset,
      forward: Array2::zeros(shape),
      backward: Array2::zeros(shape),
      length: 0,
    })
  }

  // Rebuild both matrices for this partial sequence, O(len * machines).
  pub fn load(&mut self, sequence: &[usize]) {
    let machine_count = self.dataset.machine_count;
    self.length = sequence.len();

    for (row, &position) in sequence.iter().enumerate() {
      let job = &self.dataset.jobs[position];
      for machine in 0..machine_count {
        let previous_row = if row == 0 {
          0
        } else {
          self.forward[[row - 1, machine]]
        };
        let previous_machine = if machine == 0 {
          0
        } else {
          self.forward[[row, machine - 1]]
        };
        self.forward[[row, machine]] =
          cmp::max(previous_row, previous_machine) + job.durations[machine];
      }
    }

    for (row, &position) in sequence.iter().enumerate().rev() {
      let job = &self.dataset.jobs[position];
      for machine in (0..machine_count).rev() {
        let next_row = if row + 1 == self.length {
          0
        } else {
          self.backward[[row + 1, machine]]
        };
        let next_machine = if machine + 1 == machine_count {
          0
        } else {
          self.backward[[row, machine + 1]]
        };
        self.backward[[row, machine]] =
          cmp::max(next_row, next_machine) + job.durations[machine];
      }
    }
  }

  // Makespan of the loaded partial sequence with `job` inserted at `slot`
  // (0..=len), in O(machines): run the inserted job over the forward prefix
  // and take the maximum over machines of its completion plus the tail.
  pub fn insertion_cmax(&self, job: usize, slot: usize) -> Time {
    let durations = &self.dataset.jobs[job].durations;
    let machine_count = self.dataset.machine_count;

    let mut running = 0;
    let mut makespan = 0;
    for machine in 0..machine_count {
      let prefix = if slot == 0 {
        0
      } else {
        self.forward[[slot - 1, machine]]
      };
      running = cmp::max(running, prefix) + durations[machine];

      let tail = if slot == self.length {
        0
      } else {
        self.backward[[slot, machine]]
      };
      makespan = cmp::max(makespan, running + tail);
    }

    return makespan;
  }

  pub fn forward(&self) -> ArrayView2<Time> {
    return self.forward.slice(s![..self.length, ..]);
  }

  pub fn backward(&self) -> ArrayView2<Time> {
    return self.backward.slice(s![..self.length, ..]);
  }
}
