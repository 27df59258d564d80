pub type JobId = usize;
pub type Time = u32;
pub type Penalty = u64;

#[derive(Debug, Clone)]
pub struct Job {
  pub id: JobId,

  pub durations: Vec<Time>,

  // Variant fields; present depending on the problem family the dataset
  // was loaded for (see parser).
  pub preparation_time: Option<Time>,
  pub delivery_time: Option<Time>,
  pub penalty_weight: Option<Penalty>,
  pub due_time: Option<Time>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
  pub id: usize,
  pub machine_count: usize,
  pub jobs: Vec<Job>,
  pub reference: Option<ReferenceResult>,
}

// Known-good objective and sequence shipped with a dataset; used for
// comparison only, never fed into a scheduler.
#[derive(Debug, Clone)]
pub struct ReferenceResult {
  pub objective: u64,
  pub sequence: Vec<JobId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleResult {
  pub sequence: Vec<JobId>,
  pub objective: u64,
}

impl Job {
  pub fn flow_shop(id: JobId, durations: Vec<Time>) -> Self {
    Self {
      id: id,
      durations: durations,
      preparation_time: None,
      delivery_time: None,
      penalty_weight: None,
      due_time: None,
    }
  }

  pub fn weighted(id: JobId, execution_time: Time, penalty_weight: Penalty, due_time: Time) -> Self {
    Self {
      id: id,
      durations: vec![execution_time],
      preparation_time: None,
      delivery_time: None,
      penalty_weight: Some(penalty_weight),
      due_time: Some(due_time),
    }
  }

  pub fn delivered(id: JobId, preparation_time: Time, execution_time: Time, delivery_time: Time) -> Self {
    Self {
      id: id,
      durations: vec![execution_time],
      preparation_time: Some(preparation_time),
      delivery_time: Some(delivery_time),
      penalty_weight: None,
      due_time: None,
    }
  }

  // Processing time on the single machine of one-machine variants.
  pub fn execution_time(&self) -> Time {
    return self.durations[0];
  }

  pub fn total_duration(&self) -> Time {
    return self.durations.iter().sum();
  }
}

impl Dataset {
  pub fn new(id: usize, machine_count: usize, jobs: Vec<Job>) -> Self {
    Self {
      id: id,
      machine_count: machine_count,
      jobs: jobs,
      reference: None,
    }
  }

  pub fn job_count(&self) -> usize {
    return self.jobs.len();
  }
}
