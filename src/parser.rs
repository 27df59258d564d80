use crate::data::{Dataset, Job, JobId, Penalty, ReferenceResult, Time};
use itertools::Itertools;
use std::error::Error;

// Flow-shop files hold a series of datasets, each tagged "data.XXX:". A
// header line carries the job and machine counts, one duration row follows
// per job, and a "neh:" tag opens the reference makespan and sequence.
// Datasets are numbered by their order in the file.
pub fn parse_flow_shop_datasets(content: &str) -> Result<Vec<Dataset>, Box<dyn Error>> {
  let lines: Vec<&str> = content.lines().collect();
  let mut datasets = Vec::new();
  let mut cursor = 0;

  while cursor < lines.len() {
    if !lines[cursor].contains("data.") {
      cursor += 1;
      continue;
    }
    cursor += 1;

    let header: Vec<&str> = next_line(&lines, &mut cursor)
      .ok_or("Dataset header missing")?
      .split_whitespace()
      .collect();
    let job_count: usize = header.get(0).ok_or("Job count missing")?.parse()?;
    let machine_count: usize = header.get(1).ok_or("Machine count missing")?.parse()?;

    let mut jobs = Vec::with_capacity(job_count);
    for job in 0..job_count {
      let row = next_line(&lines, &mut cursor).ok_or("Duration row missing")?;
      let mut durations = Vec::with_capacity(machine_count);
      for item in row.split_whitespace() {
        durations.push(item.parse::<Time>()?);
      }
      if durations.len() != machine_count {
        Err(format!(
          "Job {} has {} durations, expected {}",
          job + 1,
          durations.len(),
          machine_count
        ))?;
      }
      jobs.push(Job::flow_shop(job + 1, durations));
    }

    let reference = parse_reference(&lines, &mut cursor, "neh:")?;
    let mut dataset = Dataset::new(datasets.len() + 1, machine_count, jobs);
    dataset.reference = Some(reference);
    datasets.push(dataset);
  }

  Ok(datasets)
}

// Weighted-tardiness files carry the dataset id in the tag itself
// ("data.3:"), a job count, one "execution weight due" row per job and an
// "opt:" reference block.
pub fn parse_tardiness_datasets(content: &str) -> Result<Vec<Dataset>, Box<dyn Error>> {
  let lines: Vec<&str> = content.lines().collect();
  let mut datasets = Vec::new();
  let mut cursor = 0;

  while cursor < lines.len() {
    if !lines[cursor].contains("data.") {
      cursor += 1;
      continue;
    }
    let id = parse_dataset_id(lines[cursor], datasets.len() + 1);
    cursor += 1;

    let job_count: usize = next_line(&lines, &mut cursor)
      .ok_or("Job count missing")?
      .split_whitespace()
      .next()
      .ok_or("Job count missing")?
      .parse()?;

    let mut jobs = Vec::with_capacity(job_count);
    for job in 0..job_count {
      let items: Vec<&str> = next_line(&lines, &mut cursor)
        .ok_or("Task row missing")?
        .split_whitespace()
        .collect();
      let execution: Time = items.get(0).ok_or("Execution time missing")?.parse()?;
      let weight: Penalty = items.get(1).ok_or("Penalty weight missing")?.parse()?;
      let due: Time = items.get(2).ok_or("Due time missing")?.parse()?;
      jobs.push(Job::weighted(job + 1, execution, weight, due));
    }

    let reference = parse_reference(&lines, &mut cursor, "opt:")?;
    let mut dataset = Dataset::new(id, 1, jobs);
    dataset.reference = Some(reference);
    datasets.push(dataset);
  }

  Ok(datasets)
}

// Delivery files hold a single dataset: a job count followed by one
// "preparation execution delivery" row per job, with no reference block.
pub fn parse_delivery_dataset(content: &str) -> Result<Dataset, Box<dyn Error>> {
  let mut items = content.split_whitespace();
  let job_count: usize = items.next().ok_or("Job count missing")?.parse()?;

  let mut jobs = Vec::with_capacity(job_count);
  for job in 0..job_count {
    let preparation: Time = items.next().ok_or("Preparation time missing")?.parse()?;
    let execution: Time = items.next().ok_or("Execution time missing")?.parse()?;
    let delivery: Time = items.next().ok_or("Delivery time missing")?.parse()?;
    jobs.push(Job::delivered(job + 1, preparation, execution, delivery));
  }

  Ok(Dataset::new(1, 1, jobs))
}

pub fn parse_sequence(line: &str) -> Result<Vec<JobId>, Box<dyn Error>> {
  let mut sequence = Vec::new();
  for item in line.split_whitespace() {
    sequence.push(item.parse::<JobId>()?);
  }
  Ok(sequence)
}

pub fn format_sequence(sequence: &[JobId]) -> String {
  return sequence.iter().join(" ");
}

fn parse_reference(
  lines: &[&str],
  cursor: &mut usize,
  tag: &str,
) -> Result<ReferenceResult, Box<dyn Error>> {
  while *cursor < lines.len() && !lines[*cursor].contains(tag) {
    *cursor += 1;
  }
  if *cursor >= lines.len() {
    Err(format!("Reference tag {} missing", tag))?;
  }
  *cursor += 1;

  let objective: u64 = next_line(lines, cursor)
    .ok_or("Reference objective missing")?
    .split_whitespace()
    .next()
    .ok_or("Reference objective missing")?
    .parse()?;
  let sequence = parse_sequence(next_line(lines, cursor).ok_or("Reference sequence missing")?)?;

  Ok(ReferenceResult {
    objective: objective,
    sequence: sequence,
  })
}

fn parse_dataset_id(line: &str, fallback: usize) -> usize {
  let digits: String = line
    .split("data.")
    .nth(1)
    .unwrap_or("")
    .chars()
    .take_while(|c| c.is_ascii_digit())
    .collect();
  return digits.parse().unwrap_or(fallback);
}

fn next_line<'a>(lines: &[&'a str], cursor: &mut usize) -> Option<&'a str> {
  while *cursor < lines.len() {
    let line = lines[*cursor];
    *cursor += 1;
    if !line.trim().is_empty() {
      return Some(line);
    }
  }
  return None;
}
