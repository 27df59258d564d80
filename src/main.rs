#[macro_use]
extern crate log;

use clap::{App, Arg};
use flowshop::parser::{
  format_sequence, parse_delivery_dataset, parse_flow_shop_datasets, parse_tardiness_datasets,
};
use flowshop::scheduler::{exact_tardiness, neh, schrage, simulated_annealing, verify_result};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use std::fs;

fn main() {
  env_logger::init();

  let matches = App::new("flowshop")
    .version("1.0")
    .about("Schedulers for flow-shop and single-machine production problems")
    .arg(
      Arg::with_name("instance")
        .long("instance")
        .help("Instance file name")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("solver")
        .long("solver")
        .help("Solver to use")
        .possible_values(&[
          "neh",
          "qneh",
          "simulated-annealing",
          "exact-tardiness",
          "schrage",
        ])
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("seed")
        .long("seed")
        .help("Seed for rng")
        .takes_value(true)
        .required_if("solver", "simulated-annealing"),
    )
    .arg(
      Arg::with_name("cycles")
        .long("cycles")
        .help("Number of annealing cycles")
        .takes_value(true)
        .default_value("100000"),
    )
    .arg(
      Arg::with_name("delta-samples")
        .long("delta-samples")
        .help("Number of makespan deltas sampled to calibrate the temperatures")
        .takes_value(true)
        .default_value("1000"),
    )
    .arg(
      Arg::with_name("track-best")
        .long("track-best")
        .help("Return the best sequence visited instead of the final one"),
    )
    .arg(
      Arg::with_name("max-jobs")
        .long("max-jobs")
        .help("Largest job count the exact search will attempt")
        .takes_value(true)
        .default_value("20"),
    )
    .get_matches();

  let solver = matches.value_of("solver").expect("Missing solver");
  let file = matches.value_of("instance").expect("Missing instance file");

  let contents = fs::read_to_string(file).expect("Error reading file");
  let datasets = match solver {
    "neh" | "qneh" | "simulated-annealing" => {
      parse_flow_shop_datasets(&contents).expect("Error parsing file")
    }
    "exact-tardiness" => parse_tardiness_datasets(&contents).expect("Error parsing file"),
    "schrage" => vec![parse_delivery_dataset(&contents).expect("Error parsing file")],
    _ => panic!("Solver not implemented"),
  };

  for dataset in &datasets {
    let result = match solver {
      "neh" => neh::find_sequence(dataset).expect("Solver failed"),
      "qneh" => neh::find_sequence_accelerated(dataset).expect("Solver failed"),
      "simulated-annealing" => {
        let seed: u64 = matches
          .value_of("seed")
          .and_then(|m| m.parse().ok())
          .expect("Invalid seed");
        let cycles: u64 = matches
          .value_of("cycles")
          .and_then(|m| m.parse().ok())
          .expect("Invalid cycles");
        let delta_samples: u64 = matches
          .value_of("delta-samples")
          .and_then(|m| m.parse().ok())
          .expect("Invalid delta samples");

        let mut rng = ChaChaRng::seed_from_u64(seed);
        let (max_delta, min_delta) =
          simulated_annealing::sample_delta_extremes(dataset, delta_samples, &mut rng)
            .expect("Calibration failed");
        let (initial_temperature, final_temperature) =
          simulated_annealing::derive_temperatures(max_delta, min_delta)
            .expect("Calibration failed");
        let cooling_factor =
          simulated_annealing::derive_cooling_factor(initial_temperature, final_temperature, cycles)
            .expect("Calibration failed");
        info!(
          "data.{}: initial temperature {}, cooling factor {}",
          dataset.id, initial_temperature, cooling_factor
        );

        let config = simulated_annealing::Config {
          cycles: cycles,
          initial_temperature: initial_temperature,
          cooling_factor: cooling_factor,
          seed: seed,
          track_best: matches.is_present("track-best"),
        };
        simulated_annealing::find_sequence(dataset, &config).expect("Solver failed")
      }
      "exact-tardiness" => {
        let max_jobs: usize = matches
          .value_of("max-jobs")
          .and_then(|m| m.parse().ok())
          .expect("Invalid max jobs");
        let config = exact_tardiness::Config { max_jobs: max_jobs };
        exact_tardiness::find_sequence(dataset, &config).expect("Solver failed")
      }
      "schrage" => schrage::find_sequence(dataset).expect("Solver failed"),
      _ => panic!("Solver not implemented"),
    };

    verify_result(dataset, &result).expect("Verification failed");

    println!("data.{}: {}", dataset.id, result.objective);
    println!("{}", format_sequence(&result.sequence));
    if let Some(reference) = &dataset.reference {
      println!("reference: {}", reference.objective);
    }
  }
}
