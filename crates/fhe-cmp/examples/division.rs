// Integer division of an encrypted dividend, by a public or an encrypted
// divisor.

mod util;

use std::{env, error::Error, process::exit};

use console::style;
use fhe_cmp::reference::{ReferenceEngine, ReferenceParametersBuilder};
use fhe_cmp::{EvaluationOptions, Evaluator, KeyMaterial, SinglePartyKeys};
use rand::thread_rng;
use util::timeit::{timeit, timeit_n};
use util::{parse_flag, print_result};

fn print_notice_and_exit(error: Option<String>) {
    println!(
        "{} Integer division of encrypted integers",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} division [-h] [--help] [--dividend=<value>] [--divisor=<value>] [--modulus=<value>] [--private]",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} {} must be an odd prime, {} must be non-zero, and both operands must lie in [-(p-1)/2, (p-1)/2]",
        style("constraints:").magenta().bold(),
        style("modulus").blue(),
        style("divisor").blue(),
    );
    println!(
        "{} with {}, the cost grows as p^2 log p: keep the modulus small",
        style("      note:").magenta().bold(),
        style("--private").blue(),
    );
    if let Some(error) = error {
        println!("{} {}", style("     error:").red().bold(), error);
    }
    exit(0);
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.contains(&"-h".to_string()) || args.contains(&"--help".to_string()) {
        print_notice_and_exit(None)
    }

    let mut dividend: i64 = -7;
    let mut divisor: i64 = 2;
    let mut modulus: Option<u64> = None;
    let mut private = false;

    for arg in &args {
        if let Some(value) = parse_flag(arg, "--dividend") {
            match value {
                Ok(value) => dividend = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = parse_flag(arg, "--divisor") {
            match value {
                Ok(value) => divisor = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = parse_flag(arg, "--modulus") {
            match value {
                Ok(value) => modulus = Some(value),
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if arg == "--private" {
            private = true
        } else {
            print_notice_and_exit(Some(format!("Unrecognized argument: {arg}")))
        }
    }

    // The private division tries every divisor, hence a smaller default.
    let modulus = modulus.unwrap_or(if private { 17 } else { 257 });

    println!("# Integer division");
    println!("\tdividend = {dividend}");
    println!("\tdivisor = {divisor}");
    println!("\tmodulus = {modulus}");
    println!("\tprivate divisor = {private}");

    let parameters = match ReferenceParametersBuilder::new()
        .set_plaintext_modulus(modulus)
        .set_slots(1)
        .build_arc()
    {
        Ok(parameters) => parameters,
        Err(e) => {
            print_notice_and_exit(Some(e.to_string()));
            unreachable!()
        }
    };

    let mut rng = thread_rng();
    let keys = SinglePartyKeys::generate(ReferenceEngine::new(&parameters), &mut rng)?;
    let evaluator =
        Evaluator::with_options(&keys, EvaluationOptions::default().with_parallel(true))?;

    let cdividend = match keys.encrypt(&[dividend]) {
        Ok(ct) => ct,
        Err(e) => {
            print_notice_and_exit(Some(e.to_string()));
            unreachable!()
        }
    };

    let quotient = if private {
        let cdivisor = match keys.encrypt(&[divisor]) {
            Ok(ct) => ct,
            Err(e) => {
                print_notice_and_exit(Some(e.to_string()));
                unreachable!()
            }
        };
        timeit!(
            "Private division",
            evaluator.divide_private(&cdividend, &cdivisor)?
        )
    } else {
        match timeit!("Division", evaluator.divide(&cdividend, divisor)) {
            Ok(ct) => ct,
            Err(e) => {
                print_notice_and_exit(Some(e.to_string()));
                unreachable!()
            }
        }
    };

    println!();
    print_result("quotient", keys.decrypt(&quotient)?[0]);

    Ok(())
}
