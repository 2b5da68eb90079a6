// Comparison of two encrypted integers with a single key holder.

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
        "{} Comparison of two encrypted integers",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} compare [-h] [--help] [--a=<value>] [--b=<value>] [--modulus=<value>] [--parallel]",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} {} must be an odd prime, and {} and {} must lie in [-(p-1)/2, (p-1)/2]",
        style("constraints:").magenta().bold(),
        style("modulus").blue(),
        style("a").blue(),
        style("b").blue(),
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

    let mut a: i64 = 10;
    let mut b: i64 = -4;
    let mut modulus: u64 = 257;
    let mut parallel = false;

    for arg in &args {
        if let Some(value) = parse_flag(arg, "--a") {
            match value {
                Ok(value) => a = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = parse_flag(arg, "--b") {
            match value {
                Ok(value) => b = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = parse_flag(arg, "--modulus") {
            match value {
                Ok(value) => modulus = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if arg == "--parallel" {
            parallel = true
        } else {
            print_notice_and_exit(Some(format!("Unrecognized argument: {arg}")))
        }
    }

    println!("# Comparison with a single key holder");
    println!("\ta = {a}");
    println!("\tb = {b}");
    println!("\tmodulus = {modulus}");

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
    let keys = timeit!(
        "Key generation",
        SinglePartyKeys::generate(ReferenceEngine::new(&parameters), &mut rng)?
    );

    // Client side: the inputs are range checked and encrypted.
    let (ca, cb) = match (keys.encrypt(&[a]), keys.encrypt(&[b])) {
        (Ok(ca), Ok(cb)) => (ca, cb),
        (Err(e), _) | (_, Err(e)) => {
            print_notice_and_exit(Some(e.to_string()));
            unreachable!()
        }
    };

    // Server side.
    let options = EvaluationOptions::default().with_parallel(parallel);
    let evaluator = Evaluator::with_options(&keys, options)?;
    let equal = timeit!("equal", evaluator.equal(&ca, &cb)?);
    let gt = timeit!("gt", evaluator.gt(&ca, &cb)?);
    let gteq = timeit!("gteq", evaluator.gteq(&ca, &cb)?);
    let lt = timeit!("lt", evaluator.lt(&ca, &cb)?);
    let lteq = timeit!("lteq", evaluator.lteq(&ca, &cb)?);
    let max = timeit!("max", evaluator.max(&ca, &cb)?);
    let min = timeit!("min", evaluator.min(&ca, &cb)?);
    let sign_a = timeit!("sign", evaluator.sign(&ca)?);
    let sign_b = evaluator.sign(&cb)?;
    let fermat = timeit!("equal (Fermat)", evaluator.equal_fermat(&ca, &cb)?);

    // Client side.
    println!();
    print_result("a == b", keys.decrypt(&equal)?[0]);
    print_result("a == b (F)", keys.decrypt(&fermat)?[0]);
    print_result("a > b", keys.decrypt(&gt)?[0]);
    print_result("a >= b", keys.decrypt(&gteq)?[0]);
    print_result("a < b", keys.decrypt(&lt)?[0]);
    print_result("a <= b", keys.decrypt(&lteq)?[0]);
    print_result("max(a, b)", keys.decrypt(&max)?[0]);
    print_result("min(a, b)", keys.decrypt(&min)?[0]);
    print_result("sign(a)", keys.decrypt(&sign_a)?[0]);
    print_result("sign(b)", keys.decrypt(&sign_b)?[0]);

    if a - b > modulus as i64 / 2 || b - a > modulus as i64 / 2 {
        println!(
            "{} a - b leaves the domain, the ordering predicates are meaningless",
            style("   warning:").yellow().bold()
        );
    }

    Ok(())
}
