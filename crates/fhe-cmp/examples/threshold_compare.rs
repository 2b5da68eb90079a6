// Comparison of two integers encrypted under keys combined by several
// holders, none of which can decrypt alone.

mod util;

use std::{env, error::Error, process::exit};

use console::style;
use fhe_cmp::reference::{ReferenceEngine, ReferenceParametersBuilder};
use fhe_cmp::threshold::{DecryptionRound, KeyCombination, KeyHolder, ThresholdKeys};
use fhe_cmp::{Ciphertext, Evaluator, KeyMaterial};
use indicatif::{ProgressBar, ProgressStyle};
use rand::thread_rng;
use util::print_result;
use util::timeit::{timeit, timeit_n};

fn print_notice_and_exit(error: Option<String>) {
    println!(
        "{} Comparison with threshold key combination",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} threshold_compare [-h] [--help] [--holders=<value>] [--a=<value>] [--b=<value>]",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} {} must be at least 2, {} and {} must lie in [-128, 128]",
        style("constraints:").magenta().bold(),
        style("holders").blue(),
        style("a").blue(),
        style("b").blue(),
    );
    if let Some(error) = error {
        println!("{} {}", style("     error:").red().bold(), error);
    }
    exit(0);
}

fn progress(len: usize, message: &'static str) -> Result<ProgressBar, Box<dyn Error>> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template(
        "{msg:>24} [{bar:40.cyan/blue}] {pos}/{len}",
    )?);
    bar.set_message(message);
    Ok(bar)
}

fn decrypt(
    keys: &ThresholdKeys<ReferenceEngine>,
    ct: &Ciphertext<ThresholdKeys<ReferenceEngine>>,
    holders: &[KeyHolder<ReferenceEngine>],
) -> Result<i64, Box<dyn Error>> {
    let mut rng = thread_rng();
    let mut round = DecryptionRound::lead(keys, ct, &holders[0], &mut rng)?;
    for holder in &holders[1..] {
        round = round.main(holder, &mut rng)?;
    }
    Ok(round.fuse()?[0])
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.contains(&"-h".to_string()) || args.contains(&"--help".to_string()) {
        print_notice_and_exit(None)
    }

    let mut num_holders: usize = 2;
    let mut a: i64 = 5;
    let mut b: i64 = 3;

    for arg in &args {
        if let Some(value) = util::parse_flag(arg, "--holders") {
            match value {
                Ok(value) => num_holders = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = util::parse_flag(arg, "--a") {
            match value {
                Ok(value) => a = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else if let Some(value) = util::parse_flag(arg, "--b") {
            match value {
                Ok(value) => b = value,
                Err(e) => print_notice_and_exit(Some(e)),
            }
        } else {
            print_notice_and_exit(Some(format!("Unrecognized argument: {arg}")))
        }
    }

    if num_holders < 2 {
        print_notice_and_exit(Some("Invalid `--holders` argument".to_string()))
    }

    println!("# Comparison with threshold keys");
    println!("\tholders = {num_holders}");
    println!("\ta = {a}");
    println!("\tb = {b}");

    let parameters = ReferenceParametersBuilder::new()
        .set_plaintext_modulus(257)
        .set_slots(1)
        .build_arc()?;
    let mut rng = thread_rng();

    // Every holder joins the run, the lead holder first.
    let (keys, holders) = timeit!("Key combination", {
        let (mut run, lead) = KeyCombination::init(ReferenceEngine::new(&parameters), &mut rng)?;
        let mut holders = vec![lead];
        let bar = progress(num_holders - 1, "joining")?;
        for _ in 1..num_holders {
            let (next, holder) = run.join(&mut rng)?;
            run = next;
            holders.push(holder);
            bar.inc(1);
        }
        bar.finish_and_clear();

        // Then each one contributes to the multiplication key, in join order.
        let bar = progress(2 * (num_holders - 1), "accumulating")?;
        let mut added = run.accumulate_added(&holders[1], &mut rng)?;
        bar.inc(1);
        for holder in &holders[2..] {
            added = added.accumulate_added(holder, &mut rng)?;
            bar.inc(1);
        }
        let seeded = added.seed_final(&holders[0], &mut rng)?;
        let mut combined = seeded.accumulate_final(&holders[1], &mut rng)?;
        bar.inc(1);
        for holder in &holders[2..] {
            combined = combined.accumulate_final(holder, &mut rng)?;
            bar.inc(1);
        }
        bar.finish_and_clear();
        (combined.install()?, holders)
    });

    let (ca, cb) = match (keys.encrypt(&[a]), keys.encrypt(&[b])) {
        (Ok(ca), Ok(cb)) => (ca, cb),
        (Err(e), _) | (_, Err(e)) => {
            print_notice_and_exit(Some(e.to_string()));
            unreachable!()
        }
    };

    let evaluator = Evaluator::new(&keys)?;
    let gt = timeit!("gt", evaluator.gt(&ca, &cb)?);
    let equal = timeit!("equal", evaluator.equal(&ca, &cb)?);
    let max = timeit!("max", evaluator.max(&ca, &cb)?);

    // Every holder takes part in each decryption.
    let gt = timeit_n!("Decryption", 3, decrypt(&keys, &gt, &holders)?);
    let equal = decrypt(&keys, &equal, &holders)?;
    let max = decrypt(&keys, &max, &holders)?;

    println!();
    print_result("a > b", gt);
    print_result("a == b", equal);
    print_result("max(a, b)", max);

    Ok(())
}
