// Count the positions where two encrypted words differ.

mod util;

use std::{env, error::Error, process::exit};

use console::style;
use fhe_cmp::compare::encode_bytes;
use fhe_cmp::reference::{ReferenceEngine, ReferenceParametersBuilder};
use fhe_cmp::{Evaluator, KeyMaterial, SinglePartyKeys};
use rand::thread_rng;
use util::print_result;
use util::timeit::{timeit, timeit_n};

const SLOTS: usize = 16;

fn print_notice_and_exit(error: Option<String>) {
    println!(
        "{} Number of differing positions between two encrypted words",
        style("  overview:").magenta().bold()
    );
    println!(
        "{} string_compare [-h] [--help] <word> <word>",
        style("     usage:").magenta().bold()
    );
    println!(
        "{} the words must be at most {} bytes long",
        style("constraints:").magenta().bold(),
        SLOTS
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

    let (first, second) = match args.as_slice() {
        [first, second] => (first.as_bytes(), second.as_bytes()),
        [] => ("hello".as_bytes(), "hallo".as_bytes()),
        _ => {
            print_notice_and_exit(Some("Expected two words".to_string()));
            unreachable!()
        }
    };
    if first.len() > SLOTS || second.len() > SLOTS {
        print_notice_and_exit(Some(format!("Words longer than {SLOTS} bytes")))
    }
    let batch = first.len().max(second.len()).max(1);

    println!("# Word comparison");
    println!("\tfirst = {}", String::from_utf8_lossy(first));
    println!("\tsecond = {}", String::from_utf8_lossy(second));

    let parameters = ReferenceParametersBuilder::new()
        .set_plaintext_modulus(257)
        .set_slots(SLOTS)
        .build_arc()?;
    let mut rng = thread_rng();
    let keys = SinglePartyKeys::generate(ReferenceEngine::new(&parameters), &mut rng)?;
    let q = *keys.modulus();

    let cfirst = keys.encrypt_residues(&encode_bytes(first, &q)?)?;
    let csecond = keys.encrypt_residues(&encode_bytes(second, &q)?)?;

    let evaluator = Evaluator::new(&keys)?;
    let count = timeit!(
        "Count differences",
        evaluator.count_differences(&cfirst, &csecond, batch)?
    );

    println!();
    print_result("differences", keys.decrypt_residues(&count)?[0]);

    Ok(())
}
