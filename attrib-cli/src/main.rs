use std::env;

use attrib_core::io::read_file;
use attrib_core::model::attribution::identify_speaker;

/// Command-line driver for speaker attribution.
///
/// Reads two reference texts and one unknown text from the given file
/// paths, builds a k-order Markov model per reference speaker, and
/// prints the normalized log-likelihood of the unknown text under each
/// model followed by a conclusion.
fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args: Vec<String> = env::args().collect();

	if args.len() != 5 {
		println!(
			"usage: {} <file name for speaker A> <file name for speaker B>\n  <file name of text to identify> <order>",
			args[0]
		);
		return Ok(());
	}

	let speech_a = read_file(&args[1])?;
	let speech_b = read_file(&args[2])?;
	let unknown = read_file(&args[3])?;
	let order: usize = args[4].parse()?;

	let res = identify_speaker(&speech_a, &speech_b, &unknown, order)?;

	println!("Speaker A: {}", res.score_a);
	println!("Speaker B: {}", res.score_b);
	println!();
	println!("Conclusion: Speaker {} is most likely", res.verdict);

	Ok(())
}
