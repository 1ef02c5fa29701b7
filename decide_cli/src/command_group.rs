use decide::{Config, GroupParams};
use rand::rngs::OsRng;

pub fn command_group(matches: &clap::ArgMatches, mut config: Config) {
    if let Some(bits) = matches.value_of("bits") {
        config.keybits = match bits.parse() {
            Ok(bits) => bits,
            Err(e) => {
                eprintln!("decide group: invalid bit length {}: {}", bits, e);
                std::process::exit(1);
            }
        };
    }

    let group = match GroupParams::generate(config.keybits, &mut OsRng) {
        Ok(group) => group,
        Err(e) => {
            eprintln!("decide group: {}", e);
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&group) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("decide group: {}", e);
            std::process::exit(1);
        }
    }
}
