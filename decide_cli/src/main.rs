use clap::{App, Arg, SubCommand};
use log::LevelFilter;
use num_enum::TryFromPrimitive;

mod command_encode;
mod command_group;
mod command_run;
mod rest;
mod scenario;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Verbosity {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl Verbosity {
    fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Silent => LevelFilter::Off,
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

fn main() {
    let matches = App::new("Decide CLI")
        .version("0.1")
        .about("Runs multi-authority ElGamal votings")
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("group")
                .about("Generate group parameters and print them as JSON")
                .arg(
                    Arg::with_name("bits")
                        .long("bits")
                        .takes_value(true)
                        .help("Modulus size in bits - defaults to DECIDE_KEYBITS or 256"),
                ),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Run a voting scenario from open to tally")
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(true)
                        .help("Scenario file in JSON or CBOR format"),
                ),
        )
        .subcommand(
            SubCommand::with_name("encode")
                .about("Print the ballot integer for a ranking, most preferred first")
                .arg(
                    Arg::with_name("RANKING")
                        .index(1)
                        .multiple(true)
                        .required(true)
                        .help("Option numbers, e.g. `2 3 1`"),
                ),
        )
        .get_matches();

    let level = std::cmp::min(matches.occurrences_of("v") + 2, 5) as u8;
    let verbosity = Verbosity::try_from_primitive(level).unwrap_or(Verbosity::Trace);
    init_logging(verbosity);

    let config = match decide::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("decide: {}", e);
            std::process::exit(1);
        }
    };

    // Subcommands
    if let Some(matches) = matches.subcommand_matches("group") {
        command_group::command_group(matches, config);
    } else if let Some(matches) = matches.subcommand_matches("run") {
        command_run::command_run(matches, config);
    } else if let Some(matches) = matches.subcommand_matches("encode") {
        command_encode::command_encode(matches);
    } else {
        eprintln!("{}", matches.usage());
        std::process::exit(1);
    }
}

fn init_logging(verbosity: Verbosity) {
    use log4rs::append::console::{ConsoleAppender, Target};
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(
            Root::builder()
                .appender("stderr")
                .build(verbosity.level_filter()),
        );

    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("decide: unable to initialise logging: {}", e);
            }
        }
        Err(e) => eprintln!("decide: invalid logging configuration: {}", e),
    }
}

/// Read a file, exiting with a message on failure.
pub fn read_input(command: &str, filename: &str) -> Vec<u8> {
    match std::fs::read(filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("decide {}: unable to read {}: {}", command, filename, e);
            std::process::exit(1);
        }
    }
}
