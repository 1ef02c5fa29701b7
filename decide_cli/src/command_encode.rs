use decide::RankingCodec;

pub fn command_encode(matches: &clap::ArgMatches) {
    let ranking: Vec<u32> = matches
        .values_of("RANKING")
        .map(|values| values.collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|value| {
            value.parse().unwrap_or_else(|e| {
                eprintln!("decide encode: invalid option number {}: {}", value, e);
                std::process::exit(1);
            })
        })
        .collect();

    let codec = RankingCodec::new(ranking.len());
    match codec.encode(&ranking) {
        Ok(encoded) => println!("{}", encoded),
        Err(e) => {
            eprintln!("decide encode: {}", e);
            std::process::exit(1);
        }
    }
}
