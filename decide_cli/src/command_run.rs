use crate::rest::RestAuthority;
use crate::scenario::{Scenario, ScenarioBallot};
use decide::*;
use rand::rngs::OsRng;
use std::sync::Arc;
use uuid::Uuid;

pub fn command_run(matches: &clap::ArgMatches, config: Config) {
    let filename = match matches.value_of("INPUT") {
        Some(filename) => filename,
        None => {
            eprintln!("decide run: input filename required");
            std::process::exit(1);
        }
    };

    let file_bytes = crate::read_input("run", filename);
    let scenario = Scenario::from_bytes(&file_bytes).unwrap_or_else(|e| {
        eprintln!("decide run: unable to read {}: {}", filename, e);
        std::process::exit(1);
    });

    match run(scenario, config) {
        Ok(postproc) => match serde_json::to_string_pretty(&postproc) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("decide run: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("decide run: {}", e);
            std::process::exit(1);
        }
    }
}

/// Open, vote, close and tally a scenario in this process.
pub fn run(scenario: Scenario, config: Config) -> Result<PostProc, Error> {
    let question = VotingQuestion::new(
        scenario.question.description,
        scenario.question.question_type,
        scenario.question.options,
    )?;

    let mut authorities = Vec::with_capacity(scenario.authorities.len());
    let mut coordinator = AuthorityCoordinator::new();
    for entry in scenario.authorities {
        let mut authority = Authority::new(entry.name, entry.url.clone().unwrap_or_default());
        let client: Arc<dyn AuthorityClient> = match &entry.url {
            Some(url) => Arc::new(RestAuthority::new(url, config.authority_timeout)?),
            None => {
                authority.me = true;
                Arc::new(LocalAuthority::new(authority.id))
            }
        };
        coordinator.register(authority.id, client);
        authorities.push(authority);
    }

    let store = Arc::new(MemStore::new());
    let service = VotingService::in_memory(config, store.clone(), coordinator);
    let voting = service.create(scenario.name, scenario.description, question, authorities)?;

    println!("{}", service.apply(voting.id, "start", "")?);
    let voting = service.get(voting.id)?;

    for ballot in &scenario.ballots {
        let voter = Uuid::new_v4();
        store.add_voter(voting.id, voter);
        let ciphertext = match ballot {
            ScenarioBallot::Choice(number) => voting.encrypt_choice(*number, &mut OsRng)?,
            ScenarioBallot::Ranking(ranking) => voting.encrypt_ranking(ranking, &mut OsRng)?,
        };
        service.submit_ballot(voting.id, voter, ciphertext)?;
    }
    log::info!("cast {} ballots", scenario.ballots.len());

    println!("{}", service.apply(voting.id, "stop", "")?);
    let postproc = service.tally(voting.id, "")?;
    println!("{}", Action::Tally.success_message());

    Ok(postproc)
}
