use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["storefinder-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["storefinder-cli", "db", "migrate"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_command() {
    let cli =
        Cli::try_parse_from(["storefinder-cli", "db", "seed"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed
        })
    ));
}

#[test]
fn parses_db_show_command() {
    let cli = Cli::try_parse_from(["storefinder-cli", "db", "show", "recife"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Show { ref code }
        }) if code == "recife"
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storefinder-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_nearby_with_hyphenated_postal_code() {
    let cli = Cli::try_parse_from(["storefinder-cli", "nearby", "01310-100"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            ref postal_code,
            json: false
        }) if postal_code == "01310-100"
    ));
}

#[test]
fn parses_nearby_json_flag() {
    let cli = Cli::try_parse_from(["storefinder-cli", "nearby", "55700000", "--json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby { json: true, .. })
    ));
}

#[test]
fn nearby_requires_a_postal_code() {
    assert!(Cli::try_parse_from(["storefinder-cli", "nearby"]).is_err());
}

#[test]
fn db_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["storefinder-cli", "db"]).is_err());
}
