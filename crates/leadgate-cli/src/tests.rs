use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["leadgate"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_brand_with_zip_and_state() {
    let cli = Cli::try_parse_from(["leadgate", "brand", "--zip", "27601", "--state", "nc"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Brand { zip, state }) => {
            assert_eq!(zip.as_deref(), Some("27601"));
            assert_eq!(state.as_deref(), Some("nc"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_route_input() {
    let cli = Cli::try_parse_from(["leadgate", "route", "123 Main St, Charlotte"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Route { ref input }) if input == "123 Main St, Charlotte"
    ));
}

#[test]
fn weather_zip_defaults_to_raleigh() {
    let cli = Cli::try_parse_from(["leadgate", "weather"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Weather { ref zip }) if zip == "27601"
    ));
}

#[test]
fn leads_limit_defaults_to_ten() {
    let cli = Cli::try_parse_from(["leadgate", "leads"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Leads { brand: None, limit: 10 })
    ));
}

#[test]
fn route_requires_input() {
    assert!(Cli::try_parse_from(["leadgate", "route"]).is_err());
}
