use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["bizscout"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analyze_with_defaults() {
    let cli = Cli::try_parse_from([
        "bizscout",
        "analyze",
        "--niche",
        "medspas",
        "--location",
        "Miami, FL",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analyze {
            ref niche,
            ref location,
            max_results: 20,
            output: None,
            no_analysis: false,
        }) if niche == "medspas" && location == "Miami, FL"
    ));
}

#[test]
fn parses_analyze_with_all_flags() {
    let cli = Cli::try_parse_from([
        "bizscout",
        "analyze",
        "--niche",
        "dentists",
        "--location",
        "Austin, TX",
        "--max-results",
        "5",
        "--output",
        "out/dentists.json",
        "--no-analysis",
    ])
    .unwrap();

    if let Some(Commands::Analyze {
        max_results,
        ref output,
        no_analysis,
        ..
    }) = cli.command
    {
        assert_eq!(max_results, 5);
        assert_eq!(output.as_deref(), Some(std::path::Path::new("out/dentists.json")));
        assert!(no_analysis);
    } else {
        panic!("unexpected command variant");
    }
}

#[test]
fn analyze_requires_niche_and_location() {
    assert!(Cli::try_parse_from(["bizscout", "analyze", "--location", "Miami, FL"]).is_err());
    assert!(Cli::try_parse_from(["bizscout", "analyze", "--niche", "medspas"]).is_err());
}

#[test]
fn analyze_rejects_non_numeric_max_results() {
    let result = Cli::try_parse_from([
        "bizscout",
        "analyze",
        "--niche",
        "medspas",
        "--location",
        "Miami, FL",
        "--max-results",
        "lots",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_niches_command() {
    let cli = Cli::try_parse_from(["bizscout", "niches"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Niches)));
}

#[test]
fn niche_list_shows_search_terms_and_services_in_key_order() {
    let registry = bizscout_core::NicheRegistry::from_yaml_str(
        r"
medspas:
  label: Medical Spas
  search_query: med spa
  canonical_services: [Botox, Dermal Fillers]
dentists:
  label: Dentists
  vocabulary: [whitening]
",
    )
    .unwrap();

    assert_eq!(
        niches::format_niche_list(&registry),
        "dentists (Dentists)\n  search: Dentists\n  services: -\n\
         medspas (Medical Spas)\n  search: med spa\n  services: Botox, Dermal Fillers\n"
    );
}

#[test]
fn empty_registry_says_so() {
    let registry = bizscout_core::NicheRegistry::from_definitions(Vec::new()).unwrap();
    assert_eq!(niches::format_niche_list(&registry), "no niches configured\n");
}
