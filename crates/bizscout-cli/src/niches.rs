//! Handler for `bizscout niches`.

use std::fmt::Write as _;

use bizscout_core::{AppConfig, NicheRegistry};

/// Print every configured niche.
///
/// # Errors
///
/// Returns an error if the niches file cannot be loaded.
pub(crate) fn run_niches(config: &AppConfig) -> anyhow::Result<()> {
    let registry = bizscout_core::load_niches(&config.niches_path)?;
    print!("{}", format_niche_list(&registry));
    Ok(())
}

/// One block per niche, in key order: key and label, the discovery search
/// terms, then the canonical services.
pub(crate) fn format_niche_list(registry: &NicheRegistry) -> String {
    if registry.is_empty() {
        return "no niches configured\n".to_string();
    }

    let mut out = String::new();
    for (key, niche) in registry.list_all() {
        let _ = writeln!(out, "{key} ({})", niche.label);
        let _ = writeln!(out, "  search: {}", niche.search_terms());
        if niche.canonical_services.is_empty() {
            let _ = writeln!(out, "  services: -");
        } else {
            let _ = writeln!(out, "  services: {}", niche.canonical_services.join(", "));
        }
    }
    out
}
