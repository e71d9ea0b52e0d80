use crate::{
    config::{self, FeedsConfig, PagesConfig},
    feeds, pages, preview,
};
use colored::Colorize;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PagefeedError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pages(#[from] pages::PagesError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Feeds(#[from] feeds::FeedsError),
}

/// Copies the page template into every page directory described by `settings`.
///
/// With `dry_run` the copies are only previewed.
///
/// # Errors
///
/// Returns a [`PagefeedError`] if:
///
/// - The root directory does not exist or cannot be listed.
/// - Any individual copy fails. All copies are still attempted first.
pub fn distribute_pages(settings: &PagesConfig, dry_run: bool) -> Result<(), PagefeedError> {
    log::debug!(
        "distributing '{}' under {} (excluding '{}')",
        settings.template,
        settings.root.display(),
        settings.exclude
    );

    let plan = pages::plan(&settings.root, &settings.template, &settings.exclude)?;

    if dry_run {
        preview::preview_plan(&plan);
        return Ok(());
    }

    let report = pages::apply(&plan)?;

    println!("{} {} directories", "updated".green(), report.copied);

    Ok(())
}

/// Drops every feed whose url contains the configured substring from the feed list.
///
/// With `dry_run` the dropped feeds are only previewed and the file is left as is.
///
/// # Errors
///
/// Returns a [`PagefeedError`] if:
///
/// - The feed list cannot be read or written.
/// - The feed list is not a json array of objects with a string `url`.
pub fn filter_feeds(settings: &FeedsConfig, dry_run: bool) -> Result<(), PagefeedError> {
    log::debug!(
        "filtering {} for urls containing '{}'",
        settings.path.display(),
        settings.exclude
    );

    if dry_run {
        let records = feeds::load(&settings.path)?;
        let (kept, removed) = feeds::partition(records, &settings.exclude);

        preview::preview_removed(&removed, kept.len());
        return Ok(());
    }

    let report = feeds::filter_feeds(&settings.path, &settings.exclude)?;

    println!(
        "{} {} feeds, kept {}",
        "removed".red(),
        report.removed.len(),
        report.kept
    );

    Ok(())
}
