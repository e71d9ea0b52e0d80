use clap::{crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches, Command};
use pagefeed::config::{Config, FeedsConfig, PagesConfig};
use std::path::PathBuf;

fn dry_run_arg() -> Arg {
    Arg::new("dry-run")
        .long("dry-run")
        .help("Show what would change without touching any file")
        .action(ArgAction::SetTrue)
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a pagefeed.toml config file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("distribute-pages")
                .about("Copies the page template into every page directory (the default command)")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .help("Directory holding the template and the page directories")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .help("File name of the template inside the root directory"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .help("Directory name that never receives the template"),
                )
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("filter-feeds")
                .about("Removes feeds whose url contains a substring from the feed list")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .help("json file holding the feed list")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .help("Literal, case-sensitive substring of the urls to drop"),
                )
                .arg(dry_run_arg()),
        )
        .get_matches();

    // globals are propagated down, so the innermost matches see every flag
    let scoped = matches.subcommand().map(|(_, args)| args).unwrap_or(&matches);

    init_logging(scoped.get_flag("verbose"));

    let config = Config::load(scoped.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("distribute-pages", args)) => handle_distribute(args, config.pages)?,
        Some(("filter-feeds", args)) => handle_filter(args, config.feeds)?,
        _ => pagefeed::api::distribute_pages(&config.pages, false)?,
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let default_filter = if is_verbose { "pagefeed=debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("executing in verbose mode");
}

fn handle_distribute(args: &ArgMatches, mut settings: PagesConfig) -> miette::Result<()> {
    if let Some(root) = args.get_one::<PathBuf>("root") {
        settings.root = root.clone();
    }
    if let Some(template) = args.get_one::<String>("template") {
        settings.template = template.clone();
    }
    if let Some(exclude) = args.get_one::<String>("exclude") {
        settings.exclude = exclude.clone();
    }

    pagefeed::api::distribute_pages(&settings, args.get_flag("dry-run"))?;

    Ok(())
}

fn handle_filter(args: &ArgMatches, mut settings: FeedsConfig) -> miette::Result<()> {
    if let Some(path) = args.get_one::<PathBuf>("path") {
        settings.path = path.clone();
    }
    if let Some(exclude) = args.get_one::<String>("exclude") {
        settings.exclude = exclude.clone();
    }

    pagefeed::api::filter_feeds(&settings, args.get_flag("dry-run"))?;

    Ok(())
}
