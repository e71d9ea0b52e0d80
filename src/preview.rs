use crate::{feeds::FeedRecord, pages::DistributionPlan};
use colored::Colorize;

/// Print one branch of the tree with a nice ASCII style.
fn print_branch(prefix: &str, is_last: bool, name: &str) {
    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };

    println!("{}{}{}", prefix.yellow(), connector, name);
}

fn print_header(title: &str) {
    let fancy_prompt = format!("{} {}\n", "┌─".bold().bright_blue(), title.bold().bright_blue());

    println!("{}", fancy_prompt);
}

fn print_footer(summary: &str) {
    let fancy_prompt = format!(
        "\n{} {}\n",
        "└─".bold().bright_blue(),
        summary.bright_green()
    );

    println!("{}", fancy_prompt);
}

/// Shows which directories would receive the template, without copying anything.
pub fn preview_plan(plan: &DistributionPlan) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    print_header("Preview");

    println!("{}", plan.root.display().to_string().blue());

    let len = plan.targets.len();
    for (i, target) in plan.targets.iter().enumerate() {
        let is_last = i == len - 1;
        let name = format!(
            "{}/{}",
            target.entry.name.blue(),
            plan.template.green()
        );
        print_branch("", is_last, &name);
    }

    print_footer(&format!(
        "{} would be copied into {} directories (dry run)",
        plan.source.display(),
        len
    ));
}

/// Shows which feeds would be dropped, without rewriting the list.
pub fn preview_removed(removed: &[FeedRecord], kept: usize) {
    print_header("Preview");

    let len = removed.len();
    for (i, record) in removed.iter().enumerate() {
        let is_last = i == len - 1;
        print_branch("", is_last, &record.url().red().to_string());
    }

    print_footer(&format!(
        "{} feeds would be removed, {} kept (dry run)",
        len, kept
    ));
}
