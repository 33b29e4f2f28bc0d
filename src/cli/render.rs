//! Binds the view model to terminal output

use colored::Colorize;
use itertools::Itertools;

use crate::application::services::{Status, LOADING_MESSAGE};
use crate::cli::output;
use crate::domain::navigator::PATH_SEPARATOR;
use crate::domain::view::NO_BULLETS;
use crate::domain::{View, ViewBody};

/// `Start > Yes > No`, or just `Start`.
pub fn breadcrumb_line(view: &View) -> String {
    view.breadcrumbs.iter().join(PATH_SEPARATOR)
}

/// `Version: 3 · Updated: 2024-05-01`
pub fn metadata_line(view: &View) -> String {
    format!("Version: {} · Updated: {}", view.version, view.last_updated)
}

/// Draw a full view. Answers are listed only when `list_answers` is set;
/// interactive selectors present them themselves.
pub fn print_view(view: &View, list_answers: bool) {
    println!();
    output::muted(&metadata_line(view));
    output::muted(&breadcrumb_line(view));
    println!();

    match &view.body {
        ViewBody::Question {
            question,
            help,
            answers,
        } => {
            output::header(question);
            if let Some(help) = help {
                output::info(help);
            }
            if list_answers {
                for answer in answers {
                    output::bullet(answer);
                }
            }
        }
        ViewBody::Result {
            title,
            description,
            bullets,
            links,
            path,
        } => {
            output::header(title);
            if let Some(description) = description {
                output::info(description);
            }
            println!();
            if bullets.is_empty() {
                output::detail(NO_BULLETS);
            } else {
                for b in bullets {
                    output::bullet(b);
                }
            }
            if !links.is_empty() {
                println!();
                for link in links {
                    output::detail(&format!("{}: {}", link.label, link.url.underline()));
                }
            }
            println!();
            println!("{} {}", "Path:".bold(), path);
        }
        ViewBody::Error { message } => {
            println!("{}", "Error".red().bold());
            println!("{}", message.red());
        }
    }
    println!();
}

/// Draw the transient status line, if any.
///
/// [`Status::Loading`] arrives through [`SessionService::on_loading`], before
/// the fetch; the others are taken after each action.
///
/// [`SessionService::on_loading`]: crate::application::services::SessionService::on_loading
pub fn print_status(status: &Status) {
    match status {
        Status::Idle => {}
        Status::Error(message) => output::warning(message),
        // stderr: `run --summary` output stays clean when piped
        Status::Loading => eprintln!("{}", LOADING_MESSAGE.dimmed()),
        Status::Info(message) => output::success(message),
    }
}
