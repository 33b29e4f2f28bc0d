use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, info, instrument};

use crate::application::services::{Flow, SessionService, Status};
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{outline, output, render};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::ViewBody;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{PromptSelector, SelectionItem, Selector};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config = cli.config_file.as_deref();
    match &cli.command {
        Some(Commands::Walk { source, plain }) => _walk(config, source.as_deref(), *plain),
        Some(Commands::Run {
            source,
            answers,
            summary,
            copy,
        }) => _run(config, source.as_deref(), answers, *summary, *copy),
        Some(Commands::Show { source }) => _show(config, source.as_deref()),
        Some(Commands::Config { command }) => _config(config, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => _walk(config, None, false),
    }
}

fn container(config: Option<&Path>) -> CliResult<ServiceContainer> {
    let settings = Settings::load(config)?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings)?)
}

fn loaded_session(container: &ServiceContainer, source: Option<&str>) -> CliResult<SessionService> {
    let mut session = container
        .session(source)
        .on_loading(|_| render::print_status(&Status::Loading));
    info!("source: {}", session.location());
    session.load()?;
    Ok(session)
}

#[instrument]
fn _walk(config: Option<&Path>, source: Option<&str>, plain: bool) -> CliResult<()> {
    let container = container(config)?;
    let selector: Arc<dyn Selector> = if plain {
        Arc::new(PromptSelector)
    } else {
        Arc::clone(&container.selector)
    };
    let mut session = loaded_session(&container, source)?;
    walk_session(&mut session, selector.as_ref())
}

/// Interactive loop: draw the view, offer its actions, apply the choice.
///
/// Ends on `Quit` or when the selector is cancelled.
pub fn walk_session(session: &mut SessionService, selector: &dyn Selector) -> CliResult<()> {
    loop {
        let view = session.view()?;
        render::print_view(&view, false);
        render::print_status(&session.take_status());

        let actions = view.actions();
        let items: Vec<SelectionItem> = actions
            .iter()
            .enumerate()
            .map(|(i, item)| SelectionItem {
                display: item.label.clone(),
                value: i.to_string(),
            })
            .collect();
        let prompt = match view.body {
            ViewBody::Question { .. } => "answer> ",
            _ => "next> ",
        };

        let selected = selector
            .select_one(&items, prompt)
            .map_err(|message| InfraError::Selector { message })?;
        let Some(selected) = selected else {
            debug!("selection cancelled");
            return Ok(());
        };

        let action = selected
            .value
            .parse::<usize>()
            .ok()
            .and_then(|i| actions.get(i))
            .map(|item| item.action)
            .ok_or_else(|| InfraError::Selector {
                message: format!("unexpected selection: {}", selected.display),
            })?;

        if session.apply(action)? == Flow::Quit {
            return Ok(());
        }
    }
}

#[instrument]
fn _run(
    config: Option<&Path>,
    source: Option<&str>,
    answers: &[String],
    summary: bool,
    copy: bool,
) -> CliResult<()> {
    let container = container(config)?;
    let mut session = loaded_session(&container, source)?;

    for label in answers {
        session.select_answer_by_label(label)?;
    }

    if summary {
        output::info(&session.summary_text()?);
    } else {
        render::print_view(&session.view()?, true);
    }

    if copy {
        session.copy_summary();
        render::print_status(&session.take_status());
    }
    Ok(())
}

#[instrument]
fn _show(config: Option<&Path>, source: Option<&str>) -> CliResult<()> {
    let container = container(config)?;
    let session = loaded_session(&container, source)?;
    let store = session.store()?;
    let view = session.view()?;

    output::muted(&format!(
        "{} · {} nodes",
        render::metadata_line(&view),
        store.len()
    ));
    println!("{}", outline::outline(store));

    let orphans = outline::unreachable(store);
    if !orphans.is_empty() {
        output::warning(&format!("{} unreachable node(s)", orphans.len()));
        for id in orphans {
            output::bullet(&id);
        }
    }
    Ok(())
}

#[instrument]
fn _config(config: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global, force } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(Path::new("."))
            };
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_path_context("create directory", parent)?;
            }
            std::fs::write(&path, Settings::template()).with_path_context("write config", &path)?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let local = config
                .map(Path::to_path_buf)
                .unwrap_or_else(|| local_config_path(Path::new(".")));
            match global_config_path() {
                Some(p) => print_config_path("Global", &p),
                None => output::detail(&"Global: (no config directory)"),
            }
            print_config_path("Local", &local);
        }
    }
    Ok(())
}

fn print_config_path(label: &str, path: &Path) {
    if path.exists() {
        output::success(&format!("{label}: {}", path.display()));
    } else {
        output::detail(&format!("{label}: {} (not found)", path.display()));
    }
}

#[instrument]
fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
