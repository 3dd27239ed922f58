//! Line-oriented shell over the command layer.
//!
//! Every view accepts the navigation commands; the remaining commands are
//! only available in the view that owns them.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

use crate::{
    admin,
    cli::Cli,
    dashboard,
    display::Language,
    lock,
    models::CanvasRect,
    navigation::{transition, NavAction, View},
    settings::ExportSettings,
    worker, AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Exit,
}

pub fn run(state: &AppState, cli: &Cli) -> Result<()> {
    if cli.is_scripted() {
        run_script(
            state,
            cli.script.as_deref(),
            &cli.commands,
            cli.continue_on_error,
            cli.quiet,
        )
    } else {
        run_interactive(state)
    }
}

fn prompt(state: &AppState) -> String {
    format!("sketchpoint:{}> ", state.current_view().as_str())
}

fn run_interactive(state: &AppState) -> Result<()> {
    println!("Sketchpoint");
    println!("Type `help` for commands. Type `exit` to quit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("{}", prompt(state));
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        match dispatch(state, &line, &mut stdout) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

pub fn run_script(
    state: &AppState,
    script: Option<&Path>,
    commands: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(script_path) = script {
        let text = if script_path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(script_path)
                .map_err(|e| anyhow!("failed to read script {}: {e}", script_path.display()))?
        };
        lines.extend(text.lines().map(str::to_string));
    }
    lines.extend(commands.iter().cloned());

    let mut stdout = io::stdout();
    for (idx, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !quiet {
            println!("{}{line}", prompt(state));
        }

        match dispatch(state, line, &mut stdout) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => {
                if continue_on_error {
                    eprintln!("error: {e}");
                } else {
                    return Err(anyhow!("script failed at line {}: {e}", idx + 1));
                }
            }
        }
    }

    Ok(())
}

/// Splits a line on whitespace, keeping single- or double-quoted runs together.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.trim().chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}

pub fn dispatch(state: &AppState, line: &str, out: &mut dyn Write) -> Result<ReplControl> {
    let tokens = tokenize_line(line);
    let Some((command, args)) = tokens.split_first() else {
        return Ok(ReplControl::Continue);
    };

    let target = match command.as_str() {
        "exit" | "quit" => return Ok(ReplControl::Exit),
        "help" => {
            print_help(state.current_view(), out)?;
            return Ok(ReplControl::Continue);
        }
        "home" | "back" => Some(NavAction::Back),
        other => View::parse(other).map(NavAction::Open),
    };
    if let Some(action) = target {
        navigate(state, action, out)?;
        return Ok(ReplControl::Continue);
    }

    match state.current_view() {
        View::Home => home_command(state, command, args, out)?,
        View::Admin => admin_command(state, command, args, out)?,
        View::Worker => worker_command(state, command, args, line, out)?,
        View::Dashboard => dashboard_command(state, command, args, out)?,
    }
    Ok(ReplControl::Continue)
}

fn navigate(state: &AppState, action: NavAction, out: &mut dyn Write) -> Result<()> {
    let next = {
        let mut view = lock(&state.view);
        *view = transition(*view, action);
        *view
    };

    match next {
        View::Worker => {
            if let Some(warning) = worker::commands::load(state).map_err(anyhow::Error::msg)? {
                writeln!(out, "{warning}")?;
            } else {
                print_completion(state, out)?;
            }
        }
        View::Dashboard => {
            for warning in dashboard::commands::refresh(state).map_err(anyhow::Error::msg)? {
                writeln!(out, "{warning}")?;
            }
        }
        View::Home | View::Admin => {}
    }
    Ok(())
}

fn unknown(view: View, command: &str) -> anyhow::Error {
    anyhow!(
        "unknown command '{command}' in the {} view; type `help`",
        view.as_str()
    )
}

fn arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("usage: {usage}"))
}

/// Text after the command word with its inner spacing intact. A value that
/// starts with a quote is taken from the tokens instead, so quotes are removed.
fn raw_rest(line: &str, args: &[String]) -> String {
    let line = line.trim();
    let rest = line
        .find(char::is_whitespace)
        .map(|end| line[end..].trim_start())
        .unwrap_or("");
    if rest.starts_with('"') || rest.starts_with('\'') {
        args.join(" ")
    } else {
        rest.to_string()
    }
}

fn number_arg(args: &[String], index: usize, usage: &str) -> Result<f64> {
    let raw = arg(args, index, usage)?;
    raw.parse::<f64>()
        .map_err(|_| anyhow!("'{raw}' is not a number; usage: {usage}"))
}

fn home_command(state: &AppState, command: &str, args: &[String], out: &mut dyn Write) -> Result<()> {
    match command {
        "lang" => {
            let raw = arg(args, 0, "lang en|he")?;
            let language =
                Language::parse(raw).ok_or_else(|| anyhow!("unknown language '{raw}' (en, he)"))?;
            state.settings.update_language(language)?;
            writeln!(out, "language set to {}", language.code())?;
        }
        "delimiter" => {
            let raw = arg(args, 0, "delimiter <char>")?;
            let mut chars = raw.chars();
            let delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(anyhow!("the delimiter must be a single character")),
            };
            let export = ExportSettings {
                delimiter,
                ..state.settings.export()
            };
            state.settings.update_export(export)?;
            writeln!(out, "delimiter set to '{delimiter}'")?;
        }
        "settings" => {
            let export = state.settings.export();
            writeln!(out, "language:  {}", state.settings.language().code())?;
            writeln!(out, "delimiter: '{}'", export.delimiter)?;
            writeln!(out, "prefix:    {}", export.file_prefix)?;
        }
        other => return Err(unknown(View::Home, other)),
    }
    Ok(())
}

fn admin_command(
    state: &AppState,
    command: &str,
    args: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        "upload" => {
            let path = PathBuf::from(arg(args, 0, "upload <path>")?);
            let description =
                admin::commands::upload_image(state, &path).map_err(anyhow::Error::msg)?;
            writeln!(out, "uploaded {description}")?;
        }
        "open" => {
            let message = admin::commands::open_saved_config(state).map_err(anyhow::Error::msg)?;
            writeln!(out, "{message}")?;
        }
        "draft" => {
            const USAGE: &str = "draft <label> <text|number|select> [options,comma,separated]";
            let label = arg(args, 0, USAGE)?;
            let field_type = arg(args, 1, USAGE)?;
            let options = (args.len() > 2).then(|| args[2..].join(" "));
            admin::commands::begin_placement(state, label, field_type, options.as_deref())
                .map_err(anyhow::Error::msg)?;
            writeln!(out, "click position for '{label}' with `place <x> <y>`")?;
        }
        "place" => {
            const USAGE: &str = "place <x> <y> [<left> <top> <width> <height>]";
            let x = number_arg(args, 0, USAGE)?;
            let y = number_arg(args, 1, USAGE)?;
            let canvas = match args.len() {
                2 => CanvasRect::unit(),
                6 => CanvasRect::new(
                    number_arg(args, 2, USAGE)?,
                    number_arg(args, 3, USAGE)?,
                    number_arg(args, 4, USAGE)?,
                    number_arg(args, 5, USAGE)?,
                ),
                _ => return Err(anyhow!("usage: {USAGE}")),
            };
            let hotspot = admin::commands::place_hotspot(state, x, y, canvas)
                .map_err(anyhow::Error::msg)?;
            writeln!(
                out,
                "placed '{}' at ({:.2}, {:.2})",
                hotspot.label, hotspot.x, hotspot.y
            )?;
        }
        "cancel" => {
            admin::commands::cancel_placement(state);
            writeln!(out, "placement cancelled")?;
        }
        "remove" => {
            let reference = arg(args, 0, "remove <number|id>")?;
            match admin::commands::remove_hotspot(state, reference) {
                Some(hotspot) => writeln!(out, "removed '{}'", hotspot.label)?,
                None => writeln!(out, "no hotspot '{reference}'")?,
            }
        }
        "list" => {
            let status = admin::commands::editor_status(state);
            writeln!(
                out,
                "image: {}",
                if status.has_image { "uploaded" } else { "none" }
            )?;
            if let Some(label) = status.placing {
                writeln!(out, "placing: {label}")?;
            }
            for listing in admin::commands::list_hotspots(state) {
                write!(
                    out,
                    "{:>3}. {} [{}] at ({:.2}, {:.2})",
                    listing.number, listing.label, listing.field_type, listing.x, listing.y
                )?;
                if !listing.options.is_empty() {
                    write!(out, " options: {}", listing.options.join(", "))?;
                }
                writeln!(out)?;
            }
        }
        "save" => {
            let count = admin::commands::save_config(state).map_err(anyhow::Error::msg)?;
            writeln!(out, "saved configuration with {count} hotspot(s)")?;
        }
        other => return Err(unknown(View::Admin, other)),
    }
    Ok(())
}

fn worker_command(
    state: &AppState,
    command: &str,
    args: &[String],
    line: &str,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        "reload" => match worker::commands::load(state).map_err(anyhow::Error::msg)? {
            Some(warning) => writeln!(out, "{warning}")?,
            None => print_completion(state, out)?,
        },
        "list" => {
            for entry in worker::commands::progress(state) {
                let mark = if entry.value.is_some() { "x" } else { " " };
                let value = entry.value.map(|v| v.to_string()).unwrap_or_default();
                writeln!(out, "[{mark}] {:>3}. {} {value}", entry.number, entry.label)?;
            }
        }
        "select" => {
            let reference = arg(args, 0, "select <number|id>")?;
            let ctx =
                worker::commands::select_hotspot(state, reference).map_err(anyhow::Error::msg)?;
            write!(out, "{} ({})", ctx.hotspot.label, ctx.hotspot.field_type.as_str())?;
            if !ctx.hotspot.options().is_empty() {
                write!(out, " options: {}", ctx.hotspot.options().join(", "))?;
            }
            writeln!(out)?;
            if !ctx.value.is_empty() {
                writeln!(out, "current value: {}", ctx.value)?;
            }
        }
        "submit" => {
            if args.is_empty() {
                return Err(anyhow!("usage: submit <value...>"));
            }
            let value = worker::commands::submit_value(state, &raw_rest(line, args))
                .map_err(anyhow::Error::msg)?;
            writeln!(out, "saved {value}")?;
            print_completion(state, out)?;
        }
        "cancel" => {
            worker::commands::cancel_selection(state);
            writeln!(out, "selection cancelled")?;
        }
        "status" => print_completion(state, out)?,
        other => return Err(unknown(View::Worker, other)),
    }
    Ok(())
}

fn print_completion(state: &AppState, out: &mut dyn Write) -> Result<()> {
    let status = worker::commands::completion_status(state);
    writeln!(
        out,
        "{}/{} completed ({:.0}%)",
        status.completed,
        status.total,
        status.percent()
    )?;
    if status.is_all_completed() {
        writeln!(out, "all points are filled in")?;
    }
    Ok(())
}

fn dashboard_command(
    state: &AppState,
    command: &str,
    args: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        "refresh" => {
            for warning in dashboard::commands::refresh(state).map_err(anyhow::Error::msg)? {
                writeln!(out, "{warning}")?;
            }
        }
        "stats" => {
            let stats = dashboard::commands::stats(state);
            writeln!(
                out,
                "total: {}  completed: {}  pending: {}",
                stats.total, stats.completed, stats.pending
            )?;
            let orphaned = dashboard::commands::orphaned(state);
            if orphaned > 0 {
                writeln!(out, "{orphaned} value(s) belong to hotspots that were removed")?;
            }
        }
        "rows" => {
            let language = state.settings.language();
            for row in dashboard::commands::rows(state) {
                writeln!(out, "{}", row.cells(language).join(" | "))?;
            }
        }
        "export" => {
            let dir = args
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let path =
                dashboard::commands::export_to_dir(state, &dir).map_err(anyhow::Error::msg)?;
            writeln!(out, "exported to {}", path.display())?;
        }
        other => return Err(unknown(View::Dashboard, other)),
    }
    Ok(())
}

fn print_help(view: View, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "navigation: home | back | admin | worker | dashboard | help | exit")?;
    let commands: &[&str] = match view {
        View::Home => &["lang en|he", "delimiter <char>", "settings"],
        View::Admin => &[
            "upload <path>",
            "open",
            "draft <label> <text|number|select> [options,comma,separated]",
            "place <x> <y> [<left> <top> <width> <height>]",
            "cancel",
            "remove <number|id>",
            "list",
            "save",
        ],
        View::Worker => &[
            "reload",
            "list",
            "select <number|id>",
            "submit <value...>",
            "cancel",
            "status",
        ],
        View::Dashboard => &["refresh", "stats", "rows", "export [dir]"],
    };
    writeln!(out, "{} commands:", view.as_str())?;
    for command in commands {
        writeln!(out, "  {command}")?;
    }
    Ok(())
}
