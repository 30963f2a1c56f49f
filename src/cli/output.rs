//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

use crate::auth::{Role, TokenClaims};
use crate::cli::OutputFormat;
use crate::router::RouteTable;
use crate::session::{ProfileDisplay, Session};

/// Columns shown first when present, in this order
const PREFERRED_COLUMNS: &[&str] = &[
    "_id", "id", "name", "title", "email", "code", "status", "role", "price", "total", "quantity",
];

/// Upper bound on table width
const MAX_COLUMNS: usize = 8;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Render any payload in the chosen format
pub fn print_value(value: &Value, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Table => match value {
            Value::Array(records) => print_record_table(records),
            Value::Object(_) => print_record_detail(value),
            other => println!("{}", cell_text(other)),
        },
    }
    Ok(())
}

/// Print a list of opaque records as a table
pub fn print_record_table(records: &[Value]) {
    if records.is_empty() {
        info("No records found");
        return;
    }

    let columns = pick_columns(records);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );

    for record in records {
        let row = columns
            .iter()
            .map(|column| {
                let value = record.get(column.as_str()).unwrap_or(&Value::Null);
                let cell = Cell::new(cell_text(value));
                if column == "status" {
                    cell.fg(status_color(value.as_str().unwrap_or_default()))
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>();
        table.add_row(row);
    }

    println!("{table}");
    println!("{} record(s)", records.len());
}

/// Print one record as a key/value table
pub fn print_record_detail(record: &Value) {
    let Some(fields) = record.as_object() else {
        println!("{}", cell_text(record));
        return;
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    for (key, value) in fields {
        let text = match value {
            Value::Object(_) | Value::Array(_) => {
                serde_json::to_string(value).unwrap_or_else(|_| cell_text(value))
            }
            other => cell_text(other),
        };
        table.add_row(vec![Cell::new(key), Cell::new(text)]);
    }

    println!("{table}");
}

/// Print the route table, optionally for one role
pub fn print_routes(table: &RouteTable, role: Option<Role>) {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Page").fg(Color::Cyan),
            Cell::new("Layout").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
        ]);

    out.add_row(vec![
        Cell::new(crate::auth::AUTH_PATH),
        Cell::new("Login / Register"),
        Cell::new("-"),
        Cell::new("public"),
    ]);

    for group in table.groups() {
        if role.is_some_and(|r| r != group.required_role) {
            continue;
        }
        for page in &group.pages {
            out.add_row(vec![
                Cell::new(group.full_path(page)),
                Cell::new(page.title),
                Cell::new(group.layout.to_string()),
                Cell::new(group.required_role.as_str()).fg(role_color(group.required_role)),
            ]);
        }
    }

    println!("{out}");
}

/// Print who is signed in
pub fn print_session(session: &Session, profile: &ProfileDisplay, claims: Option<&TokenClaims>) {
    println!("{}", "Session".bold().underline());
    println!();
    println!(
        "  {} {} ({})",
        format!("[{}]", profile.initial).bold(),
        profile.email,
        profile.role_label.color(role_color_name(session.role))
    );
    println!("  {} {}", "User ID:".bold(), session.user_id);
    if let Some(name) = &session.user.name {
        println!("  {} {}", "Name:".bold(), name);
    }
    println!("  {} {}", "Home:".bold(), session.role.home().cyan());

    match claims.and_then(TokenClaims::expires_at) {
        Some(expires) if claims.is_some_and(TokenClaims::is_expired) => println!(
            "  {} {}",
            "Token:".bold(),
            format!("expired {}", expires.format("%Y-%m-%d %H:%M:%S UTC")).red()
        ),
        Some(expires) => println!(
            "  {} expires {}",
            "Token:".bold(),
            expires.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("  {} no expiry information", "Token:".bold()),
    }
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Ask for a password without echoing it
pub fn prompt_password() -> anyhow::Result<String> {
    Ok(dialoguer::Password::new().with_prompt("Password").interact()?)
}

fn pick_columns(records: &[Value]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if let Some(fields) = record.as_object() {
            for (key, value) in fields {
                if !value.is_object() && !value.is_array() && !seen.contains(key) {
                    seen.push(key.clone());
                }
            }
        }
    }

    let mut columns: Vec<String> = PREFERRED_COLUMNS
        .iter()
        .filter(|c| seen.iter().any(|s| s == *c))
        .map(|c| (*c).to_string())
        .collect();
    for key in seen {
        if columns.len() >= MAX_COLUMNS {
            break;
        }
        if !columns.contains(&key) {
            columns.push(key);
        }
    }
    columns.truncate(MAX_COLUMNS);
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => "{…}".to_string(),
        other => other.to_string(),
    }
}

fn status_color(status: &str) -> Color {
    match status.to_lowercase().as_str() {
        "delivered" | "approved" | "active" | "completed" | "paid" => Color::Green,
        "cancelled" | "rejected" | "inactive" | "failed" => Color::Red,
        _ => Color::Yellow,
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Superadmin => Color::Magenta,
        Role::Vendor => Color::Blue,
        Role::Customer => Color::Green,
    }
}

fn role_color_name(role: Role) -> colored::Color {
    match role {
        Role::Superadmin => colored::Color::Magenta,
        Role::Vendor => colored::Color::Blue,
        Role::Customer => colored::Color::Green,
    }
}
