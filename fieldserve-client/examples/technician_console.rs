use chrono::Utc;
use clap::Parser;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use fieldserve_client::{ApiClient, ClientPages, PagedList, Schedule, StaticToken};
use fieldserve_core::dates;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "technician-console")]
#[command(about = "Interactive console against a fieldserve backend", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(short, long, default_value = "http://localhost:8000/api")]
    server: String,

    /// Bearer token for the API
    #[arg(short, long, default_value = "")]
    token: String,

    /// Technician id for the task schedule
    #[arg(long, default_value_t = 1)]
    technician: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (only show warnings and errors)
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let cli = Cli::parse();

    println!("{}", "Fieldserve Technician Console".bold().cyan());
    println!("{}", "=============================".cyan());
    println!("Server: {}", cli.server.blue());

    let api = Arc::new(ApiClient::new(
        &cli.server,
        Arc::new(StaticToken(cli.token.clone())),
    )?);
    let today = Utc::now().date_naive();
    let schedule = Schedule::new(api.clone(), cli.technician, today);
    let clients = PagedList::new(Arc::new(ClientPages(api.clone())));

    schedule.select_index(dates::WINDOW_RADIUS).await;

    loop {
        let choices = vec![
            "Today's tasks",
            "Next day",
            "Previous day",
            "Start a task",
            "Finish a task",
            "Search clients",
            "Load more clients",
            "Quit",
        ];
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What next?")
            .items(&choices)
            .default(0)
            .interact()?;

        match choice {
            0 => print_day(&schedule).await,
            1 => {
                let snapshot = schedule.snapshot().await;
                schedule.select_index(snapshot.focused + 1).await;
                print_day(&schedule).await;
            }
            2 => {
                let snapshot = schedule.snapshot().await;
                schedule
                    .select_index(snapshot.focused.saturating_sub(1))
                    .await;
                print_day(&schedule).await;
            }
            3 => {
                let id: i64 = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Task id")
                    .interact_text()?;
                match schedule.start_task(id).await {
                    Ok(()) => println!("{}", "Task started.".green()),
                    Err(err) => println!("{}", err.user_message().red()),
                }
                schedule.refresh_focused().await;
            }
            4 => {
                let id: i64 = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Task id")
                    .interact_text()?;
                match schedule.finish_task(id).await {
                    Ok(()) => println!("{}", "Task finished.".green()),
                    Err(err) => println!("{}", err.user_message().red()),
                }
                schedule.refresh_focused().await;
            }
            5 => {
                let search: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Search")
                    .allow_empty(true)
                    .interact_text()?;
                clients.set_query(&search, "first_name").await;
                print_clients(&clients).await;
            }
            6 => {
                clients.load_more().await;
                print_clients(&clients).await;
            }
            _ => break,
        }
    }

    Ok(())
}

async fn print_day(schedule: &Schedule) {
    let snapshot = schedule.snapshot().await;
    let date = snapshot.dates[snapshot.focused];
    let today = Utc::now().date_naive();
    println!(
        "\n{} ({})",
        dates::tab_label(date, today).bold(),
        dates::date_key(date)
    );
    if let Some(error) = &snapshot.error {
        println!("{}", error.red());
    }
    if snapshot.tasks.is_empty() {
        println!("{}", "No tasks for this day.".dimmed());
    }
    for task in &snapshot.tasks {
        let urgent = if task.urgent { " URGENT".red().bold() } else { "".normal() };
        println!(
            "  #{} {} [{}]{}",
            task.id,
            task.name,
            task.status.to_string().yellow(),
            urgent
        );
    }
    println!();
}

async fn print_clients(list: &PagedList<fieldserve_core::Client>) {
    let snapshot = list.snapshot().await;
    if let Some(error) = &snapshot.error {
        println!("{}", error.red());
    }
    for client in &snapshot.items {
        println!(
            "  #{} {} {}",
            client.id,
            client.name,
            client.phone.as_deref().unwrap_or("").dimmed()
        );
    }
    if snapshot.has_more {
        println!("{}", "  (more available)".dimmed());
    }
    println!();
}
