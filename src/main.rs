use anyhow::{anyhow, Result};
use std::env;
use std::fs;

use booking_console::{
    export_bookings, BookingController, BookingServiceClient, BookingStatus, FilterState,
    SourceType,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_console=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("fetch");

    let mut controller = build_controller()?;

    match command {
        "fetch" => run_fetch(&mut controller, &args[2..]).await,
        "export" => run_export(&mut controller, &args[2..]).await,
        "approve" => run_transition(&mut controller, &args[2..], BookingStatus::Approved).await,
        "reject" => run_transition(&mut controller, &args[2..], BookingStatus::Rejected).await,
        "reopen" => run_reopen(&mut controller, &args[2..]).await,
        "approve-all" => run_approve_all(&mut controller, &args[2..]).await,
        other => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: booking-console [fetch|export|approve|reject|reopen|approve-all]");
            std::process::exit(1);
        }
    }
}

fn build_controller() -> Result<BookingController> {
    let base_url =
        env::var("BOOKING_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    // Credential is injected here, never read ambiently by the core
    let token = env::var("BOOKING_API_TOKEN").ok();
    if token.is_none() {
        eprintln!("⚠️  BOOKING_API_TOKEN not set - requests will go out unauthenticated");
    }
    let client = BookingServiceClient::new(&base_url, token)?;
    Ok(BookingController::new(client))
}

/// Parse `--seva`, `--mobile`, `--from`, `--to`, `--status`, `--payment`
/// flag pairs into a filter state
fn parse_filters(args: &[String]) -> Result<FilterState> {
    let mut state = FilterState::match_all();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        if !flag.starts_with("--") {
            continue;
        }
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("Missing value for {}", flag))?
            .clone();
        match flag.as_str() {
            "--seva" => state.seva_name = value,
            "--mobile" => state.mobile = value,
            "--from" => state.from_date = value,
            "--to" => state.to_date = value,
            "--payment" => state.payment = value,
            "--status" => {
                // "all" is the match-any sentinel
                if !value.eq_ignore_ascii_case("all") {
                    state.status = Some(BookingStatus::parse(&value));
                }
            }
            other => return Err(anyhow!("Unknown filter flag: {}", other)),
        }
    }
    if let Err(err) = state.validate() {
        eprintln!("⚠️  {} - no bookings will match", err);
    }
    Ok(state)
}

fn parse_source(arg: Option<&String>) -> Result<SourceType> {
    match arg.map(String::as_str) {
        Some("seva") => Ok(SourceType::Seva),
        Some("event") => Ok(SourceType::Event),
        Some("temple") => Ok(SourceType::Temple),
        Some(other) => Err(anyhow!("Unknown booking type: {}", other)),
        None => Err(anyhow!("Booking type required: seva | event | temple")),
    }
}

async fn run_fetch(controller: &mut BookingController, args: &[String]) -> Result<()> {
    let state = parse_filters(args)?;

    println!("📊 Loading bookings...");
    controller.refresh().await;
    report_notification(controller);

    let view = controller.filtered(&state);
    println!(
        "\n{:<10} {:<18} {:<20} {:<12} {:>10} {:<18} {:<8}",
        "ID", "NAME", "SEVA", "DATE", "AMOUNT", "PAYMENT", "STATUS"
    );
    for rec in &view {
        println!(
            "{:<10} {:<18} {:<20} {:<12} {:>10.2} {:<18} {:<8}",
            rec.id,
            rec.karta_name,
            rec.seva_name,
            rec.service_date,
            rec.amount,
            rec.payment_channel,
            rec.status.name()
        );
    }

    let totals = controller.totals(&state);
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ {} bookings in view", totals.count);
    println!("✓ Total: ₹{:.2}", totals.grand_total);
    println!("✓ Online collections: ₹{:.2}", totals.online_total);
    Ok(())
}

async fn run_export(controller: &mut BookingController, args: &[String]) -> Result<()> {
    let source_type = parse_source(args.first())?;
    let state = parse_filters(&args[1..])?;

    println!("📊 Loading bookings...");
    controller.refresh().await;
    report_notification(controller);

    let mut view = controller.filtered(&state);
    view.retain(|rec| rec.source_type == source_type);

    let export = export_bookings(&view, source_type)?;
    let path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--") && a.ends_with(".csv"))
        .cloned()
        .unwrap_or_else(|| export.filename.clone());

    fs::write(&path, &export.content)?;
    println!("✓ Exported {} bookings to {}", view.len(), path);
    Ok(())
}

async fn run_transition(
    controller: &mut BookingController,
    args: &[String],
    target: BookingStatus,
) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow!("Booking id required"))?;

    println!("📊 Loading bookings...");
    controller.refresh().await;
    controller.set_status(id, target).await;
    report_notification(controller);
    Ok(())
}

async fn run_reopen(controller: &mut BookingController, args: &[String]) -> Result<()> {
    let id = args
        .first()
        .ok_or_else(|| anyhow!("Booking id required"))?;

    println!("📊 Loading bookings...");
    controller.refresh().await;
    controller.reopen(id).await;
    report_notification(controller);
    Ok(())
}

async fn run_approve_all(controller: &mut BookingController, args: &[String]) -> Result<()> {
    let state = parse_filters(args)?;

    println!("📊 Loading bookings...");
    controller.refresh().await;
    report_notification(controller);

    println!("\n✅ Approving all pending bookings in view...");
    let summary = controller.approve_all(&state).await;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "✓ Selected {} | Approved {} | Failed {}",
        summary.selected, summary.approved, summary.failed
    );
    Ok(())
}

fn report_notification(controller: &BookingController) {
    if let Some(n) = controller.notifier().current() {
        match n.severity.name() {
            "error" => println!("❌ {}", n.message),
            "warning" => println!("⚠️  {}", n.message),
            _ => println!("✓ {}", n.message),
        }
    }
}
