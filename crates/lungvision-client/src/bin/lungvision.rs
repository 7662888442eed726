//! LungVision terminal front end.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use lungvision_client::{
    retry_analysis, run_analysis, AnalysisOutcome, ApiClient, ChatSession, ClientConfig, Pacing,
    Recovery,
};
use lungvision_core::analysis::MILESTONES;
use lungvision_core::booking::BookingStage;
use lungvision_core::models::{FieldKind, PatientRecord, PaymentMethod, RiskLevel};
use lungvision_core::{
    calculate_risk, Intro, IntroPhase, Screen, Session, SystemClock, WizardStep, TIME_SLOTS,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "LungVision AI lung-cancer risk screening", long_about = None)]
struct Cli {
    /// API base URL, e.g. http://localhost:5000/api
    #[arg(long, global = true, env = "LUNGVISION_API_URL")]
    api_url: Option<String>,

    /// Host used to derive a local API URL
    #[arg(long, global = true, env = "LUNGVISION_HOST")]
    host: Option<String>,

    /// Prediction request timeout
    #[arg(long, global = true, env = "LUNGVISION_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, global = true)]
    skip_intro: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive intake: questionnaire, results and booking
    Intake,
    /// Client-side risk estimate for a JSON patient record
    Score { file: PathBuf },
    /// Submit a JSON patient record to the prediction service
    Predict { file: PathBuf },
    /// List specialists, optionally for a risk level
    Doctors {
        #[arg(long)]
        risk: Option<RiskLevel>,
    },
    /// Ask the assistant a question
    Chat { message: String },
    /// Past screenings
    Registry,
    /// Confirmed appointments
    Records,
    /// Service status
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lungvision=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_parts(
        cli.api_url.as_deref(),
        cli.host.as_deref(),
        cli.timeout_secs,
    )
    .context("Invalid configuration")?;
    debug!(base_url = %config.base_url, "Resolved API");
    let client = ApiClient::new(&config)?;

    match cli.command.unwrap_or(Command::Intake) {
        Command::Intake => intake(&client, cli.skip_intro).await,
        Command::Score { file } => {
            let record = read_record(&file)?;
            let assessment = calculate_risk(&record);
            println!("{}", serde_json::to_string_pretty(&assessment)?);
            Ok(())
        }
        Command::Predict { file } => {
            let record = read_record(&file)?;
            let prediction = client.predict(&record).await?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
            Ok(())
        }
        Command::Doctors { risk } => {
            for doctor in client.doctors(risk).await? {
                println!(
                    "{:>3}  {:<24} {:<20} {} ({}) ★{:.1}",
                    doctor.id,
                    doctor.name,
                    doctor.specialty,
                    doctor.hospital,
                    doctor.location,
                    doctor.rating
                );
            }
            Ok(())
        }
        Command::Chat { message } => {
            let mut chat = ChatSession::new();
            if let Some(reply) = chat.send(&client, &message).await {
                println!("{}", reply.text);
            }
            Ok(())
        }
        Command::Registry => {
            println!("{}", serde_json::to_string_pretty(&client.registry().await?)?);
            Ok(())
        }
        Command::Records => {
            println!(
                "{}",
                serde_json::to_string_pretty(&client.hospital_records().await?)?
            );
            Ok(())
        }
        Command::Health => {
            let health = client.health().await?;
            println!(
                "{} (model loaded: {}) at {}",
                health.status, health.model_loaded, health.timestamp
            );
            Ok(())
        }
    }
}

fn read_record(path: &PathBuf) -> Result<PatientRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    PatientRecord::from_json(&json).with_context(|| format!("Invalid patient record in {}", path.display()))
}

/// Line-oriented stdin.
struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prompt and read one trimmed line. Errors on end of input.
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt} ");
        std::io::stdout().flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => bail!("Input closed"),
        }
    }
}

async fn intake(client: &ApiClient, skip_intro: bool) -> Result<()> {
    // Wake the hosted service while the intro plays.
    let warmup = client.clone();
    tokio::spawn(async move {
        match warmup.health().await {
            Ok(health) => debug!(model_loaded = health.model_loaded, "Service ready"),
            Err(err) => warn!(error = %err, "Service warm-up failed"),
        }
    });

    let mut term = Terminal::new();
    let mut session = Session::new();

    if !skip_intro {
        play_intro(&mut term).await?;
    }
    session.finish_intro()?;

    loop {
        match session.screen() {
            Screen::Intro => session.finish_intro()?,
            Screen::Wizard => {
                if !wizard(&mut term, &mut session, client).await? {
                    return Ok(());
                }
            }
            Screen::Results => {
                if !results(&mut term, &mut session, client).await? {
                    return Ok(());
                }
            }
            Screen::Booking => booking(&mut term, &mut session, client).await?,
        }
    }
}

async fn play_intro(term: &mut Terminal) -> Result<()> {
    let mut intro = Intro::start(SystemClock::new());
    let mut shown = None;
    println!("(press Enter to skip)");
    while !intro.is_finished() {
        let index = intro.phase_index();
        if shown != Some(index) {
            match intro.phase() {
                IntroPhase::Lungs => println!("\n      ( )( )\n       \\  /\n        ||"),
                IntroPhase::Logo => println!("\n   L U N G V I S I O N   A I"),
                IntroPhase::Text(line) => println!("\n   {line}"),
                IntroPhase::Start => {}
            }
            shown = Some(index);
        }
        tokio::select! {
            _ = tokio::time::sleep(intro.remaining_in_phase()) => {}
            _ = term.lines.next_line() => intro.skip(),
        }
    }
    info!(skipped = intro.was_skipped(), "Intro finished");
    println!("\n   Let's Get Started\n");
    Ok(())
}

/// Returns false when the user quits.
async fn wizard(term: &mut Terminal, session: &mut Session, client: &ApiClient) -> Result<bool> {
    let step = session.step();
    println!(
        "\n── Step {} of {}: {} ──",
        step.number(),
        WizardStep::LAST.number(),
        step.title()
    );

    if step == WizardStep::Analysis {
        return analysis(term, session, client).await;
    }

    // Re-read the field list each time; answering the smoker toggle changes it.
    let mut index = 0;
    while let Some(field) = step.fields(session.record()).get(index).copied() {
        let hint = match field.kind() {
            FieldKind::Text => String::new(),
            FieldKind::Choice => " (male/female)".to_string(),
            FieldKind::Toggle => " (y/n)".to_string(),
            FieldKind::Rating { min, max } => format!(" ({min}-{max})"),
        };
        let input = term.ask(&format!("{}{}:", field.label(), hint)).await?;
        match input.as_str() {
            "" => {}
            "back" => {
                session.back_step();
                return Ok(true);
            }
            "quit" => return Ok(false),
            "?" => {
                println!("  {}", field.description());
                continue;
            }
            _ => {
                if let Err(err) = session.patients_mut().answer_str(field, &input) {
                    println!("  {err}");
                    continue;
                }
            }
        }
        index += 1;
    }
    session.next_step();
    Ok(true)
}

async fn analysis(term: &mut Terminal, session: &mut Session, client: &ApiClient) -> Result<bool> {
    let estimate = session.local_assessment();
    println!(
        "Local estimate: {} ({}/100). Submitting for analysis...",
        estimate.level, estimate.score
    );
    let mut outcome = run_analysis(session, client, Pacing::default(), progress_printer()).await?;
    loop {
        match outcome {
            AnalysisOutcome::Completed | AnalysisOutcome::AlreadyStarted => return Ok(true),
            AnalysisOutcome::Failed { message, retryable } => {
                println!("  {message}");
                let choice = loop {
                    let input = term.ask(Recovery::prompt(retryable)).await?;
                    match Recovery::parse(&input, retryable) {
                        Some(choice) => break choice,
                        None => println!("  Unknown choice"),
                    }
                };
                match choice {
                    Recovery::Retry => {
                        outcome = retry_analysis(session, client, Pacing::default(), progress_printer())
                            .await?;
                    }
                    Recovery::Back => {
                        session.back_step();
                        return Ok(true);
                    }
                    Recovery::Quit => return Ok(false),
                }
            }
        }
    }
}

/// Prints each milestone label once as progress passes it.
fn progress_printer() -> impl FnMut(u8) {
    let mut reached = 0;
    move |percent| {
        for (threshold, label) in MILESTONES.iter().skip(reached) {
            if percent <= *threshold {
                break;
            }
            println!("  {label}");
            reached += 1;
        }
        if percent == 100 {
            println!("  100%");
        }
    }
}

async fn results(term: &mut Terminal, session: &mut Session, client: &ApiClient) -> Result<bool> {
    let report = session.medical_report()?;
    println!("\n{}", report.render()?);
    if let Some(prediction) = session.prediction() {
        for tip in &prediction.recommendations {
            println!("  • {tip}");
        }
        if let Some(plot) = prediction.plot() {
            println!("  Plot: {plot}");
        }
    }

    let mut chat = ChatSession::new();
    loop {
        let choice = term
            .ask("\n[b]ook a specialist, [c]hat, [n]ew patient, [q]uit:")
            .await?;
        match choice.to_lowercase().as_str() {
            "b" => {
                session.open_booking()?;
                return Ok(true);
            }
            "c" => {
                println!("{}", chat.messages()[0].text);
                loop {
                    let message = term.ask("you>").await?;
                    if message.is_empty() {
                        break;
                    }
                    if let Some(reply) = chat.send(client, &message).await {
                        println!("bot> {}", reply.text);
                    }
                }
            }
            "n" => {
                session.new_patient()?;
                return Ok(true);
            }
            "q" => return Ok(false),
            _ => println!("  Unknown choice"),
        }
    }
}

async fn booking(term: &mut Terminal, session: &mut Session, client: &ApiClient) -> Result<()> {
    let Some(risk) = session.prediction().map(|p| p.prediction) else {
        return Ok(session.close_booking()?);
    };
    let stage = session.booking().map(|b| b.stage());
    match stage {
        Some(BookingStage::Doctors) => {
            let doctors = match client.doctors(Some(risk)).await {
                Ok(doctors) => doctors,
                Err(err) => {
                    println!("  {err}");
                    session.booking_back()?;
                    return Ok(());
                }
            };
            for (index, doctor) in doctors.iter().enumerate() {
                println!(
                    "  {}. {} – {} at {} ★{:.1}",
                    index + 1,
                    doctor.name,
                    doctor.specialty,
                    doctor.hospital,
                    doctor.rating
                );
            }
            let input = term.ask("Choose a doctor (number, or back):").await?;
            if input == "back" {
                session.booking_back()?;
                return Ok(());
            }
            match input.parse::<usize>().ok().and_then(|n| doctors.get(n.wrapping_sub(1))) {
                Some(doctor) => session.select_doctor(doctor.clone())?,
                None => println!("  Pick a number from the list"),
            }
        }
        Some(BookingStage::Schedule) => {
            let today = Local::now().date_naive();
            let date = term.ask("Date (YYYY-MM-DD, or back):").await?;
            if date == "back" {
                session.booking_back()?;
                return Ok(());
            }
            let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
                println!("  Use the form 2026-03-09");
                return Ok(());
            };
            println!("  Slots: {}", TIME_SLOTS.join(", "));
            let slot = term.ask("Time:").await?;
            if let Err(err) = session.schedule(date, &slot, today) {
                println!("  {err}");
            }
        }
        Some(BookingStage::Payment) => {
            let method = term.ask("Pay with card, upi or qr (or back):").await?;
            if method == "back" {
                session.booking_back()?;
                return Ok(());
            }
            let method: PaymentMethod = match method.parse() {
                Ok(method) => method,
                Err(err) => {
                    println!("  {err}");
                    return Ok(());
                }
            };
            let record = session.pay_booking(method)?;
            if let Some(prediction) = session.prediction() {
                match client.book(&record.to_request(prediction)).await {
                    Ok(confirmation) => println!("  Transaction {}", confirmation.transaction_id),
                    Err(err) => warn!(error = %err, "Booking not recorded by server"),
                }
            }
        }
        Some(BookingStage::Success) => {
            if let Some(receipt) = session.booking_receipt() {
                println!("\n{}", receipt.render()?);
            }
            session.close_booking()?;
        }
        None => session.close_booking()?,
    }
    Ok(())
}
