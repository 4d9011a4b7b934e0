use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stocking_sdk::{
    AssetConfig, AssetKey, AssetRef, AudioChannel, Calendar, CalendarConfig, MediaType, PrizeBoard,
    PrizeFile,
};

use crate::cli::*;

/// Read the config file named on the command line (or use defaults) and
/// apply command-line overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<CalendarConfig> {
    let config = match &cli.config {
        Some(path) => CalendarConfig::load(path)?,
        None => CalendarConfig::default(),
    };
    Ok(match &cli.data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    })
}

pub fn run_command(cli: Cli, config: CalendarConfig) -> anyhow::Result<()> {
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Put(args) => cmd_put(&Calendar::open(&config), args),
        Command::Prizes(args) => cmd_prizes(&Calendar::open(&config), args),
        Command::List(_) => cmd_list(&Calendar::open(&config), json),
        Command::Show(_) => cmd_show(&Calendar::open(&config), json),
        Command::Export(args) => cmd_export(&Calendar::open(&config), args),
        Command::Import(args) => cmd_import(&Calendar::open(&config), args),
        Command::Reset(args) => cmd_reset(&Calendar::open(&config), args),
        Command::Board(args) => cmd_board(&Calendar::open(&config), args, json),
        Command::Config(_) => cmd_config(&config),
    }
}

fn cmd_put(calendar: &Calendar, args: PutArgs) -> anyhow::Result<()> {
    let key: AssetKey = args.key.parse()?;
    let data = read_file(&args.file)?;
    let media_type = match args.media_type {
        Some(m) => MediaType::new(m),
        None => MediaType::from_filename(&file_name(&args.file)),
    };
    let size = data.len();
    calendar.upload(key, media_type.clone(), data)?;
    println!(
        "{} Stored {} ({}, {} bytes)",
        "✓".green().bold(),
        key.to_string().bold(),
        media_type.as_str().cyan(),
        size
    );
    Ok(())
}

fn cmd_prizes(calendar: &Calendar, args: PrizesArgs) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(PrizeFile::new(file_name(path), read_file(path)?));
    }
    let report = calendar.upload_prizes(files)?;

    if report.accepted.is_empty() {
        println!("{} No file named a prize slot (1-35).", "!".yellow().bold());
    } else {
        let slots: Vec<String> = report.accepted.iter().map(|id| id.to_string()).collect();
        println!(
            "{} Stored {} prize image(s): {}",
            "✓".green().bold(),
            report.accepted.len(),
            slots.join(", ").yellow()
        );
    }
    for name in &report.ignored {
        println!("  {} {}", "ignored:".dimmed(), name);
    }
    Ok(())
}

fn cmd_list(calendar: &Calendar, json: bool) -> anyhow::Result<()> {
    let mut records = calendar.store().get_all()?;
    records.sort_by(|a, b| a.0.cmp(&b.0));

    if json {
        let rows: Vec<serde_json::Value> = records
            .iter()
            .map(|(key, asset)| {
                serde_json::json!({
                    "key": key,
                    "media_type": asset.media_type.as_str(),
                    "size": asset.size(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No custom assets stored. Bundled defaults are in use.");
        return Ok(());
    }
    for (key, asset) in &records {
        let label = if AssetKey::parse(key).is_some() {
            key.bold()
        } else {
            key.dimmed()
        };
        println!(
            "{:<12} {:<28} {:>10} bytes",
            label,
            asset.media_type.as_str().cyan(),
            asset.size()
        );
    }
    println!("{} asset(s)", records.len());
    Ok(())
}

fn cmd_show(calendar: &Calendar, json: bool) -> anyhow::Result<()> {
    let config = calendar.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(config.as_ref())?);
        return Ok(());
    }

    println!("{:<12} {}", "bg", describe(calendar, &config.background));
    println!("{:<12} {}", "sock", describe(calendar, &config.icon));
    for channel in AudioChannel::ALL {
        let shown = match config.audio.get(channel) {
            Some(reference) => describe(calendar, reference),
            None => "(bundled default)".dimmed().to_string(),
        };
        println!("{:<12} {}", AssetKey::Audio(channel).to_string(), shown);
    }
    let custom = custom_prizes(&config);
    println!(
        "prizes       {} of {} custom",
        custom.len().to_string().bold(),
        config.prizes.len()
    );
    for (id, reference) in config.prizes.iter().filter(|(_, r)| !r.is_bundled()) {
        println!("  gift_{:<6} {}", id, describe(calendar, reference));
    }
    Ok(())
}

fn cmd_export(calendar: &Calendar, args: ExportArgs) -> anyhow::Result<()> {
    let text = calendar.export()?;
    if args.stdout {
        println!("{text}");
        return Ok(());
    }
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_filename(chrono::Utc::now().date_naive())));
    std::fs::write(&path, &text).with_context(|| format!("writing {}", path.display()))?;
    println!(
        "{} Exported {} asset(s) to {}",
        "✓".green().bold(),
        calendar.store().keys()?.len(),
        path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_import(calendar: &Calendar, args: ImportArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let report = calendar.import(&text)?;
    println!(
        "{} Imported {} asset(s) from {}",
        "✓".green().bold(),
        report.written.len(),
        args.file.display().to_string().bold()
    );
    for skipped in &report.skipped {
        println!(
            "  {} {} ({})",
            "skipped:".yellow(),
            skipped.key,
            skipped.reason.dimmed()
        );
    }
    Ok(())
}

fn cmd_reset(calendar: &Calendar, args: ResetArgs) -> anyhow::Result<()> {
    let count = calendar.store().keys()?.len();
    if !args.yes {
        bail!("reset deletes {count} stored asset(s); rerun with --yes to confirm");
    }
    calendar.reset()?;
    println!(
        "{} Deleted {} asset(s). Bundled defaults restored.",
        "✓".green().bold(),
        count
    );
    Ok(())
}

fn cmd_board(calendar: &Calendar, args: BoardArgs, json: bool) -> anyhow::Result<()> {
    let mut board = match args.seed {
        Some(seed) => PrizeBoard::deal_with(&mut StdRng::seed_from_u64(seed)),
        None => PrizeBoard::deal(),
    };
    let config = calendar.snapshot();

    let mut opened = Vec::with_capacity(args.open.len());
    for slot in args.open {
        let prize = board.open(slot)?;
        let reference = config
            .prize(prize)
            .map(|r| r.url().to_string())
            .unwrap_or_default();
        opened.push((slot, prize, reference));
    }

    if json {
        let rows: Vec<serde_json::Value> = opened
            .iter()
            .map(|(slot, prize, url)| serde_json::json!({ "slot": slot, "prize": prize, "url": url }))
            .collect();
        let out = serde_json::json!({
            "board": board,
            "opened": rows,
            "opened_count": board.opened_count(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (slot, prize, url) in &opened {
        println!(
            "sock {:>2} {} gift {} {}",
            slot,
            "→".dimmed(),
            prize.to_string().yellow().bold(),
            url.dimmed()
        );
    }
    println!(
        "{} of {} socks opened",
        board.opened_count().to_string().bold(),
        board.len()
    );
    Ok(())
}

fn cmd_config(config: &CalendarConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Default backup filename for a given day.
pub fn export_filename(date: NaiveDate) -> String {
    format!("santa-gift-assets-{}.json", date.format("%Y-%m-%d"))
}

fn describe(calendar: &Calendar, reference: &AssetRef) -> String {
    match calendar.fetch(reference) {
        Some(asset) => format!(
            "{} ({}, {} bytes)",
            "custom".green(),
            asset.media_type.as_str(),
            asset.size()
        ),
        None => format!("{} {}", "bundled".dimmed(), reference.url()),
    }
}

fn custom_prizes(config: &AssetConfig) -> Vec<u32> {
    config
        .prizes
        .iter()
        .filter(|(_, r)| !r.is_bundled())
        .map(|(id, _)| id.get())
        .collect()
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
