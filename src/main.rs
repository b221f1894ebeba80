use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};

mod ai_analyzer;
mod ingest;
mod patterns;
mod reporter;
mod risk;
mod scanner;
mod severity;
mod vault;

use ai_analyzer::AiAnalyzer;
use patterns::{ContractAnalysis, ContractCategory};
use reporter::AnalysisReporter;
use scanner::ClauseScanner;
use vault::Vault;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "A pattern-based work-for-hire contract analyzer for performing artists")]
#[command(long_about = "
Stagehand v0.1.0

DESCRIPTION:
    Scans work-for-hire contracts for performing artists (voice actors,
    screen actors, stage performers) against a fixed catalog of predatory
    clause patterns. Each detected clause is flagged red (dangerous) or
    yellow (iffy), positive clauses are flagged green, and the contract
    gets an overall risk verdict.

EXAMPLES:
    # Analyze a voice-over contract
    stagehand --path contract.txt --category general-vo

    # Analyze every contract in a folder
    stagehand --path ./contracts --category film-tv

    # Machine-readable output
    stagehand --path contract.txt --category general-vo --format json

    # Export a plain-text report for your records
    stagehand --path contract.txt --category stage-theatre --report

    # Get an advisory second opinion from the cloud analyzer
    stagehand --path contract.txt --category general-vo --ai --consent

THREAT CATEGORIES:
    • Assignment of Rights (ownership transfer)
    • Perpetual Irrevocable License (forever, no revocation)
    • Future Technologies Clause (AI training, unknown media)
    • Derivative Works (remixing, voice cloning)
    • Vague Purpose Clause (undefined usage rights)
    • Expansive Partner License (uncontrolled sublicensing)
    • Unilateral Modification (they change the rules)
    • Broad Indemnification (you pay for their mistakes)
    • Mandatory Arbitration (no day in court)
")]
struct Args {
    #[arg(
        short,
        long,
        help = "Path to the contract file (.txt, .md) or directory to scan",
        value_name = "FILE_OR_DIR"
    )]
    path: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Contract category",
        value_parser = ["general-vo", "film-tv", "stage-theatre"]
    )]
    category: Option<String>,

    #[arg(
        short,
        long,
        help = "Output format",
        default_value = "text",
        value_parser = ["text", "json"]
    )]
    format: String,

    #[arg(long, help = "Export the analysis as a plain-text report file")]
    report: bool,

    #[arg(long, help = "Also ask the cloud AI analyzer for an advisory second opinion")]
    ai: bool,

    #[arg(long, help = "Consent to sending the contract text to the cloud analyzer")]
    consent: bool,

    #[arg(long, help = "Do not store the analysis in the local vault")]
    no_save: bool,

    #[arg(long, help = "Show the stored analysis and its time to expiry")]
    vault_status: bool,

    #[arg(long, help = "Clear the stored analysis")]
    clear_vault: bool,

    #[arg(short, long, help = "Enable verbose output")]
    verbose: bool,

    #[arg(long, help = "Show usage examples")]
    examples: bool,
}

fn main() {
    let args = Args::parse();

    if args.examples {
        show_examples();
        return;
    }

    let vault = Vault::in_dir(Path::new("."));

    if args.clear_vault {
        vault.clear();
        println!("{} Vault cleared.", "🗑️ ".green());
        return;
    }

    if args.vault_status {
        show_vault_status(&vault);
        return;
    }

    let path = match &args.path {
        Some(p) => p.clone(),
        None => {
            eprintln!("{}", "❌ Error: --path is required".red().bold());
            eprintln!(
                "{}",
                "Use --help for more information or --examples for usage examples".yellow()
            );
            std::process::exit(1);
        }
    };

    let category = match parse_category(args.category.as_deref()) {
        Some(c) => c,
        None => {
            eprintln!(
                "{}",
                "❌ Error: --category is required (general-vo, film-tv, stage-theatre)"
                    .red()
                    .bold()
            );
            std::process::exit(1);
        }
    };

    if args.ai && !args.consent {
        eprintln!(
            "{}",
            "❌ Error: --ai sends the contract text to a third-party service; pass --consent to confirm"
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    println!("{}", "🎭 Stagehand Contract Analyzer v0.1.0".bright_blue().bold());
    println!("{}", "=".repeat(55).bright_blue());

    if !path.exists() {
        eprintln!(
            "{} Path does not exist: {}",
            "❌ Error:".red().bold(),
            path.display()
        );
        std::process::exit(1);
    }

    let scanner = ClauseScanner::new(args.verbose);
    let reporter = AnalysisReporter::new(&args.format);

    if path.is_file() {
        if !analyze_file(&scanner, &reporter, &vault, &path, category, &args) {
            std::process::exit(1);
        }
    } else if path.is_dir() {
        analyze_directory(&scanner, &reporter, &vault, &path, category, &args);
    }
}

fn parse_category(value: Option<&str>) -> Option<ContractCategory> {
    match value? {
        "general-vo" => Some(ContractCategory::GeneralVo),
        "film-tv" => Some(ContractCategory::FilmTv),
        "stage-theatre" => Some(ContractCategory::StageTheatre),
        _ => None,
    }
}

/// Analyze one contract file end to end. Returns false when the file could
/// not be analyzed.
fn analyze_file(
    scanner: &ClauseScanner,
    reporter: &AnalysisReporter,
    vault: &Vault,
    path: &Path,
    category: ContractCategory,
    args: &Args,
) -> bool {
    println!("\n{} {}", "📄 Analyzing contract:".green(), path.display());

    let contract_text = match ingest::read_contract_text(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".red().bold(), e);
            return false;
        }
    };

    let result = scanner.scan(&contract_text, category);
    let analysis = risk::build_analysis(&contract_text, category, &result);

    reporter.print_analysis(&analysis);

    if args.ai {
        run_ai_analysis(&contract_text, category, reporter);
    }

    if args.report {
        export_report(&analysis);
    }

    if !args.no_save {
        match vault.save(&analysis) {
            Ok(entry) => {
                if args.verbose {
                    println!(
                        "💾 Analysis saved to vault (expires {})",
                        entry.expires_at.format("%Y-%m-%d")
                    );
                }
            }
            Err(e) => eprintln!("{} Could not save to vault: {}", "⚠️ ".yellow(), e),
        }
    }

    true
}

fn analyze_directory(
    scanner: &ClauseScanner,
    reporter: &AnalysisReporter,
    vault: &Vault,
    dir: &Path,
    category: ContractCategory,
    args: &Args,
) {
    println!("\n{} {}", "📁 Scanning directory:".green(), dir.display());

    let files = ingest::collect_contract_files(dir);
    if files.is_empty() {
        println!("{}", "⚠️ No contract files (.txt, .md) found in directory".yellow());
        return;
    }

    println!("{} {} contract files found", "✅".green(), files.len());

    let mut failures = 0;
    for path in &files {
        if !analyze_file(scanner, reporter, vault, path, category, args) {
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!(
            "\n{} {} file(s) could not be analyzed",
            "⚠️ ".yellow(),
            failures
        );
    }
}

/// Advisory cloud pass. Prints its flags separately from the pattern
/// results; failures inside the analyzer already degrade to empty.
fn run_ai_analysis(contract_text: &str, category: ContractCategory, reporter: &AnalysisReporter) {
    let analyzer = match AiAnalyzer::from_env() {
        Some(a) => a,
        None => {
            eprintln!(
                "{} Cloud analyzer not configured (set {} and {}); skipping",
                "⚠️ ".yellow(),
                ai_analyzer::ENV_BASE_URL,
                ai_analyzer::ENV_API_KEY
            );
            return;
        }
    };

    println!("\n{}", "🤖 Requesting advisory AI analysis...".bright_cyan());
    let result = analyzer.analyze(contract_text, category);

    if result.threats.is_empty() && result.green_flags.is_empty() {
        println!("{}", "🤖 AI analysis returned no additional findings.".dimmed());
        return;
    }

    let ai_view = risk::build_analysis(contract_text, category, &result);
    println!("{}", "🤖 AI ANALYSIS (advisory only)".bright_cyan().bold());
    reporter.print_analysis(&ai_view);
}

fn export_report(analysis: &ContractAnalysis) {
    let report = reporter::generate_text_report(analysis);
    let file_name = format!(
        "contract-analysis-{}.txt",
        analysis.analyzed_at.format("%Y%m%d-%H%M%S")
    );

    match std::fs::write(&file_name, report) {
        Ok(()) => println!("{} Report exported to {}", "📥".green(), file_name),
        Err(e) => eprintln!("{} Could not write report: {}", "❌ Error:".red().bold(), e),
    }
}

fn show_vault_status(vault: &Vault) {
    match vault.load() {
        Some(entry) => {
            let summary = risk::summarize(&entry.analysis.flags);
            println!("{}", "🔐 VAULT STATUS".bright_blue().bold());
            println!(
                "  Category: {}",
                entry.analysis.category.title().bright_white()
            );
            println!(
                "  Analyzed: {}",
                entry.analysis.analyzed_at.format("%Y-%m-%d %H:%M UTC")
            );
            println!(
                "  Risk: {}",
                summary
                    .overall_risk
                    .label()
                    .color(summary.overall_risk.color())
                    .bold()
            );
            println!(
                "  Flags: {} red, {} yellow, {} green",
                summary.red_flags, summary.yellow_flags, summary.green_flags
            );
            if let Some(remaining) = vault.time_until_expiry() {
                println!(
                    "  Expires in: {}",
                    vault::format_time_remaining(remaining).bright_yellow()
                );
            }
        }
        None => {
            println!("{}", "🔐 Vault is empty (or the last analysis expired).".dimmed());
        }
    }
}

fn show_examples() {
    println!("{}", "🎭 Stagehand - Usage Examples".bright_blue().bold());
    println!("{}", "=".repeat(60).bright_blue());

    println!("\n{}", "📋 Basic Usage:".bright_green().bold());
    println!("  {}", "stagehand --path contract.txt --category general-vo".bright_white());
    println!("    Analyze a single voice-over contract");

    println!("\n{}", "📋 Directory Scan:".bright_green().bold());
    println!("  {}", "stagehand --path ./contracts --category film-tv".bright_white());
    println!("    Analyze every .txt/.md contract under a directory");

    println!("\n{}", "📋 JSON Output:".bright_green().bold());
    println!(
        "  {}",
        "stagehand --path contract.txt --category general-vo --format json".bright_white()
    );
    println!("    Machine-readable analysis for further processing");

    println!("\n{}", "📋 Report Export:".bright_green().bold());
    println!(
        "  {}",
        "stagehand --path contract.txt --category stage-theatre --report".bright_white()
    );
    println!("    Save a plain-text report next to the contract");

    println!("\n{}", "📋 Vault:".bright_green().bold());
    println!("  {}", "stagehand --vault-status".bright_white());
    println!("    Show the stored analysis; entries expire after 7 days");

    println!("\n{}", "🚩 Severity Levels:".bright_yellow().bold());
    println!("  • {} Red - predatory, renegotiate before signing", "🚨".red());
    println!("  • {} Yellow - vague or unfavorable, seek clarification", "⚠️ ".yellow());
    println!("  • {} Green - standard, fair industry terms", "✅".green());

    println!("\n{}", "💡 Pro Tips:".bright_cyan().bold());
    println!("  • Voice and film/TV categories get stricter AI-clause screening");
    println!("  • Use --format json for integrations");
    println!("  • This tool is a diagnostic aid, not legal advice");
}
