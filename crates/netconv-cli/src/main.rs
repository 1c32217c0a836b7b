//! `netconv` binary

use clap::{value_parser, Arg, ArgAction, Command};
use netconv_cli::{band_command, init_tracing, run_command, verify_command, RunArgs};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("netconv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Network configuration convergence and compliance verification")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("run")
                .about("Run one convergence over a network snapshot")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML run configuration"),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Template JSON object"),
                )
                .arg(
                    Arg::new("network")
                        .long("network")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Network snapshot JSON with cells and objects"),
                )
                .arg(
                    Arg::new("closed-loop")
                        .long("closed-loop")
                        .action(ArgAction::SetTrue)
                        .help("Apply changes instead of only reporting them"),
                )
                .arg(
                    Arg::new("report-dir")
                        .long("report-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the report as JSON into this directory"),
                ),
        )
        .subcommand(
            Command::new("band")
                .about("Print the band key of a channel and width")
                .arg(
                    Arg::new("channel")
                        .long("channel")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("EARFCN"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .required(true)
                        .help("Channel width, e.g. \"20 MHz\""),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Classify checked state against an etalon")
                .arg(
                    Arg::new("etalon")
                        .long("etalon")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Expected state JSON"),
                )
                .arg(
                    Arg::new("checked")
                        .long("checked")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Observed state JSON"),
                )
                .arg(
                    Arg::new("delete")
                        .long("delete")
                        .action(ArgAction::SetTrue)
                        .help("Verify deletions instead of creates and updates"),
                ),
        );

    let matches = cli.get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("run", args)) => {
            let run = RunArgs {
                config: args.get_one::<PathBuf>("config").cloned(),
                template: args.get_one::<PathBuf>("template").cloned().unwrap_or_default(),
                network: args.get_one::<PathBuf>("network").cloned().unwrap_or_default(),
                closed_loop: args.get_flag("closed-loop"),
                report_dir: args.get_one::<PathBuf>("report-dir").cloned(),
            };
            let summary = run_command(&run).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if summary.ensure_within_threshold().is_err() {
                std::process::exit(2);
            }
        }
        Some(("band", args)) => {
            let channel = args.get_one::<i64>("channel").copied().unwrap_or_default();
            let width = args.get_one::<String>("width").map_or("", String::as_str);
            println!("{}", band_command(channel, width)?);
        }
        Some(("verify", args)) => {
            let etalon = args.get_one::<PathBuf>("etalon").cloned().unwrap_or_default();
            let checked = args.get_one::<PathBuf>("checked").cloned().unwrap_or_default();
            let result = verify_command(&etalon, &checked, args.get_flag("delete"))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}
