// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn filter_args() -> [Arg; 3] {
    [
        Arg::new("name")
            .long("name")
            .help("Case-insensitive match on sender or recipient"),
        Arg::new("from-date")
            .long("from-date")
            .value_name("YYYY-MM-DD")
            .help("Include transactions from this day on"),
        Arg::new("to-date")
            .long("to-date")
            .value_name("YYYY-MM-DD")
            .help("Include transactions through the end of this day"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("cashflow")
        .version(crate_version!())
        .about("Shared cash ledger between named parties, with spreadsheet sync")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("party")
                .about("Manage parties")
                .subcommand(
                    Command::new("add")
                        .about("Add a party")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("list").about("List parties").args(json_args())),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction and replicate it to the remote")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("credit")
                                .value_parser(["credit", "debit", "claim", "discharge"])
                                .help("credit: sender is owed; debit: sender pays back"),
                        )
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("general")
                                .value_parser(["cash", "bank", "general"]),
                        )
                        .arg(Arg::new("note").long("note").default_value("")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions")
                        .args(filter_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction locally")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("balance")
                .about("Net balance per party")
                .args(json_args()),
        )
        .subcommand(
            Command::new("export")
                .about("Export the filtered transactions to CSV")
                .args(filter_args())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output path (default: cashflow_report_<date>.csv)"),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Synchronize with the remote ledger")
                .subcommand(Command::new("pull").about("Replace local transactions with the remote list"))
                .subcommand(
                    Command::new("watch")
                        .about("Poll the remote until Ctrl-C; reads commands from stdin"),
                ),
        )
        .subcommand(Command::new("insight").about("Ask Gemini for a summary and advice"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show").about("Show resolved configuration"))
                .subcommand(
                    Command::new("set-endpoint")
                        .about("Set the remote ledger url")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("set-config-url")
                        .about("Set the url serving {\"endpoint_url\": ...}")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("set-model")
                        .about("Set the Gemini model")
                        .arg(Arg::new("model").required(true)),
                ),
        )
}
