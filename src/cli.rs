// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn record_args(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("description")
            .long("description")
            .short('d')
            .required(required)
            .help("What the money was for"),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .short('a')
            .required(required)
            .allow_hyphen_values(true)
            .help("Signed amount: positive for income, negative for expense"),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD (defaults to today)"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .short('c')
            .help("Category label (defaults to Uncategorized)"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("Transaction id")
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(crate_version!())
        .about("Track income and expenses with a filterable, sortable history")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINTRACK_DB")
                .help("Path to the storage file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (repeatable)"),
        )
        .arg(
            Arg::new("skip_invalid")
                .long("skip-invalid")
                .global(true)
                .action(ArgAction::SetTrue)
                .help(
                    "Skip stored transactions that fail validation instead of aborting; \
                     skipped records are kept in storage unchanged",
                ),
        )
        .subcommand(Command::new("init").about("Create storage and print its location"))
        .subcommand(
            Command::new("tx")
                .about("Record, change and list transactions")
                .subcommand(record_args(
                    Command::new("add").about("Record a new transaction"),
                    true,
                ))
                .subcommand(record_args(
                    Command::new("edit")
                        .about("Replace a transaction; omitted fields keep their value")
                        .arg(id_arg()),
                    false,
                ))
                .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
                .subcommand(json_args(
                    Command::new("list")
                        .about("List transactions")
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .short('s')
                                .default_value("")
                                .help("Case-insensitive text to look for in descriptions"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .default_value("All")
                                .help("Only this category, or All"),
                        )
                        .arg(
                            Arg::new("window")
                                .long("window")
                                .short('w')
                                .default_value("All")
                                .help("Only the last N days, or All"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("date-desc")
                                .help(
                                    "date-desc, date-asc, amount-desc, amount-asc, name-asc or name-desc",
                                ),
                        ),
                )),
        )
        .subcommand(json_args(
            Command::new("summary").about("Balance, income and expense over all transactions"),
        ))
        .subcommand(
            Command::new("category")
                .about("Categories in use")
                .subcommand(json_args(
                    Command::new("list").about("List categories with transaction counts"),
                )),
        )
        .subcommand(Command::new("doctor").about("Check stored transactions for problems"))
}
