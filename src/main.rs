// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! vserver CLI - TP-Link virtual server management
//!
//! Reads the router host and password from `TPLINK_HOST` and
//! `TPLINK_PASSWORD`. Without a command it runs the demo sequence.

use std::env;
use std::net::Ipv4Addr;
use std::process::ExitCode;

use anyhow::{bail, Context};
use vserver::{PortRange, Protocol, Router, RuleSpec, RuleStatus, RuleTable};

/// Address the demo adds and removes rules for
const DEMO_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 254);

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vserver=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("demo");
    let rest = args.get(2..).unwrap_or(&[]);

    let result = match command {
        "demo" => run_demo().await,
        "list" => list(rest).await,
        "add" => add(rest).await,
        "delete" => delete(rest).await,
        "enable" => set_status(rest, RuleStatus::Enabled).await,
        "disable" => set_status(rest, RuleStatus::Disabled).await,
        "clear" => clear(rest).await,
        "dump" => dump(rest).await,
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("vserver {}", vserver::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<vserver::Error>().map_or(false, |e| e.is_scrape()) {
                eprintln!("The router page did not look as expected; check TPLINK_PASSWORD.");
            }
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"vserver - TP-Link virtual server (port forwarding) manager

USAGE:
    vserver [COMMAND] [OPTIONS]

COMMANDS:
    demo                         List, add ports 1-9 for {demo}, re-list, delete them (default)
    list [--json]                Show all rules grouped by target address
    add <ip> <port|start-end>    Add a rule
        [--internal <port>] [--protocol all|tcp|udp] [--disabled]
    delete <index> <page>        Delete the rule at index/page
    enable <index> <page>        Enable the rule at index/page
    disable <index> <page>       Disable the rule at index/page
    clear <ip>                   Delete every rule targeting ip
    dump [page]                  Print the script arrays of a listing page
    help                         Show this help message
    version                      Show version information

ENVIRONMENT:
    TPLINK_HOST       Router address, e.g. 192.168.0.1
    TPLINK_PASSWORD   Admin password
    TPLINK_USER       Admin user (default: admin)
    RUST_LOG          Log filter (default: vserver=info)
"#,
        demo = DEMO_IP
    );
}

async fn connect() -> anyhow::Result<Router> {
    println!("Logging in...");
    Router::from_env().await.context("Unable to login")
}

fn show_rules(table: &RuleTable) {
    if table.is_empty() {
        println!("No virtual servers");
        return;
    }
    for (ip, group) in table.grouped() {
        for rule in group {
            println!("{} {}", ip, rule);
        }
    }
}

async fn run_demo() -> anyhow::Result<()> {
    let router = connect().await?;

    println!("Getting servers...");
    let table = router.list_rules().await?;
    show_rules(&table);

    println!("Adding servers...");
    for port in 1..10 {
        println!("Adding {}", port);
        let spec = RuleSpec::new(DEMO_IP, PortRange::single(port)?);
        router.add_rule(&spec).await?;
    }

    println!("Refreshing servers...");
    println!("Deleting servers...");
    for rule in router.delete_rules_for(DEMO_IP).await? {
        println!("Deleted {}", rule);
    }

    println!("Refreshing servers...");
    let table = router.list_rules().await?;
    show_rules(&table);

    Ok(())
}

async fn list(args: &[String]) -> anyhow::Result<()> {
    let json = args.iter().any(|a| a == "--json");
    let router = connect().await?;
    let table = router.list_rules().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{} virtual servers", table.len());
        show_rules(&table);
    }
    Ok(())
}

fn parse_add_args(args: &[String]) -> anyhow::Result<RuleSpec> {
    let (ip, ports) = match args {
        [ip, ports, ..] => (ip, ports),
        _ => bail!("Usage: vserver add <ip> <port|start-end> [--internal <port>] [--protocol all|tcp|udp] [--disabled]"),
    };

    let ip: Ipv4Addr = ip
        .parse()
        .with_context(|| format!("Invalid address '{}'", ip))?;
    let mut spec = RuleSpec::new(ip, ports.parse::<PortRange>()?);

    let mut options = args[2..].iter();
    while let Some(option) = options.next() {
        match option.as_str() {
            "--internal" => {
                let value = options.next().context("--internal needs a port")?;
                let port: u16 = value
                    .parse()
                    .with_context(|| format!("Invalid internal port '{}'", value))?;
                spec = spec.internal_port(port);
            }
            "--protocol" => {
                let value = options.next().context("--protocol needs a value")?;
                spec = spec.protocol(value.parse::<Protocol>()?);
            }
            "--disabled" => spec = spec.status(RuleStatus::Disabled),
            other => bail!("Unknown option: {}", other),
        }
    }
    Ok(spec)
}

async fn add(args: &[String]) -> anyhow::Result<()> {
    let spec = parse_add_args(args)?;
    let router = connect().await?;
    router.add_rule(&spec).await?;
    println!("Added {} -> {}", spec.ports, spec.ip_addr);
    Ok(())
}

fn parse_position(args: &[String], command: &str) -> anyhow::Result<(u32, u32)> {
    match args {
        [index, page, ..] => {
            let index: u32 = index
                .parse()
                .with_context(|| format!("Invalid index '{}'", index))?;
            let page: u32 = page
                .parse()
                .with_context(|| format!("Invalid page '{}'", page))?;
            Ok((index, page))
        }
        _ => bail!("Usage: vserver {} <index> <page>", command),
    }
}

async fn delete(args: &[String]) -> anyhow::Result<()> {
    let (index, page) = parse_position(args, "delete")?;
    let router = connect().await?;
    router.delete_rule(index, page).await?;
    println!("Deleted #{} on page {}", index, page);
    Ok(())
}

async fn set_status(args: &[String], status: RuleStatus) -> anyhow::Result<()> {
    let command = match status {
        RuleStatus::Enabled => "enable",
        RuleStatus::Disabled => "disable",
    };
    let (index, page) = parse_position(args, command)?;
    let router = connect().await?;

    let table = router.list_rules().await?;
    let rule = table
        .find(index, page)
        .with_context(|| format!("No rule #{} on page {}", index, page))?;
    router.set_rule_status(rule, status).await?;
    println!("{} is now {}", rule, status);
    Ok(())
}

async fn clear(args: &[String]) -> anyhow::Result<()> {
    let ip: Ipv4Addr = match args.first() {
        Some(ip) => ip
            .parse()
            .with_context(|| format!("Invalid address '{}'", ip))?,
        None => bail!("Usage: vserver clear <ip>"),
    };

    let router = connect().await?;
    let deleted = router.delete_rules_for(ip).await?;
    for rule in &deleted {
        println!("Deleted {}", rule);
    }
    println!("{} rules removed for {}", deleted.len(), ip);
    Ok(())
}

async fn dump(args: &[String]) -> anyhow::Result<()> {
    let page: u32 = match args.first() {
        Some(page) => page
            .parse()
            .with_context(|| format!("Invalid page '{}'", page))?,
        None => 1,
    };

    let router = connect().await?;
    let html = router.page_source(page).await?;
    let arrays = vserver::scan_arrays(&html);
    if arrays.is_empty() {
        println!("No script arrays on page {}", page);
    }
    for array in arrays {
        match array.values {
            Some(values) => println!(
                "{} ({} values): {}",
                array.name,
                values.len(),
                serde_json::Value::Array(values)
            ),
            None => println!("{} (unparsed): {}", array.name, array.raw),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_add_args() {
        let spec = parse_add_args(&args(&[
            "192.168.0.10",
            "8000-8010",
            "--internal",
            "80",
            "--protocol",
            "tcp",
            "--disabled",
        ]))
        .unwrap();

        assert_eq!(spec.ip_addr, Ipv4Addr::new(192, 168, 0, 10));
        assert_eq!(spec.ports.to_string(), "8000-8010");
        assert_eq!(spec.internal_port, Some(80));
        assert_eq!(spec.protocol, Protocol::Tcp);
        assert_eq!(spec.status, RuleStatus::Disabled);
    }

    #[test]
    fn test_parse_add_args_rejects() {
        assert!(parse_add_args(&args(&["192.168.0.10"])).is_err());
        assert!(parse_add_args(&args(&["nope", "80"])).is_err());
        assert!(parse_add_args(&args(&["10.0.0.1", "80", "--bogus"])).is_err());
        assert!(parse_add_args(&args(&["10.0.0.1", "80", "--internal"])).is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position(&args(&["3", "1"]), "delete").unwrap(), (3, 1));
        assert!(parse_position(&args(&["3"]), "delete").is_err());
        assert!(parse_position(&args(&["x", "1"]), "delete").is_err());
    }
}
