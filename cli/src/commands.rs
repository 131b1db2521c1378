pub mod classify;
pub mod infer;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adscout")]
#[command(about = "Infers Active Directory topology from nmap scan reports.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Reduce output (-q drops decoration, -qq only prints the summary)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer domains, hosts, services and domain controllers from a report
    #[command(alias = "i")]
    Infer {
        /// nmap XML report (`nmap -sV -sC -oX`)
        report: PathBuf,
        /// Project the inferred topology is registered under
        #[arg(short, long, default_value = "default")]
        project: String,
    },
    /// Decide whether a single host looks like a domain controller
    #[command(alias = "c")]
    Classify {
        /// nmap XML report (`nmap -sV -sC -oX`)
        report: PathBuf,
        /// Address of the host to classify
        #[arg(long)]
        host: String,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
