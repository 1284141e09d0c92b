//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::chat::ChatArgs;
use super::commands::stack::StackArgs;
use super::commands::workflow::WorkflowArgs;

#[derive(Parser)]
#[command(name = "redstone")]
#[command(about = "Redstone - Multi-agent workflow engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a message through a stack or workflow
    Chat(ChatArgs),

    /// Workflow definition commands
    Workflow(WorkflowArgs),

    /// Stack roster commands
    Stack(StackArgs),
}
