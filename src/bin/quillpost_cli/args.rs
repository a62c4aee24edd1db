//! Command-line surface for `quillpost-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quillpost-cli", version, about = "Quillpost blog API CLI", long_about = None)]
pub struct Cli {
    /// API base URL, e.g. <http://localhost:3000>
    #[arg(long, env = "QUILLPOST_SITE_URL")]
    pub site: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post listing and submission
    Posts(PostsArgs),
    /// Classify a summary with the server's classifier
    Classify(ClassifyCmd),
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List all posts, newest first
    List,
    /// Show one post by id
    Get {
        #[arg(long)]
        id: String,
    },
    /// Submit a new post; the server classifies and announces it
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the content from a file instead of --content
        #[arg(long, value_name = "PATH")]
        content_file: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
pub struct ClassifyCmd {
    /// Summary text to classify
    #[arg(long, conflicts_with = "summary_file")]
    pub summary: Option<String>,
    /// Read the summary from a file instead of --summary
    #[arg(long, value_name = "PATH")]
    pub summary_file: Option<PathBuf>,
}
