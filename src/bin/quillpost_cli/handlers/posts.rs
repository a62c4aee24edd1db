#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use quillpost_api_types::{CreatePostRequest, PostPayload};
use reqwest::Method;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List => list(ctx).await,
        PostsCmd::Get { id } => get(ctx, &id).await,
        PostsCmd::Create {
            title,
            content,
            content_file,
        } => create(ctx, title, content, content_file).await,
    }
}

async fn list(ctx: &Ctx) -> Result<(), CliError> {
    let posts: Vec<PostPayload> = ctx.get("api/posts").await?;
    print_json(&posts)
}

async fn get(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    if id.trim().is_empty() {
        return Err(CliError::InvalidInput("id must not be empty".into()));
    }
    let path = format!("api/posts/{}", id.trim());
    let post: PostPayload = ctx.get(&path).await?;
    print_json(&post)
}

async fn create(
    ctx: &Ctx,
    title: String,
    content: Option<String>,
    content_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let content = read_value(content, content_file, "content")?;
    let body = CreatePostRequest { title, content };
    let post: PostPayload = ctx.request(Method::POST, "api/posts", Some(&body)).await?;
    print_json(&post)
}
