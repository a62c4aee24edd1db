#![deny(clippy::all, clippy::pedantic)]

use quillpost_api_types::{ClassifyRequest, ClassifyResponse};
use reqwest::Method;

use crate::args::ClassifyCmd;
use crate::client::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: ClassifyCmd) -> Result<(), CliError> {
    let summary = read_value(cmd.summary, cmd.summary_file, "summary")?;
    let body = ClassifyRequest { summary };
    let response: ClassifyResponse = ctx
        .request(Method::POST, "api/classify", Some(&body))
        .await?;
    print_json(&response)
}
