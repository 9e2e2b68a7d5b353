//! `ipasn asn` - AS number descriptions.

use anyhow::Result;
use std::process::ExitCode;

use super::{lookup_all, parse_asn, split_inputs, Context};
use crate::cli::args::AsnArgs;

pub async fn execute(ctx: Context, args: AsnArgs) -> Result<ExitCode> {
    let client = ctx.client()?;

    let results = lookup_all(split_inputs(&args.asns), |input| {
        let client = client.clone();
        async move { Ok(client.asn(parse_asn(&input)?).await?) }
    })
    .await;

    ctx.report(results)
}
