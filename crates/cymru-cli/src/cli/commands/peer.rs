//! `ipasn peer` - BGP peers of the origin of addresses.

use anyhow::Result;
use std::process::ExitCode;

use super::{lookup_all, parse_ip, split_inputs, Context};
use crate::cli::args::IpArgs;

pub async fn execute(ctx: Context, args: IpArgs) -> Result<ExitCode> {
    let client = ctx.client()?;

    let results = lookup_all(split_inputs(&args.ips), |input| {
        let client = client.clone();
        async move { Ok(client.peer(parse_ip(&input)?).await?) }
    })
    .await;

    ctx.report(results)
}
