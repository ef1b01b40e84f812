use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::config::RuntimeConfig;
use crate::models::{ReportEnvelope, json_schema};
use crate::sqlite::create_schema_sql;

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &SchemaArgs, config: &RuntimeConfig) -> Result<()> {
    println!("schema: start db={}", config.db_path.display());

    if args.json {
        let envelope = ReportEnvelope::ok(
            "schema",
            json!({
                "sqlite_ddl": create_schema_sql(),
                "weekly_metric": json_schema(),
            }),
        );
        let encoded =
            serde_json::to_string(&envelope).context("failed to encode schema envelope")?;
        println!("{encoded}");
    } else {
        println!("{}", create_schema_sql());
        let pretty = serde_json::to_string_pretty(&json_schema())
            .context("failed to encode weekly metric schema")?;
        println!("{pretty}");
    }

    println!("schema: complete");
    Ok(())
}
