use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use herald_analytics::{
    ActorId, AuthState, BrowserContext, EventData, EventType, EventValue, Tracker,
    DEFAULT_USER_AGENT,
};
use herald_event_store::{EventSink, InMemoryEventStore, MemoryCfg, RestEventSink};
use tracing::info;

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct TrackArgs {
    /// Event type, e.g. `page_view` or `follow`
    #[arg(value_name = "EVENT")]
    pub event: String,

    /// Acting user id
    #[arg(long)]
    pub user: String,

    /// Payload entry as KEY=VALUE (repeatable)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// Navigation path recorded as `url`
    #[arg(long, default_value = "/")]
    pub url: String,

    /// Document referrer
    #[arg(long, default_value = "")]
    pub referrer: String,

    /// Print the enriched record without sending it
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn cmd_track(args: TrackArgs, config: &Config) -> Result<()> {
    let event_type: EventType = args.event.parse().map_err(|err| {
        let known: Vec<&str> = EventType::ALL.iter().map(|known| known.as_str()).collect();
        anyhow!("{err}; expected one of: {}", known.join(", "))
    })?;
    let actor = ActorId::parse(&args.user).context("--user must not be blank")?;
    let data = parse_data(&args.data)?;

    let sink: Arc<dyn EventSink> = match (args.dry_run, config.sink.rest()) {
        (false, Some(cfg)) => Arc::new(RestEventSink::new(cfg)?),
        (false, None) => bail!(
            "no event sink configured; set sink.url/sink.api_key or HERALD_SINK_URL/HERALD_SINK_API_KEY, or pass --dry-run"
        ),
        (true, _) => InMemoryEventStore::new(MemoryCfg::default()),
    };

    let browser = BrowserContext::new(DEFAULT_USER_AGENT, args.referrer);
    browser.navigate(args.url);
    let tracker = Tracker::builder(Arc::clone(&sink))
        .actor(Arc::new(AuthState::signed_in(actor)))
        .navigation(Arc::new(browser))
        .build()?;

    let record = tracker
        .build_record(event_type, data)
        .context("no authenticated actor")?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    if args.dry_run {
        return Ok(());
    }

    let ack = sink.append(record).await?;
    if ack.accepted {
        info!(target: "herald::tracker", event_type = %event_type, "event recorded");
        println!("accepted");
    } else {
        println!(
            "dropped: {}",
            ack.dropped_reason.as_deref().unwrap_or("unspecified")
        );
    }
    Ok(())
}

fn parse_data(entries: &[String]) -> Result<EventData> {
    let mut data = EventData::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("invalid --data entry `{entry}`; expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid --data entry `{entry}`; key is empty");
        }
        data.insert(key, parse_value(value.trim()));
    }
    Ok(data)
}

fn parse_value(raw: &str) -> EventValue {
    match raw {
        "true" => return EventValue::Bool(true),
        "false" => return EventValue::Bool(false),
        "null" => return EventValue::Null,
        _ => {}
    }
    if let Ok(value) = raw.parse::<i64>() {
        return value.into();
    }
    if let Ok(value) = raw.parse::<f64>() {
        if value.is_finite() {
            return value.into();
        }
    }
    EventValue::from(raw)
}
