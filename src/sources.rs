use anyhow::Result;

use crate::config::Config;
use crate::models::RequesterId;
use crate::transport::ArchiveTransport;

/// Print a per-channel audit of the access gate's inputs: the service
/// account's permission standing in each configured channel, and — when a
/// requester is given — that requester's membership. Probe failures print
/// as DENIED, matching the gate's downgrade-to-denial policy.
pub async fn list_sources(
    transport: &dyn ArchiveTransport,
    config: &Config,
    requester: Option<RequesterId>,
) -> Result<()> {
    if config.sources.channels.is_empty() {
        println!("No channels configured.");
        return Ok(());
    }

    match requester {
        Some(requester) => println!("{:<16} {:<12} MEMBER ({})", "CHANNEL", "PERMISSION", requester),
        None => println!("{:<16} {:<12}", "CHANNEL", "PERMISSION"),
    }

    for &source in &config.sources.channels {
        let permitted = transport
            .has_required_permission(source)
            .await
            .unwrap_or(false);
        let permission = if permitted { "OK" } else { "DENIED" };

        match requester {
            Some(requester) => {
                let member = transport.is_member(requester, source).await.unwrap_or(false);
                println!(
                    "{:<16} {:<12} {}",
                    source.to_string(),
                    permission,
                    if member { "yes" } else { "no" }
                );
            }
            None => println!("{:<16} {:<12}", source.to_string(), permission),
        }
    }

    Ok(())
}
