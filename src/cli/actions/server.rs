use crate::cli::actions::Action;
use crate::sigelo;
use anyhow::{anyhow, Result};
use tracing::warn;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            access_ttl,
            refresh_ttl,
        } => {
            let parsed = Url::parse(&dsn)?;

            match parsed.scheme() {
                "postgres" | "postgresql" => (),
                scheme => return Err(anyhow!("unsupported DSN scheme: {scheme}")),
            }

            // Not enforced, but an access token outliving the refresh token
            // defeats the point of the pair.
            if access_ttl >= refresh_ttl {
                warn!(
                    access_ttl = access_ttl.as_secs(),
                    refresh_ttl = refresh_ttl.as_secs(),
                    "access token TTL is not below the refresh token TTL"
                );
            }

            sigelo::new(port, dsn, access_ttl, refresh_ttl).await?;
        }
    }

    Ok(())
}
