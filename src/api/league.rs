//! Ranked-league endpoint builders.

use serde::de::DeserializeOwned;

use super::client::ApiClient;
use super::url::inject;
use crate::error::{FloodgateError, Result};
use crate::region::Region;
use crate::transport::Transport;

/// Ranked queues exposed by the league endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Queue {
    RankedSolo5x5,
    RankedFlexSr,
}

impl Queue {
    /// The token used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::RankedSolo5x5 => "RANKED_SOLO_5x5",
            Queue::RankedFlexSr => "RANKED_FLEX_SR",
        }
    }
}

/// Ranked tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    /// The token used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }
}

/// Divisions within a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

impl Division {
    /// The token used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Division::I => "I",
            Division::II => "II",
            Division::III => "III",
            Division::IV => "IV",
        }
    }
}

/// Builders for the league endpoints.
pub struct LeagueApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> LeagueApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// One page of entries for a queue, tier, and division. Pages start at 1.
    pub async fn entries_by_division<D>(
        &self,
        region: Region,
        queue: Queue,
        tier: Tier,
        division: Division,
        page: u32,
    ) -> Result<D>
    where
        D: DeserializeOwned,
    {
        if page < 1 {
            return Err(FloodgateError::InvalidArgument(format!(
                "page numbers start at 1, got {page}"
            )));
        }
        let path = inject(
            "/league/v4/entries/{queue}/{tier}/{division}",
            &[
                ("queue", queue.as_str()),
                ("tier", tier.as_str()),
                ("division", division.as_str()),
            ],
        );
        self.client
            .get(
                region.into(),
                "league.entries_by_division",
                &path,
                &[("page", Some(page.to_string()))],
            )
            .await
    }

    /// Entries in every queue for the summoner with `summoner_id`.
    pub async fn entries_by_summoner<D>(&self, region: Region, summoner_id: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject(
            "/league/v4/entries/by-summoner/{summonerId}",
            &[("summonerId", summoner_id)],
        );
        self.client
            .get(region.into(), "league.entries_by_summoner", &path, &[])
            .await
    }

    /// The challenger league for `queue`.
    pub async fn challenger<D>(&self, region: Region, queue: Queue) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject(
            "/league/v4/challengerleagues/by-queue/{queue}",
            &[("queue", queue.as_str())],
        );
        self.client
            .get(region.into(), "league.challenger", &path, &[])
            .await
    }

    /// The grandmaster league for `queue`.
    pub async fn grandmaster<D>(&self, region: Region, queue: Queue) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject(
            "/league/v4/grandmasterleagues/by-queue/{queue}",
            &[("queue", queue.as_str())],
        );
        self.client
            .get(region.into(), "league.grandmaster", &path, &[])
            .await
    }

    /// The master league for `queue`.
    pub async fn master<D>(&self, region: Region, queue: Queue) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject(
            "/league/v4/masterleagues/by-queue/{queue}",
            &[("queue", queue.as_str())],
        );
        self.client
            .get(region.into(), "league.master", &path, &[])
            .await
    }

    /// The league with `league_id`.
    pub async fn by_id<D>(&self, region: Region, league_id: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let path = inject("/league/v4/leagues/{leagueId}", &[("leagueId", league_id)]);
        self.client
            .get(region.into(), "league.by_id", &path, &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::config::ClientConfig;
    use crate::error::TransportError;
    use crate::transport::{ApiRequest, ApiResponse};

    struct CapturingTransport {
        requests: Arc<Mutex<Vec<ApiRequest>>>,
        body: String,
    }

    #[async_trait]
    impl Transport for CapturingTransport {
        async fn execute(
            &self,
            request: &ApiRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            self.requests.lock().push(request.clone());
            Ok(ApiResponse {
                status: 200,
                headers: HashMap::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client(body: &str) -> (ApiClient<CapturingTransport>, Arc<Mutex<Vec<ApiRequest>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let transport = CapturingTransport {
            requests: Arc::clone(&log),
            body: body.to_string(),
        };
        let client = ApiClient::with_transport(ClientConfig::new("key"), transport).unwrap();
        (client, log)
    }

    #[tokio::test]
    async fn test_division_listing_renders_every_path_token() {
        let (client, log) = client("[]");

        let _: serde_json::Value = client
            .leagues()
            .entries_by_division(Region::Eune, Queue::RankedSolo5x5, Tier::Gold, Division::II, 3)
            .await
            .unwrap();

        assert_eq!(
            log.lock()[0].url,
            "https://eun1.api.riotgames.com/lol/league/v4/entries/RANKED_SOLO_5x5/GOLD/II?page=3"
        );
    }

    #[tokio::test]
    async fn test_page_numbers_start_at_one() {
        let (client, log) = client("[]");

        let err = client
            .leagues()
            .entries_by_division::<serde_json::Value>(
                Region::Na,
                Queue::RankedFlexSr,
                Tier::Silver,
                Division::IV,
                0,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FloodgateError::InvalidArgument(_)));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_apex_leagues_target_their_queue() {
        let (client, log) = client("{}");

        let _: serde_json::Value = client
            .leagues()
            .challenger(Region::Kr, Queue::RankedSolo5x5)
            .await
            .unwrap();

        assert_eq!(
            log.lock()[0].url,
            "https://kr.api.riotgames.com/lol/league/v4/challengerleagues/by-queue/RANKED_SOLO_5x5"
        );
    }
}
