use std::{fmt, sync::Arc, time::Duration};

use dashmap::DashMap;
use gridmark_config::AssetConfig;
use gridmark_model::{PlayerIdentity, PlayerQuery, TeamKey};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::oracle::{
    CsvFileOracle, IdKind, Oracle, OracleEntry, OracleSource, RemoteCsvOracle,
    fold_name,
};
use crate::{
    error::{AssetError, ResolutionFailure, ResolutionReason, Result},
    teams,
};

/// Outcome of resolving one player query.
pub type Resolution = std::result::Result<PlayerIdentity, ResolutionFailure>;

/// Cross-references partial player identities against the oracle.
///
/// Cheap to clone; clones share the loaded oracle and the resolution memo.
/// The oracle is loaded on first use and kept for the life of the value.
#[derive(Clone)]
pub struct PlayerResolver {
    inner: Arc<ResolverInner>,
}

struct ResolverInner {
    source: Arc<dyn OracleSource>,
    oracle: OnceCell<Arc<Oracle>>,
    memo: DashMap<String, Resolution>,
}

impl fmt::Debug for PlayerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerResolver")
            .field("source", &self.inner.source)
            .field("oracle_loaded", &self.inner.oracle.initialized())
            .field("memoized", &self.inner.memo.len())
            .finish()
    }
}

impl PlayerResolver {
    pub fn new(source: Arc<dyn OracleSource>) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                source,
                oracle: OnceCell::new(),
                memo: DashMap::new(),
            }),
        }
    }

    /// A local oracle file wins over the remote URL.
    pub fn from_config(config: &AssetConfig, client: reqwest::Client) -> Self {
        let source: Arc<dyn OracleSource> = match &config.oracle.path {
            Some(path) => Arc::new(CsvFileOracle::new(path.clone())),
            None => Arc::new(RemoteCsvOracle::new(
                client,
                config.oracle.url.clone(),
                config.http.user_agent.clone(),
                oracle_timeout(config),
            )),
        };
        Self::new(source)
    }

    /// Loaded oracle. A failed load is returned to the caller and retried on
    /// the next call.
    pub async fn oracle(&self) -> Result<Arc<Oracle>> {
        self.inner
            .oracle
            .get_or_try_init(|| async {
                self.inner.source.load().await.map(Arc::new)
            })
            .await
            .cloned()
    }

    /// Resolve a partial identity to a full one.
    ///
    /// Ids are tried first (vendor, then league), then an exact
    /// case-insensitive name match, then a substring match. A team hint
    /// narrows several candidates down; remaining ties go to the first row
    /// in oracle order.
    pub async fn resolve(&self, query: &PlayerQuery) -> Resolution {
        let memo_key = query.to_string().to_lowercase();
        if let Some(hit) = self.inner.memo.get(&memo_key) {
            return hit.value().clone();
        }

        let oracle = match self.oracle().await {
            Ok(oracle) => oracle,
            Err(err) => {
                warn!(query = %query, "player oracle unavailable: {err}");
                return Err(ResolutionFailure {
                    query: query.to_string(),
                    reason: ResolutionReason::OracleUnavailable(err.to_string()),
                });
            }
        };

        let result = resolve_in(&oracle, query);
        match &result {
            Ok(identity) => debug!(query = %query, player = %identity, "resolved player"),
            Err(_) => debug!(query = %query, "player not found in oracle"),
        }
        self.inner.memo.insert(memo_key, result.clone());
        result
    }

    /// GSIS id to ESPN id. `Ok(None)` when the player is unknown or has no
    /// vendor id.
    pub async fn league_to_vendor(&self, league_id: &str) -> Result<Option<String>> {
        let query = PlayerQuery::by_league_id(league_id)?;
        match self.resolve(&query).await {
            Ok(identity) => Ok(identity.vendor_id().map(str::to_string)),
            Err(failure) if failure.is_not_found() => Ok(None),
            Err(failure) => Err(AssetError::Resolution(failure)),
        }
    }

    /// Direct id lookup without name matching or memoization.
    pub async fn lookup_by_id(
        &self,
        kind: IdKind,
        id: &str,
    ) -> Result<Option<PlayerIdentity>> {
        let oracle = self.oracle().await?;
        Ok(oracle.lookup(kind, id).cloned())
    }

    pub fn memoized(&self) -> usize {
        self.inner.memo.len()
    }
}

fn oracle_timeout(config: &AssetConfig) -> Duration {
    // The oracle CSV is a few MB; give it the longest of the asset timeouts.
    config
        .http
        .logo_timeout
        .max(config.http.wordmark_timeout)
        .max(config.http.headshot_timeout)
}

fn resolve_in(oracle: &Oracle, query: &PlayerQuery) -> Resolution {
    let not_found = || ResolutionFailure::not_found(query.to_string());

    if let Some(vendor_id) = query.vendor_id()
        && let Some(identity) = oracle.lookup(IdKind::Vendor, vendor_id)
    {
        return Ok(identity.clone());
    }
    if let Some(league_id) = query.league_id()
        && let Some(identity) = oracle.lookup(IdKind::League, league_id)
    {
        return Ok(identity.clone());
    }

    let Some(name) = query.name() else {
        return Err(not_found());
    };
    let hint = query.team_hint().and_then(|raw| teams::normalize(raw).ok());
    let folded = fold_name(name);

    let exact = matching(oracle, |candidate| candidate == folded);
    let candidates = if exact.is_empty() {
        matching(oracle, |candidate| candidate.contains(&folded))
    } else {
        exact
    };

    prefer_team(candidates, hint)
        .first()
        .map(|entry| entry.identity.clone())
        .ok_or_else(not_found)
}

fn matching<'a, F>(oracle: &'a Oracle, pred: F) -> Vec<&'a OracleEntry>
where
    F: Fn(&str) -> bool,
{
    oracle
        .entries()
        .iter()
        .filter(|entry| entry.name_folded.as_deref().is_some_and(&pred))
        .collect()
}

fn prefer_team(
    candidates: Vec<&OracleEntry>,
    hint: Option<TeamKey>,
) -> Vec<&OracleEntry> {
    let Some(team) = hint else {
        return candidates;
    };
    if candidates.len() < 2 {
        return candidates;
    }
    let on_team: Vec<&OracleEntry> = candidates
        .iter()
        .copied()
        .filter(|entry| entry.team() == Some(team))
        .collect();
    if on_team.is_empty() { candidates } else { on_team }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::oracle::StaticOracle;

    const SAMPLE: &str = "\
gsis_id,espn_id,name,team,position
00-0033873,3139477,Patrick Mahomes,KC,QB
00-0034857,3918298,Josh Allen,BUF,QB
00-0035000,4000001,Josh Allen,JAX,LB
00-0031000,2970000,Allen Robinson,NYG,WR
00-0020000,,Old Timer,OAK,K
";

    fn resolver() -> PlayerResolver {
        let oracle = Oracle::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
        PlayerResolver::new(Arc::new(StaticOracle::new(oracle)))
    }

    #[tokio::test]
    async fn vendor_id_wins_over_league_id() {
        let query = PlayerQuery::new(
            Some("00-0034857".into()),
            Some("3139477".into()),
            None,
        )
        .unwrap();
        let identity = resolver().resolve(&query).await.unwrap();
        assert_eq!(identity.display_name(), Some("Patrick Mahomes"));
    }

    #[tokio::test]
    async fn unknown_vendor_id_falls_through_to_league_id() {
        let query = PlayerQuery::new(
            Some("00-0034857".into()),
            Some("9999999".into()),
            None,
        )
        .unwrap();
        let identity = resolver().resolve(&query).await.unwrap();
        assert_eq!(identity.vendor_id(), Some("3918298"));
    }

    #[tokio::test]
    async fn unknown_ids_fall_back_to_name() {
        let query = PlayerQuery::new(
            Some("00-9999999".into()),
            Some("9999999".into()),
            Some("Patrick Mahomes".into()),
        )
        .unwrap();
        let identity = resolver().resolve(&query).await.unwrap();
        assert_eq!(identity.league_id(), Some("00-0033873"));
    }

    #[tokio::test]
    async fn team_hint_matches_vendor_feed_codes() {
        let csv = "\
gsis_id,espn_id,name,team
00-1,111,Josh Allen,JAC
00-2,222,Josh Allen,KCC
";
        let oracle = Oracle::from_csv_bytes(csv.as_bytes()).unwrap();
        let resolver = PlayerResolver::new(Arc::new(StaticOracle::new(oracle)));
        let query = PlayerQuery::by_name("Josh Allen")
            .unwrap()
            .with_team_hint("KC");
        let identity = resolver.resolve(&query).await.unwrap();
        assert_eq!(identity.vendor_id(), Some("222"));
        assert_eq!(identity.team(), Some(TeamKey::Kc));
    }

    #[tokio::test]
    async fn team_hint_breaks_name_ties() {
        let resolver = resolver();
        let query = PlayerQuery::by_name("josh allen").unwrap();
        let first = resolver.resolve(&query).await.unwrap();
        assert_eq!(first.vendor_id(), Some("3918298"));

        let hinted = query.clone().with_team_hint("Jaguars");
        let jags = resolver.resolve(&hinted).await.unwrap();
        assert_eq!(jags.vendor_id(), Some("4000001"));
    }

    #[tokio::test]
    async fn substring_fallback_takes_first_in_oracle_order() {
        let identity = resolver()
            .resolve(&PlayerQuery::by_name("allen").unwrap())
            .await
            .unwrap();
        assert_eq!(identity.league_id(), Some("00-0034857"));
    }

    #[tokio::test]
    async fn misses_are_memoized_as_not_found() {
        let resolver = resolver();
        let query = PlayerQuery::by_name("Nobody Atall").unwrap();
        let err = resolver.resolve(&query).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(resolver.memoized(), 1);

        // Same query modulo case hits the memo.
        let again = PlayerQuery::by_name("NOBODY ATALL").unwrap();
        assert!(resolver.resolve(&again).await.is_err());
        assert_eq!(resolver.memoized(), 1);
    }

    #[tokio::test]
    async fn league_to_vendor_handles_missing_vendor_id() {
        let resolver = resolver();
        assert_eq!(
            resolver.league_to_vendor("00-0033873").await.unwrap().as_deref(),
            Some("3139477")
        );
        assert_eq!(resolver.league_to_vendor("00-0020000").await.unwrap(), None);
        assert_eq!(resolver.league_to_vendor("00-9999999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_oracle_is_not_memoized() {
        let resolver = PlayerResolver::new(Arc::new(CsvFileOracle::new(
            "/nonexistent/gridmark/oracle.csv",
        )));
        let query = PlayerQuery::by_name("Josh Allen").unwrap();
        let err = resolver.resolve(&query).await.unwrap_err();
        assert!(matches!(err.reason, ResolutionReason::OracleUnavailable(_)));
        assert_eq!(resolver.memoized(), 0);
    }

    #[tokio::test]
    async fn lookup_by_id_reads_team_from_oracle() {
        let identity = resolver()
            .lookup_by_id(IdKind::Vendor, "2970000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.team(), Some(TeamKey::Nyg));
    }
}
