//! Caching layer for single-source cost tables.
//!
//! The graph is immutable for the lifetime of the process, so a full cost
//! table from one source answers every query that starts there: repeated
//! route lookups, and every candidate scan of a meeting-point query. Tables
//! are cached per source node with a TTL and capacity bound.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::domain::{NodeId, QueryError, Route, RouteOutcome};
use crate::engine::{self, CostTable};
use crate::graph::Graph;
use crate::meet::{self, MeetOutcome};

/// Configuration for the cost-table cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached tables.
    pub ttl: Duration,

    /// Maximum number of cached tables (one per source node).
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1024,
        }
    }
}

/// Routing front-end over an immutable graph with cached cost tables.
///
/// All methods take `&self`; the cache is internally synchronized and the
/// graph is never mutated, so one instance serves any number of concurrent
/// queries.
pub struct CachedRouter {
    graph: Arc<Graph>,
    tables: MokaCache<NodeId, Arc<CostTable>>,
}

impl CachedRouter {
    /// Create a router over `graph` with the given cache configuration.
    pub fn new(graph: Arc<Graph>, config: &CacheConfig) -> Self {
        let tables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { graph, tables }
    }

    /// The underlying graph, for operations that bypass the cache.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Full cost table from `source`, computing and caching on miss.
    pub fn cost_table(&self, source: &NodeId) -> Result<Arc<CostTable>, QueryError> {
        if let Some(cached) = self.tables.get(source) {
            return Ok(cached);
        }

        let table = Arc::new(engine::cost_table(&self.graph, source)?);
        self.tables.insert(source.clone(), table.clone());
        Ok(table)
    }

    /// Minimum-time path between two nodes, reusing a cached table for the
    /// source when one is fresh.
    pub fn shortest_path(
        &self,
        source: &NodeId,
        destination: &NodeId,
    ) -> Result<RouteOutcome, QueryError> {
        if !self.graph.contains(source) {
            return Err(QueryError::UnknownNode(source.clone()));
        }
        if !self.graph.contains(destination) {
            return Err(QueryError::UnknownNode(destination.clone()));
        }
        if source == destination {
            return Ok(RouteOutcome::Found(Route::single(source.clone())));
        }

        let table = self.cost_table(source)?;
        engine::reconstruct(&self.graph, &table, destination)
    }

    /// Meeting-point query over cached per-source tables.
    pub fn meeting_point(&self, sources: &[NodeId]) -> Result<MeetOutcome, QueryError> {
        let mut tables = Vec::with_capacity(sources.len());
        for source in sources {
            tables.push(self.cost_table(source)?);
        }
        Ok(meet::select_meeting(&self.graph, tables))
    }

    /// Number of cached tables (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.tables.run_pending_tasks();
        self.tables.entry_count()
    }

    /// Drop every cached table.
    pub fn invalidate_all(&self) {
        self.tables.invalidate_all();
    }
}
