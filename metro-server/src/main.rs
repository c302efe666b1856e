use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use metro_server::cache::{CacheConfig, CachedRouter};
use metro_server::graph::{Converter, DEFAULT_AVG_SPEED_KMH, load_graph};
use metro_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

/// Default location of the ETL pipeline's merged edge list.
const DEFAULT_GRAPH_CSV: &str = "data/subway_edges.csv";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Get configuration from environment
    let csv_path =
        std::env::var("METRO_GRAPH_CSV").unwrap_or_else(|_| DEFAULT_GRAPH_CSV.to_string());

    let avg_speed = std::env::var("METRO_AVG_SPEED_KMH")
        .ok()
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(DEFAULT_AVG_SPEED_KMH);

    let listen: SocketAddr = std::env::var("METRO_LISTEN")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    // Load the network; a bad edge list aborts startup, nothing partial
    // is ever served.
    println!("Loading rail graph from {csv_path}...");
    let converter = Converter::new(avg_speed);
    let graph = load_graph(Path::new(&csv_path), converter).unwrap_or_else(|e| {
        eprintln!("Failed to load rail graph from {csv_path}: {e}");
        std::process::exit(1);
    });
    println!(
        "Loaded {} station nodes, {} edges (average speed {avg_speed} km/h)",
        graph.node_count(),
        graph.edge_count()
    );

    // Build app state
    let router = CachedRouter::new(Arc::new(graph), &CacheConfig::default());
    let state = AppState::new(router);

    // Create router
    let app = create_router(state);

    // Bind and serve
    println!("Metro route server listening on http://{listen}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health    - Health check");
    println!("  GET  /stations  - List station nodes");
    println!("  GET  /route     - Shortest route between two stations");
    println!("  POST /meet      - Best meeting station for 2-5 people");

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
